use crate::config::spots::{RdbmsKind, RdbmsSpotConfig, S3SpotConfig, SpotsConfig};
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// On-disk shape of the spots file: one `[rdbms.<engine>]` and
/// `[s3.<engine>]` table per configured spot, loaded with `toml`. Passwords
/// and secret keys may also be supplied via `<ENGINE>_PWD` /
/// `<ENGINE>_SECRET_KEY` environment variables, which take precedence over
/// the file so that credentials need not be committed to disk.
#[derive(Debug, Deserialize, Default)]
struct SpotsFile {
    #[serde(default)]
    rdbms: std::collections::HashMap<String, RdbmsFileEntry>,
    #[serde(default)]
    s3: std::collections::HashMap<String, S3FileEntry>,
}

#[derive(Debug, Deserialize)]
struct RdbmsFileEntry {
    engine: String,
    name: String,
    host: String,
    port: u16,
    user: String,
    #[serde(default)]
    pwd: String,
    #[serde(default)]
    client: Option<String>,
    #[serde(default)]
    driver: Option<String>,
}

#[derive(Debug, Deserialize)]
struct S3FileEntry {
    endpoint_url: String,
    bucket_name: String,
    access_key: String,
    #[serde(default)]
    secret_key: String,
    #[serde(default)]
    region_name: Option<String>,
    #[serde(default)]
    secure_access: bool,
}

pub fn load_spots(path: Option<&Path>) -> Result<SpotsConfig, ConfigError> {
    let mut config = SpotsConfig::default();
    let Some(path) = path else {
        return Ok(config);
    };
    if !path.exists() {
        return Ok(config);
    }
    let contents = std::fs::read_to_string(path)?;
    let parsed: SpotsFile = toml::from_str(&contents)?;

    for (key, entry) in parsed.rdbms {
        let engine = RdbmsKind::parse(&entry.engine)?;
        let pwd = std::env::var(format!("{}_PWD", key.to_ascii_uppercase())).unwrap_or(entry.pwd);
        config.set_rdbms(
            key,
            RdbmsSpotConfig {
                engine,
                name: entry.name,
                host: entry.host,
                port: entry.port,
                user: entry.user,
                pwd,
                client: entry.client,
                driver: entry.driver,
            },
        );
    }

    for (key, entry) in parsed.s3 {
        let secret_key = std::env::var(format!("{}_SECRET_KEY", key.to_ascii_uppercase()))
            .unwrap_or(entry.secret_key);
        config.set_s3(
            key.clone(),
            S3SpotConfig {
                engine: key,
                endpoint_url: entry.endpoint_url,
                bucket_name: entry.bucket_name,
                access_key: entry.access_key,
                secret_key,
                region_name: entry.region_name,
                secure_access: entry.secure_access,
            },
        );
    }

    Ok(config)
}

pub fn default_spots_path() -> PathBuf {
    std::env::var("MIGRATOR_SPOTS_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("spots.toml"))
}
