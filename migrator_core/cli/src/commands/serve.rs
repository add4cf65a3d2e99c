use std::path::PathBuf;

use clap::Args;

/// Runs the HTTP surface (component H) in the foreground.
#[derive(Args)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    pub addr: String,
    #[arg(long = "spots-file")]
    pub spots_file: Option<PathBuf>,
}

pub fn run(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    migrator_web::init_logging();
    let spots_path = args.spots_file.unwrap_or_else(common::config::default_spots_path);
    let cfg = migrator_web::ServerConfig { addr: args.addr, spots_path: Some(spots_path) };
    migrator_web::serve(cfg)?;
    Ok(())
}
