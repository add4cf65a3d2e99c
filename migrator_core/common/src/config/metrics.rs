use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// One bounded integer metric: a default, an inclusive valid range, and the
/// name used when reporting a validation error. Mirrors the
/// `RANGE_BATCH_SIZE_IN`-style tuples in the original's `pydb_common.py`.
#[derive(Debug, Clone, Copy)]
struct Bound {
    name: &'static str,
    min: i64,
    max: i64,
    default: i64,
}

const BATCH_SIZE_IN: Bound = Bound {
    name: "batch-size-in",
    min: 1_000,
    max: 1_000_000,
    default: 1_000_000,
};
const BATCH_SIZE_OUT: Bound = Bound {
    name: "batch-size-out",
    min: 1_000,
    max: 1_000_000,
    default: 1_000_000,
};
const CHUNK_SIZE: Bound = Bound {
    name: "chunk-size",
    min: 1_024,
    max: 16 * 1024 * 1024,
    default: 1024 * 1024,
};
const INCREMENTAL_SIZE: Bound = Bound {
    name: "incremental-size",
    min: 1_000,
    max: 10_000_000,
    default: 100_000,
};
const LOBDATA_CHANNELS: Bound = Bound {
    name: "lobdata-channels",
    min: 1,
    max: 32,
    default: 1,
};
const PLAINDATA_CHANNELS: Bound = Bound {
    name: "plaindata-channels",
    min: 1,
    max: 32,
    default: 1,
};

/// The six bounded integers that tune a migration's throughput and
/// parallelism (spec.md §3 "Metrics"). `incremental_size` also doubles as
/// the per-channel partition size fed to the channel-partitioning function
/// in `transfer` (spec.md §4.C: "sized by `plaindata_channels` and
/// `plaindata_channel_size`" — the channel size metric is `incremental_size`,
/// there is no separate seventh metric in the data model).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Metrics {
    pub batch_size_in: i64,
    pub batch_size_out: i64,
    pub chunk_size: i64,
    pub incremental_size: i64,
    pub lobdata_channels: i64,
    pub plaindata_channels: i64,
}

impl Default for Metrics {
    fn default() -> Self {
        Metrics {
            batch_size_in: BATCH_SIZE_IN.default,
            batch_size_out: BATCH_SIZE_OUT.default,
            chunk_size: CHUNK_SIZE.default,
            incremental_size: INCREMENTAL_SIZE.default,
            lobdata_channels: LOBDATA_CHANNELS.default,
            plaindata_channels: PLAINDATA_CHANNELS.default,
        }
    }
}

fn validate(bound: Bound, value: i64) -> Result<i64, ConfigError> {
    // -1 on incremental-size means "no limit"; normalized to 0 (spec.md §8
    // Boundary behaviors), bypassing the range check below.
    if bound.name == "incremental-size" && value == -1 {
        return Ok(0);
    }
    if value < bound.min || value > bound.max {
        return Err(ConfigError::out_of_range(format!(
            "{} must be in [{}, {}], got {}",
            bound.name, bound.min, bound.max, value
        )));
    }
    Ok(value)
}

impl Metrics {
    /// Applies a partial patch (as received from `PATCH /migration:metrics`),
    /// validating each present field and leaving absent fields untouched.
    pub fn apply_patch(&mut self, patch: &MetricsPatch) -> Result<(), ConfigError> {
        if let Some(v) = patch.batch_size_in {
            self.batch_size_in = validate(BATCH_SIZE_IN, v)?;
        }
        if let Some(v) = patch.batch_size_out {
            self.batch_size_out = validate(BATCH_SIZE_OUT, v)?;
        }
        if let Some(v) = patch.chunk_size {
            self.chunk_size = validate(CHUNK_SIZE, v)?;
        }
        if let Some(v) = patch.incremental_size {
            self.incremental_size = validate(INCREMENTAL_SIZE, v)?;
        }
        if let Some(v) = patch.lobdata_channels {
            self.lobdata_channels = validate(LOBDATA_CHANNELS, v)?;
        }
        if let Some(v) = patch.plaindata_channels {
            self.plaindata_channels = validate(PLAINDATA_CHANNELS, v)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct MetricsPatch {
    #[serde(rename = "batch-size-in")]
    pub batch_size_in: Option<i64>,
    #[serde(rename = "batch-size-out")]
    pub batch_size_out: Option<i64>,
    #[serde(rename = "chunk-size")]
    pub chunk_size: Option<i64>,
    #[serde(rename = "incremental-size")]
    pub incremental_size: Option<i64>,
    #[serde(rename = "lobdata-channels")]
    pub lobdata_channels: Option<i64>,
    #[serde(rename = "plaindata-channels")]
    pub plaindata_channels: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let m = Metrics::default();
        assert_eq!(m.batch_size_in, 1_000_000);
        assert_eq!(m.chunk_size, 1024 * 1024);
        assert_eq!(m.lobdata_channels, 1);
    }

    #[test]
    fn negative_one_incremental_size_means_unbounded() {
        let mut m = Metrics::default();
        let patch = MetricsPatch {
            incremental_size: Some(-1),
            ..Default::default()
        };
        m.apply_patch(&patch).unwrap();
        assert_eq!(m.incremental_size, 0);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut m = Metrics::default();
        let patch = MetricsPatch {
            plaindata_channels: Some(64),
            ..Default::default()
        };
        assert!(matches!(
            m.apply_patch(&patch),
            Err(ConfigError::OutOfRange { .. })
        ));
    }
}
