pub mod loader;
pub mod metrics;
pub mod spots;

pub use loader::{default_spots_path, load_spots};
pub use metrics::{Metrics, MetricsPatch};
pub use spots::{RdbmsKind, RdbmsSpotConfig, S3SpotConfig, SpotsConfig};
