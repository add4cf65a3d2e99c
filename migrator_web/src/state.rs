use std::sync::Arc;

use common::config::SpotsConfig;
use parking_lot::Mutex;
use sessions::Registry;

/// Shared process state, handed to every worker thread's `App` factory
/// closure as one `web::Data<AppState>`: the configured RDBMS/S3 spots
/// table and the session registry (component F).
#[derive(Clone)]
pub struct AppState {
    pub spots: Arc<Mutex<SpotsConfig>>,
    pub registry: Arc<Registry>,
}
