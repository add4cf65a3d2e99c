//! The HTTP surface for the migration engine (spec.md §6), grounded on the
//! teacher's `foundry_backend` bootstrap -- the same `HttpServer::new` /
//! CORS / `Logger` shape, generalized from a single manifest-serving
//! endpoint to the full spots/session/migrate surface.

mod client;
mod error;
mod params;
mod routes;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use parking_lot::Mutex;

pub use state::AppState;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub spots_path: Option<PathBuf>,
}

/// Installs the `env_logger`/`log` backend `actix_web::middleware::Logger`
/// writes through, independent of the `tracing` subscriber `logging::init_tracing`
/// installs for the rest of the engine (spec.md §0.2: the web surface keeps
/// the teacher's own logging stack rather than being folded into `tracing`).
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

pub async fn run_server(cfg: ServerConfig) -> std::io::Result<()> {
    let spots = common::config::load_spots(cfg.spots_path.as_deref())
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))?;

    let state = web::Data::new(AppState {
        spots: Arc::new(Mutex::new(spots)),
        registry: Arc::new(sessions::Registry::new()),
    });

    log::info!("starting migrator_web on {}", cfg.addr);

    HttpServer::new(move || {
        let cors = Cors::default().allow_any_origin().allow_any_method().allow_any_header().max_age(3600);

        App::new().wrap(Logger::default()).wrap(cors).app_data(state.clone()).configure(routes::configure)
    })
    .bind(cfg.addr)?
    .run()
    .await
}

/// Runs [`run_server`] to completion on its own actix runtime, for callers
/// (the `cli` binary) that aren't already inside an async context.
pub fn serve(cfg: ServerConfig) -> std::io::Result<()> {
    actix_web::rt::System::new().block_on(run_server(cfg))
}
