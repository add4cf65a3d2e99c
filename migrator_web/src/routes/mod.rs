pub mod logging;
pub mod metrics;
pub mod migrate;
pub mod rdbms;
pub mod s3;
pub mod sessions;
pub mod swagger;
pub mod version;

use actix_web::web;

/// Wires spec.md §6's HTTP surface, plus the `/sessions` lifecycle
/// endpoints the data model requires but §6's table omits (see DESIGN.md).
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/version", web::get().to(version::get_version))
        .route("/rdbms/{engine}", web::get().to(rdbms::get_rdbms))
        .route("/rdbms", web::post().to(rdbms::post_rdbms))
        .route("/s3/{engine}", web::get().to(s3::get_s3))
        .route("/s3", web::post().to(s3::post_s3))
        .route("/migration:metrics", web::get().to(metrics::get_metrics))
        .route("/migration:metrics", web::patch().to(metrics::patch_metrics))
        .route("/migration:verify", web::post().to(migrate::verify))
        .route("/migrate", web::post().to(migrate::start))
        .route("/migrate", web::delete().to(migrate::abort))
        .route("/sessions", web::post().to(sessions::create))
        .route("/sessions", web::delete().to(sessions::destroy))
        .route("/swagger", web::get().to(swagger::get_swagger))
        .route("/logging", web::get().to(logging::get_logging));
}
