use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// `GET /version`: the engine's own crate version.
pub async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}
