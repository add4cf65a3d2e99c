use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// `GET /logging`: a passthrough stub reporting the active `tracing`
/// filter, standing in for the sink-configuration surface this engine
/// doesn't otherwise expose (spec.md §6).
pub async fn get_logging() -> impl Responder {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    HttpResponse::Ok().json(json!({ "filter": filter }))
}
