use actix_web::{web, HttpRequest, HttpResponse};
use common::config::MetricsPatch;

use crate::client;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /migration:metrics`: the active session's current throughput
/// metrics, or 204 when the client has no active session.
pub async fn get_metrics(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    let (client_id, _) = client::resolve(&req);
    match state.registry.get_active(&client_id) {
        Some(session) => HttpResponse::Ok().json(session.metrics),
        None => HttpResponse::NoContent().finish(),
    }
}

/// `PATCH /migration:metrics`: applies a partial update, validating each
/// present field against its bounds (spec.md §3 "Metrics").
pub async fn patch_metrics(
    state: web::Data<AppState>,
    req: HttpRequest,
    patch: web::Json<MetricsPatch>,
) -> Result<HttpResponse, ApiError> {
    let (client_id, _) = client::resolve(&req);
    let session = state.registry.get_active(&client_id).ok_or_else(|| ApiError::bad_request("no active session"))?;

    let applied = state.registry.update(&session.session_id, |s| s.metrics.apply_patch(&patch))?;
    applied?;

    let updated = state.registry.get(&session.session_id).expect("just updated under the registry lock");
    Ok(HttpResponse::Ok().json(updated.metrics))
}
