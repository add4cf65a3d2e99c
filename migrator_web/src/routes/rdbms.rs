use actix_web::{web, HttpResponse};
use common::config::RdbmsSpotConfig;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /rdbms/{engine}`: reads a configured RDBMS spot with its password
/// stripped. An unconfigured engine is a silent 204, not an error (spec.md
/// §6: "a 404 on GET is silently demoted to 204").
pub async fn get_rdbms(state: web::Data<AppState>, engine: web::Path<String>) -> HttpResponse {
    let spots = state.spots.lock();
    match spots.get_rdbms(&engine) {
        Ok(spot) => HttpResponse::Ok().json(spot.redacted()),
        Err(_) => HttpResponse::NoContent().finish(),
    }
}

#[derive(Debug, Deserialize)]
pub struct NamedRdbmsSpot {
    pub key: String,
    #[serde(flatten)]
    pub spot: RdbmsSpotConfig,
}

/// `POST /rdbms`: registers or replaces one RDBMS spot.
pub async fn post_rdbms(state: web::Data<AppState>, body: web::Json<NamedRdbmsSpot>) -> Result<HttpResponse, ApiError> {
    let NamedRdbmsSpot { key, spot } = body.into_inner();
    state.spots.lock().set_rdbms(key, spot);
    Ok(HttpResponse::Ok().finish())
}
