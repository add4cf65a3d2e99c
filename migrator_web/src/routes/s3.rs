use actix_web::{web, HttpResponse};
use common::config::S3SpotConfig;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /s3/{engine}`: mirrors `get_rdbms`, demoting "unconfigured" to 204.
pub async fn get_s3(state: web::Data<AppState>, engine: web::Path<String>) -> HttpResponse {
    let spots = state.spots.lock();
    match spots.get_s3(&engine) {
        Ok(spot) => HttpResponse::Ok().json(spot.redacted()),
        Err(_) => HttpResponse::NoContent().finish(),
    }
}

#[derive(Debug, Deserialize)]
pub struct NamedS3Spot {
    pub key: String,
    #[serde(flatten)]
    pub spot: S3SpotConfig,
}

/// `POST /s3`: registers or replaces one S3 spot.
pub async fn post_s3(state: web::Data<AppState>, body: web::Json<NamedS3Spot>) -> Result<HttpResponse, ApiError> {
    let NamedS3Spot { key, spot } = body.into_inner();
    state.spots.lock().set_s3(key, spot);
    Ok(HttpResponse::Ok().finish())
}
