use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct SwaggerQuery {
    filename: Option<String>,
}

/// `GET /swagger`: the OpenAPI description of this surface. A `filename`
/// query parameter asks for it as a download rather than inline JSON
/// (spec.md §6).
pub async fn get_swagger(query: web::Query<SwaggerQuery>) -> HttpResponse {
    let document = json!({
        "openapi": "3.0.3",
        "info": { "title": "migrator", "version": env!("CARGO_PKG_VERSION") },
        "paths": {
            "/version": {},
            "/rdbms/{engine}": {},
            "/rdbms": {},
            "/s3/{engine}": {},
            "/s3": {},
            "/migration:metrics": {},
            "/migration:verify": {},
            "/migrate": {},
            "/sessions": {},
            "/swagger": {},
            "/logging": {},
        },
    });

    let mut response = HttpResponse::Ok();
    if let Some(filename) = &query.filename {
        response.insert_header(("Content-Disposition", format!("attachment; filename=\"{filename}\"")));
    }
    response.json(document)
}
