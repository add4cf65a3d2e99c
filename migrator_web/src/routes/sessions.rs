//! `POST`/`DELETE /sessions`: session lifecycle endpoints implied by
//! spec.md §3's data model ("created on POST /sessions ... destroyed by
//! DELETE") but not listed as rows in §6's HTTP surface table. Exposed here
//! so the documented lifecycle actually has an entry point; see DESIGN.md.

use actix_web::{web, HttpRequest, HttpResponse};

use crate::client;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn create(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let (client_id, minted) = client::resolve(&req);
    let session_id = uuid::Uuid::new_v4().to_string();
    state.registry.create(&client_id, &session_id)?;

    let mut response = HttpResponse::Ok();
    if minted {
        response.cookie(client::cookie(&client_id));
    }
    Ok(response.json(serde_json::json!({ "session_id": session_id })))
}

pub async fn destroy(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    let (client_id, _) = client::resolve(&req);
    let session = state.registry.get_active(&client_id).ok_or_else(|| ApiError::bad_request("no active session"))?;
    state.registry.delete(&session.session_id)?;
    Ok(HttpResponse::Ok().finish())
}
