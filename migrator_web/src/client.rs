use actix_web::cookie::Cookie;
use actix_web::{HttpMessage, HttpRequest};

pub const CLIENT_ID_COOKIE: &str = "client-id";

/// Reads the `client-id` cookie, minting a fresh one when absent (spec.md
/// §3: "Clients are identified by a cookie `client-id`; if absent, a fresh
/// UUID is issued and returned on the response"). The bool is true when a
/// fresh id was minted, telling the caller to set the cookie on its reply.
pub fn resolve(req: &HttpRequest) -> (String, bool) {
    match req.cookie(CLIENT_ID_COOKIE) {
        Some(cookie) => (cookie.value().to_string(), false),
        None => (sessions::new_client_id(), true),
    }
}

pub fn cookie(client_id: &str) -> Cookie<'static> {
    Cookie::new(CLIENT_ID_COOKIE, client_id.to_string())
}
