//! A `wiremock`-backed stand-in for an S3-compatible endpoint, letting LOB
//! transfer/sync tests exercise `clients::S3Client` without a real bucket
//! (SPEC_FULL.md §0.4). `wiremock` is already a dev-dependency of the
//! teacher's own `executor` crate; this is the first place in the
//! transformed workspace that actually wires it up.

use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::fixtures::s3_spot;
use common::config::S3SpotConfig;

/// Starts a `MockServer` that answers every request with 200 and an empty
/// body, and returns an `S3SpotConfig` pointed at it. Good enough for
/// exercising request plumbing (the session carries an S3 spot, the
/// adapter connects, PUT/DELETE calls are issued) without asserting on
/// actual object contents; callers needing specific responses should
/// register their own `Mock`s against the returned server before reading
/// `spot`.
pub async fn fake_s3() -> (MockServer, S3SpotConfig) {
    let server = MockServer::start().await;

    Mock::given(method("PUT")).respond_with(ResponseTemplate::new(200)).mount(&server).await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::<u8>::new())).mount(&server).await;
    Mock::given(method("DELETE")).respond_with(ResponseTemplate::new(200)).mount(&server).await;

    let spot = s3_spot(&server.uri());
    (server, spot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_s3_endpoint_answers_put() {
        let (_server, spot) = fake_s3().await;
        let response = reqwest::Client::new()
            .put(format!("{}/test-bucket/key", spot.endpoint_url))
            .body("payload")
            .send()
            .await
            .expect("mock server reachable");
        assert!(response.status().is_success());
    }
}
