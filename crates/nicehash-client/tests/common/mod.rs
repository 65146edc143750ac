/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for nicehash-client tests

use nicehash_client::{ConfigOverrides, NicehashClient, endpoints};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SERVER_TIME: i64 = 1_700_000_000_000;

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Serve the time endpoint, expecting exactly `times` hits
pub async fn mount_server_time(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path(endpoints::TIME))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"serverTime": SERVER_TIME}))
                .set_delay(std::time::Duration::from_millis(20)),
        )
        .expect(times)
        .mount(server)
        .await;
}

/// Credentials used across tests
pub fn test_overrides() -> ConfigOverrides {
    ConfigOverrides::default()
        .with_credentials("test-key", "test-secret")
        .with_organization_id("test-org")
}

/// Client with test credentials pointed at the mock server
pub fn signed_client(server: &MockServer) -> NicehashClient {
    NicehashClient::with_config_and_base_url(test_overrides().resolve_with(|_| None), &server.uri())
        .expect("client init")
}
