//! Common test utilities for integration tests.

use flashchat_client::DispatchClient;
use std::time::Duration;
use wiremock::MockServer;

/// Start a mock FlashChat gateway.
pub async fn mock_gateway() -> MockServer {
    MockServer::start().await
}

/// Create a dispatch client configured for a mock gateway.
pub fn test_client(mock_server: &MockServer) -> DispatchClient {
    DispatchClient::new(mock_server.uri(), "test-secret", Duration::from_secs(5)).unwrap()
}
