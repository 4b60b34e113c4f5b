//! Send seam shared by the HTTP client and its callers.

use crate::types::{DispatchResult, MessageRequest};
use async_trait::async_trait;

/// Anything that can dispatch a built request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageDispatcher: Send + Sync {
    /// Send `request` once and report the outcome.
    async fn send(&self, request: &MessageRequest) -> DispatchResult;
}
