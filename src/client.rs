//! Client traits.
//!
//! Defines the interface registered clients expose, with dynamic dispatch
//! support. Factories return `Arc<dyn LlmClient>`; the registry and handles
//! only ever talk to clients through these traits.

use async_trait::async_trait;

use crate::config::ProviderKind;
use crate::error::ClientError;
use crate::types::{ChatRequest, ChatResponse};

/// Chat capability.
#[async_trait]
pub trait ChatCapability: Send + Sync {
    /// Send a chat request and wait for the full response.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError>;

    /// Convenience: send a single user message.
    async fn ask(&self, content: &str) -> Result<ChatResponse, ClientError> {
        self.chat(ChatRequest::user(content)).await
    }
}

/// Unified client interface.
pub trait LlmClient: ChatCapability + Send + Sync {
    /// Provider kind this client was built for.
    fn provider(&self) -> ProviderKind;

    /// Get as Any for dynamic casting.
    fn as_any(&self) -> &dyn std::any::Any;
}
