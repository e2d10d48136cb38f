//! Client handles.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{ChatCapability, LlmClient};
use crate::config::{ClientDefinition, ProviderKind};
use crate::error::ClientError;
use crate::registry::ClientRegistry;
use crate::retry::RetryPolicy;
use crate::types::{ChatRequest, ChatResponse};

/// Handle to a registered client.
///
/// Returned by registration and lookup. The handle carries the definition
/// snapshot and a registry reference; the live client is built lazily on
/// first resolution and cached in the registry. A handle can be used
/// directly as a chat client.
#[derive(Clone)]
pub struct ClientHandle {
    name: String,
    definition: Arc<ClientDefinition>,
    registry: ClientRegistry,
}

impl ClientHandle {
    pub(crate) fn new(definition: Arc<ClientDefinition>, registry: ClientRegistry) -> Self {
        Self {
            name: definition.name.clone(),
            definition,
            registry,
        }
    }

    /// Registered name of this client.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider kind of the underlying definition.
    pub fn provider(&self) -> ProviderKind {
        self.definition.provider()
    }

    /// The registered definition.
    pub fn definition(&self) -> &ClientDefinition {
        &self.definition
    }

    /// Resolve the live client, building it if it is not cached.
    ///
    /// This is where lazy references are checked: a fallback delegate that
    /// is still unregistered fails here with `UnresolvedDelegate`.
    pub async fn resolve(&self) -> Result<Arc<dyn LlmClient>, ClientError> {
        self.registry.resolve(&self.name).await
    }

    /// Resolve the retry policy this definition references, if any.
    ///
    /// Like delegates, the reference is checked lazily: `UnknownRetryPolicy`
    /// means the referenced policy has not been registered yet.
    pub fn retry_policy(&self) -> Result<Option<Arc<RetryPolicy>>, ClientError> {
        match &self.definition.retry_policy {
            None => Ok(None),
            Some(policy_name) => match self.registry.retry_policy(policy_name) {
                Some(policy) => Ok(Some(policy)),
                None => Err(ClientError::UnknownRetryPolicy {
                    name: policy_name.clone(),
                }),
            },
        }
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientHandle")
            .field("name", &self.name)
            .field("provider", &self.definition.provider())
            .finish()
    }
}

#[async_trait]
impl ChatCapability for ClientHandle {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError> {
        let client = self.resolve().await?;
        client.chat(request).await
    }
}

impl LlmClient for ClientHandle {
    fn provider(&self) -> ProviderKind {
        self.definition.provider()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
