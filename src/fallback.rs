//! The built-in fallback provider.
//!
//! A fallback client composes other registered clients in priority order.
//! Requests go to the first delegate; on error the next delegate is tried.
//! The first success wins. If every delegate fails, the last error is
//! returned so the caller sees what the final attempt ran into.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::{ChatCapability, LlmClient};
use crate::config::{ClientDefinition, ProviderKind};
use crate::error::ClientError;
use crate::factory::{BuildContext, ClientFactory};
use crate::types::{ChatRequest, ChatResponse};

/// A client that tries its delegates in priority order.
///
/// Delegates are captured as live clients when the fallback is built, so the
/// composite holds no registry reference and caches like any other client.
pub struct FallbackClient {
    name: String,
    delegates: Vec<(String, Arc<dyn LlmClient>)>,
}

impl FallbackClient {
    pub(crate) fn new(name: String, delegates: Vec<(String, Arc<dyn LlmClient>)>) -> Self {
        Self { name, delegates }
    }

    /// Registered name of this fallback client.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Delegate names in priority order.
    pub fn delegate_names(&self) -> Vec<String> {
        self.delegates.iter().map(|(name, _)| name.clone()).collect()
    }
}

#[async_trait]
impl ChatCapability for FallbackClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError> {
        let total = self.delegates.len();
        let mut last_err: Option<ClientError> = None;

        for (index, (delegate_name, delegate)) in self.delegates.iter().enumerate() {
            match delegate.chat(request.clone()).await {
                Ok(response) => {
                    if index > 0 {
                        tracing::debug!(
                            target: "llm_registry::fallback",
                            client = %self.name,
                            delegate = %delegate_name,
                            failed_before = index,
                            "fallback succeeded after earlier delegates failed"
                        );
                    }
                    return Ok(response);
                }
                Err(err) => {
                    tracing::warn!(
                        target: "llm_registry::fallback",
                        client = %self.name,
                        delegate = %delegate_name,
                        attempt = index + 1,
                        total,
                        error = %err,
                        "fallback delegate failed"
                    );
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            ClientError::internal(format!("fallback client '{}' has no delegates", self.name))
        }))
    }
}

impl LlmClient for FallbackClient {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Fallback
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Factory for the fallback provider.
///
/// Resolves every delegate through the build context, so a fallback may be
/// registered before its delegates are. A delegate that is still missing
/// when the fallback is resolved surfaces as `UnresolvedDelegate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackClientFactory;

#[async_trait]
impl ClientFactory for FallbackClientFactory {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Fallback
    }

    async fn build(
        &self,
        definition: &ClientDefinition,
        ctx: &BuildContext,
    ) -> Result<Arc<dyn LlmClient>, ClientError> {
        let options = definition.options.as_fallback().ok_or_else(|| {
            ClientError::invalid_options(format!(
                "definition '{}' is not a fallback definition",
                definition.name
            ))
        })?;

        let mut delegates = Vec::with_capacity(options.strategy.len());
        for delegate_ref in &options.strategy {
            let delegate_name = delegate_ref.client.as_str();
            let client = ctx
                .resolve_delegate(delegate_name)
                .await
                .map_err(|err| match err {
                    ClientError::UnknownClient { name } if name == delegate_name => {
                        ClientError::UnresolvedDelegate {
                            client: definition.name.clone(),
                            delegate: name,
                        }
                    }
                    other => other,
                })?;
            delegates.push((delegate_name.to_string(), client));
        }

        Ok(Arc::new(FallbackClient::new(
            definition.name.clone(),
            delegates,
        )))
    }
}
