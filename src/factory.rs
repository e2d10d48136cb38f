//! Client factories.
//!
//! A `ClientFactory` turns a registered definition into a live client. The
//! registry holds one factory per provider kind, injected at construction.
//! Composite factories resolve other registered clients through the
//! `BuildContext`, which tracks the in-progress resolution chain so
//! delegation cycles fail instead of recursing forever.

use std::sync::Arc;

use async_trait::async_trait;

use crate::client::LlmClient;
use crate::config::{ClientDefinition, ProviderKind};
use crate::error::ClientError;
use crate::registry::ClientRegistry;

/// Factory for one provider kind.
#[async_trait]
pub trait ClientFactory: Send + Sync {
    /// Provider kind this factory builds clients for.
    fn provider(&self) -> ProviderKind;

    /// Build a live client from a registered definition.
    async fn build(
        &self,
        definition: &ClientDefinition,
        ctx: &BuildContext,
    ) -> Result<Arc<dyn LlmClient>, ClientError>;
}

/// Build-time context handed to factories.
#[derive(Clone)]
pub struct BuildContext {
    registry: ClientRegistry,
    /// Names currently being resolved, outermost first.
    chain: Vec<String>,
}

impl BuildContext {
    pub fn new(registry: ClientRegistry) -> Self {
        Self {
            registry,
            chain: Vec::new(),
        }
    }

    /// The registry this build is resolving against.
    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// The resolution chain leading to the current build.
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    /// Resolve another registered client from inside a factory build.
    ///
    /// Composite factories use this instead of going to the registry
    /// directly so that cycles in the delegation graph are detected.
    pub async fn resolve_delegate(&self, name: &str) -> Result<Arc<dyn LlmClient>, ClientError> {
        self.registry.build_with_ctx(name, self).await
    }

    /// Extend the chain with the client about to be built.
    pub(crate) fn enter(&self, name: &str) -> Result<Self, ClientError> {
        if self.chain.iter().any(|n| n == name) {
            let mut chain = self.chain.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(name);
            return Err(ClientError::DelegateCycle { chain });
        }
        let mut next = self.clone();
        next.chain.push(name.to_string());
        Ok(next)
    }
}
