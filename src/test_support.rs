//! Test support helpers (crate-internal).
//!
//! Scriptable mock clients and factories shared by the unit tests. Counters
//! are per-instance and shared across clones, so a test can hand a mock to
//! the registry and keep reading its counts.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::client::{ChatCapability, LlmClient};
use crate::config::{ClientDefinition, ProviderKind};
use crate::error::ClientError;
use crate::factory::{BuildContext, ClientFactory};
use crate::types::{ChatRequest, ChatResponse};

/// A chat client with a fixed script: always reply or always fail.
#[derive(Clone)]
pub(crate) struct MockClient {
    provider: ProviderKind,
    reply: Result<String, String>,
    calls: Arc<AtomicUsize>,
}

impl MockClient {
    pub(crate) fn replying(reply: &str) -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            reply: Ok(reply.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            reply: Err(message.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCapability for MockClient {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(content) => Ok(ChatResponse::new(content.clone())),
            Err(message) => Err(ClientError::provider_error(
                self.provider.to_string(),
                message.clone(),
            )),
        }
    }
}

impl LlmClient for MockClient {
    fn provider(&self) -> ProviderKind {
        self.provider
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Factory that hands out clones of scripted clients, counting builds.
///
/// Builds the default client unless a script was attached for the
/// definition's name.
#[derive(Clone)]
pub(crate) struct MockClientFactory {
    provider: ProviderKind,
    default: MockClient,
    scripts: HashMap<String, MockClient>,
    builds: Arc<AtomicUsize>,
}

impl MockClientFactory {
    pub(crate) fn new(provider: ProviderKind, default: MockClient) -> Self {
        Self {
            provider,
            default,
            scripts: HashMap::new(),
            builds: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn replying(provider: ProviderKind, reply: &str) -> Self {
        Self::new(provider, MockClient::replying(reply))
    }

    /// Use `client` for definitions named `name` instead of the default.
    pub(crate) fn script(mut self, name: &str, client: MockClient) -> Self {
        self.scripts.insert(name.to_string(), client);
        self
    }

    pub(crate) fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientFactory for MockClientFactory {
    fn provider(&self) -> ProviderKind {
        self.provider
    }

    async fn build(
        &self,
        definition: &ClientDefinition,
        _ctx: &BuildContext,
    ) -> Result<Arc<dyn LlmClient>, ClientError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let client = self
            .scripts
            .get(&definition.name)
            .unwrap_or(&self.default)
            .clone();
        Ok(Arc::new(client))
    }
}
