//! Scriptable chat clients and factories for integration tests.
//!
//! Goals:
//! - Stand in for real provider clients without any network
//! - Count calls and builds through per-instance shared counters, so a test
//!   can hand a mock to the registry and keep reading its counts
//! - Let one factory serve different scripts per definition name

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use llm_registry::prelude::*;

/// A chat client with a fixed script: always reply or always fail.
#[derive(Clone)]
pub struct MockChatClient {
    provider: ProviderKind,
    reply: Result<String, String>,
    calls: Arc<AtomicUsize>,
}

impl MockChatClient {
    pub fn replying(provider: ProviderKind, reply: &str) -> Self {
        Self {
            provider,
            reply: Ok(reply.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(provider: ProviderKind, message: &str) -> Self {
        Self {
            provider,
            reply: Err(message.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of chat calls this client (and its clones) have served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCapability for MockChatClient {
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

impl LlmClient for MockChatClient {
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
pub struct ScriptedFactory {
    provider: ProviderKind,
    default: MockChatClient,
    scripts: HashMap<String, MockChatClient>,
    builds: Arc<AtomicUsize>,
}

impl ScriptedFactory {
    pub fn new(provider: ProviderKind, default: MockChatClient) -> Self {
        Self {
            provider,
            default,
            scripts: HashMap::new(),
            builds: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn replying(provider: ProviderKind, reply: &str) -> Self {
        Self::new(provider, MockChatClient::replying(provider, reply))
    }

    /// Use `client` for definitions named `name` instead of the default.
    pub fn script(mut self, name: &str, client: MockChatClient) -> Self {
        self.scripts.insert(name.to_string(), client);
        self
    }

    /// Number of clients this factory (and its clones) have built.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientFactory for ScriptedFactory {
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

/// Registry wired with scripted openai, azure, and fallback factories.
pub fn scripted_registry(
    openai: ScriptedFactory,
    azure: ScriptedFactory,
) -> llm_registry::ClientRegistry {
    create_client_registry(
        vec![
            Arc::new(openai) as Arc<dyn ClientFactory>,
            Arc::new(azure) as Arc<dyn ClientFactory>,
            Arc::new(FallbackClientFactory) as Arc<dyn ClientFactory>,
        ],
        None,
    )
}
