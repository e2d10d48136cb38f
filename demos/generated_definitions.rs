// Loading generated client documents into a registry.
//
// The JSON below mirrors what the configuration generator emits for each
// client: a name, a provider tag, an optional retry-policy reference, and a
// provider-shaped options payload. Registration turns the documents into
// typed definitions; validation then checks every cross-reference.
//
// To run:
//   cargo run --example generated_definitions

use std::sync::Arc;

use async_trait::async_trait;
use llm_registry::prelude::*;

/// Echo client standing in for a real provider backend.
struct EchoClient {
    name: String,
    provider: ProviderKind,
}

#[async_trait]
impl ChatCapability for EchoClient {
    async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse, ClientError> {
        Ok(ChatResponse::new(format!("[{}] ok", self.name)))
    }
}

impl LlmClient for EchoClient {
    fn provider(&self) -> ProviderKind {
        self.provider
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

struct EchoFactory {
    provider: ProviderKind,
}

#[async_trait]
impl ClientFactory for EchoFactory {
    fn provider(&self) -> ProviderKind {
        self.provider
    }

    async fn build(
        &self,
        definition: &ClientDefinition,
        _ctx: &BuildContext,
    ) -> Result<Arc<dyn LlmClient>, ClientError> {
        Ok(Arc::new(EchoClient {
            name: definition.name.clone(),
            provider: self.provider,
        }))
    }
}

const GENERATED: &str = r#"[
  {
    "name": "AZURE_DEFAULT",
    "provider": "baml-azure-chat",
    "options": { "deployment": "gpt-35-turbo-default" }
  },
  {
    "name": "AZURE_GPT4",
    "provider": "baml-azure-chat",
    "options": { "deployment": "gpt-4" }
  },
  {
    "name": "LARGE_RESPONSE",
    "provider": "baml-openai-chat",
    "options": { "model": "gpt-4-32k" }
  },
  {
    "name": "CLAUDE",
    "provider": "baml-anthropic-chat",
    "options": { "model": "claude-3-5-sonnet-latest" }
  },
  {
    "name": "ResilientGPT4",
    "retry_policy": "DefaultRetry",
    "provider": "baml-fallback",
    "options": {
      "strategy": [
        { "client": "AZURE_DEFAULT" },
        { "client": "AZURE_GPT4" },
        { "client": "LARGE_RESPONSE" }
      ]
    }
  }
]"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let registry = create_client_registry(
        vec![
            Arc::new(EchoFactory {
                provider: ProviderKind::OpenAi,
            }) as Arc<dyn ClientFactory>,
            Arc::new(EchoFactory {
                provider: ProviderKind::Azure,
            }) as Arc<dyn ClientFactory>,
            Arc::new(EchoFactory {
                provider: ProviderKind::Anthropic,
            }) as Arc<dyn ClientFactory>,
            Arc::new(FallbackClientFactory) as Arc<dyn ClientFactory>,
        ],
        None,
    );

    let definitions: Vec<ClientDefinition> = serde_json::from_str(GENERATED)?;
    let handles = registry.register_all(definitions)?;
    println!(
        "loaded {} clients: {:?}",
        handles.len(),
        registry.client_names()
    );

    // The fallback document references this policy by name.
    registry.register_retry_policy(
        "DefaultRetry",
        RetryPolicy::exponential_backoff(3, 200, 10_000, 1.5),
    )?;
    registry.validate()?;
    println!("all cross-references check out");

    let resilient = registry.client("ResilientGPT4")?;
    if let Some(policy) = resilient.retry_policy()? {
        println!(
            "retry policy: {} retries, first delay {:?}",
            policy.max_retries,
            policy.delay_for_attempt(0)
        );
    }

    let response = resilient.ask("hello").await?;
    println!("ResilientGPT4> {}", response.content);

    Ok(())
}
