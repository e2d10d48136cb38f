// Fallback composition walkthrough: one handle, three delegates, no network.
//
// A simulated factory stands in for real provider backends so the failover
// path is visible without credentials. Watch the warn logs as the azure
// delegates fail and the request lands on the large-context client.
//
// To run:
//   cargo run --example resilient_fallback

use std::sync::Arc;

use async_trait::async_trait;
use llm_registry::prelude::*;

/// Simulated chat client: replies with its name, or fails if marked down.
struct SimulatedClient {
    name: String,
    provider: ProviderKind,
    down: bool,
}

#[async_trait]
impl ChatCapability for SimulatedClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ClientError> {
        if self.down {
            return Err(ClientError::provider_error(
                self.provider.to_string(),
                format!("{} is down for maintenance", self.name),
            ));
        }
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or("");
        Ok(ChatResponse::new(format!("[{}] answering: {prompt}", self.name)))
    }
}

impl LlmClient for SimulatedClient {
    fn provider(&self) -> ProviderKind {
        self.provider
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

/// Factory that builds simulated clients; names listed in `outages` fail.
struct SimulatedFactory {
    provider: ProviderKind,
    outages: Vec<&'static str>,
}

impl SimulatedFactory {
    fn new(provider: ProviderKind, outages: Vec<&'static str>) -> Self {
        Self { provider, outages }
    }
}

#[async_trait]
impl ClientFactory for SimulatedFactory {
    fn provider(&self) -> ProviderKind {
        self.provider
    }

    async fn build(
        &self,
        definition: &ClientDefinition,
        _ctx: &BuildContext,
    ) -> Result<Arc<dyn LlmClient>, ClientError> {
        Ok(Arc::new(SimulatedClient {
            name: definition.name.clone(),
            provider: self.provider,
            down: self.outages.contains(&definition.name.as_str()),
        }))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("llm_registry=debug")),
        )
        .init();

    // Both azure deployments are down in this simulation.
    let registry = create_client_registry(
        vec![
            Arc::new(SimulatedFactory::new(
                ProviderKind::Azure,
                vec!["AZURE_DEFAULT", "AZURE_GPT4"],
            )) as Arc<dyn ClientFactory>,
            Arc::new(SimulatedFactory::new(ProviderKind::OpenAi, vec![])) as Arc<dyn ClientFactory>,
            Arc::new(FallbackClientFactory) as Arc<dyn ClientFactory>,
        ],
        None,
    );

    registry.register(ClientDefinition::new(
        "AZURE_DEFAULT",
        ProviderOptions::Azure(AzureOptions::new("gpt-35-turbo-default")),
    ))?;
    registry.register(ClientDefinition::new(
        "AZURE_GPT4",
        ProviderOptions::Azure(AzureOptions::new("gpt-4")),
    ))?;
    registry.register(ClientDefinition::new(
        "LARGE_RESPONSE",
        ProviderOptions::OpenAi(OpenAiOptions::new("gpt-4-32k")),
    ))?;
    let resilient = registry.register(ClientDefinition::fallback(
        "ResilientGPT4",
        ["AZURE_DEFAULT", "AZURE_GPT4", "LARGE_RESPONSE"],
    ))?;

    println!("registered clients: {:?}", registry.client_names());

    let response = resilient.ask("What should we do about the outage?").await?;
    println!("ResilientGPT4> {}", response.content);

    Ok(())
}
