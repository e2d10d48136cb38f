//! # llm-registry - A Named LLM Client Registry
//!
//! llm-registry keeps generated LLM client configurations in a process-wide
//! registry: definitions go in under unique names, handles come out, and the
//! live clients behind them are built lazily through injected provider
//! factories. A built-in `fallback` provider composes registered clients in
//! priority order so a request can fail over from one client to the next.
//!
#![deny(unsafe_code)]
//!
//! ## Features
//!
//! - **Insert-only registration**: a name, once registered, always means the
//!   same definition. Duplicates are rejected, never replaced.
//! - **Lazy resolution**: fallback delegates and retry-policy references may
//!   point at names registered later; they are checked when a handle is
//!   resolved, not when it is created.
//! - **Injected factories**: the registry holds no provider code. Callers
//!   install one `ClientFactory` per provider kind, which keeps the registry
//!   itself free of network and credential concerns.
//! - **No global state**: registries are plain values, cheap to clone, and
//!   passed to whatever loads the generated definitions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_registry::prelude::*;
//!
//! # fn factories() -> Vec<std::sync::Arc<dyn ClientFactory>> { Vec::new() }
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = create_client_registry(factories(), None);
//!
//!     registry.register(ClientDefinition::new(
//!         "AZURE_GPT4",
//!         ProviderOptions::Azure(AzureOptions::new("gpt-4")),
//!     ))?;
//!     let resilient = registry.register(ClientDefinition::fallback(
//!         "ResilientGPT4",
//!         ["AZURE_GPT4", "LARGE_RESPONSE"],
//!     ))?;
//!
//!     // Delegates are resolved when the handle is used, not before.
//!     registry.register(ClientDefinition::new(
//!         "LARGE_RESPONSE",
//!         ProviderOptions::OpenAi(OpenAiOptions::new("gpt-4o")),
//!     ))?;
//!
//!     let response = resilient.ask("Hello!").await?;
//!     println!("{}", response.content);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod factory;
pub mod fallback;
pub mod registry;
pub mod retry;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ChatCapability, LlmClient};
pub use config::{
    AnthropicOptions, AzureOptions, ClientDefinition, DelegateRef, FallbackOptions, OpenAiOptions,
    ProviderKind, ProviderOptions,
};
pub use error::{ClientError, ErrorCategory};
pub use factory::{BuildContext, ClientFactory};
pub use fallback::{FallbackClient, FallbackClientFactory};
pub use registry::helpers::{create_default_registry, create_empty_registry};
pub use registry::{ClientHandle, ClientRegistry, RegistryOptions, create_client_registry};
pub use retry::{RetryPolicy, RetryStrategy};
pub use types::{ChatMessage, ChatRequest, ChatResponse, MessageRole};

/// Everything most callers need, importable in one line.
pub mod prelude {
    pub use crate::client::{ChatCapability, LlmClient};
    pub use crate::config::{
        AnthropicOptions, AzureOptions, ClientDefinition, DelegateRef, FallbackOptions,
        OpenAiOptions, ProviderKind, ProviderOptions,
    };
    pub use crate::error::ClientError;
    pub use crate::factory::{BuildContext, ClientFactory};
    pub use crate::fallback::{FallbackClient, FallbackClientFactory};
    pub use crate::registry::helpers::{create_default_registry, create_empty_registry};
    pub use crate::registry::{
        ClientHandle, ClientRegistry, RegistryOptions, create_client_registry,
    };
    pub use crate::retry::{RetryPolicy, RetryStrategy};
    pub use crate::types::{ChatMessage, ChatRequest, ChatResponse, MessageRole};
}
