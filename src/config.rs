//! Client definitions: provider kinds and typed per-provider options.
//!
//! A `ClientDefinition` is pure data. Generated configuration documents
//! deserialize into it directly; the registry validates it at registration
//! and factories consume it when a handle is resolved. Options are a tagged
//! union keyed by the `provider` field, so every kind carries exactly the
//! fields it understands.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Known provider kinds.
///
/// The set is closed: a definition naming anything else is rejected with
/// `UnknownProvider` at registration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Azure,
    Anthropic,
    /// Composes other registered clients in priority order.
    Fallback,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAi => write!(f, "openai"),
            Self::Azure => write!(f, "azure"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Fallback => write!(f, "fallback"),
        }
    }
}

impl ProviderKind {
    /// Parse a provider tag from a configuration document.
    ///
    /// Accepts the canonical tags plus the prefixed aliases older generated
    /// documents carry (`baml-fallback` and friends).
    pub fn parse(tag: &str) -> Result<Self, ClientError> {
        match tag.trim() {
            "openai" | "baml-openai-chat" => Ok(Self::OpenAi),
            "azure" | "baml-azure-chat" => Ok(Self::Azure),
            "anthropic" | "baml-anthropic-chat" => Ok(Self::Anthropic),
            "fallback" | "baml-fallback" => Ok(Self::Fallback),
            other => Err(ClientError::UnknownProvider {
                provider: other.to_string(),
            }),
        }
    }
}

/// A reference to another registered client inside a fallback strategy.
///
/// Kept as a single-field struct to match the generated wire shape
/// `{"client": "NAME"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegateRef {
    pub client: String,
}

impl DelegateRef {
    pub fn new(client: impl Into<String>) -> Self {
        Self {
            client: client.into(),
        }
    }
}

/// Options for an OpenAI chat client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiOptions {
    pub model: String,
    /// Accepted from configuration documents, never written back out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

impl OpenAiOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: None,
            organization: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.model.trim().is_empty() {
            return Err(ClientError::invalid_options("openai options require a model"));
        }
        Ok(())
    }
}

/// Options for an Azure OpenAI chat client.
///
/// The deployment id plays the role of the model name. The endpoint is
/// either given explicitly via `base_url` or derived by the factory from
/// `resource_name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureOptions {
    pub deployment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
}

impl AzureOptions {
    pub fn new(deployment: impl Into<String>) -> Self {
        Self {
            deployment: deployment.into(),
            resource_name: None,
            base_url: None,
            api_version: None,
            api_key: None,
        }
    }

    pub fn with_resource_name(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = Some(resource_name.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.deployment.trim().is_empty() {
            return Err(ClientError::invalid_options(
                "azure options require a deployment",
            ));
        }
        Ok(())
    }
}

/// Options for an Anthropic chat client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicOptions {
    pub model: String,
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl AnthropicOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            base_url: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.model.trim().is_empty() {
            return Err(ClientError::invalid_options(
                "anthropic options require a model",
            ));
        }
        Ok(())
    }
}

/// Options for a fallback client: other registered clients in priority order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackOptions {
    pub strategy: Vec<DelegateRef>,
}

impl FallbackOptions {
    pub fn new<I, S>(delegates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strategy: delegates.into_iter().map(DelegateRef::new).collect(),
        }
    }

    /// Delegate names in priority order.
    pub fn delegate_names(&self) -> Vec<String> {
        self.strategy.iter().map(|d| d.client.clone()).collect()
    }

    fn validate(&self) -> Result<(), ClientError> {
        if self.strategy.is_empty() {
            return Err(ClientError::invalid_options(
                "fallback strategy must list at least one delegate",
            ));
        }
        if self.strategy.iter().any(|d| d.client.trim().is_empty()) {
            return Err(ClientError::invalid_options(
                "fallback delegate names must not be empty",
            ));
        }
        Ok(())
    }
}

/// Typed per-provider options, tagged by provider kind.
///
/// On the wire the tag and the payload sit side by side, which is the shape
/// generated documents use:
/// `{"provider": "fallback", "options": {"strategy": [...]}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "options")]
pub enum ProviderOptions {
    #[serde(rename = "openai", alias = "baml-openai-chat")]
    OpenAi(OpenAiOptions),
    #[serde(rename = "azure", alias = "baml-azure-chat")]
    Azure(AzureOptions),
    #[serde(rename = "anthropic", alias = "baml-anthropic-chat")]
    Anthropic(AnthropicOptions),
    #[serde(rename = "fallback", alias = "baml-fallback")]
    Fallback(FallbackOptions),
}

impl ProviderOptions {
    /// The provider kind these options belong to.
    pub fn provider_kind(&self) -> ProviderKind {
        match self {
            Self::OpenAi(_) => ProviderKind::OpenAi,
            Self::Azure(_) => ProviderKind::Azure,
            Self::Anthropic(_) => ProviderKind::Anthropic,
            Self::Fallback(_) => ProviderKind::Fallback,
        }
    }

    /// Borrow the fallback options, if this is a fallback definition.
    pub fn as_fallback(&self) -> Option<&FallbackOptions> {
        match self {
            Self::Fallback(opts) => Some(opts),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        match self {
            Self::OpenAi(opts) => opts.validate(),
            Self::Azure(opts) => opts.validate(),
            Self::Anthropic(opts) => opts.validate(),
            Self::Fallback(opts) => opts.validate(),
        }
    }
}

/// A named client definition: the unit generated configuration documents
/// register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientDefinition {
    pub name: String,
    /// Name of a separately registered retry policy, resolved lazily.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<String>,
    #[serde(flatten)]
    pub options: ProviderOptions,
}

impl ClientDefinition {
    pub fn new(name: impl Into<String>, options: ProviderOptions) -> Self {
        Self {
            name: name.into(),
            retry_policy: None,
            options,
        }
    }

    /// Convenience for the common fallback definition.
    pub fn fallback<I, S>(name: impl Into<String>, delegates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, ProviderOptions::Fallback(FallbackOptions::new(delegates)))
    }

    pub fn with_retry_policy(mut self, policy: impl Into<String>) -> Self {
        self.retry_policy = Some(policy.into());
        self
    }

    pub fn provider(&self) -> ProviderKind {
        self.options.provider_kind()
    }

    /// Check the definition before it enters the registry.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.name.trim().is_empty() {
            return Err(ClientError::InvalidName(
                "client name must not be empty".to_string(),
            ));
        }
        self.options.validate()
    }
}
