//! Error types for the client registry.
//!
//! All fallible operations in this crate return `ClientError`. Registration
//! errors surface immediately to the caller: a definition that fails
//! validation is a defect in the artifact that produced it, not a runtime
//! condition to recover from. Resolution errors surface when a handle is
//! first resolved, which is where lazy name references are checked.

use thiserror::Error;

/// Errors reported by the client registry and its clients.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Something is already registered under this name in the target
    /// namespace (client or retry policy).
    #[error("Duplicate name: {name}")]
    DuplicateName { name: String },

    /// The provider tag does not name a known provider kind.
    #[error("Unknown provider: {provider}")]
    UnknownProvider { provider: String },

    /// The options payload does not fit the provider kind.
    #[error("Invalid client options: {0}")]
    InvalidOptions(String),

    /// The client name is empty or otherwise unusable.
    #[error("Invalid client name: {0}")]
    InvalidName(String),

    /// No client is registered under the requested name.
    #[error("Unknown client: {name}")]
    UnknownClient { name: String },

    /// A fallback strategy references a delegate that is not registered.
    #[error("Fallback client '{client}' references unregistered delegate '{delegate}'")]
    UnresolvedDelegate { client: String, delegate: String },

    /// A definition references a retry policy that is not registered.
    #[error("Unknown retry policy: {name}")]
    UnknownRetryPolicy { name: String },

    /// Fallback delegation loops back on itself.
    #[error("Fallback delegation cycle: {chain}")]
    DelegateCycle { chain: String },

    /// No factory is installed for the definition's provider kind.
    #[error("No factory registered for provider: {provider}")]
    NoFactory { provider: String },

    /// A live client (or fallback delegate) failed while serving a request.
    #[error("Provider error ({provider}): {message}")]
    ProviderError { provider: String, message: String },

    /// The requested operation is not supported by this client.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Coarse classification of a `ClientError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The definition was rejected when it was registered.
    Registration,
    /// A name reference failed to resolve against the registry.
    Resolution,
    /// A resolved client failed while serving a request.
    Invocation,
    /// Serialization and internal errors.
    Other,
}

impl ClientError {
    /// Create an invalid-options error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions(message.into())
    }

    /// Create a provider error.
    pub fn provider_error(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DuplicateName { .. }
            | Self::UnknownProvider { .. }
            | Self::InvalidOptions(_)
            | Self::InvalidName(_) => ErrorCategory::Registration,
            Self::UnknownClient { .. }
            | Self::UnresolvedDelegate { .. }
            | Self::UnknownRetryPolicy { .. }
            | Self::DelegateCycle { .. }
            | Self::NoFactory { .. } => ErrorCategory::Resolution,
            Self::ProviderError { .. } | Self::UnsupportedOperation(_) => ErrorCategory::Invocation,
            Self::JsonError(_) | Self::InternalError(_) => ErrorCategory::Other,
        }
    }

    /// Whether this error points at a defective configuration rather than a
    /// runtime condition. Registration and resolution errors are fixed by
    /// correcting the definitions, not by retrying.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Registration | ErrorCategory::Resolution
        )
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = ClientError::DuplicateName {
            name: "ResilientGPT4".to_string(),
        };
        assert_eq!(err.to_string(), "Duplicate name: ResilientGPT4");

        let err = ClientError::UnresolvedDelegate {
            client: "ResilientGPT4".to_string(),
            delegate: "AZURE_GPT4".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Fallback client 'ResilientGPT4' references unregistered delegate 'AZURE_GPT4'"
        );
    }

    #[test]
    fn test_categories() {
        let dup = ClientError::DuplicateName {
            name: "A".to_string(),
        };
        assert_eq!(dup.category(), ErrorCategory::Registration);
        assert!(dup.is_config_error());

        let unresolved = ClientError::UnresolvedDelegate {
            client: "A".to_string(),
            delegate: "B".to_string(),
        };
        assert_eq!(unresolved.category(), ErrorCategory::Resolution);
        assert!(unresolved.is_config_error());

        let provider = ClientError::provider_error("openai", "boom");
        assert_eq!(provider.category(), ErrorCategory::Invocation);
        assert!(!provider.is_config_error());
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::JsonError(_)));
    }
}
