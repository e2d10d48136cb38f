//! Registry convenience helpers.

use std::sync::Arc;

use crate::factory::ClientFactory;
use crate::fallback::FallbackClientFactory;
use crate::registry::{ClientRegistry, RegistryOptions, create_client_registry};

/// Create a registry with the built-in fallback factory installed.
///
/// Concrete provider factories still have to be injected by the caller;
/// composition is the only provider this crate ships. Pass the extra
/// factories to `create_client_registry` together with
/// `FallbackClientFactory` when you need both.
pub fn create_default_registry() -> ClientRegistry {
    create_client_registry(vec![Arc::new(FallbackClientFactory) as Arc<dyn ClientFactory>], None)
}

/// Create an empty registry: no factories, default cache options.
///
/// Useful when the registry is only used to hold and validate definitions,
/// or when every factory comes from the caller.
pub fn create_empty_registry() -> ClientRegistry {
    create_client_registry(Vec::new(), Some(RegistryOptions::default()))
}
