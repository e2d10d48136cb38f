//! The client registry.
//!
//! Maps client names to definitions and retry-policy names to policies, and
//! builds live clients through injected factories when a handle is resolved.
//! There is no process-global instance: construct a registry with
//! `create_client_registry` (or a helper) and pass it to whatever loads the
//! generated definitions.
//!
//! Both maps are insert-only. Registration takes the write lock across the
//! uniqueness check and the insert, so concurrent startup registration
//! cannot race two definitions under one name. Built clients live in a
//! bounded LRU cache with an optional TTL, shared by every handle.

pub mod handle;
pub mod helpers;


pub use handle::ClientHandle;

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use lru::LruCache;
use tokio::sync::Mutex as TokioMutex;

use crate::client::LlmClient;
use crate::config::{ClientDefinition, ProviderKind};
use crate::error::ClientError;
use crate::factory::{BuildContext, ClientFactory};
use crate::retry::RetryPolicy;

/// Cache entry with TTL support.
struct CacheEntry {
    client: Arc<dyn LlmClient>,
    created_at: Instant,
}

impl CacheEntry {
    fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            client,
            created_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        if let Some(ttl) = ttl {
            self.created_at.elapsed() > ttl
        } else {
            false
        }
    }
}

/// Options for creating a client registry.
#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    /// Maximum number of cached clients (LRU eviction when exceeded).
    pub max_cache_entries: Option<usize>,
    /// Time-to-live for cached clients (None = no expiration).
    pub client_ttl: Option<Duration>,
}

/// A registered definition plus bookkeeping.
struct RegisteredClient {
    definition: Arc<ClientDefinition>,
    registered_at: DateTime<Utc>,
}

struct RegistryInner {
    /// Registered client definitions (insert-only).
    clients: RwLock<HashMap<String, RegisteredClient>>,
    /// Registered retry policies (insert-only, separate namespace).
    retry_policies: RwLock<HashMap<String, Arc<RetryPolicy>>>,
    /// Installed factories, one per provider kind.
    factories: HashMap<ProviderKind, Arc<dyn ClientFactory>>,
    /// LRU cache of built clients (key: client name).
    client_cache: TokioMutex<LruCache<String, CacheEntry>>,
    /// TTL for cached clients.
    client_ttl: Option<Duration>,
}

/// The client registry.
///
/// Cheap to clone; all state is shared behind an `Arc`.
#[derive(Clone)]
pub struct ClientRegistry {
    inner: Arc<RegistryInner>,
}

impl ClientRegistry {
    /// Register a client definition and return a handle bound to its name.
    ///
    /// The definition is validated first. Names are unique: a second
    /// registration under the same name fails with `DuplicateName` and
    /// leaves the first registration in place.
    pub fn register(&self, definition: ClientDefinition) -> Result<ClientHandle, ClientError> {
        definition.validate()?;
        let name = definition.name.clone();
        let provider = definition.provider();
        let definition = Arc::new(definition);

        let mut clients = self.clients_write()?;
        if clients.contains_key(&name) {
            return Err(ClientError::DuplicateName { name });
        }
        clients.insert(
            name.clone(),
            RegisteredClient {
                definition: definition.clone(),
                registered_at: Utc::now(),
            },
        );
        drop(clients);

        tracing::debug!(
            target: "llm_registry::registry",
            client = %name,
            provider = %provider,
            retry_policy = ?definition.retry_policy,
            "registered client"
        );

        Ok(ClientHandle::new(definition, self.clone()))
    }

    /// Register from the raw pieces a generated document carries: a name, a
    /// provider tag, an optional retry-policy name, and an untyped options
    /// payload.
    ///
    /// The payload is decoded into the typed options for the provider kind;
    /// a shape mismatch fails with `InvalidOptions` and an unrecognized tag
    /// with `UnknownProvider`.
    pub fn register_raw(
        &self,
        name: impl Into<String>,
        provider: &str,
        retry_policy: Option<&str>,
        options: serde_json::Value,
    ) -> Result<ClientHandle, ClientError> {
        let name = name.into();
        let kind = ProviderKind::parse(provider)?;
        let options = decode_options(&name, kind, options)?;

        let mut definition = ClientDefinition::new(name, options);
        if let Some(policy) = retry_policy {
            definition = definition.with_retry_policy(policy);
        }
        self.register(definition)
    }

    /// Register a batch of definitions in order, stopping at the first error.
    pub fn register_all(
        &self,
        definitions: impl IntoIterator<Item = ClientDefinition>,
    ) -> Result<Vec<ClientHandle>, ClientError> {
        let mut handles = Vec::new();
        for definition in definitions {
            handles.push(self.register(definition)?);
        }
        Ok(handles)
    }

    /// Register a named retry policy.
    pub fn register_retry_policy(
        &self,
        name: impl Into<String>,
        policy: RetryPolicy,
    ) -> Result<(), ClientError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ClientError::InvalidName(
                "retry policy name must not be empty".to_string(),
            ));
        }

        let mut policies = self.policies_write()?;
        if policies.contains_key(&name) {
            return Err(ClientError::DuplicateName { name });
        }
        policies.insert(name.clone(), Arc::new(policy));
        drop(policies);

        tracing::debug!(
            target: "llm_registry::registry",
            policy = %name,
            "registered retry policy"
        );
        Ok(())
    }

    /// Look up a handle for a registered client.
    pub fn client(&self, name: &str) -> Result<ClientHandle, ClientError> {
        let definition = self.lookup(name)?;
        Ok(ClientHandle::new(definition, self.clone()))
    }

    /// Whether a client is registered under this name.
    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .clients
            .read()
            .map(|clients| clients.contains_key(name))
            .unwrap_or(false)
    }

    /// Registered client names, sorted.
    pub fn client_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .clients
            .read()
            .map(|clients| clients.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// The stored definition for a client, if registered.
    pub fn definition(&self, name: &str) -> Option<Arc<ClientDefinition>> {
        self.inner
            .clients
            .read()
            .ok()
            .and_then(|clients| clients.get(name).map(|c| c.definition.clone()))
    }

    /// When a client was registered, if it is.
    pub fn registered_at(&self, name: &str) -> Option<DateTime<Utc>> {
        self.inner
            .clients
            .read()
            .ok()
            .and_then(|clients| clients.get(name).map(|c| c.registered_at))
    }

    /// A registered retry policy, if present.
    pub fn retry_policy(&self, name: &str) -> Option<Arc<RetryPolicy>> {
        self.inner
            .retry_policies
            .read()
            .ok()
            .and_then(|policies| policies.get(name).cloned())
    }

    /// Number of registered clients.
    pub fn len(&self) -> usize {
        self.inner
            .clients
            .read()
            .map(|clients| clients.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the live client for a registered name, building it through
    /// the factory for its provider kind if it is not cached.
    pub async fn resolve(&self, name: &str) -> Result<Arc<dyn LlmClient>, ClientError> {
        let ctx = BuildContext::new(self.clone());
        self.build_with_ctx(name, &ctx).await
    }

    /// Check every lazy reference in the registry.
    ///
    /// Intended as an end-of-load step after all generated documents have
    /// registered: every retry-policy reference must name a registered
    /// policy, every fallback delegate must name a registered client, and
    /// fallback delegation must be acyclic. Nothing is built.
    pub fn validate(&self) -> Result<(), ClientError> {
        let definitions: Vec<Arc<ClientDefinition>> = {
            let clients = self.clients_read()?;
            clients.values().map(|c| c.definition.clone()).collect()
        };

        for definition in &definitions {
            if let Some(policy) = &definition.retry_policy {
                if self.retry_policy(policy).is_none() {
                    return Err(ClientError::UnknownRetryPolicy {
                        name: policy.clone(),
                    });
                }
            }
            if let Some(fallback) = definition.options.as_fallback() {
                for delegate in &fallback.strategy {
                    if !self.contains(&delegate.client) {
                        return Err(ClientError::UnresolvedDelegate {
                            client: definition.name.clone(),
                            delegate: delegate.client.clone(),
                        });
                    }
                }
            }
        }

        // Delegation graph must be acyclic.
        let mut done: HashSet<String> = HashSet::new();
        for definition in &definitions {
            self.walk_delegates(definition, &mut Vec::new(), &mut done)?;
        }
        Ok(())
    }

    fn walk_delegates(
        &self,
        definition: &ClientDefinition,
        chain: &mut Vec<String>,
        done: &mut HashSet<String>,
    ) -> Result<(), ClientError> {
        if done.contains(&definition.name) {
            return Ok(());
        }
        if chain.iter().any(|n| n == &definition.name) {
            let mut rendered = chain.join(" -> ");
            rendered.push_str(" -> ");
            rendered.push_str(&definition.name);
            return Err(ClientError::DelegateCycle { chain: rendered });
        }

        if let Some(fallback) = definition.options.as_fallback() {
            chain.push(definition.name.clone());
            for delegate in &fallback.strategy {
                if let Some(next) = self.definition(&delegate.client) {
                    self.walk_delegates(&next, chain, done)?;
                }
            }
            chain.pop();
        }
        done.insert(definition.name.clone());
        Ok(())
    }

    /// Build (or fetch from cache) the client for `name` inside an ongoing
    /// resolution. Composite factories re-enter here through
    /// `BuildContext::resolve_delegate`.
    pub(crate) async fn build_with_ctx(
        &self,
        name: &str,
        parent: &BuildContext,
    ) -> Result<Arc<dyn LlmClient>, ClientError> {
        let ctx = parent.enter(name)?;

        let mut cache = self.inner.client_cache.lock().await;
        if let Some(entry) = cache.get(name) {
            if !entry.is_expired(self.inner.client_ttl) {
                return Ok(entry.client.clone());
            }
            // Expired - remove it
            cache.pop(name);
        }
        // Release the lock before the factory call: composite builds resolve
        // their delegates back through this method.
        drop(cache);

        let definition = self.lookup(name)?;
        let provider = definition.provider();
        let factory = self
            .inner
            .factories
            .get(&provider)
            .ok_or_else(|| ClientError::NoFactory {
                provider: provider.to_string(),
            })?;

        tracing::debug!(
            target: "llm_registry::registry",
            client = %name,
            provider = %provider,
            "building client"
        );
        let client = factory.build(&definition, &ctx).await?;

        let mut cache = self.inner.client_cache.lock().await;
        cache.put(name.to_string(), CacheEntry::new(client.clone()));
        Ok(client)
    }

    fn lookup(&self, name: &str) -> Result<Arc<ClientDefinition>, ClientError> {
        let clients = self.clients_read()?;
        clients
            .get(name)
            .map(|c| c.definition.clone())
            .ok_or_else(|| ClientError::UnknownClient {
                name: name.to_string(),
            })
    }

    fn clients_read(
        &self,
    ) -> Result<RwLockReadGuard<'_, HashMap<String, RegisteredClient>>, ClientError> {
        self.inner
            .clients
            .read()
            .map_err(|_| ClientError::internal("client registry lock poisoned"))
    }

    fn clients_write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, RegisteredClient>>, ClientError> {
        self.inner
            .clients
            .write()
            .map_err(|_| ClientError::internal("client registry lock poisoned"))
    }

    fn policies_write(
        &self,
    ) -> Result<RwLockWriteGuard<'_, HashMap<String, Arc<RetryPolicy>>>, ClientError> {
        self.inner
            .retry_policies
            .write()
            .map_err(|_| ClientError::internal("retry policy lock poisoned"))
    }
}

fn decode_options(
    name: &str,
    kind: ProviderKind,
    options: serde_json::Value,
) -> Result<crate::config::ProviderOptions, ClientError> {
    use crate::config::ProviderOptions;

    let decoded = match kind {
        ProviderKind::OpenAi => serde_json::from_value(options).map(ProviderOptions::OpenAi),
        ProviderKind::Azure => serde_json::from_value(options).map(ProviderOptions::Azure),
        ProviderKind::Anthropic => serde_json::from_value(options).map(ProviderOptions::Anthropic),
        ProviderKind::Fallback => serde_json::from_value(options).map(ProviderOptions::Fallback),
    };
    decoded
        .map_err(|err| ClientError::invalid_options(format!("{kind} options for '{name}': {err}")))
}

/// Create a client registry.
///
/// # Arguments
/// * `factories` - Factory instances, keyed internally by their provider kind
/// * `opts` - Optional registry configuration (cache size, TTL)
///
/// A factory listed later wins if two report the same provider kind.
pub fn create_client_registry(
    factories: Vec<Arc<dyn ClientFactory>>,
    opts: Option<RegistryOptions>,
) -> ClientRegistry {
    let opts = opts.unwrap_or_default();

    let mut table: HashMap<ProviderKind, Arc<dyn ClientFactory>> = HashMap::new();
    for factory in factories {
        table.insert(factory.provider(), factory);
    }

    // Create LRU cache with specified capacity (default: 100 entries)
    let cache_capacity = opts.max_cache_entries.unwrap_or(100);
    let cache =
        LruCache::new(NonZeroUsize::new(cache_capacity).expect("cache capacity must be > 0"));

    ClientRegistry {
        inner: Arc::new(RegistryInner {
            clients: RwLock::new(HashMap::new()),
            retry_policies: RwLock::new(HashMap::new()),
            factories: table,
            client_cache: TokioMutex::new(cache),
            client_ttl: opts.client_ttl,
        }),
    }
}
