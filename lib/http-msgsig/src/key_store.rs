use crate::crypto::{Algorithm, VerifyingKey, VerifyingOperation};
use moka::sync::Cache;
use std::{collections::HashMap, fmt, sync::Arc};

/// Resolver for key IDs that weren't registered up front
///
/// Called synchronously, whenever the store encounters a key ID it doesn't know yet.
/// Returning `None` marks the key as unknown for this attempt. Misses aren't cached.
pub trait VerifyingKeyResolver: Send + Sync {
    /// Look up the key
    fn resolve(&self, key_id: &str) -> Option<VerifyingKey>;
}

impl<F> VerifyingKeyResolver for F
where
    F: Fn(&str) -> Option<VerifyingKey> + Send + Sync,
{
    fn resolve(&self, key_id: &str) -> Option<VerifyingKey> {
        self(key_id)
    }
}

/// Key known to the store
#[derive(Debug)]
pub struct KeyEntry {
    key_id: String,
    key: VerifyingKey,
}

impl KeyEntry {
    fn new(key_id: String, key: VerifyingKey) -> Self {
        Self { key_id, key }
    }

    /// Key ID
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Algorithm bound to the key, if any
    #[must_use]
    pub fn algorithm(&self) -> Option<Algorithm> {
        self.key.algorithm()
    }

    /// Start a fresh verifying operation
    #[must_use]
    pub fn operation(&self) -> VerifyingOperation<'_> {
        self.key.operation()
    }
}

/// Store of verifying keys
///
/// Statically registered keys take precedence. Keys handed out by the resolver are cached for the lifetime of
/// the store, which means the first key the resolver returns for a key ID sticks.
pub struct KeyStore {
    static_keys: HashMap<String, Arc<KeyEntry>>,
    resolved_keys: Cache<String, Arc<KeyEntry>>,
    resolver: Option<Box<dyn VerifyingKeyResolver>>,
}

impl Default for KeyStore {
    fn default() -> Self {
        Self {
            static_keys: HashMap::new(),
            resolved_keys: Cache::builder().name("resolved-keys").build(),
            resolver: None,
        }
    }
}

impl KeyStore {
    /// Construct an empty store without a resolver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct an empty store that consults the resolver for unknown key IDs
    #[must_use]
    pub fn with_resolver<R>(resolver: R) -> Self
    where
        R: VerifyingKeyResolver + 'static,
    {
        Self {
            resolver: Some(Box::new(resolver)),
            ..Self::default()
        }
    }

    /// Register a key
    ///
    /// Registering a key ID twice replaces the earlier key
    pub fn insert(&mut self, key_id: impl Into<String>, key: VerifyingKey) -> &mut Self {
        let key_id = key_id.into();
        let entry = Arc::new(KeyEntry::new(key_id.clone(), key));
        self.static_keys.insert(key_id, entry);
        self
    }

    /// Resolve the key ID
    #[instrument(skip(self))]
    pub fn resolve(&self, key_id: &str) -> Option<Arc<KeyEntry>> {
        if let Some(entry) = self.static_keys.get(key_id) {
            return Some(Arc::clone(entry));
        }

        let resolver = self.resolver.as_ref()?;

        // Concurrent lookups of the same key ID are coalesced into one resolver call
        let entry = self
            .resolved_keys
            .optionally_get_with_by_ref(key_id, || {
                debug!("resolving key");
                resolver
                    .resolve(key_id)
                    .map(|key| Arc::new(KeyEntry::new(key_id.to_string(), key)))
            });

        if entry.is_none() {
            debug!("resolver doesn't know the key");
        }

        entry
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("static_keys", &self.static_keys.len())
            .field("resolved_keys", &self.resolved_keys.entry_count())
            .field("has_resolver", &self.resolver.is_some())
            .finish()
    }
}
