//! Provider registry and sequence resolution

use super::entities::Provider;
use std::collections::HashMap;

/// Read-only lookup from provider identifier to provider configuration.
///
/// Iteration follows first-insertion order. Registering an id twice keeps
/// its original position but the later configuration.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Provider>,
    order: Vec<String>,
}

/// Outcome of resolving an ordered list of provider ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSequence {
    /// Enabled providers, in sequence order
    pub providers: Vec<Provider>,
    /// Ids that were dropped (unknown or disabled)
    pub skipped: Vec<String>,
}

impl ResolvedSequence {
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl ProviderRegistry {
    pub fn new(providers: impl IntoIterator<Item = Provider>) -> Self {
        let mut registry = Self::default();
        for provider in providers {
            registry.insert(provider);
        }
        registry
    }

    fn insert(&mut self, provider: Provider) {
        if !self.providers.contains_key(&provider.id) {
            self.order.push(provider.id.clone());
        }
        self.providers.insert(provider.id.clone(), provider);
    }

    pub fn get(&self, id: &str) -> Option<&Provider> {
        self.providers.get(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All providers in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.order.iter().filter_map(|id| self.providers.get(id))
    }

    /// Enabled providers in registration order
    pub fn enabled(&self) -> impl Iterator<Item = &Provider> {
        self.iter().filter(|p| p.enabled)
    }

    /// Resolve an ordered id list into enabled provider configurations.
    ///
    /// Ids without an enabled match are dropped without error; callers decide
    /// whether the remaining sequence is long enough. Repeated ids resolve
    /// repeatedly, so one provider may fill several positions.
    pub fn resolve_sequence<S: AsRef<str>>(&self, ids: &[S]) -> ResolvedSequence {
        let mut resolved = ResolvedSequence::default();
        for id in ids {
            let id = id.as_ref();
            match self.providers.get(id) {
                Some(provider) if provider.enabled => resolved.providers.push(provider.clone()),
                _ => resolved.skipped.push(id.to_string()),
            }
        }
        resolved
    }
}
