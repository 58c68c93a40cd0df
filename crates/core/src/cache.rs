//! Per-resolver cache of resolved bindings and filter decisions.

use crate::error::{ResolveError, Result};
use crate::resolver::Binding;
use std::collections::HashMap;
use std::sync::Mutex;

/// What a lookup settled on for one qualified name.
pub(crate) enum CachedUnit {
    Allowed(Binding),
    Denied,
}

impl CachedUnit {
    fn binding(&self, name: &str) -> Result<Binding> {
        match self {
            CachedUnit::Allowed(binding) => Ok(binding.clone()),
            CachedUnit::Denied => Err(ResolveError::NotAllowed(name.to_string())),
        }
    }
}

/// Maps qualified unit names to their resolved binding and allow/deny
/// decision. Populated lazily, never invalidated.
///
/// Each resolver owns its cache by default; hand the same `Arc` to
/// several resolvers to share decisions. One lock guards the whole map:
/// concurrent probes of the same name must observe a single decision and
/// invoke the filter at most once.
#[derive(Default)]
pub struct UnitCache {
    entries: Mutex<HashMap<String, CachedUnit>>,
}

impl UnitCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of names with a settled decision.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }

    /// Look up `name`, filling the slot with `fill` on a miss.
    ///
    /// The lock is held across `fill`, so two callers racing on the same
    /// name cannot trigger a second filter invocation. A `fill` error
    /// (name absent, archive unreadable) is propagated and not cached —
    /// absence may be answered by another resolver in a chain.
    pub(crate) fn get_or_fill(
        &self,
        name: &str,
        fill: impl FnOnce() -> Result<CachedUnit>,
    ) -> Result<Binding> {
        let mut entries = self.entries.lock().unwrap();

        if let Some(cached) = entries.get(name) {
            return cached.binding(name);
        }

        let computed = fill()?;
        let resolved = computed.binding(name);
        entries.insert(name.to_string(), computed);
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denied_names_are_not_refilled() {
        let cache = UnitCache::new();

        let first = cache.get_or_fill("com.acme.Blocked", || Ok(CachedUnit::Denied));
        assert!(matches!(first, Err(ResolveError::NotAllowed(_))));

        // A second lookup must answer from the cache.
        let second = cache.get_or_fill("com.acme.Blocked", || {
            panic!("fill must not run twice for the same name")
        });
        assert!(matches!(second, Err(ResolveError::NotAllowed(_))));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn fill_errors_are_not_cached() {
        let cache = UnitCache::new();

        let miss = cache.get_or_fill("com.acme.Missing", || {
            Err(ResolveError::NotFound("com.acme.Missing".into()))
        });
        assert!(matches!(miss, Err(ResolveError::NotFound(_))));
        assert!(cache.is_empty());
    }
}
