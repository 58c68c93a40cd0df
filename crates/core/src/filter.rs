//! Allow/deny filtering of resolved units.

use crate::image::UnitDef;

/// Predicate deciding whether a named unit may be loaded.
///
/// Consulted the first time a name is resolved; the decision is cached
/// per name in the resolver's [`UnitCache`](crate::cache::UnitCache) and
/// the predicate is never re-invoked for that name.
pub trait LoadFilter: Send + Sync {
    fn allow(&self, name: &str, def: &UnitDef) -> bool;
}

impl<F> LoadFilter for F
where
    F: Fn(&str, &UnitDef) -> bool + Send + Sync,
{
    fn allow(&self, name: &str, def: &UnitDef) -> bool {
        self(name, def)
    }
}
