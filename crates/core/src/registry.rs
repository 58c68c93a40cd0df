//! Explicit constructor registry.
//!
//! Instantiation is driven by registration, not introspection: embedders
//! register a construction closure per qualified name, and the resolver
//! looks the closure up once, at first resolution, caching it inside the
//! returned binding.

use crate::image::UnitDef;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Construction closure for a named unit definition.
pub type Constructor = Arc<dyn Fn(&UnitDef) -> Box<dyn Any + Send + Sync> + Send + Sync>;

/// Maps qualified unit names to construction closures.
#[derive(Default)]
pub struct ConstructorRegistry {
    factories: RwLock<HashMap<String, Constructor>>,
}

impl ConstructorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the constructor for `name`, replacing any previous one.
    pub fn register<F>(&self, name: impl Into<String>, ctor: F)
    where
        F: Fn(&UnitDef) -> Box<dyn Any + Send + Sync> + Send + Sync + 'static,
    {
        self.factories
            .write()
            .unwrap()
            .insert(name.into(), Arc::new(ctor));
    }

    pub fn get(&self, name: &str) -> Option<Constructor> {
        self.factories.read().unwrap().get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.factories.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.read().unwrap().is_empty()
    }
}
