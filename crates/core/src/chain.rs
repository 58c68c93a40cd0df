//! Common lookup interface and explicit resolver chaining.

use crate::archive::ResourceLocation;
use crate::error::{ResolveError, Result};
use crate::resolver::{Binding, SearchPathResolver};
use std::path::PathBuf;
use std::sync::Arc;

/// The three lookups every resolver answers.
pub trait UnitResolver: Send + Sync {
    fn resolve_unit(&self, name: &str) -> Result<Binding>;
    fn find_resource(&self, name: &str) -> Option<ResourceLocation>;
    fn find_native_library(&self, name: &str) -> Option<PathBuf>;
}

impl UnitResolver for SearchPathResolver {
    fn resolve_unit(&self, name: &str) -> Result<Binding> {
        SearchPathResolver::resolve_unit(self, name)
    }

    fn find_resource(&self, name: &str) -> Option<ResourceLocation> {
        SearchPathResolver::find_resource(self, name)
    }

    fn find_native_library(&self, name: &str) -> Option<PathBuf> {
        SearchPathResolver::find_native_library(self, name)
    }
}

/// An explicit, ordered list of resolvers tried in sequence.
///
/// Unit lookups fall through to the next link on `NotFound`; a filter
/// denial (or any other failure) is definitive and stops the chain.
/// Resource and native lookups return the first `Some`.
#[derive(Default)]
pub struct ResolverChain {
    links: Vec<Arc<dyn UnitResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a link; earlier links take priority.
    pub fn push(&mut self, link: Arc<dyn UnitResolver>) {
        self.links.push(link);
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl UnitResolver for ResolverChain {
    fn resolve_unit(&self, name: &str) -> Result<Binding> {
        for link in &self.links {
            match link.resolve_unit(name) {
                Err(err) if err.is_not_found() => continue,
                other => return other,
            }
        }
        Err(ResolveError::NotFound(name.to_string()))
    }

    fn find_resource(&self, name: &str) -> Option<ResourceLocation> {
        self.links.iter().find_map(|link| link.find_resource(name))
    }

    fn find_native_library(&self, name: &str) -> Option<PathBuf> {
        self.links
            .iter()
            .find_map(|link| link.find_native_library(name))
    }
}
