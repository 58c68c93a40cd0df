//! Ordered multi-archive search path resolution.

use crate::archive::{ArchiveHandle, ResourceLocation};
use crate::artifact::{self, CodeUnit};
use crate::cache::{CachedUnit, UnitCache};
use crate::error::{ResolveError, Result};
use crate::filter::LoadFilter;
use crate::image::UnitDef;
use crate::native::{NativeSearchPath, split_path_list};
use crate::registry::{Constructor, ConstructorRegistry};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// One configured archive location.
///
/// The archive handle and the derived unit are acquired independently: a
/// resource-only archive serves resources without a unit, and a readable
/// unit survives a corrupt resource directory. Either failure degrades to
/// `None` instead of failing construction.
pub struct SearchPathEntry {
    source: PathBuf,
    artifact: PathBuf,
    archive: Option<ArchiveHandle>,
    unit: Option<CodeUnit>,
}

impl SearchPathEntry {
    fn open(source: PathBuf, artifact: PathBuf) -> Self {
        if !source.is_file() {
            debug!("search path entry not found: {}", source.display());
            return Self {
                source,
                artifact,
                archive: None,
                unit: None,
            };
        }

        let archive = match ArchiveHandle::open(&source) {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("failed opening '{}': {err}", source.display());
                None
            }
        };

        // May be a resource-only archive; keep serving resources.
        let unit = match artifact::derive_unit(&source, &artifact) {
            Ok(unit) => Some(unit),
            Err(err) => {
                warn!("failed deriving unit for '{}': {err}", source.display());
                None
            }
        };

        Self {
            source,
            artifact,
            archive,
            unit,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Derived artifact name for this entry, present even when derivation
    /// failed.
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    pub fn archive(&self) -> Option<&ArchiveHandle> {
        self.archive.as_ref()
    }

    pub fn unit(&self) -> Option<&CodeUnit> {
        self.unit.as_ref()
    }
}

/// A successfully resolved code unit.
#[derive(Clone)]
pub struct Binding {
    pub name: String,
    /// Archive the definition came from.
    pub source: PathBuf,
    pub def: Arc<UnitDef>,
    ctor: Option<Constructor>,
}

impl Binding {
    /// Construct an instance through the registered constructor, if one
    /// was registered for this name.
    pub fn instantiate(&self) -> Option<Box<dyn Any + Send + Sync>> {
        self.ctor.as_ref().map(|ctor| ctor(&self.def))
    }

    pub fn has_constructor(&self) -> bool {
        self.ctor.is_some()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("source", &self.source)
            .field("constructor", &self.ctor.is_some())
            .finish()
    }
}

/// Resolves code units, resources and native libraries against an
/// ordered archive search path, deriving and caching per-archive
/// artifacts under an output directory.
///
/// Entry order is lookup priority: the first archive containing a name
/// wins, regardless of call order or repetition.
pub struct SearchPathResolver {
    entries: Vec<SearchPathEntry>,
    native_path: NativeSearchPath,
    cache: Arc<UnitCache>,
    filter: Option<Arc<dyn LoadFilter>>,
    registry: Option<Arc<ConstructorRegistry>>,
}

impl std::fmt::Debug for SearchPathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPathResolver")
            .field("entries", &self.entries.len())
            .field("has_filter", &self.filter.is_some())
            .field("has_registry", &self.registry.is_some())
            .finish()
    }
}

impl SearchPathResolver {
    /// Open every archive on `archive_paths` (a delimiter-separated
    /// list) and derive its cached unit under `output_dir`.
    ///
    /// Individual archives that cannot be opened or derived degrade to
    /// absent handles; construction fails only on missing arguments or
    /// on two sources whose derived artifacts would collide.
    pub fn new(
        archive_paths: &str,
        output_dir: impl AsRef<Path>,
        native_paths: Option<&str>,
    ) -> Result<Self> {
        let output_dir = output_dir.as_ref();
        if output_dir.as_os_str().is_empty() {
            return Err(ResolveError::InvalidArgument(
                "output directory is unset".into(),
            ));
        }

        let sources: Vec<PathBuf> = split_path_list(archive_paths)
            .into_iter()
            .map(PathBuf::from)
            .collect();
        if sources.is_empty() {
            return Err(ResolveError::InvalidArgument(
                "archive path list is empty".into(),
            ));
        }

        // Sources sharing a basename would overwrite each other's derived
        // artifact; reject the configuration before touching any archive.
        let mut by_artifact: HashMap<PathBuf, &PathBuf> = HashMap::new();
        for source in &sources {
            let artifact = artifact::output_name(source, output_dir);
            if let Some(first) = by_artifact.insert(artifact.clone(), source) {
                return Err(ResolveError::ArtifactConflict {
                    first: first.clone(),
                    second: source.clone(),
                    artifact,
                });
            }
        }

        let entries = sources
            .into_iter()
            .map(|source| {
                let artifact = artifact::output_name(&source, output_dir);
                SearchPathEntry::open(source, artifact)
            })
            .collect();

        Ok(Self {
            entries,
            native_path: NativeSearchPath::new(native_paths),
            cache: Arc::new(UnitCache::new()),
            filter: None,
            registry: None,
        })
    }

    /// Attach an allow/deny filter, consulted once per distinct name.
    pub fn set_filter(&mut self, filter: Arc<dyn LoadFilter>) {
        self.filter = Some(filter);
    }

    /// Attach a constructor registry for [`Binding::instantiate`].
    pub fn set_registry(&mut self, registry: Arc<ConstructorRegistry>) {
        self.registry = Some(registry);
    }

    /// Replace the unit cache, e.g. to share decisions across resolvers.
    pub fn set_cache(&mut self, cache: Arc<UnitCache>) {
        self.cache = cache;
    }

    pub fn entries(&self) -> &[SearchPathEntry] {
        &self.entries
    }

    pub fn native_path(&self) -> &NativeSearchPath {
        &self.native_path
    }

    /// Resolve a code unit by qualified name.
    ///
    /// Scans entries in configured order and returns the first match;
    /// fails with [`ResolveError::NotFound`] when no entry has the name
    /// and [`ResolveError::NotAllowed`] when the filter denied it.
    pub fn resolve_unit(&self, name: &str) -> Result<Binding> {
        self.cache.get_or_fill(name, || {
            let (def, source) = self
                .entries
                .iter()
                .filter_map(|entry| entry.unit.as_ref())
                .find_map(|unit| unit.get(name).map(|def| (def, unit.source().to_path_buf())))
                .ok_or_else(|| ResolveError::NotFound(name.to_string()))?;

            if let Some(filter) = &self.filter {
                if !filter.allow(name, &def) {
                    debug!("load filter denied '{name}'");
                    return Ok(CachedUnit::Denied);
                }
            }

            let ctor = self.registry.as_ref().and_then(|r| r.get(name));
            debug!("resolved '{}' from {}", name, source.display());
            Ok(CachedUnit::Allowed(Binding {
                name: name.to_string(),
                source,
                def,
                ctor,
            }))
        })
    }

    /// Locate a resource by exact member name.
    ///
    /// Absence is a normal outcome, not a fault: a miss across all
    /// entries is `None`.
    pub fn find_resource(&self, name: &str) -> Option<ResourceLocation> {
        for entry in &self.entries {
            if let Some(archive) = &entry.archive {
                if archive.contains(name) {
                    debug!("found resource '{}' in {}", name, entry.source.display());
                    return Some(ResourceLocation {
                        archive: entry.source.clone(),
                        entry: name.to_string(),
                    });
                }
            }
        }
        None
    }

    /// Read a resource's bytes out of the first archive that has it.
    pub fn read_resource(&self, name: &str) -> Result<Option<Vec<u8>>> {
        for entry in &self.entries {
            if let Some(archive) = &entry.archive {
                if archive.contains(name) {
                    return archive.read(name).map(Some);
                }
            }
        }
        Ok(None)
    }

    /// Probe the native search path for a bare library name.
    pub fn find_native_library(&self, name: &str) -> Option<PathBuf> {
        self.native_path.find(name)
    }
}
