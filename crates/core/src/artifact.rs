//! Derived ("optimized") artifact naming, persistence and derivation.
//!
//! Deriving a unit out of an archive is the expensive step, so the result
//! is written under the configured output directory and reused on later
//! constructions as long as the source archive has not changed. A stale or
//! undecodable artifact is re-derived, never trusted.

use crate::error::{ResolveError, Result};
use crate::image::{UNIT_ENTRY, UnitDef, UnitImage};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;
use xxhash_rust::xxh3::xxh3_64;

/// Extension carried by derived artifacts.
pub const ARTIFACT_EXT: &str = "unit";

/// On-disk artifact format version.
const ARTIFACT_VERSION: u32 = 1;

/// Derived artifact name for `source` under `out_dir`.
///
/// Strips any directory prefix from the source path and its final
/// `.`-delimited extension, appends [`ARTIFACT_EXT`] and prefixes the
/// output directory. Pure: equal inputs always map to equal paths, so
/// sources sharing a basename collide — the resolver rejects such
/// configurations up front.
pub fn output_name(source: &Path, out_dir: &Path) -> PathBuf {
    let base = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = match base.rfind('.') {
        Some(dot) => &base[..dot],
        None => base.as_str(),
    };
    out_dir.join(format!("{stem}.{ARTIFACT_EXT}"))
}

/// Identity stamp of a source archive, embedded in its derived artifact
/// to detect staleness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceStamp(u64);

impl SourceStamp {
    fn of(path: &Path) -> std::io::Result<Self> {
        let meta = fs::metadata(path)?;
        let mtime = meta
            .modified()?
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let key = format!("{}:{}:{}", path.display(), meta.len(), mtime);
        Ok(Self(xxh3_64(key.as_bytes())))
    }
}

/// On-disk layout of a derived artifact: rmp-encoded, zstd-compressed.
#[derive(Debug, Serialize, Deserialize)]
struct ArtifactFile {
    version: u32,
    source_key: u64,
    source_path: String,
    created_at: u64,
    definitions: Vec<UnitDef>,
}

/// A loaded, name-indexed code unit.
pub struct CodeUnit {
    source: PathBuf,
    artifact: PathBuf,
    defs: HashMap<String, Arc<UnitDef>>,
}

impl CodeUnit {
    fn from_defs(source: PathBuf, artifact: PathBuf, defs: Vec<UnitDef>) -> Self {
        let defs = defs
            .into_iter()
            .map(|def| (def.name.clone(), Arc::new(def)))
            .collect();
        Self {
            source,
            artifact,
            defs,
        }
    }

    /// Archive this unit was derived from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Derived artifact backing this unit.
    pub fn artifact(&self) -> &Path {
        &self.artifact
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<UnitDef>> {
        self.defs.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(String::as_str)
    }
}

/// Load the code unit for `source`, reusing the derived artifact at
/// `artifact` when it is still fresh, deriving and writing it otherwise.
pub fn derive_unit(source: &Path, artifact: &Path) -> Result<CodeUnit> {
    let stamp = SourceStamp::of(source)?;

    if let Some(unit) = try_load_cached(source, artifact, stamp) {
        return Ok(unit);
    }

    let image = read_image(source)?;
    write_artifact(source, artifact, stamp, image)
}

fn try_load_cached(source: &Path, artifact: &Path, stamp: SourceStamp) -> Option<CodeUnit> {
    let bytes = fs::read(artifact).ok()?;
    let decompressed = zstd::decode_all(bytes.as_slice()).ok()?;
    let file: ArtifactFile = rmp_serde::from_slice(&decompressed).ok()?;

    if file.version != ARTIFACT_VERSION || file.source_key != stamp.0 {
        debug!("stale artifact {}, re-deriving", artifact.display());
        return None;
    }

    debug!("reusing derived artifact {}", artifact.display());
    Some(CodeUnit::from_defs(
        source.to_path_buf(),
        artifact.to_path_buf(),
        file.definitions,
    ))
}

fn read_image(source: &Path) -> Result<UnitImage> {
    let file = File::open(source)?;
    let mut archive = zip::ZipArchive::new(file)?;
    let mut entry = archive.by_name(UNIT_ENTRY)?;
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut bytes)?;
    UnitImage::decode(&bytes)
}

fn write_artifact(
    source: &Path,
    artifact: &Path,
    stamp: SourceStamp,
    image: UnitImage,
) -> Result<CodeUnit> {
    let created_at = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let file = ArtifactFile {
        version: ARTIFACT_VERSION,
        source_key: stamp.0,
        source_path: source.display().to_string(),
        created_at,
        definitions: image.definitions,
    };

    let encoded = rmp_serde::to_vec(&file)
        .map_err(|e| ResolveError::Image(format!("artifact encode failed: {e}")))?;
    let compressed = zstd::encode_all(encoded.as_slice(), 0)?;

    if let Some(parent) = artifact.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(artifact, compressed)?;
    debug!(
        "derived {} ({} definitions)",
        artifact.display(),
        file.definitions.len()
    );

    Ok(CodeUnit::from_defs(
        source.to_path_buf(),
        artifact.to_path_buf(),
        file.definitions,
    ))
}
