//! Random-access archive handles and inside-archive addressing.

use crate::error::Result;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use zip::ZipArchive;

/// An opened archive on the search path.
///
/// The member-name set is captured at open time so membership checks never
/// contend on the underlying reader; member reads serialize on the
/// archive's own lock. The file handle is released when the owning
/// resolver is dropped.
pub struct ArchiveHandle {
    path: PathBuf,
    names: HashSet<String>,
    zip: Mutex<ZipArchive<File>>,
}

impl ArchiveHandle {
    /// Open `path` as a random-access archive.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let zip = ZipArchive::new(file)?;
        let names = zip.file_names().map(str::to_owned).collect();

        Ok(Self {
            path: path.to_path_buf(),
            names,
            zip: Mutex::new(zip),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the archive has a member with exactly this name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn member_count(&self) -> usize {
        self.names.len()
    }

    /// Read a member's bytes out of the archive.
    pub fn read(&self, name: &str) -> Result<Vec<u8>> {
        let mut zip = self.zip.lock().unwrap();
        let mut entry = zip.by_name(name)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl fmt::Debug for ArchiveHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveHandle")
            .field("path", &self.path)
            .field("members", &self.names.len())
            .finish()
    }
}

/// Inside-archive address of a resource: the owning archive plus the
/// member path within it. Not a filesystem path — opening the member is
/// the embedding runtime's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceLocation {
    pub archive: PathBuf,
    pub entry: String,
}

impl fmt::Display for ResourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!/{}", self.archive.display(), self.entry)
    }
}
