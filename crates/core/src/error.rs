use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unit '{0}' not found on the search path")]
    NotFound(String),
    #[error("unit '{0}' denied by load filter")]
    NotAllowed(String),
    #[error("derived artifacts for '{}' and '{}' collide at '{}'", first.display(), second.display(), artifact.display())]
    ArtifactConflict {
        first: PathBuf,
        second: PathBuf,
        artifact: PathBuf,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("unit image error: {0}")]
    Image(String),
}

impl ResolveError {
    /// Whether this failure means "the name is absent", as opposed to a
    /// policy rejection or an I/O fault. Chains fall through on absence.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ResolveError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
