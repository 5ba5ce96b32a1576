//! File mirror: every stored write is copied to a plain-text file under a
//! per-type directory so the user's documents stay readable outside the service.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::document::DocumentKind;

pub const BIOGRAPHY_DIR: &str = "biography";
pub const PROMPTS_DIR: &str = "prompts";

/// Path segments the router claims for actions under documents and prompts.
/// A stored item with one of these names could never be fetched or deleted.
const RESERVED_NAMES: [&str; 2] = ["import", "reset"];

const MIRROR_DIRS: [&str; 5] = [
    "resumes",
    "cover_letters",
    "job_descriptions",
    BIOGRAPHY_DIR,
    PROMPTS_DIR,
];

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    #[error("Name {0:?} is reserved")]
    ReservedName(String),

    #[error("File system error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone)]
pub struct FileMirror {
    base_dir: PathBuf,
}

impl FileMirror {
    /// Creates the mirror and its subdirectories.
    pub async fn init(base_dir: impl Into<PathBuf>) -> Result<Self, MirrorError> {
        let base_dir = base_dir.into();
        for dir in MIRROR_DIRS {
            tokio::fs::create_dir_all(base_dir.join(dir)).await?;
        }
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Writes `content` to `<base>/<dir>/<name>.txt` and returns the path.
    pub async fn write(&self, dir: &str, name: &str, content: &str) -> Result<PathBuf, MirrorError> {
        let path = self.path_for(dir, name)?;
        tokio::fs::write(&path, content).await?;
        Ok(path)
    }

    pub async fn write_document(
        &self,
        kind: DocumentKind,
        name: &str,
        content: &str,
    ) -> Result<PathBuf, MirrorError> {
        self.write(kind.mirror_dir(), name, content).await
    }

    /// Removes a mirrored file. Returns false when there was nothing to remove.
    pub async fn delete(&self, dir: &str, name: &str) -> Result<bool, MirrorError> {
        let path = self.path_for(dir, name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, dir: &str, name: &str) -> Result<PathBuf, MirrorError> {
        validate_name(name)?;
        Ok(self.base_dir.join(dir).join(format!("{name}.txt")))
    }
}

/// Names become file names, so they must stay inside their directory.
pub fn validate_name(name: &str) -> Result<(), MirrorError> {
    let invalid = name.trim().is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.contains('\0');
    if invalid {
        return Err(MirrorError::InvalidName(name.to_string()));
    }
    if RESERVED_NAMES.contains(&name.trim()) {
        return Err(MirrorError::ReservedName(name.to_string()));
    }
    Ok(())
}
