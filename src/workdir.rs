//! Working-Directory Manager
//!
//! Each ingest attempt operates inside its own uniquely named temporary
//! directory. The directory is group-writable and owned by the configured
//! service group so the external tool (running under that group) can write
//! into it. Removal is tied to [`Drop`], so the directory is gone before the
//! caller regains control on every exit path, including error paths.
//!
//! Directories are never shared between concurrent attempts and never reused.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use tempfile::TempDir;
use thiserror::Error;

/// Name prefix of every ingest working directory.
pub const DIR_PREFIX: &str = "recipeloader_";

const DIR_MODE: u32 = 0o775;

#[derive(Debug, Error)]
pub enum WorkDirError {
    /// The configured service group does not exist on this host. This is a
    /// deployment problem; the in-progress attempt is aborted.
    #[error("working group {0:?} does not exist on this host")]
    GroupLookup(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Scoped working directory for a single ingest attempt.
#[derive(Debug)]
pub struct WorkDir {
    inner: TempDir,
}

impl WorkDir {
    /// Creates the directory, sets 0775 permissions, and (when a group is
    /// configured) hands group ownership to the named service group.
    pub fn acquire(group: Option<&str>) -> Result<Self, WorkDirError> {
        let inner = tempfile::Builder::new().prefix(DIR_PREFIX).tempdir()?;
        fs::set_permissions(inner.path(), fs::Permissions::from_mode(DIR_MODE))?;

        if let Some(name) = group {
            let gid = nix::unistd::Group::from_name(name)
                .map_err(|_| WorkDirError::GroupLookup(name.to_string()))?
                .ok_or_else(|| WorkDirError::GroupLookup(name.to_string()))?
                .gid;
            nix::unistd::chown(inner.path(), None, Some(gid))
                .map_err(|errno| WorkDirError::Io(std::io::Error::from_raw_os_error(errno as i32)))?;
        }

        tracing::debug!("created working dir: {}", inner.path().display());
        Ok(Self { inner })
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        // TempDir removes the tree itself; this only records that it happened.
        tracing::debug!("removing working dir: {}", self.inner.path().display());
    }
}
