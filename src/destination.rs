//! Prepares the directory repositories are cloned into.

use std::fs::DirBuilder;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Make sure `path` exists and is a directory.
///
/// Missing directories (and parents) are created with mode `0o700`. An
/// existing non-directory is [`Error::NotADirectory`]; a failed creation is
/// [`Error::CreateDir`].
pub fn prepare(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            tracing::debug!("destination {} already exists", path.display());
            Ok(())
        }
        Ok(_) => Err(Error::NotADirectory(path.to_path_buf())),
        Err(_) => {
            tracing::debug!("creating destination {}", path.display());
            builder()
                .create(path)
                .map_err(|source| Error::CreateDir {
                    path: path.to_path_buf(),
                    source,
                })
        }
    }
}

/// [`prepare`] on the blocking pool, for callers on the async runtime.
pub async fn prepare_blocking(path: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || prepare(&path))
        .await
        .map_err(|e| Error::TaskJoin(e.to_string()))?
}

#[cfg(unix)]
fn builder() -> DirBuilder {
    use std::os::unix::fs::DirBuilderExt;

    let mut builder = DirBuilder::new();
    builder.recursive(true).mode(0o700);
    builder
}

#[cfg(not(unix))]
fn builder() -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    builder
}
