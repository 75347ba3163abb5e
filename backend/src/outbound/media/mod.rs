//! Filesystem storage for recipe images.
//!
//! The media root is opened once as a `cap_std` directory handle, so every
//! write is confined to it even if a path slipped past validation. Files are
//! written under a staging name and renamed into place, so readers never see
//! a partial image.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::TraceId;
use crate::domain::ports::{ImageStoreError, RecipeImageStore};

/// `RecipeImageStore` writing beneath a media root directory.
#[derive(Clone)]
pub struct CapStdRecipeImageStore {
    root: Arc<Dir>,
    root_path: PathBuf,
}

impl CapStdRecipeImageStore {
    /// Open (creating if needed) the media root at `root`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        let root_path = root.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&root_path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&root_path, ambient_authority())?;
        Ok(Self {
            root: Arc::new(dir),
            root_path,
        })
    }

    /// Filesystem location of the media root.
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }
}

fn relative_path(path: &str) -> Result<PathBuf, ImageStoreError> {
    let candidate = Path::new(path);
    let is_plain = !path.is_empty()
        && candidate
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
    if is_plain {
        Ok(candidate.to_path_buf())
    } else {
        Err(ImageStoreError::invalid_path(path))
    }
}

fn storage_error(path: &Path, error: &io::Error) -> ImageStoreError {
    ImageStoreError::storage(format!("{}: {error}", path.display()))
}

fn write_atomically(dir: &Dir, relative: &Path, bytes: &[u8]) -> Result<(), ImageStoreError> {
    if let Some(parent) = relative.parent().filter(|p| !p.as_os_str().is_empty()) {
        dir.create_dir_all(parent)
            .map_err(|error| storage_error(parent, &error))?;
    }
    let file_name = relative
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ImageStoreError::invalid_path(relative.display().to_string()))?;
    let staged = relative.with_file_name(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));

    dir.write(&staged, bytes)
        .map_err(|error| storage_error(&staged, &error))?;
    dir.rename(&staged, dir, relative).map_err(|error| {
        let _cleanup = dir.remove_file(&staged);
        storage_error(relative, &error)
    })
}

fn remove_if_exists(dir: &Dir, relative: &Path) -> Result<(), ImageStoreError> {
    match dir.remove_file(relative) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) => Err(storage_error(relative, &error)),
    }
}

async fn run_blocking<F>(task: F) -> Result<(), ImageStoreError>
where
    F: FnOnce() -> Result<(), ImageStoreError> + Send + 'static,
{
    let trace_id = TraceId::current();
    tokio::task::spawn_blocking(move || match trace_id {
        Some(trace_id) => TraceId::sync_scope(trace_id, task),
        None => task(),
    })
    .await
    .map_err(|error| ImageStoreError::storage(format!("blocking task failed: {error}")))?
}

#[async_trait]
impl RecipeImageStore for CapStdRecipeImageStore {
    async fn store(&self, path: &str, bytes: &[u8]) -> Result<(), ImageStoreError> {
        let relative = relative_path(path)?;
        let dir = Arc::clone(&self.root);
        let owned = bytes.to_vec();
        run_blocking(move || write_atomically(&dir, &relative, &owned)).await?;
        debug!(path, size = bytes.len(), "recipe image written");
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), ImageStoreError> {
        let relative = relative_path(path)?;
        let dir = Arc::clone(&self.root);
        run_blocking(move || remove_if_exists(&dir, &relative)).await
    }
}
