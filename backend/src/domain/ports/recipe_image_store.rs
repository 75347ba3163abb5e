//! Port for storing uploaded recipe images.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ImageStoreError {
        /// Writing or removing the file failed.
        Storage { message: String } => "image storage failed: {message}",
        /// The relative path tried to escape the media root.
        InvalidPath { path: String } => "image path is not allowed: {path}",
    }
}

/// Blob storage addressed by media-relative paths such as
/// `uploads/recipe/<uuid>.jpg`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeImageStore: Send + Sync {
    /// Write `bytes` at `path`, creating parent directories.
    async fn store(&self, path: &str, bytes: &[u8]) -> Result<(), ImageStoreError>;

    /// Remove the file at `path`. Missing files are not an error.
    async fn remove(&self, path: &str) -> Result<(), ImageStoreError>;
}
