//! Storage paths for uploaded recipe images.
//!
//! Uploaded files are renamed to a random UUID so user-supplied names never
//! reach the filesystem. Only the original extension survives.

use uuid::Uuid;

/// Directory, relative to the media root, holding recipe images.
pub const RECIPE_IMAGE_DIR: &str = "uploads/recipe";

/// Longest extension accepted from an uploaded filename.
const EXTENSION_MAX: usize = 10;

/// Errors raised when deriving an image path from a filename.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageNameError {
    /// Filename had no `.ext` suffix.
    #[error("image filename must have an extension")]
    MissingExtension,
    /// Extension contained characters other than ASCII letters and digits.
    #[error("image file extension is not valid")]
    InvalidExtension,
}

/// Build `uploads/recipe/<random uuid>.<ext>` for an uploaded filename.
///
/// # Examples
/// ```
/// use backend::domain::recipe_image_path;
///
/// let path = recipe_image_path("example.jpg").expect("filename has an extension");
/// assert!(path.starts_with("uploads/recipe/"));
/// assert!(path.ends_with(".jpg"));
/// ```
pub fn recipe_image_path(filename: &str) -> Result<String, ImageNameError> {
    recipe_image_path_with(filename, Uuid::new_v4())
}

/// Same as [`recipe_image_path`] with a caller-supplied UUID.
pub fn recipe_image_path_with(filename: &str, uuid: Uuid) -> Result<String, ImageNameError> {
    let extension = extension_of(filename)?;
    Ok(format!("{RECIPE_IMAGE_DIR}/{uuid}.{extension}"))
}

fn extension_of(filename: &str) -> Result<&str, ImageNameError> {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .trim();
    let Some((stem, extension)) = basename.rsplit_once('.') else {
        return Err(ImageNameError::MissingExtension);
    };
    if stem.is_empty() || extension.is_empty() {
        return Err(ImageNameError::MissingExtension);
    }
    if extension.len() > EXTENSION_MAX || !extension.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ImageNameError::InvalidExtension);
    }
    Ok(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn path_uses_uuid_and_original_extension() {
        let uuid = Uuid::parse_str("6fa459ea-ee8a-3ca4-894e-db77e160355e").expect("uuid");
        let path = recipe_image_path_with("example.jpg", uuid).expect("path");
        assert_eq!(path, format!("uploads/recipe/{uuid}.jpg"));
    }

    #[rstest]
    #[case("photo.PNG", "PNG")]
    #[case("archive.tar.gz", "gz")]
    #[case("../../etc/cake.webp", "webp")]
    #[case("C:\\images\\cake.jpeg", "jpeg")]
    fn extension_is_taken_from_basename(#[case] filename: &str, #[case] expected: &str) {
        let path = recipe_image_path(filename).expect("path");
        assert!(path.ends_with(&format!(".{expected}")), "{path}");
        assert!(!path.contains(".."));
    }

    #[rstest]
    #[case("noextension", ImageNameError::MissingExtension)]
    #[case("trailing.", ImageNameError::MissingExtension)]
    #[case(".hidden", ImageNameError::MissingExtension)]
    #[case("", ImageNameError::MissingExtension)]
    #[case("bad.j$g", ImageNameError::InvalidExtension)]
    fn unusable_filenames_are_rejected(#[case] filename: &str, #[case] expected: ImageNameError) {
        assert_eq!(recipe_image_path(filename), Err(expected));
    }

    #[rstest]
    fn each_call_generates_a_fresh_name() {
        let first = recipe_image_path("a.jpg").expect("path");
        let second = recipe_image_path("a.jpg").expect("path");
        assert_ne!(first, second);
    }
}
