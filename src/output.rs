//! File naming and PNG saving.

use std::path::{Path, PathBuf};

use crate::error::GenerateError;
use crate::ports::GeneratedImage;

/// Default file name for an image of the requested size.
#[must_use]
pub fn download_name(width: u32, height: u32) -> String {
    format!("ai_generated_{width}x{height}.png")
}

/// Resolve the output path: use explicit path or the default name.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, width: u32, height: u32) -> PathBuf {
    match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(download_name(width, height)),
    }
}

/// Encode the image as PNG and write it to `output_path`.
///
/// # Errors
///
/// Returns an error if encoding fails or the file cannot be written.
pub fn save_png(image: &GeneratedImage, output_path: &Path) -> Result<(), GenerateError> {
    let bytes = image.to_png()?;
    std::fs::write(output_path, bytes)?;
    tracing::debug!("Wrote {}", output_path.display());
    Ok(())
}
