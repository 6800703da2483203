use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

use crate::chat::{Attachment, MAX_ATTACHMENT_BYTES};

/// Guesses a MIME type from the file extension.
pub fn mime_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

/// Reads an image file into an [`Attachment`].
///
/// The size is checked before the file is read.
pub fn load_image(path: &str) -> Result<Attachment> {
    let path_ref = Path::new(path);
    let metadata =
        fs::metadata(path_ref).with_context(|| format!("Failed to access file: {path}"))?;

    let size = metadata.len() as usize;
    if size > MAX_ATTACHMENT_BYTES {
        bail!(
            "Error: Image size ({:.1} MB) exceeds maximum allowed size (10 MB).",
            size as f64 / 1024.0 / 1024.0
        );
    }

    let mime_type = mime_type_for(path_ref);
    if !mime_type.starts_with("image/") {
        bail!("Error: '{path}' does not look like an image ({mime_type})");
    }

    let bytes = fs::read(path_ref).with_context(|| format!("Failed to read file: {path}"))?;
    log::debug!("loaded {path} ({} bytes, {mime_type})", bytes.len());

    Ok(Attachment::from_bytes(mime_type, &bytes))
}
