//! File system helpers.

use anyhow::Result;
use std::fs;
use std::path::Path;

/// Writes `content` to `path` through a sibling temp file and a rename.
///
/// The temp file sits next to the target so the rename never crosses a
/// filesystem boundary. An interrupted save leaves the old file intact.
///
/// # Errors
///
/// Returns an error if the temp file cannot be written or renamed.
pub fn atomic_write(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp_path = parent.join(format!(".{file_name}.tmp"));

    fs::write(&temp_path, content)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_replaces_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[gmc]\nmodel = \"old\"\n").unwrap();

        atomic_write(&config_path, "[gmc]\nmodel = \"new\"\n").unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("\"new\""));
        assert!(!temp_dir.path().join(".config.toml.tmp").exists());
    }

    #[test]
    fn test_atomic_write_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing").join("config.toml");

        assert!(atomic_write(&config_path, "x").is_err());
        assert!(!config_path.exists());
    }
}
