use crate::models::PackageMetadata;
use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;

/// Load the package-metadata portion of a GAPIC config document.
///
/// The document is produced by the config generator and may carry far more
/// than `language_settings`; unknown keys are ignored.
///
/// # Arguments
/// * `path` - Path to the GAPIC config YAML
pub fn load_package_metadata(path: &Utf8Path) -> Result<PackageMetadata> {
    let file_contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read GAPIC config: {}", path))?;

    let metadata: PackageMetadata = serde_yaml_ng::from_str(&file_contents)
        .with_context(|| format!("Failed to parse GAPIC config: {}", path))?;

    tracing::debug!(
        "Loaded package metadata from {} ({} languages)",
        path,
        metadata.language_settings.len()
    );
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_package_metadata() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "language_settings:").unwrap();
        writeln!(file, "  java:").unwrap();
        writeln!(file, "    package_name: com.google.cloud.pubsub.v1").unwrap();
        file.flush().unwrap();

        let path = Utf8PathBuf::try_from(file.path().to_path_buf()).unwrap();
        let metadata = load_package_metadata(&path).unwrap();

        assert_eq!(
            metadata.package_name_for("java"),
            Some("com.google.cloud.pubsub.v1")
        );
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_package_metadata(Utf8Path::new("/nonexistent/gapic.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "language_settings: [not, a, mapping]").unwrap();
        file.flush().unwrap();

        let path = Utf8PathBuf::try_from(file.path().to_path_buf()).unwrap();
        assert!(load_package_metadata(&path).is_err());
    }
}
