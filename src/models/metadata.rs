use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Per-language settings from a GAPIC config document.
///
/// The generator writes many more fields per language; only `package_name`
/// is read here, the rest are ignored on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSettings {
    pub package_name: String,
}

/// The subset of a GAPIC config document the packaging tasks read.
///
/// Language order in the document is preserved so re-serialized configs stay
/// diffable against the generator's output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub language_settings: IndexMap<String, LanguageSettings>,
}

impl PackageMetadata {
    /// Look up the configured package name for a target language
    pub fn package_name_for(&self, language: &str) -> Option<&str> {
        self.language_settings
            .get(language)
            .map(|settings| settings.package_name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
language_settings:
  csharp:
    package_name: Google.Cloud.PubSub.V1
  python:
    package_name: google-cloud-pubsub
    release_level: ga
"#;

    #[test]
    fn test_parse_language_settings() {
        let metadata: PackageMetadata = serde_yaml_ng::from_str(SAMPLE).unwrap();

        assert_eq!(
            metadata.package_name_for("csharp"),
            Some("Google.Cloud.PubSub.V1")
        );
        assert_eq!(
            metadata.package_name_for("python"),
            Some("google-cloud-pubsub")
        );
        assert_eq!(metadata.package_name_for("go"), None);
    }

    #[test]
    fn test_language_order_preserved() {
        let metadata: PackageMetadata = serde_yaml_ng::from_str(SAMPLE).unwrap();
        let languages: Vec<&String> = metadata.language_settings.keys().collect();
        assert_eq!(languages, vec!["csharp", "python"]);
    }
}
