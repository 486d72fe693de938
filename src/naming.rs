//! Naming conventions for generated artifacts.
//!
//! Every task derives its working paths from the same canonical API identity,
//! so the names produced here must stay deterministic: the config-gen task
//! writes `<full_name>-config-gen/<full_name>_gapic.yaml` and later tasks
//! recompute the exact same strings instead of passing them around.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised when an API identity fails convention checks
#[derive(Error, Debug)]
pub enum NamingError {
    #[error("Invalid API name {0:?}: expected lowercase letters, digits and dashes")]
    InvalidApiName(String),

    #[error("Invalid API version {0:?}: expected a lowercase alphanumeric version tag")]
    InvalidApiVersion(String),

    #[error("Invalid organization name {0:?}: expected lowercase letters, digits and dashes")]
    InvalidOrganization(String),
}

fn name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z][a-z0-9-]*$").expect("Invalid name regex"))
}

fn version_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_.]*$").expect("Invalid version regex"))
}

/// Canonical identity of an API artifact: (name, version, organization).
///
/// Tasks recompute this from their inputs every time they need a path; there
/// is no shared cache, so construction has to be cheap and infallible once
/// the fields have been validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiIdentity {
    name: String,
    version: String,
    organization: String,
}

impl ApiIdentity {
    /// Validate and build an API identity.
    ///
    /// # Arguments
    /// * `name` - API name, e.g. "pubsub"
    /// * `version` - API version tag, e.g. "v1" or "v1beta1"
    /// * `organization` - Owning organization, e.g. "google-cloud"
    pub fn new(name: &str, version: &str, organization: &str) -> Result<Self, NamingError> {
        if !name_pattern().is_match(name) {
            return Err(NamingError::InvalidApiName(name.to_string()));
        }
        if !version_pattern().is_match(version) {
            return Err(NamingError::InvalidApiVersion(version.to_string()));
        }
        if !name_pattern().is_match(organization) {
            return Err(NamingError::InvalidOrganization(organization.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            version: version.to_string(),
            organization: organization.to_string(),
        })
    }

    /// Canonical full name: `<organization>-<name>-<version>`
    ///
    /// Example: ("pubsub", "v1", "google-cloud") -> "google-cloud-pubsub-v1"
    pub fn full_name(&self) -> String {
        format!("{}-{}-{}", self.organization, self.name, self.version)
    }

    /// Working directory for config generation under `output_dir`
    pub fn config_gen_dir(&self, output_dir: &Utf8Path) -> Utf8PathBuf {
        output_dir.join(format!("{}-config-gen", self.full_name()))
    }

    /// File name of the generated GAPIC config
    pub fn config_file_name(&self) -> String {
        format!("{}_gapic.yaml", self.full_name())
    }

    /// Package name in the form the packaging utility expects
    ///
    /// The packaging tool takes slash-separated names, so
    /// "google-cloud-pubsub-v1" becomes "google/cloud/pubsub/v1".
    pub fn packaging_name(&self) -> String {
        self.full_name().replace('-', "/")
    }
}

/// Make a path absolute against the current working directory.
///
/// External tools are invoked with `-p <toolkit>` and resolve their own
/// relative paths against the toolkit directory, so every document path we
/// hand them must already be absolute.
pub fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let cwd = Utf8PathBuf::try_from(cwd).context("Current directory is not valid UTF-8")?;
    Ok(cwd.join(path))
}

/// Expand a leading `~` to the user's home directory.
///
/// Only the Discovery-document input accepts `~` paths; other inputs come
/// from pipeline config and are expected to be plain paths. Only the bare
/// `~` and `~/...` forms are recognized: expanding `~user/...` would need a
/// passwd lookup, and the pipeline always runs as the invoking user, so
/// that form passes through unchanged.
pub fn expand_user(path: &Utf8Path) -> Utf8PathBuf {
    let raw = path.as_str();
    if raw == "~" || raw.starts_with("~/") {
        if let Ok(home) = std::env::var("HOME") {
            let rest = raw.trim_start_matches('~').trim_start_matches('/');
            return Utf8PathBuf::from(home).join(rest);
        }
    }
    path.to_path_buf()
}
