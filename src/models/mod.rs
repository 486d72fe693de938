//! Data models for the YAML documents the pipeline consumes.
//!
//! These are thin serde mirrors of the generator's own config formats; the
//! pipeline only reads the handful of fields it needs to compute paths and
//! ignores everything else in the documents.

pub mod metadata;

pub use metadata::{LanguageSettings, PackageMetadata};
