//! Pipeline tasks for GAPIC generation and packaging.
//!
//! Each task is one synchronous step of the generation pipeline: compute
//! paths from naming conventions, assemble the external tool's argument
//! list, invoke it through a [`CommandRunner`](crate::process::CommandRunner),
//! and store the resulting location in the shared [`TaskContext`] for the
//! next step. There is no algorithmic work in here; the generator and the
//! packaging utility do everything interesting.
//!
//! # Components
//!
//! - [`Task`]: the uniform contract a pipeline runner drives. A task
//!   declares a `provides` output key and precondition [`Requirement`]s,
//!   and its `execute` reads declared inputs from the context by key.
//! - [`TaskContext`]: the shared key/value store the runner threads between
//!   task calls. Values are strings, paths, path lists, or flags.
//! - [`config_gen`]: derive a GAPIC config from a descriptor set or a
//!   Discovery document.
//! - [`config_move`]: relocate the generated config to its final location,
//!   keeping a single `.old` backup.
//! - [`code_gen`]: generate client code, clearing stale output first.
//! - [`packaging`]: C# source layout plus the optional packman invocation.
//!
//! # Design Philosophy
//!
//! - **Stateless**: tasks hold no fields; every input comes from the context
//! - **Sequential**: one task at a time, each awaited to completion
//! - **Testable**: the runner is a trait, so tests assert assembled commands
//!   without spawning anything

pub mod code_gen;
pub mod config_gen;
pub mod config_move;
pub mod packaging;

pub use code_gen::{DiscoGapicCodeGenTask, GapicCodeGenTask};
pub use config_gen::{DiscoGapicConfigGenTask, GapicConfigGenTask};
pub use config_move::GapicConfigMoveTask;
pub use packaging::{CsharpPackagingTask, PackmanTask};

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use thiserror::Error;

use crate::naming::ApiIdentity;
use crate::process::CommandRunner;

/// Well-known context keys shared between tasks.
///
/// A task's inputs and its `provides` key are all drawn from this set; the
/// pipeline runner seeds the initial keys from its own configuration.
pub mod keys {
    pub const TOOLKIT_PATH: &str = "toolkit_path";
    pub const DESCRIPTOR_SET: &str = "descriptor_set";
    pub const SERVICE_YAML: &str = "service_yaml";
    pub const DISCOVERY_DOC: &str = "discovery_doc";
    pub const OUTPUT_DIR: &str = "output_dir";
    pub const API_NAME: &str = "api_name";
    pub const API_VERSION: &str = "api_version";
    pub const ORGANIZATION_NAME: &str = "organization_name";
    pub const LANGUAGE: &str = "language";
    pub const GAPIC_CONFIG_PATH: &str = "gapic_config_path";
    pub const GAPIC_API_YAML: &str = "gapic_api_yaml";
    pub const GAPIC_LANGUAGE_YAML: &str = "gapic_language_yaml";
    pub const PACKAGE_METADATA_YAML: &str = "package_metadata_yaml";
    pub const GAPIC_CODE_DIR: &str = "gapic_code_dir";
    pub const GRPC_CODE_DIR: &str = "grpc_code_dir";
    pub const PROTO_CODE_DIR: &str = "proto_code_dir";
    pub const PACKAGE_DIR: &str = "package_dir";
    pub const SKIP_PACKMAN: &str = "skip_packman";
}

/// A value stored in the task context
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    Str(String),
    Path(Utf8PathBuf),
    Paths(Vec<Utf8PathBuf>),
    Flag(bool),
}

/// Errors raised by task bodies before any external tool runs
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Missing input {0:?} in task context")]
    MissingInput(&'static str),

    #[error("Input {key:?} has unexpected type: expected {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },

    #[error(
        "Could not move generated config file from \"{source_path}\" to {destinations:?}: {reason}"
    )]
    InvalidDestination {
        source_path: Utf8PathBuf,
        destinations: Vec<Utf8PathBuf>,
        reason: &'static str,
    },

    #[error("No package_name configured for language {language:?} in {config}")]
    MissingPackageName {
        language: String,
        config: Utf8PathBuf,
    },
}

/// Shared key/value store threaded between task calls by the pipeline runner.
///
/// Insertion order is preserved so a dump of the context reads in pipeline
/// order when debugging.
#[derive(Debug, Clone, Default)]
pub struct TaskContext {
    values: IndexMap<String, ContextValue>,
}

impl TaskContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<K: Into<String>>(&mut self, key: K, value: ContextValue) {
        self.values.insert(key.into(), value);
    }

    pub fn set_str<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.insert(key, ContextValue::Str(value.into()));
    }

    pub fn set_path<K: Into<String>, P: Into<Utf8PathBuf>>(&mut self, key: K, path: P) {
        self.insert(key, ContextValue::Path(path.into()));
    }

    pub fn set_paths<K: Into<String>>(&mut self, key: K, paths: Vec<Utf8PathBuf>) {
        self.insert(key, ContextValue::Paths(paths));
    }

    pub fn set_flag<K: Into<String>>(&mut self, key: K, value: bool) {
        self.insert(key, ContextValue::Flag(value));
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }

    /// Fetch a required string input
    pub fn str(&self, key: &'static str) -> Result<&str, TaskError> {
        match self.values.get(key) {
            Some(ContextValue::Str(value)) => Ok(value),
            Some(_) => Err(TaskError::WrongType {
                key,
                expected: "string",
            }),
            None => Err(TaskError::MissingInput(key)),
        }
    }

    /// Fetch a required path input
    pub fn path(&self, key: &'static str) -> Result<&Utf8Path, TaskError> {
        match self.values.get(key) {
            Some(ContextValue::Path(path)) => Ok(path),
            Some(_) => Err(TaskError::WrongType {
                key,
                expected: "path",
            }),
            None => Err(TaskError::MissingInput(key)),
        }
    }

    /// Fetch a required path-list input
    pub fn paths(&self, key: &'static str) -> Result<&[Utf8PathBuf], TaskError> {
        match self.values.get(key) {
            Some(ContextValue::Paths(paths)) => Ok(paths),
            Some(_) => Err(TaskError::WrongType {
                key,
                expected: "path list",
            }),
            None => Err(TaskError::MissingInput(key)),
        }
    }

    /// Fetch a flag input; an absent flag reads as false
    pub fn flag(&self, key: &'static str) -> Result<bool, TaskError> {
        match self.values.get(key) {
            Some(ContextValue::Flag(value)) => Ok(*value),
            Some(_) => Err(TaskError::WrongType {
                key,
                expected: "flag",
            }),
            None => Ok(false),
        }
    }
}

/// Precondition capabilities a task declares.
///
/// The checks themselves live with the pipeline runner (toolkit checkout
/// present, Java available, and so on); tasks only name what they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    ConfigGen,
    Gapic,
}

impl Requirement {
    pub fn name(&self) -> &'static str {
        match self {
            Requirement::ConfigGen => "ConfigGenRequirements",
            Requirement::Gapic => "GapicRequirements",
        }
    }
}

/// Uniform contract for one pipeline step.
///
/// The runner checks `requirements()` before calling `execute`, then relies
/// on the task to store its output under the `provides()` key.
#[async_trait]
pub trait Task: Send + Sync {
    /// Task name for logs and runner reporting
    fn name(&self) -> &'static str;

    /// Context key this task stores its output under, if any
    fn provides(&self) -> Option<&'static str> {
        None
    }

    /// Capabilities that must hold before `execute` runs
    fn requirements(&self) -> &'static [Requirement] {
        &[]
    }

    /// Run the task to completion against the shared context
    async fn execute(
        &self,
        runner: &dyn CommandRunner,
        ctx: &mut TaskContext,
    ) -> anyhow::Result<()>;
}

/// Recompute the API identity from the context's identity inputs.
///
/// Every task that needs naming does this independently; identities are not
/// cached across tasks.
pub(crate) fn api_identity(ctx: &TaskContext) -> anyhow::Result<ApiIdentity> {
    let identity = ApiIdentity::new(
        ctx.str(keys::API_NAME)?,
        ctx.str(keys::API_VERSION)?,
        ctx.str(keys::ORGANIZATION_NAME)?,
    )?;
    Ok(identity)
}
