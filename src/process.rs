//! Subprocess execution for external generator and packaging tools.
//!
//! Tasks never spawn processes directly; they hand an [`Invocation`] to a
//! [`CommandRunner`]. The production [`SubprocessRunner`] blocks until the
//! child exits and treats any non-zero exit as fatal. There is deliberately
//! no timeout: the pipeline runs one task at a time and a hung generator is
//! surfaced by the operator killing the pipeline, not by this crate.
//!
//! The trait is annotated for `mockall` so integration tests can assert
//! exactly which commands a task assembles without running anything.

use async_trait::async_trait;
use camino::Utf8PathBuf;
use std::fmt;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command;

/// A fully assembled external command: program plus argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: Utf8PathBuf,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<P: Into<Utf8PathBuf>>(program: P, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Errors from spawning or waiting on an external command
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}")]
    NonZeroExit { program: Utf8PathBuf, code: i32 },
}

/// Runs external commands on behalf of tasks.
///
/// Implementors must propagate a non-zero exit as [`ProcessError::NonZeroExit`];
/// tasks rely on that to abort the pipeline step.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion, erroring on non-zero exit.
    async fn run(&self, invocation: &Invocation) -> Result<(), ProcessError>;
}

/// Production runner backed by `tokio::process`.
///
/// Child stdout/stderr are inherited so generator output lands in the
/// pipeline's own console/log stream.
#[derive(Debug, Clone, Default)]
pub struct SubprocessRunner;

impl SubprocessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<(), ProcessError> {
        tracing::info!("Executing: {}", invocation);

        let start = Instant::now();

        let status = Command::new(invocation.program.as_str())
            .args(&invocation.args)
            .status()
            .await
            .map_err(|source| ProcessError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;

        let exit_code = status.code().unwrap_or(-1);
        tracing::info!(
            "{} completed in {:.2}s with exit code {}",
            invocation.program,
            start.elapsed().as_secs_f32(),
            exit_code
        );

        if !status.success() {
            return Err(ProcessError::NonZeroExit {
                program: invocation.program.clone(),
                code: exit_code,
            });
        }

        Ok(())
    }
}
