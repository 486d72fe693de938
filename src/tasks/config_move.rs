//! Config relocation task.
//!
//! Moves the generated GAPIC config to the location the pipeline config
//! names. Exactly one destination is allowed; the check runs before any
//! filesystem mutation so a bad destination list never costs a backup.

use anyhow::{Context, Result};
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

use crate::naming;
use crate::process::CommandRunner;
use crate::tasks::{Task, TaskContext, TaskError, keys};

/// Moves the generated config file to its final `gapic_api_yaml` location
#[derive(Debug, Clone, Copy, Default)]
pub struct GapicConfigMoveTask;

impl GapicConfigMoveTask {
    /// Validate destination cardinality and return the single absolute
    /// destination. Zero or multiple destinations is a fatal input error.
    fn select_destination(
        source: &Utf8Path,
        destinations: &[Utf8PathBuf],
    ) -> Result<Utf8PathBuf> {
        let source_path = naming::absolute(source)?;
        let mut absolute_destinations = Vec::with_capacity(destinations.len());
        for destination in destinations {
            absolute_destinations.push(naming::absolute(destination)?);
        }

        if absolute_destinations.len() == 1 {
            return Ok(absolute_destinations.remove(0));
        }

        let reason = if absolute_destinations.is_empty() {
            "no location specified"
        } else {
            "multiple locations specified"
        };
        Err(TaskError::InvalidDestination {
            source_path,
            destinations: absolute_destinations,
            reason,
        }
        .into())
    }
}

#[async_trait]
impl Task for GapicConfigMoveTask {
    fn name(&self) -> &'static str {
        "GapicConfigMove"
    }

    async fn execute(&self, _runner: &dyn CommandRunner, ctx: &mut TaskContext) -> Result<()> {
        let config_path = ctx.path(keys::GAPIC_CONFIG_PATH)?.to_path_buf();
        let destinations = ctx.paths(keys::GAPIC_API_YAML)?.to_vec();

        let destination = Self::select_destination(&config_path, &destinations)?;

        if destination.exists() {
            // Last-write-wins with a single-generation backup, no history.
            let backup = Utf8PathBuf::from(format!("{}.old", destination));
            tracing::info!(
                "File already exists, saving the old version as {}",
                backup
            );
            fs::rename(&destination, &backup)
                .with_context(|| format!("Failed to back up existing config: {}", destination))?;
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create destination dir: {}", parent))?;
        }
        fs::copy(&config_path, &destination).with_context(|| {
            format!(
                "Failed to copy config from {} to {}",
                config_path, destination
            )
        })?;

        tracing::debug!("Moved config {} -> {}", config_path, destination);
        Ok(())
    }
}
