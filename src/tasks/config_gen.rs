//! GAPIC config generation tasks.
//!
//! Both variants compute `<api_full_name>-config-gen/<api_full_name>_gapic.yaml`
//! under the pipeline output directory, then drive the toolkit's config
//! generator over either a descriptor set plus service YAMLs or a single
//! Discovery document.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;

use crate::naming;
use crate::process::CommandRunner;
use crate::tasks::{Requirement, Task, TaskContext, api_identity, keys};
use crate::toolkit::{self, GradleTask};

/// Generates a GAPIC config file from a protocol descriptor set
#[derive(Debug, Clone, Copy, Default)]
pub struct GapicConfigGenTask;

#[async_trait]
impl Task for GapicConfigGenTask {
    fn name(&self) -> &'static str {
        "GapicConfigGen"
    }

    fn provides(&self) -> Option<&'static str> {
        Some(keys::GAPIC_CONFIG_PATH)
    }

    fn requirements(&self) -> &'static [Requirement] {
        &[Requirement::ConfigGen]
    }

    async fn execute(&self, runner: &dyn CommandRunner, ctx: &mut TaskContext) -> Result<()> {
        let toolkit_path = ctx.path(keys::TOOLKIT_PATH)?.to_path_buf();
        let descriptor_set = ctx.path(keys::DESCRIPTOR_SET)?.to_path_buf();
        let service_yaml = ctx.paths(keys::SERVICE_YAML)?.to_vec();
        let output_dir = ctx.path(keys::OUTPUT_DIR)?.to_path_buf();
        let identity = api_identity(ctx)?;

        let config_gen_dir = identity.config_gen_dir(&output_dir);
        fs::create_dir_all(&config_gen_dir)
            .with_context(|| format!("Failed to create config-gen dir: {}", config_gen_dir))?;
        let config_gen_path = config_gen_dir.join(identity.config_file_name());

        let mut flags = vec![
            format!("--descriptor_set={}", naming::absolute(&descriptor_set)?),
            format!("--output={}", naming::absolute(&config_gen_path)?),
        ];
        for yaml in &service_yaml {
            flags.push(format!("--service_yaml={}", naming::absolute(yaml)?));
        }

        runner
            .run(&toolkit::gradle_invocation(
                &toolkit_path,
                GradleTask::ConfigGen,
                &flags,
            ))
            .await?;

        ctx.set_path(keys::GAPIC_CONFIG_PATH, config_gen_path);
        Ok(())
    }
}

/// Generates a GAPIC config file from a Discovery document
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoGapicConfigGenTask;

#[async_trait]
impl Task for DiscoGapicConfigGenTask {
    fn name(&self) -> &'static str {
        "DiscoGapicConfigGen"
    }

    fn provides(&self) -> Option<&'static str> {
        Some(keys::GAPIC_CONFIG_PATH)
    }

    fn requirements(&self) -> &'static [Requirement] {
        &[Requirement::ConfigGen]
    }

    async fn execute(&self, runner: &dyn CommandRunner, ctx: &mut TaskContext) -> Result<()> {
        let toolkit_path = ctx.path(keys::TOOLKIT_PATH)?.to_path_buf();
        let discovery_doc = ctx.path(keys::DISCOVERY_DOC)?.to_path_buf();
        let output_dir = ctx.path(keys::OUTPUT_DIR)?.to_path_buf();
        let identity = api_identity(ctx)?;

        let config_gen_dir = identity.config_gen_dir(&output_dir);
        fs::create_dir_all(&config_gen_dir)
            .with_context(|| format!("Failed to create config-gen dir: {}", config_gen_dir))?;
        let config_gen_path = config_gen_dir.join(identity.config_file_name());

        // The Discovery doc is the one input users hand over by hand, so it
        // alone gets ~ expansion.
        let discovery_doc = naming::expand_user(&discovery_doc);
        let flags = vec![
            format!("--discovery_doc={}", naming::absolute(&discovery_doc)?),
            format!("--output={}", naming::absolute(&config_gen_path)?),
        ];

        runner
            .run(&toolkit::gradle_invocation(
                &toolkit_path,
                GradleTask::DiscoConfigGen,
                &flags,
            ))
            .await?;

        ctx.set_path(keys::GAPIC_CONFIG_PATH, config_gen_path);
        Ok(())
    }
}
