//! Packaging tasks: C# source layout and the optional packman invocation.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use camino::Utf8Path;
use std::fs;

use crate::config;
use crate::process::CommandRunner;
use crate::tasks::{Task, TaskContext, TaskError, api_identity, keys};
use crate::toolkit;

/// Copy every `.cs` file from `source_dir` into `target_dir`.
///
/// Mirrors a shell `cp *.cs`: no matching files is an error, and the target
/// directory must already exist (the generator lays it out).
fn copy_cs_sources(source_dir: &Utf8Path, target_dir: &Utf8Path) -> Result<()> {
    let mut copied = 0usize;
    for entry in source_dir
        .read_dir_utf8()
        .with_context(|| format!("Failed to list source dir: {}", source_dir))?
    {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", source_dir))?;
        let path = entry.path();
        if path.extension() != Some("cs") {
            continue;
        }
        let target = target_dir.join(entry.file_name());
        fs::copy(path, &target)
            .with_context(|| format!("Failed to copy {} to {}", path, target))?;
        copied += 1;
    }

    if copied == 0 {
        bail!("No .cs sources found in {}", source_dir);
    }
    tracing::debug!("Copied {} .cs files from {} to {}", copied, source_dir, target_dir);
    Ok(())
}

/// Lays generated proto/grpc C# sources into the package production directory.
///
/// Reads `language_settings.csharp.package_name` from the gapic config and
/// copies the `.cs` output of the proto and grpc generation steps into
/// `<gapic_code_dir>/<package_name>/<package_name>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsharpPackagingTask;

#[async_trait]
impl Task for CsharpPackagingTask {
    fn name(&self) -> &'static str {
        "CsharpGapicPackaging"
    }

    async fn execute(&self, _runner: &dyn CommandRunner, ctx: &mut TaskContext) -> Result<()> {
        let gapic_code_dir = ctx.path(keys::GAPIC_CODE_DIR)?.to_path_buf();
        let grpc_code_dir = ctx.path(keys::GRPC_CODE_DIR)?.to_path_buf();
        let proto_code_dir = ctx.path(keys::PROTO_CODE_DIR)?.to_path_buf();
        let gapic_api_yaml = ctx.paths(keys::GAPIC_API_YAML)?.to_vec();

        let config_path = gapic_api_yaml
            .first()
            .ok_or(TaskError::MissingInput(keys::GAPIC_API_YAML))?;
        let metadata = config::load_package_metadata(config_path)?;
        let package_name = metadata
            .package_name_for("csharp")
            .ok_or_else(|| TaskError::MissingPackageName {
                language: "csharp".to_string(),
                config: config_path.clone(),
            })?;

        let package_root = gapic_code_dir.join(package_name);
        let prod_dir = package_root.join(package_name);

        copy_cs_sources(&proto_code_dir, &prod_dir)?;
        copy_cs_sources(&grpc_code_dir, &prod_dir)?;
        Ok(())
    }
}

/// Invokes the external packaging utility, unless skipped.
///
/// Whether or not packaging runs, the generated code directory is stored
/// unchanged under `package_dir` so downstream steps see a value either way.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackmanTask;

#[async_trait]
impl Task for PackmanTask {
    fn name(&self) -> &'static str {
        "GapicPackman"
    }

    fn provides(&self) -> Option<&'static str> {
        Some(keys::PACKAGE_DIR)
    }

    async fn execute(&self, runner: &dyn CommandRunner, ctx: &mut TaskContext) -> Result<()> {
        let gapic_code_dir = ctx.path(keys::GAPIC_CODE_DIR)?.to_path_buf();

        if ctx.flag(keys::SKIP_PACKMAN)? {
            tracing::info!("Packman invocation skipped by configuration");
        } else {
            let language = ctx.str(keys::LANGUAGE)?.to_string();
            let identity = api_identity(ctx)?;
            let extra_args = vec![
                format!("--gax_dir={}", gapic_code_dir),
                "--template_root=templates/gax".to_string(),
            ];
            runner
                .run(&toolkit::packman_invocation(
                    &language,
                    &identity.packaging_name(),
                    &extra_args,
                ))
                .await?;
        }

        ctx.set_path(keys::PACKAGE_DIR, gapic_code_dir);
        Ok(())
    }
}
