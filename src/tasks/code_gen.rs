//! GAPIC code generation tasks.
//!
//! Both variants clear any stale output before invoking the generator, so a
//! regenerated client never contains leftovers from a previous run. The
//! clear-then-populate sequence is not atomic: a generator failure leaves
//! the directory empty or partially populated.

use anyhow::{Context, Result};
use async_trait::async_trait;
use camino::Utf8Path;
use std::fs;

use crate::naming;
use crate::process::CommandRunner;
use crate::tasks::{Requirement, Task, TaskContext, keys};
use crate::toolkit::{self, GradleTask};

/// Remove every pre-existing entry of the generated-code directory.
///
/// Best effort, entry by entry; an absent directory is fine (the generator
/// creates it).
fn clear_existing(code_dir: &Utf8Path) -> Result<()> {
    if !code_dir.exists() {
        return Ok(());
    }

    let mut removed = 0usize;
    for entry in code_dir
        .read_dir_utf8()
        .with_context(|| format!("Failed to list code dir: {}", code_dir))?
    {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", code_dir))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", path))?;
        if file_type.is_dir() {
            fs::remove_dir_all(path)
                .with_context(|| format!("Failed to remove stale dir: {}", path))?;
        } else {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove stale file: {}", path))?;
        }
        removed += 1;
    }

    if removed > 0 {
        tracing::debug!("Cleared {} stale entries from {}", removed, code_dir);
    }
    Ok(())
}

/// Generates GAPIC client code from a descriptor set
#[derive(Debug, Clone, Copy, Default)]
pub struct GapicCodeGenTask;

#[async_trait]
impl Task for GapicCodeGenTask {
    fn name(&self) -> &'static str {
        "GapicCodeGen"
    }

    fn provides(&self) -> Option<&'static str> {
        Some(keys::GAPIC_CODE_DIR)
    }

    fn requirements(&self) -> &'static [Requirement] {
        &[Requirement::Gapic]
    }

    async fn execute(&self, runner: &dyn CommandRunner, ctx: &mut TaskContext) -> Result<()> {
        let toolkit_path = ctx.path(keys::TOOLKIT_PATH)?.to_path_buf();
        let descriptor_set = ctx.path(keys::DESCRIPTOR_SET)?.to_path_buf();
        let service_yaml = ctx.paths(keys::SERVICE_YAML)?.to_vec();
        let gapic_api_yaml = ctx.paths(keys::GAPIC_API_YAML)?.to_vec();
        let gapic_language_yaml = ctx.paths(keys::GAPIC_LANGUAGE_YAML)?.to_vec();
        let package_metadata_yaml = ctx.path(keys::PACKAGE_METADATA_YAML)?.to_path_buf();
        let code_dir = ctx.path(keys::GAPIC_CODE_DIR)?.to_path_buf();

        clear_existing(&code_dir)?;

        let mut flags = vec![
            format!("--descriptor_set={}", naming::absolute(&descriptor_set)?),
            format!(
                "--package_yaml={}",
                naming::absolute(&package_metadata_yaml)?
            ),
            format!("--output={}", naming::absolute(&code_dir)?),
        ];
        for yaml in &service_yaml {
            flags.push(format!("--service_yaml={}", naming::absolute(yaml)?));
        }
        // API-wide gapic config first, then the language overrides
        for yaml in gapic_api_yaml.iter().chain(gapic_language_yaml.iter()) {
            flags.push(format!("--gapic_yaml={}", naming::absolute(yaml)?));
        }

        runner
            .run(&toolkit::gradle_invocation(
                &toolkit_path,
                GradleTask::CodeGen,
                &flags,
            ))
            .await?;

        ctx.set_path(keys::GAPIC_CODE_DIR, code_dir);
        Ok(())
    }
}

/// Generates GAPIC client code from a Discovery document
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscoGapicCodeGenTask;

#[async_trait]
impl Task for DiscoGapicCodeGenTask {
    fn name(&self) -> &'static str {
        "DiscoGapicCodeGen"
    }

    fn provides(&self) -> Option<&'static str> {
        Some(keys::GAPIC_CODE_DIR)
    }

    fn requirements(&self) -> &'static [Requirement] {
        &[Requirement::Gapic]
    }

    async fn execute(&self, runner: &dyn CommandRunner, ctx: &mut TaskContext) -> Result<()> {
        let toolkit_path = ctx.path(keys::TOOLKIT_PATH)?.to_path_buf();
        let discovery_doc = ctx.path(keys::DISCOVERY_DOC)?.to_path_buf();
        let gapic_api_yaml = ctx.paths(keys::GAPIC_API_YAML)?.to_vec();
        let gapic_language_yaml = ctx.paths(keys::GAPIC_LANGUAGE_YAML)?.to_vec();
        let package_metadata_yaml = ctx.path(keys::PACKAGE_METADATA_YAML)?.to_path_buf();
        let code_dir = ctx.path(keys::GAPIC_CODE_DIR)?.to_path_buf();

        clear_existing(&code_dir)?;

        let mut flags = vec![
            format!("--discovery_doc={}", naming::absolute(&discovery_doc)?),
            format!(
                "--package_yaml={}",
                naming::absolute(&package_metadata_yaml)?
            ),
            format!("--output={}", naming::absolute(&code_dir)?),
        ];
        for yaml in gapic_api_yaml.iter().chain(gapic_language_yaml.iter()) {
            flags.push(format!("--gapic_yaml={}", naming::absolute(yaml)?));
        }

        runner
            .run(&toolkit::gradle_invocation(
                &toolkit_path,
                GradleTask::DiscoCodeGen,
                &flags,
            ))
            .await?;

        ctx.set_path(keys::GAPIC_CODE_DIR, code_dir);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_clear_existing_removes_entries() {
        let temp = TempDir::new().unwrap();
        let code_dir = Utf8PathBuf::try_from(temp.path().to_path_buf()).unwrap();

        fs::write(code_dir.join("stale.java"), "old").unwrap();
        fs::create_dir(code_dir.join("src")).unwrap();
        fs::write(code_dir.join("src").join("nested.java"), "old").unwrap();

        clear_existing(&code_dir).unwrap();

        assert_eq!(code_dir.read_dir_utf8().unwrap().count(), 0);
    }

    #[test]
    fn test_clear_existing_absent_dir() {
        let temp = TempDir::new().unwrap();
        let code_dir = Utf8PathBuf::try_from(temp.path().to_path_buf())
            .unwrap()
            .join("never-created");

        assert!(clear_existing(&code_dir).is_ok());
        assert!(!code_dir.exists());
    }
}
