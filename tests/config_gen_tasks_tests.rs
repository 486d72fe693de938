//! Integration tests for the config generation tasks
//!
//! These tests verify:
//! - A `~` Discovery-document path reaches the generator expanded to the
//!   user's home directory and absolute
//! - The generated config path is stored for downstream tasks

use camino::Utf8PathBuf;
use gapic_pipeline::process::MockCommandRunner;
use gapic_pipeline::tasks::{DiscoGapicConfigGenTask, Task, TaskContext, keys};
use tempfile::TempDir;

fn scratch_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, root)
}

#[tokio::test]
async fn test_discovery_doc_tilde_expanded_before_invocation() {
    let (_temp_dir, output_dir) = scratch_dir();

    let mut ctx = TaskContext::new();
    ctx.set_path(keys::TOOLKIT_PATH, "/opt/toolkit");
    ctx.set_path(keys::DISCOVERY_DOC, "~/discovery/compute.v1.json");
    ctx.set_path(keys::OUTPUT_DIR, output_dir.clone());
    ctx.set_str(keys::API_NAME, "compute");
    ctx.set_str(keys::API_VERSION, "v1");
    ctx.set_str(keys::ORGANIZATION_NAME, "google-cloud");

    let home = std::env::var("HOME").unwrap();
    let expanded_doc = format!("--discovery_doc={}/discovery/compute.v1.json", home);

    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(move |invocation| {
            let clargs = &invocation.args[3];
            // The generator sees the expanded absolute path, never the ~
            clargs.contains(&expanded_doc) && !clargs.contains('~')
        })
        .times(1)
        .returning(|_| Ok(()));

    DiscoGapicConfigGenTask
        .execute(&runner, &mut ctx)
        .await
        .unwrap();

    let config_path = ctx.path(keys::GAPIC_CONFIG_PATH).unwrap();
    assert!(config_path.as_str().ends_with("google-cloud-compute-v1_gapic.yaml"));
}
