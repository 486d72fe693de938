//! Integration tests for the packaging tasks
//!
//! These tests verify:
//! - The packman skip flag suppresses the external invocation entirely while
//!   the code directory still passes through unchanged
//! - Packman receives the slash-separated package name and fixed arguments
//! - C# packaging lays `.cs` sources into the configured package directory

use camino::Utf8PathBuf;
use gapic_pipeline::process::MockCommandRunner;
use gapic_pipeline::tasks::{CsharpPackagingTask, PackmanTask, Task, TaskContext, keys};
use std::fs;
use tempfile::TempDir;

fn scratch_dir() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    (temp_dir, root)
}

fn packman_context(code_dir: &Utf8PathBuf) -> TaskContext {
    let mut ctx = TaskContext::new();
    ctx.set_path(keys::GAPIC_CODE_DIR, code_dir.clone());
    ctx.set_str(keys::LANGUAGE, "python");
    ctx.set_str(keys::API_NAME, "pubsub");
    ctx.set_str(keys::API_VERSION, "v1");
    ctx.set_str(keys::ORGANIZATION_NAME, "google-cloud");
    ctx
}

#[tokio::test]
async fn test_packman_skip_flag() {
    let code_dir = Utf8PathBuf::from("/out/python/pubsub-v1");
    let mut ctx = packman_context(&code_dir);
    ctx.set_flag(keys::SKIP_PACKMAN, true);

    // No expectations registered: any invocation would fail the test
    let runner = MockCommandRunner::new();
    PackmanTask.execute(&runner, &mut ctx).await.unwrap();

    assert_eq!(ctx.path(keys::PACKAGE_DIR).unwrap(), code_dir);
}

#[tokio::test]
async fn test_packman_invocation_arguments() {
    let code_dir = Utf8PathBuf::from("/out/python/pubsub-v1");
    let mut ctx = packman_context(&code_dir);

    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .withf(|invocation| {
            invocation.program.as_str() == "gen-api-package"
                && invocation.args
                    == vec![
                        "--api_name=google/cloud/pubsub/v1".to_string(),
                        "--lang=python".to_string(),
                        "--gax_dir=/out/python/pubsub-v1".to_string(),
                        "--template_root=templates/gax".to_string(),
                    ]
        })
        .times(1)
        .returning(|_| Ok(()));

    PackmanTask.execute(&runner, &mut ctx).await.unwrap();

    // The code directory passes through whether or not packaging ran
    assert_eq!(ctx.path(keys::PACKAGE_DIR).unwrap(), code_dir);
}

#[tokio::test]
async fn test_csharp_packaging_copies_sources() {
    let (_temp_dir, root) = scratch_dir();

    let gapic_code_dir = root.join("gapic");
    let proto_dir = root.join("proto");
    let grpc_dir = root.join("grpc");
    let prod_dir = gapic_code_dir
        .join("Google.Cloud.PubSub.V1")
        .join("Google.Cloud.PubSub.V1");
    fs::create_dir_all(&prod_dir).unwrap();
    fs::create_dir_all(&proto_dir).unwrap();
    fs::create_dir_all(&grpc_dir).unwrap();

    fs::write(proto_dir.join("PubSub.cs"), "// proto").unwrap();
    fs::write(grpc_dir.join("PubSubGrpc.cs"), "// grpc").unwrap();

    let gapic_yaml = root.join("pubsub_gapic.yaml");
    fs::write(
        &gapic_yaml,
        "language_settings:\n  csharp:\n    package_name: Google.Cloud.PubSub.V1\n",
    )
    .unwrap();

    let mut ctx = TaskContext::new();
    ctx.set_path(keys::GAPIC_CODE_DIR, gapic_code_dir.clone());
    ctx.set_path(keys::PROTO_CODE_DIR, proto_dir);
    ctx.set_path(keys::GRPC_CODE_DIR, grpc_dir);
    ctx.set_paths(keys::GAPIC_API_YAML, vec![gapic_yaml]);

    let runner = MockCommandRunner::new();
    CsharpPackagingTask.execute(&runner, &mut ctx).await.unwrap();

    assert!(prod_dir.join("PubSub.cs").exists());
    assert!(prod_dir.join("PubSubGrpc.cs").exists());
}

#[tokio::test]
async fn test_csharp_packaging_missing_language_settings() {
    let (_temp_dir, root) = scratch_dir();

    let gapic_yaml = root.join("pubsub_gapic.yaml");
    fs::write(
        &gapic_yaml,
        "language_settings:\n  java:\n    package_name: com.google.pubsub.v1\n",
    )
    .unwrap();

    let mut ctx = TaskContext::new();
    ctx.set_path(keys::GAPIC_CODE_DIR, root.join("gapic"));
    ctx.set_path(keys::PROTO_CODE_DIR, root.join("proto"));
    ctx.set_path(keys::GRPC_CODE_DIR, root.join("grpc"));
    ctx.set_paths(keys::GAPIC_API_YAML, vec![gapic_yaml]);

    let runner = MockCommandRunner::new();
    let err = CsharpPackagingTask
        .execute(&runner, &mut ctx)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("csharp"));
}
