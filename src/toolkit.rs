//! Command-line assembly for the GAPIC toolkit and the packaging utility.
//!
//! The toolkit is a Gradle build: every generator entry point is a Gradle
//! task run as `gradlew -p <toolkit> <task> -Pclargs=<flags>`, where the
//! generator's own `--flag=value` arguments are comma-joined into the single
//! `clargs` project property. The packaging utility is a standalone
//! `gen-api-package` executable with ordinary flags.

use crate::process::Invocation;
use camino::Utf8Path;

/// Generator entry points exposed by the toolkit's Gradle build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradleTask {
    ConfigGen,
    DiscoConfigGen,
    CodeGen,
    DiscoCodeGen,
}

impl GradleTask {
    /// The Gradle task identifier as the toolkit build script names it
    pub fn task_id(&self) -> &'static str {
        match self {
            GradleTask::ConfigGen => "runConfigGen",
            GradleTask::DiscoConfigGen => "runDiscoConfigGen",
            GradleTask::CodeGen => "runCodeGen",
            GradleTask::DiscoCodeGen => "runDiscoCodeGen",
        }
    }
}

/// Build the Gradle invocation for a generator entry point.
///
/// # Arguments
/// * `toolkit_path` - Checkout of the GAPIC toolkit (contains `gradlew`)
/// * `task` - Which generator entry point to run
/// * `flags` - Generator arguments in `--flag=value` form, already absolute
pub fn gradle_invocation(toolkit_path: &Utf8Path, task: GradleTask, flags: &[String]) -> Invocation {
    let args = vec![
        "-p".to_string(),
        toolkit_path.to_string(),
        task.task_id().to_string(),
        format!("-Pclargs={}", flags.join(",")),
    ];
    Invocation::new(toolkit_path.join("gradlew"), args)
}

/// Build the packaging-utility invocation.
///
/// # Arguments
/// * `language` - Target language identifier, e.g. "python"
/// * `package_name` - Slash-separated package name, e.g. "google/cloud/pubsub/v1"
/// * `extra_args` - Tool flags such as `--gax_dir=` and `--template_root=`
pub fn packman_invocation(language: &str, package_name: &str, extra_args: &[String]) -> Invocation {
    let mut args = vec![
        format!("--api_name={}", package_name),
        format!("--lang={}", language),
    ];
    args.extend(extra_args.iter().cloned());
    Invocation::new("gen-api-package", args)
}
