// gapic-pipeline - Pipeline tasks for GAPIC client library generation
//
// This library defines the task bodies of the generation pipeline: each task
// computes paths, assembles an external tool invocation, and records output
// locations in a shared context. The pipeline runner that sequences tasks
// lives outside this crate.

pub mod config;
pub mod logging;
pub mod models;
pub mod naming;
pub mod process;
pub mod tasks;
pub mod toolkit;

// Re-export commonly used types for convenience
pub use naming::ApiIdentity;
pub use process::{CommandRunner, Invocation, SubprocessRunner};
pub use tasks::{Requirement, Task, TaskContext};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
