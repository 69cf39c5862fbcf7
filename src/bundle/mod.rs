//! Resource aggregation and bundle generation
//!
//! This stage turns the workspace manifests into an aggregated YAML stream
//! and feeds it to `operator-sdk generate bundle`, producing the bundle
//! directory tree under `<workspace>/release-artifacts`.
//!
//! - `plan` - pure description of the external-process invocations
//! - `generate` - executes the plan

pub mod generate;
pub mod plan;

pub use generate::run;
pub use plan::{InvocationPlan, ToolCommand};
