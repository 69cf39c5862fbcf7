//! Configuration handling for bundlegen
//!
//! This module contains:
//! - `workspace` - the `<workspace>/config.yaml` schema (image substitutions,
//!   default related images, operator package name)
//! - `resolve` - merging CLI arguments and the workspace config into one
//!   immutable `GenerateConfig`

pub mod resolve;
pub mod workspace;

// Re-export commonly used types
pub use resolve::{GenerateConfig, parse_key_values};
pub use workspace::{ImageSubstitution, RelatedImage, ReplaceLocation, WorkspaceConfig};
