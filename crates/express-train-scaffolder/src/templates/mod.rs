//! Template set loading and project file emission
//!
//! This module provides:
//! - Template manifest types (TemplateManifest, DirectoryTree, FileJob)
//! - Template source lookup from the bundled set or a local directory
//! - Directory creation from the manifest's tree
//! - Rendering and copying of file jobs

pub mod emitter;
pub mod manifest;
pub mod store;
pub mod tree;

pub use emitter::{Emitter, TemplateContext};
pub use manifest::{DirNode, DirectoryTree, FileJob, TemplateManifest};
pub use store::{TemplateSource, TemplateStore};
pub use tree::build_tree;
