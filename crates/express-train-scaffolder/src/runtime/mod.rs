//! Runtime detection and the post-generation install hook
//!
//! This module provides:
//! - Node.js / npm detection
//! - The `Installer` seam and its `npm install` implementation

pub mod check;
pub mod install;

pub use check::{check_node, check_npm, RuntimeInfo};
pub use install::{on_complete, InstallOutcome, Installer, NpmInstaller};
