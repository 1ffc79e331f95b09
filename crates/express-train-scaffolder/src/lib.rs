//! Express Train Scaffolder - project generator for express-train applications
//!
//! Given a framework version, this library lays out the directory skeleton of a
//! new express-train application and fills it with rendered and copied files.
//!
//! # Architecture
//!
//! A run moves through four steps, each owned by one module:
//!
//! - **Version resolution** (`registry`, `version`) - suggest a default from the
//!   npm registry, then validate the user's version or range
//! - **Directory tree** (`templates::tree`) - create the manifest's directories
//! - **File emission** (`templates::emitter`) - render template jobs, copy static jobs
//! - **Install hook** (`runtime::install`) - hand the project to `npm install`
//!
//! `generator::Generator` strings the last three together; the optional `tui`
//! module adds cliclack prompts around the whole flow.
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use express_train_scaffolder::{validate, Generator, NpmInstaller, ProjectOptions, TemplateStore};
//!
//! let spec = validate("^2.1.0")?;
//! let store = TemplateStore::embedded();
//! let options = ProjectOptions::for_root("my-app".into());
//! Generator::new(&store).generate(&spec, &options, &NpmInstaller::default()).await?;
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod registry;
pub mod runtime;
pub mod templates;
pub mod version;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{GeneratorConfig, TransportConfig};
pub use error::ScaffoldError;
pub use generator::{GenerationReport, Generator, ProjectOptions};
pub use registry::{resolve_default_range, suggested_default, HttpRegistry, RegistryClient};
pub use runtime::{on_complete, InstallOutcome, Installer, NpmInstaller};
pub use templates::{TemplateContext, TemplateManifest, TemplateSource, TemplateStore};
pub use version::{compute_feature_flag, validate, VersionSpec};

#[cfg(feature = "tui")]
pub use tui::run;
