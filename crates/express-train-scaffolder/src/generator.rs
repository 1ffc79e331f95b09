//! Project generation: directories, then template jobs, then copy jobs,
//! then the install hook

use crate::error::ScaffoldError;
use crate::runtime::{on_complete, InstallOutcome, Installer};
use crate::templates::{build_tree, Emitter, TemplateContext, TemplateStore};
use crate::version::{compute_feature_flag, VersionSpec};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Fallback project name when the root has no usable final component
const FALLBACK_PROJECT_NAME: &str = "express-train-app";

/// Per-project settings fed into the template context
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    /// Project root; created if missing
    pub root: PathBuf,

    pub name: String,

    pub description: String,

    pub skip_install: bool,
}

impl ProjectOptions {
    /// Options named after the root directory
    pub fn for_root(root: PathBuf) -> Self {
        Self {
            name: default_project_name(&root),
            root,
            description: String::new(),
            skip_install: false,
        }
    }
}

/// Project name derived from the root directory's final component
pub fn default_project_name(root: &Path) -> String {
    root.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_PROJECT_NAME)
        .to_string()
}

/// What a run wrote to disk
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Directories created, relative to the root
    pub directories: Vec<PathBuf>,

    /// Files written, absolute
    pub files: Vec<PathBuf>,
}

pub struct Generator<'a> {
    store: &'a TemplateStore,
}

impl<'a> Generator<'a> {
    pub fn new(store: &'a TemplateStore) -> Self {
        Self { store }
    }

    /// Template context for a validated version spec
    pub fn context(spec: &VersionSpec, options: &ProjectOptions) -> TemplateContext {
        TemplateContext {
            version: spec.to_string(),
            gt21: compute_feature_flag(spec),
            name: options.name.clone(),
            description: options.description.clone(),
        }
    }

    /// Create the directory tree and emit every file job.
    ///
    /// Stops at the first failure; files already written stay on disk.
    pub async fn write_project(
        &self,
        spec: &VersionSpec,
        options: &ProjectOptions,
    ) -> Result<GenerationReport> {
        let manifest = self.store.load_manifest().await?;
        let context = Self::context(spec, options);
        let root = options.root.as_path();

        tokio::fs::create_dir_all(root)
            .await
            .map_err(|e| ScaffoldError::io(root, e))
            .context("Failed to create project directory")?;

        let directories = build_tree(&manifest.directories, root).await?;

        let emitter = Emitter::new(self.store);
        let mut files = Vec::with_capacity(manifest.file_count());
        for job in &manifest.templates {
            files.push(emitter.emit_template(job, &context, root).await?);
        }
        for job in &manifest.copies {
            files.push(emitter.emit_copy(job, root).await?);
        }

        tracing::debug!(
            directories = directories.len(),
            files = files.len(),
            root = %root.display(),
            "project written"
        );
        Ok(GenerationReport { directories, files })
    }

    /// `write_project` followed by the install hook
    pub async fn generate<I: Installer>(
        &self,
        spec: &VersionSpec,
        options: &ProjectOptions,
        installer: &I,
    ) -> Result<(GenerationReport, InstallOutcome)> {
        let report = self.write_project(spec, options).await?;
        let outcome = on_complete(installer, &options.root, options.skip_install).await?;
        Ok((report, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::validate;

    #[test]
    fn test_default_project_name() {
        assert_eq!(default_project_name(Path::new("/tmp/trainyard")), "trainyard");
        assert_eq!(default_project_name(Path::new("/")), FALLBACK_PROJECT_NAME);
    }

    #[test]
    fn test_context_carries_version_and_flag() {
        let options = ProjectOptions::for_root(PathBuf::from("/tmp/depot"));
        let context = Generator::context(&validate("2.0.0").unwrap(), &options);
        assert_eq!(context.version, "2.0.0");
        assert!(context.gt21);
        assert_eq!(context.name, "depot");

        let context = Generator::context(&validate("^3.0.0").unwrap(), &options);
        assert_eq!(context.version, "^3.0.0");
        assert!(!context.gt21);
    }

    #[tokio::test]
    async fn test_missing_local_template_aborts() {
        let templates = tempfile::tempdir().unwrap();
        std::fs::write(
            templates.path().join("template.yaml"),
            "name: t\ndescription: t\ndirectories:\n  lib: true\ntemplates:\n  - source: gone.js\n    dest: lib/gone.js\n",
        )
        .unwrap();
        let store = TemplateStore::from_local(templates.path().to_path_buf());
        let project = tempfile::tempdir().unwrap();
        let options = ProjectOptions::for_root(project.path().to_path_buf());

        let result = Generator::new(&store)
            .write_project(&validate("2.5.0").unwrap(), &options)
            .await;

        assert!(result.is_err());
        // Directories created before the failure are left behind
        assert!(project.path().join("lib").is_dir());
    }
}
