//! Writing template and copy jobs into the project tree

use super::manifest::FileJob;
use super::store::TemplateStore;
use crate::error::{Result, ScaffoldError};
use minijinja::Environment;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Values available to every rendered template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateContext {
    /// Version or range written into the generated `package.json`
    pub version: String,

    /// Selects the 2.1-era code paths
    pub gt21: bool,

    pub name: String,

    pub description: String,
}

/// Emits files from a template store. Parent directories must already exist.
pub struct Emitter<'a> {
    store: &'a TemplateStore,
    env: Environment<'static>,
}

impl<'a> Emitter<'a> {
    pub fn new(store: &'a TemplateStore) -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        Self { store, env }
    }

    /// Render `job.source` with `context` and write it to `root/job.dest`
    pub async fn emit_template(
        &self,
        job: &FileJob,
        context: &TemplateContext,
        root: &Path,
    ) -> Result<PathBuf> {
        let source = self.store.read_text(&job.source).await?;
        let rendered = self.render(&job.source, &source, context)?;
        write_output(root, &job.dest, rendered.as_bytes()).await
    }

    /// Copy `job.source` byte-for-byte to `root/job.dest`
    pub async fn emit_copy(&self, job: &FileJob, root: &Path) -> Result<PathBuf> {
        let bytes = self.store.read_bytes(&job.source).await?;
        write_output(root, &job.dest, &bytes).await
    }

    fn render(&self, id: &str, source: &str, context: &TemplateContext) -> Result<String> {
        self.env
            .render_str(source, context)
            .map_err(|e| ScaffoldError::Template {
                id: id.to_string(),
                message: e.to_string(),
            })
    }
}

async fn write_output(root: &Path, dest: &str, content: &[u8]) -> Result<PathBuf> {
    let target = root.join(dest);
    fs::write(&target, content)
        .await
        .map_err(|e| ScaffoldError::io(&target, e))?;
    tracing::debug!(path = %target.display(), bytes = content.len(), "wrote file");
    Ok(target)
}
