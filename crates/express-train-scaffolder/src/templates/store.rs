//! Template source lookup, bundled or from a local directory
//!
//! The bundled set is compiled into the binary, so generation works without a
//! template checkout. A local directory with the same layout (a `template.yaml`
//! plus its sources) can be used instead while developing templates.

use super::manifest::TemplateManifest;
use crate::error::{Result, ScaffoldError};
use std::io::{Error as IoError, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs;

const MANIFEST_FILE: &str = "template.yaml";

macro_rules! bundled {
    ($($path:literal),* $(,)?) => {
        &[$((
            $path,
            include_bytes!(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/../../templates/express-train/",
                $path
            )) as &[u8],
        )),*]
    };
}

/// Bundled express-train template set
static BUNDLED: &[(&str, &[u8])] = bundled![
    "template.yaml",
    "_index.js",
    "_app.js",
    "_package.json",
    "_default.json",
    "lib/_middleware.js",
    "lib/_routes.js",
    "lib/_server.js",
    "lib/_views.js",
    "controllers/_HomeController.js",
    "views/index.hbs",
    "views/partials/css.hbs",
    "views/partials/scripts.hbs",
    "views/layouts/default.hbs",
];

/// Where template sources come from
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Embedded,
    Local(PathBuf),
}

/// Read access to a template set
#[derive(Debug, Clone)]
pub struct TemplateStore {
    source: TemplateSource,
}

impl TemplateStore {
    pub fn new(source: TemplateSource) -> Self {
        Self { source }
    }

    /// Store over the bundled template set
    pub fn embedded() -> Self {
        Self::new(TemplateSource::Embedded)
    }

    /// Store over a local template directory
    pub fn from_local(path: PathBuf) -> Self {
        Self::new(TemplateSource::Local(path))
    }

    /// Load and validate the set's `template.yaml`
    pub async fn load_manifest(&self) -> Result<TemplateManifest> {
        let content = self.read_text(MANIFEST_FILE).await?;
        TemplateManifest::parse(&content)
    }

    /// Read a source file as bytes; a missing source is an I/O failure
    pub async fn read_bytes(&self, id: &str) -> Result<Vec<u8>> {
        match &self.source {
            TemplateSource::Embedded => BUNDLED
                .iter()
                .find(|(path, _)| *path == id)
                .map(|(_, bytes)| bytes.to_vec())
                .ok_or_else(|| {
                    ScaffoldError::io(
                        Path::new(id),
                        IoError::new(ErrorKind::NotFound, "not part of the bundled templates"),
                    )
                }),
            TemplateSource::Local(dir) => {
                let path = dir.join(id);
                fs::read(&path).await.map_err(|e| ScaffoldError::io(&path, e))
            }
        }
    }

    /// Read a source file as UTF-8 text
    pub async fn read_text(&self, id: &str) -> Result<String> {
        let bytes = self.read_bytes(id).await?;
        String::from_utf8(bytes).map_err(|e| {
            ScaffoldError::io(Path::new(id), IoError::new(ErrorKind::InvalidData, e))
        })
    }
}
