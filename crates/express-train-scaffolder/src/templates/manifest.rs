//! Template manifest types and parsing

use crate::error::{Result, ScaffoldError};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Nested directory layout, `name: true` for a leaf or `name: {...}` to nest.
/// Entries keep the order they were written in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Mapping")]
pub struct DirectoryTree {
    entries: Vec<(String, DirNode)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirNode {
    Leaf,
    Tree(DirectoryTree),
}

impl DirectoryTree {
    /// Every directory in the tree, parents before children, relative to the root
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        self.collect_paths(Path::new(""), &mut paths);
        paths
    }

    fn collect_paths(&self, base: &Path, out: &mut Vec<PathBuf>) {
        for (name, node) in &self.entries {
            let path = base.join(name);
            out.push(path.clone());
            if let DirNode::Tree(subtree) = node {
                subtree.collect_paths(&path, out);
            }
        }
    }
}

impl TryFrom<Mapping> for DirectoryTree {
    type Error = String;

    fn try_from(mapping: Mapping) -> std::result::Result<Self, Self::Error> {
        let mut entries = Vec::with_capacity(mapping.len());
        for (key, value) in mapping {
            let name = key
                .as_str()
                .ok_or_else(|| format!("directory name must be a string, got {:?}", key))?
                .to_string();
            if !is_plain_segment(&name) {
                return Err(format!("invalid directory name '{}'", name));
            }
            let node = match value {
                Value::Bool(true) => DirNode::Leaf,
                Value::Mapping(inner) => DirNode::Tree(DirectoryTree::try_from(inner)?),
                other => {
                    return Err(format!(
                        "directory '{}' must be `true` or a mapping, got {:?}",
                        name, other
                    ))
                }
            };
            entries.push((name, node));
        }
        Ok(Self { entries })
    }
}

fn is_plain_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// One output file: `source` names a file in the template set, `dest` is
/// relative to the project root
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileJob {
    pub source: String,
    pub dest: String,
}

/// Template set manifest (`template.yaml`)
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template set
    pub name: String,

    /// Description of what the template set generates
    pub description: String,

    /// Directories created before any file is written
    pub directories: DirectoryTree,

    /// Files rendered with the template context
    #[serde(default)]
    pub templates: Vec<FileJob>,

    /// Files copied verbatim
    #[serde(default)]
    pub copies: Vec<FileJob>,
}

impl TemplateManifest {
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self =
            serde_yaml::from_str(content).map_err(|e| ScaffoldError::Manifest(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Destinations must stay inside the project root and be unique
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for job in self.templates.iter().chain(&self.copies) {
            let dest = Path::new(&job.dest);
            let inside_root = dest
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
            if job.dest.is_empty() || !inside_root {
                return Err(ScaffoldError::Manifest(format!(
                    "destination '{}' must be a relative path inside the project",
                    job.dest
                )));
            }
            if !seen.insert(job.dest.as_str()) {
                return Err(ScaffoldError::Manifest(format!(
                    "destination '{}' is listed twice",
                    job.dest
                )));
            }
        }
        Ok(())
    }

    pub fn file_count(&self) -> usize {
        self.templates.len() + self.copies.len()
    }
}
