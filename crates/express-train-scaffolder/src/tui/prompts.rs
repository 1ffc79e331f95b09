//! Charm-style CLI prompts using cliclack

use crate::config::GeneratorConfig;
use crate::generator::{default_project_name, Generator, ProjectOptions};
use crate::registry::suggested_default;
use crate::runtime::{check_node, check_npm, on_complete, InstallOutcome, NpmInstaller};
use crate::templates::TemplateStore;
use crate::version::{self, VersionSpec};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// CLI arguments for the create command
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Local directory to use for templates instead of the bundled set
    pub template_dir: Option<PathBuf>,

    /// Project directory to generate into
    pub directory: Option<PathBuf>,

    /// Project name (defaults to the directory name)
    pub name: Option<String>,

    /// Project description
    pub description: Option<String>,

    /// Framework version or range; skips the prompt
    pub version: Option<String>,

    /// Do not run `npm install` after generation
    pub skip_install: bool,

    /// Auto-accept the suggested version (non-interactive mode)
    pub yes: bool,
}

/// Run the generator with interactive prompts
pub async fn run(config: &GeneratorConfig, args: CreateArgs) -> Result<()> {
    cliclack::intro(format!("{} generator", config.display_name))?;

    // Step 1: Template set
    let store = setup_store(&args.template_dir)?;

    // Step 2: Version
    let spec = select_version(config, &args).await?;

    // Step 3: Project directory
    let root = select_directory(&args)?;
    let options = ProjectOptions {
        name: args
            .name
            .clone()
            .unwrap_or_else(|| default_project_name(&root)),
        description: args.description.clone().unwrap_or_default(),
        skip_install: args.skip_install,
        root,
    };

    // Step 4: Directories and files
    create_project(&store, &spec, &options).await?;

    // Step 5: Dependencies
    let outcome = install_dependencies(&options).await?;

    // Step 6: Next steps
    print_next_steps(config, &options.root, outcome)?;

    Ok(())
}

fn setup_store(template_dir: &Option<PathBuf>) -> Result<TemplateStore> {
    let store = match template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateStore::from_local(path.clone())
        }
        None => TemplateStore::embedded(),
    };
    Ok(store)
}

async fn select_version(config: &GeneratorConfig, args: &CreateArgs) -> Result<VersionSpec> {
    if let Some(input) = &args.version {
        let spec = version::validate(input)?;
        cliclack::log::info(format!("Using {} {}", config.package_name, spec))?;
        return Ok(spec);
    }

    let spinner = cliclack::spinner();
    spinner.start("Checking the latest release...");
    let default = suggested_default(config).await;
    match &default {
        Some(range) => spinner.stop(format!("Latest release line: {}", range)),
        None => spinner.stop("No suggested version available"),
    }

    if args.yes {
        let Some(range) = default else {
            anyhow::bail!("No suggested version available; pass --train-version to choose one.");
        };
        cliclack::log::info(format!("Using {} {}", config.package_name, range))?;
        return Ok(version::validate(&range)?);
    }

    let mut prompt = cliclack::input(format!(
        "What version of {} are you using?",
        config.display_name
    ))
    .validate(|input: &String| version::validate(input).map(|_| ()).map_err(|e| e.to_string()));
    if let Some(range) = &default {
        prompt = prompt.placeholder(range).default_input(range);
    }

    let answer: String = prompt.interact()?;
    Ok(version::validate(&answer)?)
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = match &args.directory {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => current_dir.join(dir),
        None => current_dir,
    };

    // Validate parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.exists() && parent != Path::new("") {
            anyhow::bail!("Parent directory does not exist: {}", parent.display());
        }
    }

    // Existing files are overwritten, so make that visible
    if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!(
                    "Directory has {} existing items; generated files will overwrite matches",
                    count
                ))?;
            }
        }
    }

    cliclack::log::info(format!("Generating into {}", path.display()))?;
    Ok(path)
}

async fn create_project(
    store: &TemplateStore,
    spec: &VersionSpec,
    options: &ProjectOptions,
) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");

    match Generator::new(store).write_project(spec, options).await {
        Ok(report) => {
            spinner.stop(format!(
                "Created {} directories and {} files in {}",
                report.directories.len(),
                report.files.len(),
                options.root.display()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.stop("Project generation failed");
            Err(e)
        }
    }
}

async fn install_dependencies(options: &ProjectOptions) -> Result<InstallOutcome> {
    let mut skip = options.skip_install;
    if skip {
        cliclack::log::info("Skipping npm install")?;
    } else {
        let npm = check_npm();
        if !npm.available {
            cliclack::log::warning(format!(
                "{} was not found; install dependencies manually",
                npm.name
            ))?;
            skip = true;
        } else {
            tracing::debug!(version = ?npm.version, "npm found");
        }

        let node = check_node();
        if !node.available {
            cliclack::log::warning(format!(
                "{} was not found; install it before running npm start",
                node.name
            ))?;
        }
    }

    match on_complete(&NpmInstaller::default(), &options.root, skip).await {
        Ok(outcome) => {
            if outcome == InstallOutcome::Installed {
                cliclack::log::success("Dependencies installed")?;
            }
            Ok(outcome)
        }
        Err(e) => {
            // The project is complete; only the dependencies are missing
            cliclack::log::warning(format!("{}", e))?;
            Ok(InstallOutcome::Skipped)
        }
    }
}

fn print_next_steps(config: &GeneratorConfig, root: &Path, outcome: InstallOutcome) -> Result<()> {
    let mut steps = Vec::new();

    if std::env::current_dir().ok().as_deref() != Some(root) {
        steps.push(format!("cd {}", root.display()));
    }
    if outcome == InstallOutcome::Skipped {
        steps.push("npm install".to_string());
    }
    steps.push("npm start".to_string());

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    println!();
    println!("  Docs: {}", config.docs_url);

    cliclack::outro("All aboard!")?;

    Ok(())
}
