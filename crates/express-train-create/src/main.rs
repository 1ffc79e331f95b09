//! express-train-create - Project scaffolding for express-train applications

use anyhow::Result;
use clap::Parser;
use express_train_scaffolder::tui::CreateArgs;
use express_train_scaffolder::{GeneratorConfig, TransportConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "express-train-create")]
#[command(about = "CLI for scaffolding express-train applications")]
#[command(version)]
pub struct Args {
    /// Project directory to generate into (defaults to the current directory)
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// Project name (defaults to the directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Project description written to package.json
    #[arg(long)]
    pub description: Option<String>,

    /// express-train version or range to target (skips the version prompt)
    #[arg(long = "train-version", value_name = "SPEC")]
    pub train_version: Option<String>,

    /// Do not run `npm install` after generating
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Local directory to use for templates instead of the bundled set (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Verify the registry's TLS certificate during the latest-version lookup
    #[arg(long = "strict-tls")]
    pub strict_tls: bool,

    /// Accept the suggested version without prompting (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            template_dir: args.template_dir,
            directory: args.directory,
            name: args.name,
            description: args.description,
            version: args.train_version,
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

/// Diagnostics go to stderr so they never mix with the prompts
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    init_tracing();

    let args = Args::parse();
    let mut config = GeneratorConfig::from_env()?;
    if args.strict_tls {
        config = config.with_transport(TransportConfig::strict());
    }

    let result = express_train_scaffolder::run(&config, args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
