//! Post-generation dependency installation
//!
//! The generator itself never installs anything; it hands the project root to
//! an `Installer` once every file has been written.

use super::check::npm_program;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for `npm install` (2 minutes)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Installs the generated project's dependencies
#[allow(async_fn_in_trait)]
pub trait Installer {
    /// Human-readable command, shown before running
    fn command(&self) -> String;

    async fn install(&self, project_dir: &Path) -> Result<()>;
}

/// What the post-generation hook did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Skipped,
    Installed,
}

/// Run the installer unless `skip_install` is set
pub async fn on_complete<I: Installer>(
    installer: &I,
    project_dir: &Path,
    skip_install: bool,
) -> Result<InstallOutcome> {
    if skip_install {
        tracing::debug!("dependency installation skipped");
        return Ok(InstallOutcome::Skipped);
    }
    installer.install(project_dir).await?;
    Ok(InstallOutcome::Installed)
}

/// `npm install` in the project root, output streamed to the terminal
pub struct NpmInstaller {
    timeout: Duration,
}

impl Default for NpmInstaller {
    fn default() -> Self {
        Self {
            timeout: INSTALL_TIMEOUT,
        }
    }
}

async fn stream_lines<R: AsyncRead + Unpin>(reader: R, is_stderr: bool) {
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if is_stderr => eprintln!("  {}", line.yellow()),
            Ok(Some(line)) => println!("  {}", line),
            Ok(None) => break,
            Err(e) => {
                eprintln!("{} {}", "Error reading installer output:".red(), e);
                break;
            }
        }
    }
}

impl Installer for NpmInstaller {
    fn command(&self) -> String {
        format!("{} install", npm_program())
    }

    async fn install(&self, project_dir: &Path) -> Result<()> {
        let cmd = self.command();
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        let mut child = TokioCommand::new(npm_program())
            .arg("install")
            .current_dir(project_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start `{}`", cmd))?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to capture installer stdout")?;
        let stderr = child
            .stderr
            .take()
            .context("Failed to capture installer stderr")?;

        let run = async {
            tokio::join!(stream_lines(stdout, false), stream_lines(stderr, true));
            child.wait().await
        };

        let result = timeout(self.timeout, run).await;
        match result {
            Ok(Ok(status)) => {
                println!();
                if status.success() {
                    Ok(())
                } else {
                    anyhow::bail!(
                        "`{}` failed with exit code: {}\n\
                         Please run it manually inside {}",
                        cmd,
                        status.code().unwrap_or(-1),
                        project_dir.display()
                    );
                }
            }
            Ok(Err(e)) => {
                anyhow::bail!("Failed to wait for installer: {}", e);
            }
            Err(_) => {
                let _ = child.kill().await;
                anyhow::bail!(
                    "`{}` timed out after {} seconds. Please run it manually inside {}",
                    cmd,
                    self.timeout.as_secs(),
                    project_dir.display()
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingInstaller {
        calls: AtomicUsize,
    }

    impl Installer for CountingInstaller {
        fn command(&self) -> String {
            "count".to_string()
        }

        async fn install(&self, _project_dir: &Path) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_skip_install_never_calls_installer() {
        let installer = CountingInstaller::default();
        let outcome = on_complete(&installer, Path::new("."), true).await.unwrap();
        assert_eq!(outcome, InstallOutcome::Skipped);
        assert_eq!(installer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_install_delegates_once() {
        let installer = CountingInstaller::default();
        let outcome = on_complete(&installer, Path::new("."), false).await.unwrap();
        assert_eq!(outcome, InstallOutcome::Installed);
        assert_eq!(installer.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_npm_command() {
        assert!(NpmInstaller::default().command().ends_with(" install"));
    }
}
