use std::time::Duration;

use crate::config::{Config, Distro};
use crate::exec::{CommandRunner, ExecError, ProcessCommand};
use crate::search_command::{guest_command, WSL_PROGRAM};
use crate::shell_quote::{escape_wt_separators, quote_word};

pub const EXPLORER_PROGRAM: &str = "explorer.exe";
pub const TERMINAL_PROGRAM: &str = "wt.exe";

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("empty path")]
    EmptyPath,
    #[error("wslpath could not translate '{path}'")]
    Translate { path: String },
    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// `wslpath -w <path>` in the guest. The path travels as its own argument, so
/// no shell ever sees it.
pub fn translate_command(distro: Distro, path: &str) -> ProcessCommand {
    let path = if path.starts_with('-') {
        format!("./{path}")
    } else {
        path.to_string()
    };
    guest_command(distro).args(["wslpath", "-w"]).arg(path)
}

pub fn translate_path(
    runner: &dyn CommandRunner,
    distro: Distro,
    path: &str,
    timeout: Duration,
) -> Result<String, LaunchError> {
    let output = runner.run(&translate_command(distro, path), timeout)?;
    let translated = output.stdout.trim();
    if !output.success || translated.is_empty() {
        return Err(LaunchError::Translate {
            path: path.to_string(),
        });
    }
    Ok(translated.to_string())
}

/// Translates a guest path and hands the Windows path to Explorer.
pub fn open_path(
    runner: &dyn CommandRunner,
    cfg: &Config,
    path: &str,
    timeout: Duration,
) -> Result<(), LaunchError> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(LaunchError::EmptyPath);
    }

    let windows_path = translate_path(runner, cfg.distro, trimmed, timeout)?;
    tracing::info!(guest = trimmed, host = %windows_path, "opening in explorer");
    runner.spawn_detached(&ProcessCommand::new(EXPLORER_PROGRAM).arg(windows_path))?;
    Ok(())
}

/// Windows Terminal on the distro's profile, running the configured shell in
/// `directory`.
///
/// The directory is quoted as one POSIX word for the guest shell, then every
/// `;` in the script is escaped for Windows Terminal's own parser.
pub fn terminal_command(cfg: &Config, directory: &str) -> ProcessCommand {
    let shell = cfg.shell.as_str();
    let script = format!("cd {} && exec {shell}", quote_word(directory));

    ProcessCommand::new(TERMINAL_PROGRAM)
        .args(["-p", cfg.distro.as_str()])
        .args([WSL_PROGRAM, "-d", cfg.distro.as_str(), "--exec", shell, "-c"])
        .arg(escape_wt_separators(&script))
}

pub fn open_terminal(
    runner: &dyn CommandRunner,
    cfg: &Config,
    directory: &str,
) -> Result<(), LaunchError> {
    if directory.trim().is_empty() {
        return Err(LaunchError::EmptyPath);
    }

    let command = terminal_command(cfg, directory);
    tracing::info!(directory, "opening terminal");
    runner.spawn_detached(&command)?;
    Ok(())
}
