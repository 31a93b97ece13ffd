use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A program and its argument vector. Nothing here is ever re-parsed by a
/// host shell; quoting for shells inside the guest happens before the
/// arguments are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ProcessCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl std::fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg:?}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub status_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' did not finish within {}ms", .timeout.as_millis())]
    Timeout { program: String, timeout: Duration },
    #[error("failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Seam for every external process the plugin starts.
pub trait CommandRunner: Send + Sync {
    /// Runs to completion and captures stdout, giving up after `timeout`.
    fn run(&self, command: &ProcessCommand, timeout: Duration) -> Result<ProcessOutput, ExecError>;

    /// Starts the process and returns without waiting for it.
    fn spawn_detached(&self, command: &ProcessCommand) -> Result<(), ExecError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ProcessCommand, timeout: Duration) -> Result<ProcessOutput, ExecError> {
        let mut child = build(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                kill_quietly(&mut child);
                return Err(ExecError::Wait {
                    program: command.program.clone(),
                    source: std::io::Error::other("stdout was not captured"),
                });
            }
        };

        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let mut reader = stdout;
            let mut buffer = Vec::new();
            let result = reader.read_to_end(&mut buffer).map(|_| buffer);
            let _ = tx.send(result);
        });

        let bytes = match rx.recv_timeout(timeout) {
            Ok(Ok(bytes)) => bytes,
            Ok(Err(source)) => {
                kill_quietly(&mut child);
                return Err(ExecError::Wait {
                    program: command.program.clone(),
                    source,
                });
            }
            Err(_) => {
                kill_quietly(&mut child);
                return Err(ExecError::Timeout {
                    program: command.program.clone(),
                    timeout,
                });
            }
        };

        let status = child.wait().map_err(|source| ExecError::Wait {
            program: command.program.clone(),
            source,
        })?;

        Ok(ProcessOutput {
            status_code: status.code(),
            success: status.success(),
            stdout: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    fn spawn_detached(&self, command: &ProcessCommand) -> Result<(), ExecError> {
        build(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_| ())
            .map_err(|source| ExecError::Spawn {
                program: command.program.clone(),
                source,
            })
    }
}

fn build(command: &ProcessCommand) -> Command {
    let mut process = Command::new(&command.program);
    process.args(&command.args);
    hide_console_window(&mut process);
    process
}

#[cfg(target_os = "windows")]
fn hide_console_window(process: &mut Command) {
    use std::os::windows::process::CommandExt;
    use windows_sys::Win32::System::Threading::CREATE_NO_WINDOW;

    process.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(target_os = "windows"))]
fn hide_console_window(_process: &mut Command) {}

fn kill_quietly(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(all(test, unix))]
mod tests {
    use super::{CommandRunner, ExecError, ProcessCommand, SystemRunner};
    use std::time::Duration;

    #[test]
    fn captures_stdout_and_status() {
        let command = ProcessCommand::new("sh").args(["-c", "printf 'a\\nb\\n'; exit 3"]);
        let output = SystemRunner
            .run(&command, Duration::from_secs(5))
            .expect("sh should run");
        assert_eq!(output.stdout, "a\nb\n");
        assert_eq!(output.status_code, Some(3));
        assert!(!output.success);
    }

    #[test]
    fn slow_processes_time_out() {
        let command = ProcessCommand::new("sh").args(["-c", "sleep 5"]);
        let result = SystemRunner.run(&command, Duration::from_millis(100));
        assert!(matches!(result, Err(ExecError::Timeout { .. })));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let command = ProcessCommand::new("wslsearch-definitely-not-a-binary");
        let result = SystemRunner.run(&command, Duration::from_secs(1));
        assert!(matches!(result, Err(ExecError::Spawn { .. })));
    }

    #[test]
    fn display_quotes_arguments() {
        let command = ProcessCommand::new("wsl.exe").arg("-d").arg("Ubuntu Preview");
        assert_eq!(command.to_string(), "wsl.exe \"-d\" \"Ubuntu Preview\"");
    }
}
