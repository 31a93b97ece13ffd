#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wslsearch_core::config::{Config, StaticSettings};
use wslsearch_core::core_service::PluginService;
use wslsearch_core::exec::{CommandRunner, ExecError, ProcessCommand, ProcessOutput};

/// Replays canned process results and records every command it is handed.
#[derive(Default)]
pub struct FakeRunner {
    responses: Mutex<VecDeque<Result<ProcessOutput, ExecError>>>,
    runs: Mutex<Vec<ProcessCommand>>,
    timeouts: Mutex<Vec<Duration>>,
    spawns: Mutex<Vec<ProcessCommand>>,
    fail_spawns: bool,
}

impl FakeRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_spawns() -> Arc<Self> {
        Arc::new(Self {
            fail_spawns: true,
            ..Self::default()
        })
    }

    pub fn push_stdout(&self, stdout: &str) {
        self.push(Ok(ProcessOutput {
            status_code: Some(0),
            success: true,
            stdout: stdout.to_string(),
        }));
    }

    pub fn push_exit(&self, code: i32, stdout: &str) {
        self.push(Ok(ProcessOutput {
            status_code: Some(code),
            success: code == 0,
            stdout: stdout.to_string(),
        }));
    }

    pub fn push(&self, response: Result<ProcessOutput, ExecError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn runs(&self) -> Vec<ProcessCommand> {
        self.runs.lock().unwrap().clone()
    }

    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }

    pub fn spawns(&self) -> Vec<ProcessCommand> {
        self.spawns.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, command: &ProcessCommand, timeout: Duration) -> Result<ProcessOutput, ExecError> {
        self.runs.lock().unwrap().push(command.clone());
        self.timeouts.lock().unwrap().push(timeout);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ProcessOutput {
                    status_code: Some(0),
                    success: true,
                    stdout: String::new(),
                })
            })
    }

    fn spawn_detached(&self, command: &ProcessCommand) -> Result<(), ExecError> {
        self.spawns.lock().unwrap().push(command.clone());
        if self.fail_spawns {
            return Err(ExecError::Spawn {
                program: command.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            });
        }
        Ok(())
    }
}

pub fn service_with(runner: &Arc<FakeRunner>, config: Config) -> PluginService {
    PluginService::new(Box::new(StaticSettings(config)), runner.clone())
}

pub fn service(runner: &Arc<FakeRunner>) -> PluginService {
    service_with(runner, Config::default())
}
