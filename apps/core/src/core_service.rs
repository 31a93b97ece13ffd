use std::sync::Arc;
use std::time::Duration;

use crate::action_executor::{self, LaunchError};
use crate::config::SettingsSource;
use crate::contract::{ResultItem, METHOD_OPEN_PATH, METHOD_OPEN_WINDOWS_TERMINAL};
use crate::exec::{CommandRunner, DEFAULT_TIMEOUT};
use crate::model::ResultEntry;
use crate::query_dsl::QuerySpec;
use crate::search::{self, SearchOutcome};
use crate::search_command;

pub const HELP_TITLE: &str = "Search WSL Files";
pub const HELP_SUBTITLE: &str =
    "Type a filename or keyword to find inside your WSL home directory";
pub const MATCH_SUBTITLE: &str = "Open in Explorer • Right Arrow + Enter to open in Terminal";
pub const NO_RESULTS_TITLE: &str = "No results";
pub const TOOL_MISSING_TITLE: &str = "fd is not installed in WSL";
pub const TOOL_MISSING_SUBTITLE: &str =
    "Install it inside your distro with: sudo apt install fd-find";
pub const TERMINAL_TITLE: &str = "Open in Windows Terminal";
pub const OPEN_PATH_ERROR_TITLE: &str = "Error opening file";
pub const TERMINAL_ERROR_TITLE: &str = "Error opening Windows Terminal";

/// Serves every launcher method. Settings are read again for each call.
pub struct PluginService {
    settings: Box<dyn SettingsSource>,
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl PluginService {
    pub fn new(settings: Box<dyn SettingsSource>, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            settings,
            runner,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn settings(&self) -> &dyn SettingsSource {
        self.settings.as_ref()
    }

    pub fn runner(&self) -> Arc<dyn CommandRunner> {
        Arc::clone(&self.runner)
    }

    pub fn query(&self, raw: &str) -> Vec<ResultItem> {
        let spec = QuerySpec::parse(raw);
        if spec.is_empty() {
            return vec![ResultItem::message(HELP_TITLE, HELP_SUBTITLE)];
        }

        let cfg = self.settings.load();
        let command = search_command::compile(&spec, &cfg);
        tracing::debug!(command = %command.process(), "running search");

        let outcome = search::run(
            self.runner.as_ref(),
            &command,
            cfg.max_results as usize,
            self.timeout,
        );
        render_outcome(outcome, raw)
    }

    pub fn context_menu(&self, data: &[String]) -> Vec<ResultItem> {
        let Some(directory) = data.first() else {
            return Vec::new();
        };

        vec![ResultItem::message(
            TERMINAL_TITLE,
            format!("Windows Terminal with WSL profile at {directory}"),
        )
        .with_action(METHOD_OPEN_WINDOWS_TERMINAL, vec![directory.clone()])]
    }

    pub fn open_path(&self, path: &str) -> Vec<ResultItem> {
        let cfg = self.settings.load();
        match action_executor::open_path(self.runner.as_ref(), &cfg, path, self.timeout) {
            Ok(()) => Vec::new(),
            Err(error) => launch_failure(OPEN_PATH_ERROR_TITLE, error),
        }
    }

    pub fn open_terminal(&self, directory: &str) -> Vec<ResultItem> {
        let cfg = self.settings.load();
        match action_executor::open_terminal(self.runner.as_ref(), &cfg, directory) {
            Ok(()) => Vec::new(),
            Err(error) => launch_failure(TERMINAL_ERROR_TITLE, error),
        }
    }
}

pub fn render_outcome(outcome: SearchOutcome, raw_query: &str) -> Vec<ResultItem> {
    match outcome {
        SearchOutcome::Matches(entries) => entries.into_iter().map(render_entry).collect(),
        SearchOutcome::NoMatches => vec![ResultItem::message(
            NO_RESULTS_TITLE,
            format!("No matches for '{raw_query}'"),
        )],
        SearchOutcome::ToolMissing => {
            vec![ResultItem::message(TOOL_MISSING_TITLE, TOOL_MISSING_SUBTITLE)]
        }
    }
}

fn render_entry(entry: ResultEntry) -> ResultItem {
    ResultItem::message(entry.display_path, MATCH_SUBTITLE)
        .with_action(METHOD_OPEN_PATH, vec![entry.raw_path])
        .with_context_data(vec![entry.containing_directory])
}

fn launch_failure(title: &str, error: LaunchError) -> Vec<ResultItem> {
    tracing::error!(%error, "{title}");
    vec![ResultItem::message(title, error.to_string())]
}
