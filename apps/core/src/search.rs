use std::collections::HashSet;
use std::time::Duration;

use crate::exec::CommandRunner;
use crate::model::ResultEntry;
use crate::search_command::{SearchCommand, FD_MISSING_SENTINEL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Matches(Vec<ResultEntry>),
    /// The search ran and found nothing, failed, or timed out.
    NoMatches,
    /// Neither `fd` nor `fdfind` is installed in the guest.
    ToolMissing,
}

/// Runs the compiled search and shapes its output.
///
/// Never fails: spawn errors, timeouts and non-zero exits all collapse into
/// [`SearchOutcome::NoMatches`]. Only the missing-tool sentinel is reported
/// separately.
pub fn run(
    runner: &dyn CommandRunner,
    command: &SearchCommand,
    max_results: usize,
    timeout: Duration,
) -> SearchOutcome {
    let output = match runner.run(command.process(), timeout) {
        Ok(output) => output,
        Err(error) => {
            tracing::warn!(%error, "search command failed");
            return SearchOutcome::NoMatches;
        }
    };

    if has_sentinel(&output.stdout) {
        return SearchOutcome::ToolMissing;
    }

    if !output.success {
        tracing::debug!(status = ?output.status_code, "search exited unsuccessfully");
        return SearchOutcome::NoMatches;
    }

    shape(&output.stdout, max_results)
}

/// Turns raw `fd` output into at most `max_results` entries, dropping blank
/// and repeated lines.
pub fn shape(stdout: &str, max_results: usize) -> SearchOutcome {
    if has_sentinel(stdout) {
        return SearchOutcome::ToolMissing;
    }

    let mut seen = HashSet::new();
    let entries: Vec<ResultEntry> = stdout
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .take(max_results)
        .map(ResultEntry::from_line)
        .collect();

    if entries.is_empty() {
        SearchOutcome::NoMatches
    } else {
        SearchOutcome::Matches(entries)
    }
}

fn has_sentinel(stdout: &str) -> bool {
    stdout.lines().any(|line| line.trim() == FD_MISSING_SENTINEL)
}
