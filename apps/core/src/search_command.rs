use crate::config::{Config, Distro};
use crate::exec::ProcessCommand;
use crate::query_dsl::QuerySpec;
use crate::shell_quote::quote_word;

pub const WSL_PROGRAM: &str = "wsl.exe";

/// Printed by the search script instead of matches when neither `fd` nor
/// `fdfind` exists in the guest.
pub const FD_MISSING_SENTINEL: &str = "__WSL_FILE_SEARCH_FD_MISSING__";

const MATCH_ANYTHING: &str = ".";
const TOKEN_GAP: &str = ".*";

/// A compiled `fd` invocation, wrapped to run inside the configured guest
/// distribution and shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCommand {
    process: ProcessCommand,
}

impl SearchCommand {
    pub fn process(&self) -> &ProcessCommand {
        &self.process
    }

    /// The shell script handed to the guest shell with `-c`.
    pub fn script(&self) -> &str {
        self.process.args.last().map(String::as_str).unwrap_or_default()
    }
}

/// `wsl.exe -d <distro> --exec`, ready for the guest program and its args.
pub fn guest_command(distro: Distro) -> ProcessCommand {
    ProcessCommand::new(WSL_PROGRAM).args(["-d", distro.as_str(), "--exec"])
}

/// Every token must appear, in order, with anything in between. Tokens are
/// matched literally.
pub fn match_expression(spec: &QuerySpec) -> String {
    if spec.pattern_tokens().is_empty() {
        return MATCH_ANYTHING.to_string();
    }
    spec.pattern_tokens()
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join(TOKEN_GAP)
}

pub fn compile(spec: &QuerySpec, cfg: &Config) -> SearchCommand {
    let mut fd_args = vec![
        "--color".to_string(),
        "never".to_string(),
        "--absolute-path".to_string(),
        "--max-results".to_string(),
        cfg.max_results.to_string(),
    ];
    if cfg.match_full_path {
        fd_args.push("--full-path".to_string());
    }
    // fd keeps a result when it matches any of the repeated --extension flags.
    for extension in spec.extensions() {
        fd_args.push("--extension".to_string());
        fd_args.push(extension.clone());
    }
    fd_args.push("--".to_string());
    fd_args.push(match_expression(spec));

    let quoted: Vec<String> = fd_args.iter().map(|arg| quote_word(arg)).collect();
    let script = format!(
        "if command -v fd >/dev/null 2>&1; then finder=fd; \
         elif command -v fdfind >/dev/null 2>&1; then finder=fdfind; \
         else echo {FD_MISSING_SENTINEL}; exit 0; fi; \
         \"$finder\" {} \"$HOME\" 2>/dev/null",
        quoted.join(" ")
    );

    SearchCommand {
        process: guest_command(cfg.distro).args([cfg.shell.as_str(), "-c"]).arg(script),
    }
}
