use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use clap::Parser;

use crate::config::{FileSettings, SettingsSource, StaticSettings};
use crate::contract::{PluginMethod, PluginRequest, PluginResponse};
use crate::core_service::PluginService;
use crate::exec::{CommandRunner, SystemRunner};
use crate::{logging, transport, warmup};

pub const BIN_NAME: &str = "wslsearch-core";

#[derive(Debug, Clone, Parser, PartialEq, Eq)]
#[command(name = BIN_NAME, version, about = "Find files in your WSL home directory from the launcher")]
pub struct Options {
    /// JSON-RPC request passed by the launcher.
    #[arg(required_unless_present = "query")]
    pub request: Option<String>,

    /// Run a single query and print the results as readable JSON.
    #[arg(short, long, conflicts_with = "request")]
    pub query: Option<String>,

    /// Settings file to read instead of the launcher's plugin settings.
    #[arg(long, env = "WSL_FILE_SEARCH_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Do not boot the guest in the background before searching.
    #[arg(long)]
    pub no_warmup: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("failed to write response: {0}")]
    Output(#[from] std::io::Error),
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

pub fn parse_cli_args(args: &[String]) -> Result<Options, clap::Error> {
    Options::try_parse_from(std::iter::once(BIN_NAME.to_string()).chain(args.iter().cloned()))
}

pub fn run_with_options(options: Options) -> Result<(), RuntimeError> {
    if let Err(error) = logging::init() {
        eprintln!("[{BIN_NAME}] logging disabled: {error}");
    }

    let settings = settings_source(options.settings.clone());
    let runner: Arc<dyn CommandRunner> = Arc::new(SystemRunner);
    let service = PluginService::new(settings, runner);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    // The warm-up thread is left running; only its guest process matters.
    run_service(&service, &options, &mut out).map(drop)
}

/// Answers one invocation on `out`. Split from [`run_with_options`] so it can
/// be driven with any service and writer.
///
/// Returns the warm-up thread when one was started.
pub fn run_service(
    service: &PluginService,
    options: &Options,
    out: &mut dyn Write,
) -> Result<Option<JoinHandle<()>>, RuntimeError> {
    if let Some(query) = &options.query {
        let warmup = maybe_warm_up(service, options, opens_session(query));
        let response = PluginResponse::from(service.query(query));
        writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
        return Ok(warmup);
    }

    let payload = options.request.as_deref().unwrap_or_default();
    let warmup = maybe_warm_up(service, options, request_opens_session(payload));
    tracing::debug!(payload, "handling request");
    writeln!(out, "{}", transport::handle_json(service, payload))?;
    out.flush()?;
    Ok(warmup)
}

fn settings_source(path: Option<PathBuf>) -> Box<dyn SettingsSource> {
    match path.map(FileSettings::new).or_else(FileSettings::default_location) {
        Some(file) => {
            tracing::debug!(path = %file.path().display(), "using settings file");
            Box::new(file)
        }
        None => Box::new(StaticSettings::default()),
    }
}

/// The launcher starts a new process for every keystroke, and booting the
/// guest next to a search cannot make that search faster. Only the help row
/// and the first typed character warm up; later keystrokes find the guest
/// already running.
fn opens_session(query: &str) -> bool {
    query.trim().chars().count() <= 1
}

fn request_opens_session(payload: &str) -> bool {
    match serde_json::from_str::<PluginRequest>(payload).map(PluginRequest::into_method) {
        Ok(Ok(PluginMethod::Query(query))) => opens_session(&query),
        _ => false,
    }
}

fn maybe_warm_up(
    service: &PluginService,
    options: &Options,
    wanted: bool,
) -> Option<JoinHandle<()>> {
    if options.no_warmup || !wanted {
        return None;
    }
    let distro = service.settings().load().distro;
    Some(warmup::spawn(service.runner(), distro))
}

#[cfg(test)]
mod tests {
    use super::{opens_session, parse_cli_args, request_opens_session};

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn parses_launcher_request() {
        let options = parse_cli_args(&args(&[r#"{"method":"query","parameters":["x"]}"#]))
            .expect("request should parse");
        assert!(options.request.is_some());
        assert!(options.query.is_none());
        assert!(!options.no_warmup);
    }

    #[test]
    fn parses_manual_query() {
        let options =
            parse_cli_args(&args(&["--query", "report .pdf", "--no-warmup"])).expect("parse");
        assert_eq!(options.query.as_deref(), Some("report .pdf"));
        assert!(options.no_warmup);
    }

    #[test]
    fn requires_request_or_query() {
        assert!(parse_cli_args(&[]).is_err());
    }

    #[test]
    fn only_session_opening_queries_warm_up() {
        assert!(opens_session(""));
        assert!(opens_session("  r "));
        assert!(!opens_session("re"));

        assert!(request_opens_session(r#"{"method":"query","parameters":["a"]}"#));
        assert!(request_opens_session(r#"{"method":"query"}"#));
        assert!(!request_opens_session(r#"{"method":"query","parameters":["abc"]}"#));
        assert!(!request_opens_session(r#"{"method":"open_path","parameters":["/a"]}"#));
        assert!(!request_opens_session("not json"));
    }
}
