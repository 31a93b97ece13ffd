use std::path::{Path, PathBuf};

use serde_json::Value;

/// Name the launcher registers the plugin under. The host keeps plugin
/// settings in a directory with exactly this name.
pub const PLUGIN_NAME: &str = "WSL File Search";
pub const SETTINGS_FILE_NAME: &str = "Settings.json";
pub const DEFAULT_MAX_RESULTS: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distro {
    #[default]
    Ubuntu,
    Debian,
}

impl Distro {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ubuntu" => Some(Self::Ubuntu),
            "debian" => Some(Self::Debian),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ubuntu => "Ubuntu",
            Self::Debian => "Debian",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shell {
    #[default]
    Zsh,
    Bash,
}

impl Shell {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "zsh" => Some(Self::Zsh),
            "bash" => Some(Self::Bash),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Zsh => "zsh",
            Self::Bash => "bash",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub distro: Distro,
    pub shell: Shell,
    pub max_results: u32,
    /// Match the pattern against the whole path rather than the final
    /// component only.
    pub match_full_path: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            distro: Distro::default(),
            shell: Shell::default(),
            max_results: DEFAULT_MAX_RESULTS,
            match_full_path: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings document '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// Read-only access to the plugin configuration.
///
/// Implementations are expected to hand out a fresh snapshot on every call;
/// callers never cache the result across requests.
pub trait SettingsSource: Send + Sync {
    fn load(&self) -> Config;
}

/// Settings backed by the launcher's per-plugin `Settings.json`, re-read on
/// every access.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings at the launcher's standard location, if the platform config
    /// directory can be resolved.
    pub fn default_location() -> Option<Self> {
        settings_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsSource for FileSettings {
    fn load(&self) -> Config {
        match load_from_path(&self.path) {
            Ok(config) => config,
            Err(error) => {
                tracing::warn!(%error, "falling back to default settings");
                Config::default()
            }
        }
    }
}

/// Fixed configuration, used when no settings file is available and in tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSettings(pub Config);

impl SettingsSource for StaticSettings {
    fn load(&self) -> Config {
        self.0.clone()
    }
}

pub fn settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| {
        base.join("FlowLauncher")
            .join("Settings")
            .join("Plugins")
            .join(PLUGIN_NAME)
            .join(SETTINGS_FILE_NAME)
    })
}

/// Missing files resolve to the defaults; unreadable or malformed ones are
/// reported so the caller can decide how loudly to fall back.
pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "settings file not found");
            return Ok(Config::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let document: Value = json5::from_str(&raw).map_err(|error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: error.to_string(),
    })?;
    Ok(from_document(&document))
}

/// Builds a config from a settings document. Every field falls back to its
/// default on its own, so one bad value never discards the others.
pub fn from_document(document: &Value) -> Config {
    let defaults = Config::default();

    let distro = document
        .get("distro")
        .and_then(Value::as_str)
        .and_then(Distro::parse)
        .unwrap_or_else(|| {
            log_fallback("distro", document.get("distro"));
            defaults.distro
        });

    let shell = document
        .get("shell")
        .and_then(Value::as_str)
        .and_then(Shell::parse)
        .unwrap_or_else(|| {
            log_fallback("shell", document.get("shell"));
            defaults.shell
        });

    let max_results = parse_max_results(document.get("max_results")).unwrap_or_else(|| {
        log_fallback("max_results", document.get("max_results"));
        defaults.max_results
    });

    let match_full_path = parse_flag(document.get("match_full_path")).unwrap_or_else(|| {
        log_fallback("match_full_path", document.get("match_full_path"));
        defaults.match_full_path
    });

    Config {
        distro,
        shell,
        max_results,
        match_full_path,
    }
}

fn parse_max_results(value: Option<&Value>) -> Option<u32> {
    let parsed = match value? {
        Value::Number(number) => number.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    }?;
    (parsed > 0).then_some(parsed)
}

fn parse_flag(value: Option<&Value>) -> Option<bool> {
    match value? {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn log_fallback(key: &str, value: Option<&Value>) {
    if let Some(value) = value {
        tracing::debug!(key, %value, "ignoring invalid setting");
    }
}

#[cfg(test)]
mod tests {
    use super::{from_document, parse_max_results, Distro, Shell};
    use serde_json::json;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg = from_document(&json!({}));
        assert_eq!(cfg.distro, Distro::Ubuntu);
        assert_eq!(cfg.shell, Shell::Zsh);
        assert_eq!(cfg.max_results, 20);
        assert!(!cfg.match_full_path);
    }

    #[test]
    fn invalid_fields_fall_back_independently() {
        let cfg = from_document(&json!({
            "distro": "Arch",
            "shell": "bash",
            "max_results": -4,
        }));
        assert_eq!(cfg.distro, Distro::Ubuntu);
        assert_eq!(cfg.shell, Shell::Bash);
        assert_eq!(cfg.max_results, 20);
    }

    #[test]
    fn max_results_accepts_numeric_strings_but_not_zero() {
        assert_eq!(parse_max_results(Some(&json!("35"))), Some(35));
        assert_eq!(parse_max_results(Some(&json!(0))), None);
        assert_eq!(parse_max_results(Some(&json!("lots"))), None);
        assert_eq!(parse_max_results(Some(&json!(2.5))), None);
    }
}
