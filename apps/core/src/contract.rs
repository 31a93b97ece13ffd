use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ICON_PATH: &str = "icon.png";

pub const METHOD_QUERY: &str = "query";
pub const METHOD_CONTEXT_MENU: &str = "context_menu";
pub const METHOD_OPEN_PATH: &str = "open_path";
pub const METHOD_OPEN_WINDOWS_TERMINAL: &str = "open_windows_terminal";

/// A launcher request as received on the command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PluginRequest {
    pub method: String,
    #[serde(default)]
    pub parameters: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginMethod {
    Query(String),
    ContextMenu(Vec<String>),
    OpenPath(String),
    OpenWindowsTerminal(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("unknown method '{0}'")]
    UnknownMethod(String),
    #[error("method '{method}' expects a string parameter at position {index}")]
    BadParameter { method: String, index: usize },
}

impl PluginRequest {
    pub fn new(method: &str, parameters: Vec<Value>) -> Self {
        Self {
            method: method.to_string(),
            parameters,
        }
    }

    pub fn into_method(self) -> Result<PluginMethod, RequestError> {
        match self.method.as_str() {
            METHOD_QUERY => Ok(PluginMethod::Query(
                // An absent query is the same as an empty one.
                self.optional_string(0)?.unwrap_or_default(),
            )),
            METHOD_CONTEXT_MENU => Ok(PluginMethod::ContextMenu(self.context_data())),
            METHOD_OPEN_PATH => Ok(PluginMethod::OpenPath(self.required_string(0)?)),
            METHOD_OPEN_WINDOWS_TERMINAL => {
                Ok(PluginMethod::OpenWindowsTerminal(self.required_string(0)?))
            }
            other => Err(RequestError::UnknownMethod(other.to_string())),
        }
    }

    fn optional_string(&self, index: usize) -> Result<Option<String>, RequestError> {
        match self.parameters.get(index) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(self.bad_parameter(index)),
        }
    }

    fn required_string(&self, index: usize) -> Result<String, RequestError> {
        self.optional_string(index)?
            .ok_or_else(|| self.bad_parameter(index))
    }

    /// Context data comes back either as the array the result carried or
    /// spread across the parameter list.
    fn context_data(&self) -> Vec<String> {
        let values = match self.parameters.as_slice() {
            [Value::Array(items)] => items.as_slice(),
            other => other,
        };
        values
            .iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect()
    }

    fn bad_parameter(&self, index: usize) -> RequestError {
        RequestError::BadParameter {
            method: self.method.clone(),
            index,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRpcAction {
    pub method: String,
    pub parameters: Vec<String>,
    #[serde(rename = "dontHideAfterAction")]
    pub dont_hide_after_action: bool,
}

/// One row in the launcher's result list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultItem {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "SubTitle")]
    pub subtitle: String,
    #[serde(rename = "IcoPath")]
    pub icon_path: String,
    #[serde(
        rename = "JsonRPCAction",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub action: Option<JsonRpcAction>,
    #[serde(rename = "ContextData", default, skip_serializing_if = "Vec::is_empty")]
    pub context_data: Vec<String>,
}

impl ResultItem {
    /// A row with nothing to invoke: help text, placeholders and errors.
    pub fn message(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            icon_path: ICON_PATH.to_string(),
            action: None,
            context_data: Vec::new(),
        }
    }

    pub fn with_action(mut self, method: &str, parameters: Vec<String>) -> Self {
        self.action = Some(JsonRpcAction {
            method: method.to_string(),
            parameters,
            dont_hide_after_action: false,
        });
        self
    }

    pub fn with_context_data(mut self, context_data: Vec<String>) -> Self {
        self.context_data = context_data;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PluginResponse {
    pub result: Vec<ResultItem>,
}

impl From<Vec<ResultItem>> for PluginResponse {
    fn from(result: Vec<ResultItem>) -> Self {
        Self { result }
    }
}
