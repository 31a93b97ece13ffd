use crate::contract::{PluginMethod, PluginRequest, PluginResponse, ResultItem};
use crate::core_service::PluginService;

pub const INVALID_REQUEST_TITLE: &str = "Invalid plugin request";

pub fn handle_request(service: &PluginService, request: PluginRequest) -> PluginResponse {
    let method = match request.into_method() {
        Ok(method) => method,
        Err(error) => {
            tracing::warn!(%error, "rejecting request");
            return vec![ResultItem::message(INVALID_REQUEST_TITLE, error.to_string())].into();
        }
    };

    let result = match method {
        PluginMethod::Query(query) => service.query(&query),
        PluginMethod::ContextMenu(data) => service.context_menu(&data),
        PluginMethod::OpenPath(path) => service.open_path(&path),
        PluginMethod::OpenWindowsTerminal(directory) => service.open_terminal(&directory),
    };
    result.into()
}

pub fn handle_json(service: &PluginService, payload: &str) -> String {
    let response = match serde_json::from_str::<PluginRequest>(payload) {
        Ok(request) => handle_request(service, request),
        Err(error) => {
            tracing::warn!(%error, "request is not valid json");
            vec![ResultItem::message(INVALID_REQUEST_TITLE, error.to_string())].into()
        }
    };

    encode(&response)
}

pub fn encode(response: &PluginResponse) -> String {
    // Only strings, bools and vectors of them: serialization cannot fail.
    serde_json::to_string(response).unwrap_or_else(|_| r#"{"result":[]}"#.to_string())
}
