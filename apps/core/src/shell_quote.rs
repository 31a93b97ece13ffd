//! Quoting for the two command-line dialects the plugin writes into: POSIX
//! shell scripts run inside the guest, and the Windows Terminal command line
//! on the host.

use std::borrow::Cow;

/// Quotes `value` as exactly one word for `sh`, `bash` and `zsh`.
///
/// NUL bytes cannot travel through an argument vector, so they are dropped
/// before quoting.
pub fn quote_word(value: &str) -> String {
    let cleaned: Cow<'_, str> = if value.contains('\0') {
        Cow::Owned(value.replace('\0', ""))
    } else {
        Cow::Borrowed(value)
    };

    match shlex::try_quote(&cleaned) {
        Ok(quoted) => quoted.into_owned(),
        Err(_) => "''".to_string(),
    }
}

/// Windows Terminal splits its command line into tabs and panes on bare `;`.
/// A literal semicolon has to be written as `\;`.
pub fn escape_wt_separators(value: &str) -> String {
    value.replace(';', "\\;")
}
