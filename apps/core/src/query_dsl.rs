/// A parsed launcher query: free pattern words plus extension filters.
///
/// Extensions are lowercase, dot-free, and unique, in the order they were
/// first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    pattern_tokens: Vec<String>,
    extensions: Vec<String>,
}

impl QuerySpec {
    pub fn parse(query: &str) -> Self {
        let mut spec = Self::default();

        for token in query.split_whitespace() {
            match extension_token(token) {
                Some(extension) => spec.push_extension(extension),
                None => spec.pattern_tokens.push(token.to_string()),
            }
        }

        spec
    }

    pub fn pattern_tokens(&self) -> &[String] {
        &self.pattern_tokens
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// True when the query had nothing to search for at all, as opposed to a
    /// query that simply matches nothing.
    pub fn is_empty(&self) -> bool {
        self.pattern_tokens.is_empty() && self.extensions.is_empty()
    }

    fn push_extension(&mut self, extension: String) {
        if !self.extensions.contains(&extension) {
            self.extensions.push(extension);
        }
    }
}

fn extension_token(token: &str) -> Option<String> {
    if let Some(value) = parse_prefixed(token, "ext:") {
        let normalized = normalize_extension_filter(value);
        return (!normalized.is_empty()).then_some(normalized);
    }

    let rest = token.strip_prefix('.')?;
    let mut significant = rest.chars().filter(|ch| *ch != '_').peekable();
    if significant.peek().is_none() || !significant.all(char::is_alphanumeric) {
        return None;
    }
    Some(normalize_extension_filter(rest))
}

fn normalize_extension_filter(value: &str) -> String {
    value
        .trim()
        .trim_start_matches('.')
        .chars()
        .flat_map(|ch| ch.to_lowercase())
        .collect()
}

/// Strips `prefix` from `token`, ignoring ASCII case.
fn parse_prefixed<'a>(token: &'a str, prefix: &str) -> Option<&'a str> {
    let head = token.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &token[prefix.len()..])
}
