use crate::truncate::truncate_path_default;

/// Width of the title line the launcher shows for a match.
pub const DISPLAY_WIDTH: usize = 60;

/// One line of search output, classified and ready to present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    pub raw_path: String,
    pub display_path: String,
    pub is_directory: bool,
    pub containing_directory: String,
}

impl ResultEntry {
    /// Classifies a single output line. A line is a directory when it ends in
    /// `/` or its last segment has no `.`; everything else is a file.
    pub fn from_line(line: &str) -> Self {
        let is_directory = looks_like_directory(line);
        let containing_directory = if is_directory {
            line.to_string()
        } else {
            parent_of(line)
        };

        Self {
            raw_path: line.to_string(),
            display_path: truncate_path_default(line, DISPLAY_WIDTH),
            is_directory,
            containing_directory,
        }
    }
}

fn looks_like_directory(line: &str) -> bool {
    if line.ends_with('/') {
        return true;
    }
    let last_segment = line.rsplit('/').next().unwrap_or(line);
    !last_segment.contains('.')
}

fn parent_of(line: &str) -> String {
    match line.rsplit_once('/') {
        Some(("", _)) if line.starts_with('/') => "/".to_string(),
        Some((parent, _)) if !parent.is_empty() => parent.to_string(),
        _ => line.to_string(),
    }
}
