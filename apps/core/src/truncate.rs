//! Fixed-width shortening of guest paths for result titles.

pub const ELLIPSIS: &str = "...";
pub const DEFAULT_KEEP_LEADING: usize = 3;

const SEPARATOR: char = '/';

pub fn truncate_path_default(full_path: &str, max_len: usize) -> String {
    truncate_path(full_path, max_len, DEFAULT_KEEP_LEADING)
}

/// Shortens `full_path` to at most `max_len` characters, keeping up to
/// `keep_leading` leading segments and always the final segment.
///
/// When even `.../<last>` does not fit, the final segment itself is cut from
/// the front, so the result never exceeds `max_len`.
pub fn truncate_path(full_path: &str, max_len: usize, keep_leading: usize) -> String {
    if char_len(full_path) <= max_len {
        return full_path.to_string();
    }

    let ellipsis_len = char_len(ELLIPSIS);
    if max_len <= ellipsis_len {
        return ELLIPSIS.chars().take(max_len).collect();
    }

    let segments: Vec<&str> = full_path
        .trim_matches(SEPARATOR)
        .split(SEPARATOR)
        .collect();
    let Some(last) = segments.last().copied() else {
        return ellipsize_tail(full_path, max_len);
    };

    if segments.len() <= keep_leading.max(1).saturating_add(1) {
        return ellipsize_tail(full_path, max_len);
    }

    let root = if full_path.starts_with(SEPARATOR) { "/" } else { "" };
    let trailing = if full_path.ends_with(SEPARATOR) { "/" } else { "" };

    for leading in (1..=keep_leading).rev() {
        let candidate = format!(
            "{root}{}{SEPARATOR}{ELLIPSIS}{SEPARATOR}{last}{trailing}",
            segments[..leading].join("/")
        );
        if char_len(&candidate) <= max_len {
            return candidate;
        }
    }

    let tail_only = format!("{ELLIPSIS}{SEPARATOR}{last}{trailing}");
    if char_len(&tail_only) <= max_len {
        return tail_only;
    }

    ellipsize_tail(last, max_len)
}

/// `...` followed by the last `max_len - 3` characters of `value`.
fn ellipsize_tail(value: &str, max_len: usize) -> String {
    let keep = max_len.saturating_sub(char_len(ELLIPSIS));
    let skip = char_len(value).saturating_sub(keep);
    let tail: String = value.chars().skip(skip).collect();
    format!("{ELLIPSIS}{tail}")
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::{char_len, truncate_path, truncate_path_default};

    const LONG: &str = "/home/alice/projects/clients/acme/reports/2024/q4/summary.pdf";

    #[test]
    fn short_paths_are_untouched() {
        assert_eq!(truncate_path_default("/home/u/a.txt", 60), "/home/u/a.txt");
    }

    #[test]
    fn keeps_leading_segments_and_last_segment() {
        assert_eq!(
            truncate_path_default(LONG, 40),
            "/home/alice/projects/.../summary.pdf"
        );
    }

    #[test]
    fn drops_leading_segments_until_it_fits() {
        assert_eq!(truncate_path_default(LONG, 30), "/home/alice/.../summary.pdf");
        assert_eq!(truncate_path_default(LONG, 25), "/home/.../summary.pdf");
    }

    #[test]
    fn falls_back_to_ellipsis_and_last_segment() {
        assert_eq!(truncate_path_default(LONG, 16), ".../summary.pdf");
    }

    #[test]
    fn cuts_the_last_segment_when_nothing_else_fits() {
        assert_eq!(truncate_path_default(LONG, 10), "...ary.pdf");
    }

    #[test]
    fn few_segments_use_suffix_truncation() {
        let path = "/home/a_really_long_directory_name/file.txt";
        assert_eq!(truncate_path_default(path, 20), "...ory_name/file.txt");
    }

    #[test]
    fn preserves_trailing_separator_of_directories() {
        let path = "/home/alice/projects/clients/acme/reports/";
        assert_eq!(truncate_path(path, 35, 3), "/home/alice/projects/.../reports/");
        assert_eq!(truncate_path(path, 30, 3), "/home/alice/.../reports/");
    }

    #[test]
    fn huge_keep_leading_uses_suffix_truncation() {
        assert_eq!(
            truncate_path("/a/b/c/d/e/f/ggggggggggggg.txt", 12, usize::MAX),
            "...ggggg.txt"
        );
    }

    #[test]
    fn tiny_limits_return_part_of_the_marker() {
        assert_eq!(truncate_path_default(LONG, 2), "..");
    }

    #[test]
    fn output_never_exceeds_limit_and_is_idempotent() {
        let paths = [
            LONG,
            "/home/u/docs/",
            "relative/path/without/root/but/deep/file.rs",
            "/home/\u{e9}l\u{e8}ve/donn\u{e9}es/tr\u{e8}s/profond/r\u{e9}sum\u{e9}.odt",
            "single_segment_that_is_quite_long.tar.gz",
        ];
        for path in paths {
            for max_len in 1..=70 {
                let once = truncate_path_default(path, max_len);
                assert!(char_len(&once) <= max_len, "{path} @ {max_len}: {once}");
                assert_eq!(truncate_path_default(&once, max_len), once);
            }
        }
    }
}
