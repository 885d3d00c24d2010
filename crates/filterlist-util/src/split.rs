use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n]+").unwrap());

fn is_document_padding(c: char) -> bool {
    // Byte order marks show up at the start of lists saved by some editors
    c.is_whitespace() || c == '\u{feff}'
}

/// Splits a filter document into lines.
///
/// The document is trimmed first and any run of `\r`/`\n` counts as a single break, so blank
/// lines never survive. An empty document produces a single empty line.
///
/// # Example
///
/// ```
/// use filterlist_util::split::split_filter;
/// assert_eq!(split_filter("\r\n! Title\r\n\r\n||example.org^\n"), vec!["! Title", "||example.org^"]);
/// assert_eq!(split_filter(""), vec![""]);
/// ```
pub fn split_filter(input: &str) -> Vec<String> {
    LINE_BREAKS
        .split(input.trim_matches(is_document_padding))
        .map(String::from)
        .collect()
}

/// Returns true if every line is blank.
pub fn is_blank<S: AsRef<str>>(lines: &[S]) -> bool {
    lines.iter().all(|line| line.as_ref().trim().is_empty())
}
