//! Normalization of titles and names into filename-comparable strings.

/// Replacement for straight quotes. Titles often quote a term, and the
/// renamed files carry this marker where the quote was.
pub const EMPHASIS_MARKER: &str = "_em_";

const SEPARATORS: [char; 11] = ['.', '-', ':', ',', '?', '!', ' ', '(', ')', '&', '@'];

/// Maps text onto the character set used in publication filenames.
///
/// `ß` becomes `ss`, quotes become [`EMPHASIS_MARKER`], separators and
/// punctuation become `_`, and every remaining character outside printable
/// ASCII becomes one `_`. The result is stable under repeated application.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            'ß' => out.push_str("ss"),
            '"' | '\'' => out.push_str(EMPHASIS_MARKER),
            c if SEPARATORS.contains(&c) => out.push('_'),
            ' '..='~' => out.push(ch),
            _ => out.push('_'),
        }
    }
    out
}

/// [`sanitize`] for optional text; a missing value stays missing.
pub fn sanitize_opt(text: Option<&str>) -> Option<String> {
    text.map(sanitize)
}
