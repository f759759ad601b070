//! Candidate filename keys derived from publication metadata.
//!
//! Conference organizers name publication files after the first author and
//! the title, with inconsistent handling of quotes, `ß` and author order. For
//! every record we build all plausible spellings and later test which of them
//! contain a file's comparison key.

use tracing::warn;

use confbundle_model::{Defect, DefectKind, PublicationRecord};

use crate::sanitize::{EMPHASIS_MARKER, sanitize, sanitize_opt};

/// Creator name split into the parts used for filename prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorName {
    /// Sanitized text before the first comma.
    pub surname: String,
    /// Sanitized text after the first comma; empty when there is none.
    pub given_name_fragment: String,
}

impl CreatorName {
    /// Parses a `"Surname, Given"` string. Returns `None` for a blank name.
    ///
    /// Only the first two comma-separated parts are used; suffixes such as
    /// `"Jr."` in `"Smith, John, Jr."` are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        let mut parts = raw.split(',').map(str::trim);
        let surname = parts.next().unwrap_or_default();
        let given = parts.next().unwrap_or_default();
        Some(Self {
            surname: sanitize(surname),
            given_name_fragment: sanitize(given),
        })
    }

    /// Filename prefix: upper-cased surname, given name, each followed by `_`.
    pub fn prefix(&self) -> String {
        format!(
            "{}_{}_",
            self.surname.to_ascii_uppercase(),
            self.given_name_fragment
        )
    }
}

/// All candidate keys of one record, in test order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    /// Sanitized title, `""` when the record has none.
    pub title: String,
    pub candidates: Vec<String>,
}

impl CandidateSet {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(String::as_str)
    }
}

/// Builds the candidate set of a record.
///
/// Missing titles and creators are reported as defects; the record then falls
/// back to whatever candidates remain (possibly none).
pub fn candidates(record: &PublicationRecord) -> (CandidateSet, Vec<Defect>) {
    let mut defects = Vec::new();
    let subject = record.display_title();

    let title = match sanitize_opt(record.raw_title.as_deref()) {
        Some(title) => title,
        None => {
            warn!(index = record.index, "record has no title");
            defects.push(Defect::new(
                DefectKind::MissingTitle,
                &subject,
                "record has no title; matching relies on creator names only",
            ));
            String::new()
        }
    };

    let prefixes: Vec<String> = record
        .creators
        .iter()
        .filter_map(|raw| CreatorName::parse(raw))
        .map(|name| name.prefix())
        .collect();
    if prefixes.is_empty() {
        warn!(title = %subject, "record has no usable creators");
        defects.push(Defect::new(
            DefectKind::MissingCreators,
            &subject,
            "record has no creators; only positional fallback is possible",
        ));
    }

    let mut keys: Vec<String> = prefixes
        .iter()
        .map(|prefix| format!("{prefix}{title}"))
        .collect();
    if title.contains(EMPHASIS_MARKER) {
        let plain = title.replace(EMPHASIS_MARKER, "_");
        keys.extend(prefixes.iter().map(|prefix| format!("{prefix}{plain}")));
    }
    if title.contains("ss") {
        let collapsed = title.replace("ss", "_");
        keys.extend(prefixes.iter().map(|prefix| format!("{prefix}{collapsed}")));
    }
    keys.extend(prefixes.iter().map(|prefix| format!("{prefix}_{title}")));

    (
        CandidateSet {
            title,
            candidates: dedup_keep_last(keys),
        },
        defects,
    )
}

/// Removes repeated keys, keeping each one at its last position.
fn dedup_keep_last(keys: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut kept: Vec<String> = keys
        .into_iter()
        .rev()
        .filter(|key| seen.insert(key.clone()))
        .collect();
    kept.reverse();
    kept
}
