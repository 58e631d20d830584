//! File name parsing for the `YYYY-MM-DD-slug` post convention.
//!
//! Posts carry their identity in the file name: a publication date followed
//! by a slug. Pages and drafts usually have no date and are identified by
//! their stem alone. This module extracts both parts consistently.
//!
//! ## Display Titles
//!
//! Dashes in the slug are converted to spaces for display:
//! - `2021-03-14-test-doubles.md` → "test doubles"
//! - `about.md` → "about"

use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

/// Length of the `YYYY-MM-DD` prefix.
const DATE_LEN: usize = 10;

/// Result of parsing a file stem like `2021-03-14-test-doubles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostName {
    /// Publication date if the stem starts with a valid `YYYY-MM-DD-`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Stem with the date prefix removed. For undated entries, the full stem.
    pub slug: String,
    /// Slug with dashes converted to spaces.
    pub display_title: String,
}

/// Parse a file stem following the `YYYY-MM-DD-slug` convention.
///
/// - `"2021-03-14-test-doubles"` → date=2021-03-14, slug="test-doubles"
/// - `"2021-03-14-"` → date=2021-03-14, slug=""
/// - `"2021-02-30-typo"` → no date (not a calendar day), slug is the whole stem
/// - `"about"` → no date, slug="about"
pub fn parse_post_name(stem: &str) -> PostName {
    if let Some((date, rest)) = split_date_prefix(stem) {
        return PostName {
            date: Some(date),
            slug: rest.to_string(),
            display_title: rest.replace('-', " "),
        };
    }
    PostName {
        date: None,
        slug: stem.to_string(),
        display_title: stem.replace('-', " "),
    }
}

/// Identity for a document file, from its stem. `None` when the path has no stem.
pub fn post_name_for_path(path: &Path) -> Option<PostName> {
    path.file_stem().map(|stem| parse_post_name(&stem.to_string_lossy()))
}

fn split_date_prefix(stem: &str) -> Option<(NaiveDate, &str)> {
    let prefix = stem.get(..DATE_LEN)?;
    let rest = stem.get(DATE_LEN..)?;
    let rest = rest.strip_prefix('-')?;
    // chrono accepts unpadded fields; the convention requires exactly YYYY-MM-DD.
    let shape_ok = prefix
        .bytes()
        .enumerate()
        .all(|(i, b)| if i == 4 || i == 7 { b == b'-' } else { b.is_ascii_digit() });
    if !shape_ok {
        return None;
    }
    let date = NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    Some((date, rest))
}
