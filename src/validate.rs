//! Document validation.
//!
//! Validation never fails: it inspects a parsed [`Document`] against the
//! configured [`LayoutsConfig`] and returns every problem it finds as a
//! [`Finding`]. A document with findings is still a perfectly usable
//! document; the report exists so a batch run can list everything at once.
//!
//! ## Checks
//!
//! | Finding | When |
//! |---------|------|
//! | `UnknownLayout` | `layout` is not in `layouts.known` |
//! | `MissingTitle` | layout is in `layouts.title_required` and `title` is absent or blank |
//! | `MissingLayout` | no `layout` key and `layouts.require_layout = true` |
//! | `WrongType` | `layout`, `title` or `permalink` written as a list |
//! | `UppercaseCategory` | a category token contains uppercase characters |
//! | `DuplicateCategory` | the same category appears twice |
//! | `RelativePermalink` | `permalink` is empty or does not start with `/` |
//! | `UndatedPost` | layout is in `layouts.dated` but the file name has no date |

use crate::config::LayoutsConfig;
use crate::types::{Document, FieldValue, KEY_LAYOUT, KEY_PERMALINK, KEY_TITLE};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

/// A single non-fatal problem with a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    UnknownLayout { layout: String },
    MissingTitle { layout: String },
    MissingLayout,
    WrongType { key: String, expected: &'static str },
    UppercaseCategory { category: String },
    DuplicateCategory { category: String },
    RelativePermalink { permalink: String },
    UndatedPost { layout: String },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::UnknownLayout { layout } => write!(f, "unknown layout `{layout}`"),
            Finding::MissingTitle { layout } => {
                write!(f, "layout `{layout}` requires a non-empty title")
            }
            Finding::MissingLayout => write!(f, "no layout given"),
            Finding::WrongType { key, expected } => write!(f, "`{key}` must be a {expected}"),
            Finding::UppercaseCategory { category } => {
                write!(f, "category `{category}` is not lowercase")
            }
            Finding::DuplicateCategory { category } => {
                write!(f, "category `{category}` is listed more than once")
            }
            Finding::RelativePermalink { permalink } => {
                write!(f, "permalink `{permalink}` must start with `/`")
            }
            Finding::UndatedPost { layout } => {
                write!(f, "layout `{layout}` requires a YYYY-MM-DD- file name prefix")
            }
        }
    }
}

/// All findings for one document, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Check a document against the layout rules.
pub fn validate(doc: &Document, rules: &LayoutsConfig) -> ValidationReport {
    let mut findings = Vec::new();

    check_scalar_types(doc, &mut findings);

    match doc.layout() {
        Some(layout) => check_layout(doc, layout, rules, &mut findings),
        None if rules.require_layout && !doc.front_matter.contains_key(KEY_LAYOUT) => {
            findings.push(Finding::MissingLayout);
        }
        None => {}
    }

    check_categories(doc, &mut findings);

    if let Some(permalink) = doc.permalink()
        && !permalink.starts_with('/')
    {
        findings.push(Finding::RelativePermalink {
            permalink: permalink.to_string(),
        });
    }

    ValidationReport { findings }
}

fn check_scalar_types(doc: &Document, findings: &mut Vec<Finding>) {
    for key in [KEY_LAYOUT, KEY_TITLE, KEY_PERMALINK] {
        if let Some(FieldValue::List(_)) = doc.front_matter.get(key) {
            findings.push(Finding::WrongType {
                key: key.to_string(),
                expected: "string",
            });
        }
    }
}

fn check_layout(doc: &Document, layout: &str, rules: &LayoutsConfig, findings: &mut Vec<Finding>) {
    if !rules.known.iter().any(|known| known == layout) {
        findings.push(Finding::UnknownLayout {
            layout: layout.to_string(),
        });
        return;
    }

    let title_blank = doc.title().is_none_or(|t| t.trim().is_empty());
    if title_blank && rules.title_required.iter().any(|l| l == layout) {
        findings.push(Finding::MissingTitle {
            layout: layout.to_string(),
        });
    }

    let undated = doc.identity.as_ref().is_some_and(|id| id.date.is_none());
    if undated && rules.dated.iter().any(|l| l == layout) {
        findings.push(Finding::UndatedPost {
            layout: layout.to_string(),
        });
    }
}

fn check_categories(doc: &Document, findings: &mut Vec<Finding>) {
    let mut seen = HashSet::new();
    for category in doc.categories() {
        if category.chars().any(char::is_uppercase) {
            findings.push(Finding::UppercaseCategory {
                category: category.to_string(),
            });
        }
        if !seen.insert(category) {
            findings.push(Finding::DuplicateCategory {
                category: category.to_string(),
            });
        }
    }
}
