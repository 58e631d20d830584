//! Shared document types.
//!
//! A [`Document`] is the unit everything else works on: the parser produces
//! it, the validator inspects it, the scanner collects it, and the output
//! module displays it. These types carry no behavior beyond lookups.

use crate::naming::PostName;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Keys the renderer understands. Other keys are kept but not checked.
pub const KEY_LAYOUT: &str = "layout";
pub const KEY_TITLE: &str = "title";
pub const KEY_CATEGORIES: &str = "categories";
pub const KEY_PERMALINK: &str = "permalink";

/// A front-matter value: the corpus only uses scalars and flat string lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    /// The scalar string, or `None` for lists.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }
}

/// Ordered key → value mapping from a front-matter block.
///
/// Insertion order is the order keys appear in the file, which the
/// serializer reproduces. Keys are unique; the parser rejects duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    entries: Vec<(String, FieldValue)>,
}

impl FrontMatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace a value. Replacing keeps the key's original position.
    ///
    /// Returns the previous value if the key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        let key = key.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Scalar value for `key`, if present and a scalar.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FieldValue::as_scalar)
    }
}

impl Serialize for FrontMatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One post or page: metadata block plus Markdown body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub front_matter: FrontMatter,
    pub body: String,
    /// Derived from the file name; `None` for documents parsed from raw text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<PostName>,
}

impl Document {
    pub fn layout(&self) -> Option<&str> {
        self.front_matter.scalar(KEY_LAYOUT)
    }

    pub fn title(&self) -> Option<&str> {
        self.front_matter.scalar(KEY_TITLE)
    }

    pub fn permalink(&self) -> Option<&str> {
        self.front_matter.scalar(KEY_PERMALINK)
    }

    /// Categories in file order.
    ///
    /// A scalar value is split on whitespace, the way Jekyll reads
    /// `categories: testing doubles`.
    pub fn categories(&self) -> Vec<&str> {
        match self.front_matter.get(KEY_CATEGORIES) {
            Some(FieldValue::List(items)) => items.iter().map(String::as_str).collect(),
            Some(FieldValue::Scalar(s)) => s.split_whitespace().collect(),
            None => Vec::new(),
        }
    }
}
