//! Front-matter parsing and serialization.
//!
//! A document optionally starts with a metadata block fenced by `---` lines:
//!
//! ```text
//! ---
//! layout: post
//! title: "Mocks: what they are"
//! categories:
//!   - testing
//!   - doubles
//! ---
//! Body text starts here.
//! ```
//!
//! ## Grammar
//!
//! The block is the small YAML subset Jekyll posts actually use:
//!
//! - `key: value`: scalar. Plain values are trimmed and end at a ` #` comment.
//!   `"..."` understands `\\`, `\"`, `\n`, `\r` and `\t`; `'...'` understands `''`.
//! - `key: [a, b, "c, d"]`: inline list.
//! - `key:` followed by `- item` lines: block list. With no items it is an
//!   empty scalar.
//! - Blank lines and `#` comment lines are skipped.
//!
//! Anything else (nested mappings, orphan list items, duplicate keys) is a
//! [`Malformation`]. Parsing is all-or-nothing: a malformed block never yields
//! a partial document.
//!
//! ## Body
//!
//! The body is the exact remainder of the input after the closing delimiter
//! line, line terminator included. Nothing is trimmed, so [`serialize`] followed
//! by [`parse`] reproduces every document [`parse`] can produce.

use crate::types::{Document, FieldValue, FrontMatter};
use thiserror::Error;

/// Opening and closing marker line.
pub const DELIMITER: &str = "---";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed front matter: {0}")]
    MalformedFrontMatter(Malformation),
}

/// What exactly is wrong with a front-matter block. Line numbers are 1-based
/// and count the opening delimiter as line 1.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformation {
    #[error("opening `---` has no matching closing `---`")]
    MissingClosingDelimiter,
    #[error("line {line}: expected `key: value` or `- item`, found `{content}`")]
    InvalidLine { line: usize, content: String },
    #[error("line {line}: list item does not belong to a key")]
    OrphanListItem { line: usize },
    #[error("line {line}: duplicate key `{key}`")]
    DuplicateKey { line: usize, key: String },
    #[error("line {line}: unterminated quoted string")]
    UnterminatedQuote { line: usize },
    #[error("line {line}: inline list is missing its closing `]`")]
    UnterminatedList { line: usize },
}

impl From<Malformation> for ParseError {
    fn from(m: Malformation) -> Self {
        ParseError::MalformedFrontMatter(m)
    }
}

/// Split raw text into front matter and body.
///
/// Without an opening delimiter on the first line the whole input is the body
/// and the front matter is empty.
pub fn parse(raw: &str) -> Result<Document, ParseError> {
    let mut lines = raw.split_inclusive('\n');

    let Some(opening) = lines.next().filter(|line| is_delimiter(line)) else {
        return Ok(Document {
            front_matter: FrontMatter::new(),
            body: raw.to_string(),
            identity: None,
        });
    };

    let mut offset = opening.len();

    let mut block = Vec::new();
    for line in lines {
        offset += line.len();
        if is_delimiter(line) {
            let front_matter = parse_block(&block)?;
            return Ok(Document {
                front_matter,
                body: raw[offset..].to_string(),
                identity: None,
            });
        }
        block.push(line);
    }

    Err(Malformation::MissingClosingDelimiter.into())
}

/// Render a document back to its file form.
///
/// A document without front matter is written as its bare body, unless the
/// body itself starts with a delimiter line; then an empty block is emitted
/// so the body is not mistaken for an opening marker.
pub fn serialize(doc: &Document) -> String {
    let body_looks_fenced = doc
        .body
        .split_inclusive('\n')
        .next()
        .is_some_and(is_delimiter);
    if doc.front_matter.is_empty() && !body_looks_fenced {
        return doc.body.clone();
    }

    let mut out = String::with_capacity(doc.body.len() + 64);
    out.push_str(DELIMITER);
    out.push('\n');
    for (key, value) in doc.front_matter.iter() {
        match value {
            FieldValue::Scalar(s) => {
                out.push_str(key);
                out.push_str(": ");
                out.push_str(&render_scalar(s));
                out.push('\n');
            }
            FieldValue::List(items) if items.is_empty() => {
                out.push_str(key);
                out.push_str(": []\n");
            }
            FieldValue::List(items) => {
                out.push_str(key);
                out.push_str(":\n");
                for item in items {
                    out.push_str("  - ");
                    out.push_str(&render_scalar(item));
                    out.push('\n');
                }
            }
        }
    }
    out.push_str(DELIMITER);
    out.push('\n');
    out.push_str(&doc.body);
    out
}

fn strip_line_ending(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn is_delimiter(line: &str) -> bool {
    strip_line_ending(line) == DELIMITER
}

/// A key whose value comes from the following `- item` lines.
struct PendingList {
    key: String,
    items: Vec<String>,
}

impl PendingList {
    fn into_entry(self) -> (String, FieldValue) {
        let value = if self.items.is_empty() {
            FieldValue::Scalar(String::new())
        } else {
            FieldValue::List(self.items)
        };
        (self.key, value)
    }
}

fn parse_block(lines: &[&str]) -> Result<FrontMatter, Malformation> {
    let mut fm = FrontMatter::new();
    let mut pending: Option<PendingList> = None;

    for (idx, raw_line) in lines.iter().enumerate() {
        let line_no = idx + 2;
        let line = strip_line_ending(raw_line);
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(item) = list_item(trimmed) {
            let Some(list) = pending.as_mut() else {
                return Err(Malformation::OrphanListItem { line: line_no });
            };
            list.items.push(parse_scalar(item, line_no)?);
            continue;
        }

        if let Some(list) = pending.take() {
            let (key, value) = list.into_entry();
            fm.insert(key, value);
        }

        let (key, value) = split_key_value(line).ok_or_else(|| Malformation::InvalidLine {
            line: line_no,
            content: trimmed.to_string(),
        })?;

        if fm.contains_key(key) {
            return Err(Malformation::DuplicateKey {
                line: line_no,
                key: key.to_string(),
            });
        }

        if value.is_empty() {
            pending = Some(PendingList {
                key: key.to_string(),
                items: Vec::new(),
            });
        } else if value.starts_with('[') {
            fm.insert(key, FieldValue::List(parse_inline_list(value, line_no)?));
        } else {
            fm.insert(key, FieldValue::Scalar(parse_scalar(value, line_no)?));
        }
    }

    if let Some(list) = pending {
        let (key, value) = list.into_entry();
        fm.insert(key, value);
    }

    Ok(fm)
}

fn list_item(trimmed: &str) -> Option<&str> {
    if trimmed == "-" {
        Some("")
    } else {
        trimmed.strip_prefix("- ")
    }
}

/// `key: value` at column zero. Returns the trimmed key and value.
fn split_key_value(line: &str) -> Option<(&str, &str)> {
    if line.starts_with(char::is_whitespace) {
        return None;
    }
    let (key, rest) = line.split_once(':')?;
    let key = key.trim_end();
    if key.is_empty() || key.starts_with(['"', '\'']) {
        return None;
    }
    // `a:b` is a plain scalar in YAML, not a mapping.
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((key, rest.trim()))
}

/// Parse one scalar: quoted or plain, with an optional trailing comment.
fn parse_scalar(text: &str, line: usize) -> Result<String, Malformation> {
    let text = text.trim();
    let (value, rest) = match text.chars().next() {
        Some('"') => parse_double_quoted(&text[1..], line)?,
        Some('\'') => parse_single_quoted(&text[1..], line)?,
        _ => return Ok(strip_comment(text).trim_end().to_string()),
    };
    let rest = rest.trim_start();
    if rest.is_empty() || rest.starts_with('#') {
        Ok(value)
    } else {
        Err(Malformation::InvalidLine {
            line,
            content: text.to_string(),
        })
    }
}

/// Plain-scalar comments start at a `#` that begins the value or follows whitespace.
fn strip_comment(text: &str) -> &str {
    let mut prev_ws = true;
    for (i, c) in text.char_indices() {
        if c == '#' && prev_ws {
            return &text[..i];
        }
        prev_ws = c.is_whitespace();
    }
    text
}

/// Returns the unescaped value and whatever follows the closing quote.
fn parse_double_quoted(text: &str, line: usize) -> Result<(String, &str), Malformation> {
    let mut value = String::with_capacity(text.len());
    let mut chars = text.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((value, &text[i + 1..])),
            '\\' => match chars.next() {
                Some((_, 'n')) => value.push('\n'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, 't')) => value.push('\t'),
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => break,
            },
            _ => value.push(c),
        }
    }
    Err(Malformation::UnterminatedQuote { line })
}

fn parse_single_quoted(text: &str, line: usize) -> Result<(String, &str), Malformation> {
    let mut value = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '\'' {
            value.push(c);
            continue;
        }
        if chars.peek().is_some_and(|&(_, next)| next == '\'') {
            chars.next();
            value.push('\'');
        } else {
            return Ok((value, &text[i + 1..]));
        }
    }
    Err(Malformation::UnterminatedQuote { line })
}

fn parse_inline_list(text: &str, line: usize) -> Result<Vec<String>, Malformation> {
    let text = strip_list_comment(text);
    let inner = text
        .strip_prefix('[')
        .and_then(|t| t.strip_suffix(']'))
        .ok_or(Malformation::UnterminatedList { line })?;

    split_inline_items(inner)
        .into_iter()
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| parse_scalar(item, line))
        .collect()
}

/// Drop a trailing comment after the closing `]`.
fn strip_list_comment(text: &str) -> &str {
    match text.rfind(']') {
        Some(end) if text[end + 1..].trim_start().starts_with('#') => &text[..=end],
        _ => text.trim_end(),
    }
}

/// Split on commas that are not inside a quoted item.
fn split_inline_items(inner: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut chars = inner.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match quote {
            Some('"') => {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == '"' {
                    quote = None;
                }
            }
            Some(_) => {
                if c == '\'' {
                    // `''` is an escaped quote inside a single-quoted item.
                    if chars.peek().is_some_and(|&(_, next)| next == '\'') {
                        chars.next();
                    } else {
                        quote = None;
                    }
                }
            }
            None => match c {
                '"' | '\'' if inner[start..i].trim().is_empty() => quote = Some(c),
                ',' => {
                    items.push(&inner[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    items.push(&inner[start..]);
    items
}

/// Emit a scalar plain when it would read back unchanged, quoted otherwise.
fn render_scalar(s: &str) -> String {
    if needs_quotes(s) {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
        }
        out.push('"');
        out
    } else {
        s.to_string()
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s != s.trim()
        || s.starts_with(['"', '\'', '[', '#'])
        || s.contains(['\n', '\r', '\t'])
        || strip_comment(s).len() != s.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> FieldValue {
        FieldValue::Scalar(s.to_string())
    }

    fn list(items: &[&str]) -> FieldValue {
        FieldValue::List(items.iter().map(|s| s.to_string()).collect())
    }

    fn malformation(raw: &str) -> Malformation {
        match parse(raw) {
            Err(ParseError::MalformedFrontMatter(m)) => m,
            Ok(doc) => panic!("expected malformed front matter, parsed {doc:?}"),
        }
    }

    // =========================================================================
    // Delimiters and body
    // =========================================================================

    #[test]
    fn parses_typical_post() {
        let raw = "---\nlayout: post\ntitle: Test Doubles\ncategories:\n  - testing\n  - doubles\npermalink: /doubles/\n---\n# Doubles\n\nA dummy is...\n";
        let doc = parse(raw).unwrap();
        assert_eq!(doc.front_matter.get("layout"), Some(&scalar("post")));
        assert_eq!(doc.front_matter.get("title"), Some(&scalar("Test Doubles")));
        assert_eq!(
            doc.front_matter.get("categories"),
            Some(&list(&["testing", "doubles"]))
        );
        assert_eq!(doc.permalink(), Some("/doubles/"));
        assert_eq!(doc.body, "# Doubles\n\nA dummy is...\n");
        assert_eq!(doc.identity, None);
    }

    #[test]
    fn body_is_exact_remainder_after_closing_line() {
        let raw = "---\ntitle: x\n---\n\n  indented first line\n\n";
        let doc = parse(raw).unwrap();
        assert_eq!(doc.body, "\n  indented first line\n\n");
    }

    #[test]
    fn closing_delimiter_at_end_of_input_gives_empty_body() {
        let doc = parse("---\ntitle: x\n---").unwrap();
        assert_eq!(doc.body, "");
        assert_eq!(doc.title(), Some("x"));
    }

    #[test]
    fn no_opening_delimiter_means_whole_input_is_body() {
        let raw = "# Stubs\n\n---\nnot: front matter\n---\n";
        let doc = parse(raw).unwrap();
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, raw);
    }

    #[test]
    fn reparsing_bare_body_is_idempotent() {
        let raw = "Plain post without metadata.\n---\n";
        let doc = parse(raw).unwrap();
        let again = parse(&doc.body).unwrap();
        assert_eq!(again.body, doc.body);
        assert!(again.front_matter.is_empty());
    }

    #[test]
    fn empty_input_is_empty_body() {
        let doc = parse("").unwrap();
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, "");
    }

    #[test]
    fn delimiter_must_be_exactly_three_hyphens() {
        let raw = "----\ntitle: x\n----\nbody";
        let doc = parse(raw).unwrap();
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, raw);

        let raw = "--- \ntitle: x\n---\nbody";
        assert!(parse(raw).unwrap().front_matter.is_empty());
    }

    #[test]
    fn crlf_delimiters_are_recognized() {
        let raw = "---\r\nlayout: post\r\ntitle: Spies\r\n---\r\nBody\r\n";
        let doc = parse(raw).unwrap();
        assert_eq!(doc.layout(), Some("post"));
        assert_eq!(doc.title(), Some("Spies"));
        assert_eq!(doc.body, "Body\r\n");
    }

    #[test]
    fn empty_block_is_valid() {
        let doc = parse("---\n---\nbody").unwrap();
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, "body");
    }

    #[test]
    fn missing_closing_delimiter_is_malformed() {
        assert_eq!(
            malformation("---\nlayout: post\ntitle: x\n\nbody"),
            Malformation::MissingClosingDelimiter
        );
        assert_eq!(malformation("---"), Malformation::MissingClosingDelimiter);
        assert_eq!(malformation("---\n"), Malformation::MissingClosingDelimiter);
    }

    #[test]
    fn malformed_error_message_names_the_problem() {
        let err = parse("---\ntitle: x\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed front matter: opening `---` has no matching closing `---`"
        );
    }

    // =========================================================================
    // Block grammar
    // =========================================================================

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let doc = parse("---\n# draft\n\nlayout: post # was page\n---\n").unwrap();
        assert_eq!(doc.front_matter.len(), 1);
        assert_eq!(doc.layout(), Some("post"));
    }

    #[test]
    fn quoted_scalars() {
        let raw = "---\ntitle: \"Mocks: \\\"strict\\\" vs loose\"\nalt: 'it''s a stub'\n---\n";
        let doc = parse(raw).unwrap();
        assert_eq!(doc.title(), Some("Mocks: \"strict\" vs loose"));
        assert_eq!(doc.front_matter.scalar("alt"), Some("it's a stub"));
    }

    #[test]
    fn hash_inside_quotes_is_not_a_comment() {
        let doc = parse("---\ntitle: \"C# test doubles\" # note\n---\n").unwrap();
        assert_eq!(doc.title(), Some("C# test doubles"));
    }

    #[test]
    fn value_may_contain_colons() {
        let doc = parse("---\npermalink: https://example.com/a:b\n---\n").unwrap();
        assert_eq!(doc.permalink(), Some("https://example.com/a:b"));
    }

    #[test]
    fn inline_list() {
        let doc = parse("---\ncategories: [testing, \"mocks, spies\", 'di']\n---\n").unwrap();
        assert_eq!(
            doc.front_matter.get("categories"),
            Some(&list(&["testing", "mocks, spies", "di"]))
        );
    }

    #[test]
    fn inline_list_single_quoted_item_with_escaped_quote() {
        let doc = parse("---\ncategories: ['it''s, ok', b]\n---\n").unwrap();
        assert_eq!(
            doc.front_matter.get("categories"),
            Some(&list(&["it's, ok", "b"]))
        );
    }

    #[test]
    fn empty_inline_list() {
        let doc = parse("---\ncategories: []\n---\n").unwrap();
        assert_eq!(doc.front_matter.get("categories"), Some(&list(&[])));
    }

    #[test]
    fn key_without_items_is_empty_scalar() {
        let doc = parse("---\ntitle:\nlayout: post\n---\n").unwrap();
        assert_eq!(doc.front_matter.get("title"), Some(&scalar("")));
        assert_eq!(doc.layout(), Some("post"));
    }

    #[test]
    fn block_list_at_end_of_block() {
        let doc = parse("---\ncategories:\n- testing\n-\n---\n").unwrap();
        assert_eq!(
            doc.front_matter.get("categories"),
            Some(&list(&["testing", ""]))
        );
    }

    #[test]
    fn unrecognized_keys_are_preserved_in_order() {
        let doc = parse("---\nauthor: sam\nlayout: post\ndraft: true\n---\n").unwrap();
        let keys: Vec<&str> = doc.front_matter.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["author", "layout", "draft"]);
    }

    #[test]
    fn orphan_list_item_is_malformed() {
        assert_eq!(
            malformation("---\n- testing\n---\n"),
            Malformation::OrphanListItem { line: 2 }
        );
    }

    #[test]
    fn duplicate_key_is_malformed() {
        assert_eq!(
            malformation("---\ntitle: a\nlayout: post\ntitle: b\n---\n"),
            Malformation::DuplicateKey {
                line: 4,
                key: "title".to_string()
            }
        );
    }

    #[test]
    fn duplicate_key_after_block_list_is_malformed() {
        let m = malformation("---\ncategories:\n  - a\ncategories: b\n---\n");
        assert!(matches!(m, Malformation::DuplicateKey { line: 4, .. }));
    }

    #[test]
    fn nested_mapping_is_malformed() {
        let m = malformation("---\nauthor:\n  name: sam\n---\n");
        assert!(matches!(m, Malformation::InvalidLine { line: 3, .. }));
    }

    #[test]
    fn line_without_colon_is_malformed() {
        let m = malformation("---\nlayout post\n---\n");
        assert_eq!(
            m,
            Malformation::InvalidLine {
                line: 2,
                content: "layout post".to_string()
            }
        );
    }

    #[test]
    fn colon_without_space_is_not_a_key() {
        let m = malformation("---\nlayout:post\n---\n");
        assert!(matches!(m, Malformation::InvalidLine { line: 2, .. }));
    }

    #[test]
    fn unterminated_quote_is_malformed() {
        assert_eq!(
            malformation("---\ntitle: \"open\n---\n"),
            Malformation::UnterminatedQuote { line: 2 }
        );
    }

    #[test]
    fn text_after_closing_quote_is_malformed() {
        let m = malformation("---\ntitle: \"a\" b\n---\n");
        assert!(matches!(m, Malformation::InvalidLine { line: 2, .. }));
    }

    #[test]
    fn unterminated_inline_list_is_malformed() {
        assert_eq!(
            malformation("---\ncategories: [a, b\n---\n"),
            Malformation::UnterminatedList { line: 2 }
        );
    }

    // =========================================================================
    // Serialization
    // =========================================================================

    #[test]
    fn serialize_emits_block_lists_and_body() {
        let mut doc = Document::default();
        doc.front_matter.insert("layout", scalar("post"));
        doc.front_matter.insert("categories", list(&["testing", "mocks"]));
        doc.front_matter.insert("tags", list(&[]));
        doc.body = "Body\n".to_string();

        assert_eq!(
            serialize(&doc),
            "---\nlayout: post\ncategories:\n  - testing\n  - mocks\ntags: []\n---\nBody\n"
        );
    }

    #[test]
    fn serialize_quotes_only_when_needed() {
        assert_eq!(render_scalar("Test Doubles"), "Test Doubles");
        assert_eq!(render_scalar("Mocks: an intro"), "Mocks: an intro");
        assert_eq!(render_scalar(""), "\"\"");
        assert_eq!(render_scalar(" padded"), "\" padded\"");
        assert_eq!(render_scalar("[not a list]"), "\"[not a list]\"");
        assert_eq!(render_scalar("C # sharp"), "\"C # sharp\"");
        assert_eq!(render_scalar("say \"hi\""), "say \"hi\"");
        assert_eq!(render_scalar("'quoted'"), "\"'quoted'\"");
        assert_eq!(render_scalar("two\nlines"), "\"two\\nlines\"");
    }

    #[test]
    fn serialize_without_front_matter_is_bare_body() {
        let doc = parse("Just prose.\n").unwrap();
        assert_eq!(serialize(&doc), "Just prose.\n");
    }

    #[test]
    fn serialize_protects_body_that_starts_with_delimiter() {
        let doc = parse("---\n---\n---\nrest").unwrap();
        assert!(doc.front_matter.is_empty());
        assert_eq!(doc.body, "---\nrest");
        let text = serialize(&doc);
        assert_eq!(text, "---\n---\n---\nrest");
        assert_eq!(parse(&text).unwrap(), doc);
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let samples = [
            "---\nlayout: post\ntitle: \"Spies: \\\"recording\\\" doubles\"\ncategories: [testing, 'spies']\npermalink: /spies/\n---\nBody with `code`.\n",
            "---\ntitle:\nnote: 'a # b'\nempty: []\ncategories:\n  - \"\"\n  - x\n---",
            "---\r\nlayout: page\r\n---\r\nwindows body\r\n",
            "no front matter at all",
            "",
            "---\n---\n",
            "---\nweird: \"tab\\there\" # comment\nback: \"c:\\\\dir\"\n---\n\n\n",
        ];
        for raw in samples {
            let doc = parse(raw).unwrap();
            let text = serialize(&doc);
            assert_eq!(parse(&text).unwrap(), doc, "round trip failed for {raw:?}");
        }
    }
}
