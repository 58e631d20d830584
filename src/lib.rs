//! # postcheck
//!
//! Parser and validator for Markdown documents with Jekyll-style front
//! matter. A blog is a directory of text files; each file may open with a
//! metadata block fenced by `---` lines and continues with a Markdown body.
//! postcheck turns those files into [`types::Document`] values, checks them
//! against a small set of layout rules, and reports the result per file.
//! Rendering stays with the site generator.
//!
//! # Pipeline
//!
//! ```text
//! file ──read──▶ raw text ──parse──▶ Document ──validate──▶ ValidationReport
//!   │                                    │
//!   └──naming──▶ identity                └──outline──▶ headings + code blocks
//! ```
//!
//! Each document goes through this independently, so a directory is checked
//! in parallel and a broken file only ever affects its own entry.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | `Document`, ordered `FrontMatter`, `FieldValue` |
//! | [`front_matter`] | Parse raw text into a `Document`; serialize it back |
//! | [`naming`] | `YYYY-MM-DD-slug` file name convention |
//! | [`validate`] | Layout allow-list, required titles, category and permalink checks |
//! | [`outline`] | Headings and code block languages of a body |
//! | [`scan`] | Directory walk and parallel batch check |
//! | [`config`] | `postcheck.toml` loading, merging and validation |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## A Hand-Written Front-Matter Grammar
//!
//! Posts only ever use flat `key: value` scalars and string lists, so the
//! block is parsed with a small line-based grammar rather than a YAML
//! library. This keeps values as strings (`title: 2021` stays `"2021"`),
//! keeps keys in file order, and makes serialize → parse an exact round trip.
//!
//! ## Findings, Not Errors
//!
//! Only a structurally broken block is a parse error. Everything the renderer
//! could still cope with (an unknown layout, a missing title) is a finding on
//! an otherwise valid document, so one run reports every problem in the tree.
//!
//! ## Read-Only
//!
//! Documents are authored by hand and never rewritten by this tool. The
//! serializer exists for round-trip guarantees and library users, not to
//! reformat files in place.

pub mod config;
pub mod front_matter;
pub mod naming;
pub mod outline;
pub mod output;
pub mod scan;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_helpers;
