//! Document discovery and batch checking.
//!
//! Walks a source directory, picks out document files, and runs each one
//! through parse → identity → validate → outline. Documents are independent,
//! so they are processed in parallel with [rayon](https://docs.rs/rayon) and
//! collected back in path order.
//!
//! ## Directory Structure
//!
//! A typical Jekyll source tree:
//!
//! ```text
//! blog/                              # Source root
//! ├── postcheck.toml                 # Checker configuration (optional)
//! ├── about.md                       # Page (undated)
//! ├── _posts/
//! │   ├── 2021-03-14-test-doubles.md # Post (dated)
//! │   └── 2021-04-02-mocks.md
//! ├── _drafts/
//! │   └── spies.md
//! ├── _site/                         # Build output, excluded by default
//! └── .git/                          # Hidden, always skipped
//! ```
//!
//! ## Failure Isolation
//!
//! A file that cannot be read or whose front matter is malformed becomes a
//! [`Outcome::Failed`] entry. It never aborts the scan: the other documents
//! are still checked and reported. Only problems with the tree itself (missing
//! root, unreadable directory, bad config) are a [`ScanError`].

use crate::config::{self, CheckConfig, DocumentsConfig, LayoutsConfig};
use crate::front_matter::{self, ParseError};
use crate::naming;
use crate::outline::{self, Outline};
use crate::types::Document;
use crate::validate::{self, ValidationReport};
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Why a single document could not be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Result of a scan: one entry per document, in relative path order.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub entries: Vec<Entry>,
    pub config: CheckConfig,
}

#[derive(Debug, Serialize)]
pub struct Entry {
    /// Path relative to the source root, `/`-separated.
    pub path: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Checked(CheckedDocument),
    Failed {
        #[serde(serialize_with = "serialize_display")]
        error: LoadError,
    },
}

#[derive(Debug, Serialize)]
pub struct CheckedDocument {
    pub document: Document,
    pub report: ValidationReport,
    pub outline: Outline,
}

/// Aggregate counts over a manifest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub documents: usize,
    pub failed: usize,
    pub with_findings: usize,
    pub findings: usize,
}

impl Manifest {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            documents: self.entries.len(),
            ..Summary::default()
        };
        for entry in &self.entries {
            match &entry.outcome {
                Outcome::Checked(checked) if !checked.report.is_clean() => {
                    summary.with_findings += 1;
                    summary.findings += checked.report.findings.len();
                }
                Outcome::Checked(_) => {}
                Outcome::Failed { .. } => summary.failed += 1,
            }
        }
        summary
    }
}

impl Summary {
    /// Whether `check` should exit non-zero: any failed document, or with
    /// `strict` any finding at all.
    pub fn exit_failure(&self, strict: bool) -> bool {
        self.failed > 0 || (strict && self.findings > 0)
    }
}

fn serialize_display<S: Serializer>(err: &LoadError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(err)
}

/// Scan `root` using the `postcheck.toml` found there (or stock defaults).
pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::SourceNotFound(root.to_path_buf()));
    }
    let config = config::load_config(root)?;
    scan_with_config(root, config)
}

/// Scan `root` with an already-resolved config.
pub fn scan_with_config(root: &Path, config: CheckConfig) -> Result<Manifest, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::SourceNotFound(root.to_path_buf()));
    }

    let paths = discover(root, &config.documents)?;
    log::debug!("found {} documents under {}", paths.len(), root.display());

    let entries: Vec<Entry> = paths
        .par_iter()
        .map(|path| Entry {
            path: relative_display(path, root),
            outcome: check_path(path, &config.layouts),
        })
        .collect();

    Ok(Manifest { entries, config })
}

/// List document files under `root`, sorted by path.
///
/// Hidden entries and excluded directory names are pruned at any depth.
pub fn discover(root: &Path, documents: &DocumentsConfig) -> Result<Vec<PathBuf>, ScanError> {
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(e, documents));

    let mut paths = Vec::new();
    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && documents.is_document(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_skipped(entry: &DirEntry, documents: &DocumentsConfig) -> bool {
    let name = entry.file_name().to_string_lossy();
    let skipped =
        name.starts_with('.') || (entry.file_type().is_dir() && documents.is_excluded_dir(&name));
    if skipped {
        log::debug!("skipping {}", entry.path().display());
    }
    skipped
}

fn relative_display(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read and parse one document file, attaching its file-name identity.
pub fn load_document(path: &Path) -> Result<Document, LoadError> {
    let raw = fs::read_to_string(path)?;
    let mut document = front_matter::parse(&raw)?;
    document.identity = naming::post_name_for_path(path);
    Ok(document)
}

/// Load, validate and outline a single file.
pub fn check_path(path: &Path, rules: &LayoutsConfig) -> Outcome {
    match load_document(path) {
        Ok(document) => {
            let report = validate::validate(&document, rules);
            let outline = outline::outline(&document.body);
            Outcome::Checked(CheckedDocument {
                document,
                report,
                outline,
            })
        }
        Err(error) => {
            log::debug!("{}: {}", path.display(), error);
            Outcome::Failed { error }
        }
    }
}
