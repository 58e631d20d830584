//! Shared test utilities for the postcheck test suite.
//!
//! Provides fixture setup and lookup helpers over scan results
//! (`Manifest`, `Entry`, `Document`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let doc = find_document(&manifest, "about.md");
//! assert_eq!(doc.layout(), Some("page"));
//! assert!(findings_for(&manifest, "about.md").is_empty());
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::scan::{CheckedDocument, Entry, Manifest, Outcome};
use crate::types::Document;
use crate::validate::Finding;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/posts/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/posts");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups (panic with a clear message on miss)
// =========================================================================

/// All entry paths in manifest order.
pub fn entry_paths(manifest: &Manifest) -> Vec<&str> {
    manifest.entries.iter().map(|e| e.path.as_str()).collect()
}

/// Find an entry by relative path. Panics if not found.
pub fn find_entry<'a>(manifest: &'a Manifest, path: &str) -> &'a Entry {
    manifest
        .entries
        .iter()
        .find(|e| e.path == path)
        .unwrap_or_else(|| {
            let paths = entry_paths(manifest);
            panic!("entry '{path}' not found. Available: {paths:?}")
        })
}

/// Find a successfully checked entry. Panics if missing or failed.
pub fn find_checked<'a>(manifest: &'a Manifest, path: &str) -> &'a CheckedDocument {
    match &find_entry(manifest, path).outcome {
        Outcome::Checked(checked) => checked,
        Outcome::Failed { error } => panic!("entry '{path}' failed to load: {error}"),
    }
}

/// The parsed document of a checked entry.
pub fn find_document<'a>(manifest: &'a Manifest, path: &str) -> &'a Document {
    &find_checked(manifest, path).document
}

/// Validation findings of a checked entry.
pub fn findings_for(manifest: &Manifest, path: &str) -> Vec<Finding> {
    find_checked(manifest, path).report.findings.clone()
}
