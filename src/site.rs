//! The mirrored site on disk.
//!
//! A mirror is a directory of HTML documents the vendor's export pipeline
//! may rewrite at any time. Patching a file is read, parse, pass,
//! serialize, and write back only when the output differs from what is on
//! disk. The no-write-when-equal rule both minimizes churn and keeps the
//! change scanner from reacting to our own writes.
//!
//! Serializing a freshly parsed document may normalize formatting, so the
//! first pass can rewrite a semantically unchanged file once; after that
//! the representation is a fixed point and converged files are never
//! touched again.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::dom::{parse_document, serialize};
use crate::patch::{PassReport, Patcher};

/// Mirror I/O failures. Parse never fails: html5ever recovers from any
/// input the way a browser would.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("site root {0} is not a directory")]
    NotADirectory(PathBuf),
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Which patcher pass to run over a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassMode {
    /// The full pass.
    Full,
    /// Hero and contact fixers only.
    TouchUp,
}

/// Result of patching one file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// Whether the file content on disk changed (or would change, for a
    /// preview).
    pub changed: bool,
    pub report: PassReport,
}

/// A mirrored site rooted at a directory.
#[derive(Debug, Clone)]
pub struct MirrorSite {
    root: PathBuf,
}

impl MirrorSite {
    /// Open a mirror. Fails when the root is not a directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, SiteError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(SiteError::NotADirectory(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All HTML documents under the root, sorted for stable pass order.
    /// Hidden directories are skipped; unreadable entries are ignored.
    pub fn discover(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        collect_html(&self.root, &mut files);
        files.sort();
        files
    }

    /// Patch one file with the given pass.
    pub fn patch_file(
        &self,
        patcher: &Patcher,
        path: &Path,
        mode: PassMode,
    ) -> Result<FileOutcome, SiteError> {
        self.apply(patcher, path, mode, true)
    }

    /// Like [`patch_file`](Self::patch_file) but never writes; reports what
    /// a pass would change.
    pub fn preview_file(
        &self,
        patcher: &Patcher,
        path: &Path,
        mode: PassMode,
    ) -> Result<FileOutcome, SiteError> {
        self.apply(patcher, path, mode, false)
    }

    /// Patch every discovered file. Per-file failures are logged and
    /// skipped; the next pass retries them naturally.
    pub fn patch_all(&self, patcher: &Patcher, mode: PassMode) -> Vec<FileOutcome> {
        self.run_over_all(patcher, mode, true)
    }

    /// Preview every discovered file without writing.
    pub fn preview_all(&self, patcher: &Patcher, mode: PassMode) -> Vec<FileOutcome> {
        self.run_over_all(patcher, mode, false)
    }

    fn run_over_all(&self, patcher: &Patcher, mode: PassMode, write: bool) -> Vec<FileOutcome> {
        let mut outcomes = Vec::new();
        for path in self.discover() {
            match self.apply(patcher, &path, mode, write) {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => tracing::warn!("skipping {}: {err}", path.display()),
            }
        }
        outcomes
    }

    fn apply(
        &self,
        patcher: &Patcher,
        path: &Path,
        mode: PassMode,
        write: bool,
    ) -> Result<FileOutcome, SiteError> {
        let original = std::fs::read_to_string(path).map_err(|source| SiteError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut dom = parse_document(&original);
        let report = match mode {
            PassMode::Full => patcher.run(&mut dom),
            PassMode::TouchUp => patcher.touch_up(&mut dom),
        };

        let output = serialize(&dom);
        let changed = output != original;
        if changed && write {
            std::fs::write(path, &output).map_err(|source| SiteError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!("rewrote {}", path.display());
        }

        Ok(FileOutcome {
            path: path.to_path_buf(),
            changed,
            report,
        })
    }
}

fn collect_html(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if path.is_dir() {
            if !name.starts_with('.') {
                collect_html(&path, out);
            }
        } else if matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("html") | Some("htm")
        ) {
            out.push(path);
        }
    }
}
