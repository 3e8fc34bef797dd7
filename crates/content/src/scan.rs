//! Build-time integrity gate: every `*.json` file under a content directory must parse.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ScanError;

/// A JSON file that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFile {
    /// Path relative to the scanned root.
    pub path: PathBuf,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub valid: Vec<PathBuf>,
    pub invalid: Vec<InvalidFile>,
}

impl ScanReport {
    #[must_use]
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Recursively parse every `*.json` file under `root`, in sorted path order.
///
/// # Errors
///
/// Returns `ScanError::MissingRoot` if `root` is not a directory, or
/// `ScanError::Io` if a directory cannot be listed.
pub fn scan_json_tree(root: &Path) -> Result<ScanReport, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    collect_json_files(root, &mut files)?;
    files.sort();

    let mut report = ScanReport::default();
    for file in files {
        let relative = file.strip_prefix(root).unwrap_or(&file).to_path_buf();
        match check_file(&file) {
            Ok(()) => report.valid.push(relative),
            Err((message, line, column)) => report.invalid.push(InvalidFile {
                path: relative,
                message,
                line,
                column,
            }),
        }
    }
    Ok(report)
}

fn collect_json_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ScanError> {
    let io_err = |source| ScanError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_json_files(&path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            out.push(path);
        }
    }
    Ok(())
}

fn check_file(path: &Path) -> Result<(), (String, usize, usize)> {
    let body = fs::read_to_string(path).map_err(|err| (err.to_string(), 0, 0))?;
    serde_json::from_str::<serde_json::Value>(&body)
        .map(|_| ())
        .map_err(|err| (err.to_string(), err.line(), err.column()))
}
