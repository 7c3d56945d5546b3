//! Multi-root environment discovery.
//!
//! Walks the configured scan roots, applies the marker classifier, and
//! returns a deduplicated, path-sorted inventory. Every scan rebuilds its
//! result from scratch; nothing is cached between runs, so a record exists
//! iff the classifier accepted its root at scan time.

pub mod classify;
pub mod roots;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Config;
use classify::{manager_kind, EnvironmentRecord};

/// How far below each root the scan looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDepth {
    /// Only the roots themselves.
    RootOnly,
    /// Roots plus their immediate subdirectories.
    RootAndChildren,
    /// Every descendant directory.
    Recursive,
}

#[derive(Serialize)]
pub struct ScanResult {
    pub records: Vec<EnvironmentRecord>,
    pub diagnostics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u128>,
}

impl ScanResult {
    pub fn empty() -> Self {
        ScanResult {
            records: Vec::new(),
            diagnostics: Vec::new(),
            duration_ms: None,
        }
    }
}

pub fn run(config: &Config) -> ScanResult {
    let start = Instant::now();

    // keyed by normalized path, so overlapping roots collapse and the
    // output comes back sorted ascending
    let mut found: BTreeMap<PathBuf, EnvironmentRecord> = BTreeMap::new();
    let mut diagnostics = Vec::new();

    for root in &config.roots {
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "skipping scan root");
            continue;
        }

        scan_root(root, config.depth, &mut found, &mut diagnostics);
    }

    ScanResult {
        records: found.into_values().collect(),
        diagnostics,
        duration_ms: Some(start.elapsed().as_millis()),
    }
}

fn scan_root(
    root: &Path,
    depth: ScanDepth,
    found: &mut BTreeMap<PathBuf, EnvironmentRecord>,
    diagnostics: &mut Vec<String>,
) {
    match depth {
        ScanDepth::RootOnly => {
            record_if_environment(root, found);
        }
        ScanDepth::RootAndChildren => {
            record_if_environment(root, found);

            let entries = match fs::read_dir(root) {
                Ok(entries) => entries,
                Err(e) => {
                    diagnostics.push(format!("cannot list {}: {}", root.display(), e));
                    return;
                }
            };

            for entry in entries.filter_map(|e| e.ok()) {
                let path = entry.path();
                if path.is_dir() {
                    record_if_environment(&path, found);
                }
            }
        }
        ScanDepth::Recursive => {
            let mut walker = WalkDir::new(root).follow_links(false).into_iter();

            while let Some(entry) = walker.next() {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        // an unreadable directory loses its subtree, nothing else
                        diagnostics.push(format!(
                            "cannot list {}: {}",
                            e.path()
                                .map(|p| p.display().to_string())
                                .unwrap_or_else(|| "unknown path".to_string()),
                            e
                        ));
                        continue;
                    }
                };

                if !entry.file_type().is_dir() {
                    continue;
                }

                if record_if_environment(entry.path(), found) {
                    // everything below a recognized environment belongs to
                    // it, there is nothing further to discover inside
                    walker.skip_current_dir();
                }
            }
        }
    }
}

fn record_if_environment(
    path: &Path,
    found: &mut BTreeMap<PathBuf, EnvironmentRecord>,
) -> bool {
    let Some(manager) = manager_kind(path) else {
        return false;
    };

    let root = normalize(path);
    found
        .entry(root.clone())
        .or_insert(EnvironmentRecord { root, manager });
    true
}

// canonicalize collapses symlinks and relative segments so a directory
// reachable from two roots dedups to one record; when that fails the path is
// still made absolute so ordering stays stable
fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}
