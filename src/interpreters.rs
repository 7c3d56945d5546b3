//! Discovery of Python interpreters installed on the host.
//!
//! Enumeration is best-effort: install-location probes and PATH lookups that
//! fail simply contribute nothing, and the process running the tool itself
//! is always reported, so the listing is never empty.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::env;
use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::config::Config;
use crate::process::ProcessRunner;

/// Dotted numeric prefix of a version string: "Python 3.11.4" parses as
/// 3.11.4, "3.12.0rc1" as 3.12.0. Comparison is numeric per component.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PythonVersion(Vec<u32>);

impl FromStr for PythonVersion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, ()> {
        let token = s
            .split_whitespace()
            .find(|t| t.starts_with(|c: char| c.is_ascii_digit()))
            .ok_or(())?;

        let mut parts = Vec::new();
        for piece in token.split('.') {
            let digits: String = piece.chars().take_while(char::is_ascii_digit).collect();
            if digits.is_empty() {
                break;
            }
            parts.push(digits.parse().map_err(|_| ())?);
            if digits.len() != piece.len() {
                // a suffix like "0rc1" ends the numeric prefix
                break;
            }
        }

        if parts.is_empty() {
            Err(())
        } else {
            Ok(PythonVersion(parts))
        }
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.0.iter().map(u32::to_string).collect();
        write!(f, "{}", rendered.join("."))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InterpreterRecord {
    pub path: PathBuf,
    pub version: Option<PythonVersion>,
    pub version_label: String,
    pub is_current_process: bool,
}

/// Enumerates interpreters: the current process first, then conventional
/// install locations, then launchers on the search path. Candidates are
/// deduplicated by executable path (first occurrence wins) and ordered by
/// version descending with unparsable versions last.
pub fn locate(config: &Config, runner: &dyn ProcessRunner) -> Vec<InterpreterRecord> {
    let mut records = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    // the process running the tool is always reported, even on a host with
    // no Python installed at all
    if let Ok(exe) = env::current_exe() {
        seen.insert(exe.clone());
        records.push(InterpreterRecord {
            path: exe,
            version: env!("CARGO_PKG_VERSION").parse().ok(),
            version_label: env!("CARGO_PKG_VERSION").to_string(),
            is_current_process: true,
        });
    }

    let mut candidates = config.platform.installed_interpreters();
    for name in config.platform.launcher_names() {
        if let Ok(matches) = which::which_all(name) {
            candidates.extend(matches);
        }
    }

    for candidate in candidates {
        if !seen.insert(candidate.clone()) {
            continue;
        }

        match probe_version(&candidate, config.probe_timeout, runner) {
            Some((version, version_label)) => records.push(InterpreterRecord {
                path: candidate,
                version,
                version_label,
                is_current_process: false,
            }),
            None => {
                tracing::debug!(path = %candidate.display(), "interpreter probe failed");
            }
        }
    }

    records.sort_by(listing_order);
    records
}

/// Asks a candidate for its version under a short timeout. A spawn failure,
/// timeout, or failure status excludes the candidate; a reply that merely
/// fails to parse keeps it with no version, which sorts it last.
fn probe_version(
    path: &Path,
    timeout: Duration,
    runner: &dyn ProcessRunner,
) -> Option<(Option<PythonVersion>, String)> {
    let output = runner
        .run(path, &[OsStr::new("--version")], Some(timeout))
        .ok()?;

    if !output.success {
        return None;
    }

    // interpreters before 3.4 print the banner on stderr
    let banner = if output.stdout.trim().is_empty() {
        output.stderr.trim()
    } else {
        output.stdout.trim()
    };

    if banner.is_empty() {
        return None;
    }

    let version: Option<PythonVersion> = banner.parse().ok();
    let label = version
        .as_ref()
        .map(PythonVersion::to_string)
        .unwrap_or_else(|| banner.to_string());

    Some((version, label))
}

// version descending, unparsable last, path as the deterministic tiebreak
fn listing_order(a: &InterpreterRecord, b: &InterpreterRecord) -> Ordering {
    match (&a.version, &b.version) {
        (Some(x), Some(y)) => y.cmp(x).then_with(|| a.path.cmp(&b.path)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.path.cmp(&b.path),
    }
}
