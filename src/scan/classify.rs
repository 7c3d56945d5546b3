//! Recognizes virtual environment directories by their on-disk markers.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Which tool family laid the environment out, as far as the markers reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ManagerKind {
    StdlibVenv,
    CondaLike,
    Unknown,
}

/// One discovered environment. Identity is the normalized absolute root
/// path; records are rebuilt from scratch on every scan and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentRecord {
    pub root: PathBuf,
    pub manager: ManagerKind,
}

impl EnvironmentRecord {
    /// Interpreter binary conventionally shipped inside the environment.
    /// Derived on demand, not stored.
    pub fn interpreter_path(&self) -> PathBuf {
        let windows_style = self.root.join("Scripts").join("python.exe");
        if windows_style.is_file() {
            return windows_style;
        }
        self.root.join("bin").join("python")
    }
}

// interpreter binaries and activation scripts prove an environment exists
// but not which manager produced it
const LAYOUT_MARKERS: &[&[&str]] = &[
    &["Scripts", "python.exe"],
    &["Scripts", "activate.bat"],
    &["bin", "python"],
    &["bin", "activate"],
];

/// Classifies a directory by its markers. Both Windows-style and Unix-style
/// subpaths are checked on every host: an environment created on one system
/// may be scanned from another (WSL, network mounts). A permission error
/// while testing a marker counts as "marker absent". The directory's own
/// name never participates.
pub fn manager_kind(path: &Path) -> Option<ManagerKind> {
    if !path.is_dir() {
        return None;
    }

    if path.join("pyvenv.cfg").is_file() {
        return Some(ManagerKind::StdlibVenv);
    }

    if path.join("conda-meta").is_dir() || path.join("etc").join("conda").is_dir() {
        return Some(ManagerKind::CondaLike);
    }

    for parts in LAYOUT_MARKERS {
        let mut marker = path.to_path_buf();
        for part in *parts {
            marker.push(part);
        }
        if marker.exists() {
            return Some(ManagerKind::Unknown);
        }
    }

    None
}

pub fn is_environment(path: &Path) -> bool {
    manager_kind(path).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn pyvenv_cfg_marks_a_stdlib_venv() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pyvenv.cfg"), "home = /usr/bin\n").unwrap();

        assert_eq!(manager_kind(dir.path()), Some(ManagerKind::StdlibVenv));
    }

    #[test]
    fn conda_markers_mark_a_conda_environment() {
        let with_meta = tempfile::tempdir().unwrap();
        fs::create_dir(with_meta.path().join("conda-meta")).unwrap();
        assert_eq!(manager_kind(with_meta.path()), Some(ManagerKind::CondaLike));

        let with_etc = tempfile::tempdir().unwrap();
        fs::create_dir_all(with_etc.path().join("etc").join("conda")).unwrap();
        assert_eq!(manager_kind(with_etc.path()), Some(ManagerKind::CondaLike));
    }

    #[test]
    fn layout_markers_mark_an_unknown_manager() {
        for parts in [
            ["Scripts", "python.exe"],
            ["Scripts", "activate.bat"],
            ["bin", "python"],
            ["bin", "activate"],
        ] {
            let dir = tempfile::tempdir().unwrap();
            let subdir = dir.path().join(parts[0]);
            fs::create_dir_all(&subdir).unwrap();
            fs::write(subdir.join(parts[1]), "").unwrap();

            assert_eq!(manager_kind(dir.path()), Some(ManagerKind::Unknown));
        }
    }

    #[test]
    fn classification_ignores_the_directory_name() {
        // a directory named like a venv with no markers is not one
        let base = tempfile::tempdir().unwrap();
        let decoy = base.path().join(".venv");
        fs::create_dir(&decoy).unwrap();
        assert!(!is_environment(&decoy));

        // and an arbitrary name with a marker is one
        let real = base.path().join("build-output");
        fs::create_dir(&real).unwrap();
        fs::write(real.join("pyvenv.cfg"), "").unwrap();
        assert!(is_environment(&real));
    }

    #[test]
    fn files_and_missing_paths_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("pyvenv.cfg");
        fs::write(&file, "").unwrap();

        assert!(!is_environment(&file));
        assert!(!is_environment(&dir.path().join("does-not-exist")));
    }

    #[test]
    fn interpreter_path_prefers_the_existing_layout() {
        let dir = tempfile::tempdir().unwrap();
        let scripts = dir.path().join("Scripts");
        fs::create_dir(&scripts).unwrap();
        fs::write(scripts.join("python.exe"), "").unwrap();

        let record = EnvironmentRecord {
            root: dir.path().to_path_buf(),
            manager: ManagerKind::Unknown,
        };
        assert!(record.interpreter_path().ends_with("Scripts/python.exe"));

        let bare = EnvironmentRecord {
            root: PathBuf::from("/nonexistent/env"),
            manager: ManagerKind::StdlibVenv,
        };
        assert_eq!(
            bare.interpreter_path(),
            PathBuf::from("/nonexistent/env/bin/python")
        );
    }
}
