//! Resolution of scan roots.
//!
//! The places worth looking for environments are an ordered list of
//! strategies rather than ambient global lookups, so front ends can swap in
//! a single explicit directory and tests can supply synthetic roots.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// One entry in the root-resolution policy.
#[derive(Debug, Clone)]
pub enum RootStrategy {
    /// A directory the user named outright.
    Explicit(PathBuf),
    /// Home and the directory names venv tooling habitually uses under it.
    ConventionalDirs,
    /// Roots named by virtualenvwrapper-style environment variables.
    EnvOverrides,
    /// The current working directory.
    CurrentDir,
}

pub fn default_strategies() -> Vec<RootStrategy> {
    vec![
        RootStrategy::ConventionalDirs,
        RootStrategy::EnvOverrides,
        RootStrategy::CurrentDir,
    ]
}

pub fn resolve(strategies: &[RootStrategy]) -> Vec<PathBuf> {
    let mut roots = Vec::new();

    for strategy in strategies {
        match strategy {
            RootStrategy::Explicit(path) => roots.push(path.clone()),
            RootStrategy::ConventionalDirs => roots.extend(conventional_dirs()),
            RootStrategy::EnvOverrides => roots.extend(env_overrides(|key| env::var_os(key))),
            RootStrategy::CurrentDir => {
                if let Ok(cwd) = env::current_dir() {
                    roots.push(cwd);
                }
            }
        }
    }

    roots
}

fn conventional_dirs() -> Vec<PathBuf> {
    let Some(home) = crate::platform::home_dir() else {
        return Vec::new();
    };

    let mut dirs = vec![
        home.clone(),
        home.join(".virtualenvs"), // virtualenvwrapper default
        home.join("venvs"),
        home.join("virtualenvs"),
        home.join("envs"),
        home.join(".venv"),
    ];

    // Documents/Python is mostly a Windows habit but shows up elsewhere too
    let documents = directories::UserDirs::new()
        .and_then(|d| d.document_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| home.join("Documents"));
    dirs.push(documents.join("Python").join("venvs"));
    dirs.push(documents.join("Python").join("virtualenvs"));

    dirs
}

/// WORKON_HOME and VIRTUALENVWRAPPER_HOOK_DIR name container directories
/// outright; an active VIRTUAL_ENV points at a single environment, so its
/// parent is the interesting root.
fn env_overrides(get: impl Fn(&str) -> Option<OsString>) -> Vec<PathBuf> {
    let mut roots = Vec::new();

    if let Some(value) = get("WORKON_HOME") {
        roots.push(PathBuf::from(value));
    }
    if let Some(value) = get("VIRTUALENVWRAPPER_HOOK_DIR") {
        roots.push(PathBuf::from(value));
    }
    if let Some(value) = get("VIRTUAL_ENV") {
        if let Some(parent) = PathBuf::from(value).parent() {
            roots.push(parent.to_path_buf());
        }
    }

    roots
}

/// Expands a leading `~` in paths coming from the config file.
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };

    if text == "~" {
        return crate::platform::home_dir().unwrap_or_else(|| path.to_path_buf());
    }

    if let Some(rest) = text.strip_prefix("~/") {
        if let Some(home) = crate::platform::home_dir() {
            return home.join(rest);
        }
    }

    path.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_env<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<OsString> + 'a {
        move |key| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| OsString::from(v))
        }
    }

    #[test]
    fn env_overrides_use_the_virtual_env_parent() {
        let roots = env_overrides(fake_env(&[
            ("WORKON_HOME", "/data/workon"),
            ("VIRTUAL_ENV", "/home/dev/project/.venv"),
        ]));

        assert_eq!(
            roots,
            vec![
                PathBuf::from("/data/workon"),
                PathBuf::from("/home/dev/project"),
            ]
        );
    }

    #[test]
    fn env_overrides_with_nothing_set_are_empty() {
        let roots = env_overrides(fake_env(&[]));
        assert!(roots.is_empty());
    }

    #[test]
    fn explicit_strategies_resolve_in_order() {
        let roots = resolve(&[
            RootStrategy::Explicit(PathBuf::from("/first")),
            RootStrategy::Explicit(PathBuf::from("/second")),
        ]);

        assert_eq!(roots, vec![PathBuf::from("/first"), PathBuf::from("/second")]);
    }

    #[test]
    fn tilde_expands_against_home() {
        let expanded = expand_tilde(Path::new("~/venvs"));
        if let Some(home) = crate::platform::home_dir() {
            assert_eq!(expanded, home.join("venvs"));
        }

        // absolute paths pass through untouched
        assert_eq!(
            expand_tilde(Path::new("/opt/venvs")),
            PathBuf::from("/opt/venvs")
        );
    }
}
