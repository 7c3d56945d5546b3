use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::cli::ListArgs;
use crate::platform::{self, PlatformOps};
use crate::scan::roots::{self, RootStrategy};
use crate::scan::ScanDepth;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

pub struct Config {
    pub roots: Vec<PathBuf>,
    pub depth: ScanDepth,
    pub probe_timeout: Duration,
    pub json_output: bool,
    pub verbose: bool,
    pub platform: &'static dyn PlatformOps,
}

impl Config {
    pub fn from_list_args(args: &ListArgs) -> Self {
        let file = FileConfig::load();

        let strategies = match &args.base {
            Some(dir) => vec![RootStrategy::Explicit(dir.clone())],
            None => {
                let mut strategies = roots::default_strategies();
                for extra in &file.extra_roots {
                    strategies.push(RootStrategy::Explicit(roots::expand_tilde(extra)));
                }
                strategies
            }
        };

        let depth = if args.deep {
            ScanDepth::Recursive
        } else {
            ScanDepth::RootAndChildren
        };

        Config {
            roots: roots::resolve(&strategies),
            depth,
            probe_timeout: file.probe_timeout(),
            json_output: args.json,
            verbose: args.verbose,
            platform: platform::current(),
        }
    }

    pub fn default() -> Self {
        let file = FileConfig::load();

        Config {
            roots: roots::resolve(&roots::default_strategies()),
            depth: ScanDepth::RootAndChildren,
            probe_timeout: file.probe_timeout(),
            json_output: false,
            verbose: false,
            platform: platform::current(),
        }
    }
}

/// On-disk configuration, all optional.
#[derive(Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    /// Extra scan roots appended after the built-in strategy list.
    extra_roots: Vec<PathBuf>,
    /// Interpreter probe timeout as a humantime string ("2s", "500ms").
    probe_timeout: Option<String>,
}

impl FileConfig {
    fn load() -> Self {
        let Some(dirs) = directories::ProjectDirs::from("", "", "venvy") else {
            return Self::default();
        };

        let path = dirs.config_dir().join("config.toml");
        let Ok(content) = std::fs::read_to_string(&path) else {
            return Self::default();
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("warning: ignoring malformed {}: {e}", path.display());
                Self::default()
            }
        }
    }

    fn probe_timeout(&self) -> Duration {
        self.probe_timeout
            .as_deref()
            .and_then(|text| humantime::parse_duration(text).ok())
            .unwrap_or(DEFAULT_PROBE_TIMEOUT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_timeout_parses_humantime_strings() {
        let file: FileConfig = toml::from_str(r#"probe_timeout = "500ms""#).unwrap();
        assert_eq!(file.probe_timeout(), Duration::from_millis(500));
    }

    #[test]
    fn missing_and_malformed_timeouts_fall_back() {
        assert_eq!(FileConfig::default().probe_timeout(), DEFAULT_PROBE_TIMEOUT);

        let file: FileConfig = toml::from_str(r#"probe_timeout = "soonish""#).unwrap();
        assert_eq!(file.probe_timeout(), DEFAULT_PROBE_TIMEOUT);
    }

    #[test]
    fn extra_roots_deserialize() {
        let file: FileConfig = toml::from_str(r#"extra_roots = ["~/work/envs", "/srv/py"]"#).unwrap();
        assert_eq!(file.extra_roots.len(), 2);
    }
}
