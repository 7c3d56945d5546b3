//! Platform detection and the capability surface of the engine.
//!
//! Everything that differs between Windows-style and Unix-style environment
//! layouts (interpreter and activation subpaths, interpreter install
//! locations, the shape of an activation instruction) lives behind
//! `PlatformOps`. One variant is selected at startup; tests pick a variant
//! explicitly and pair it with a fake process runner.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Linux,
    Windows,
    Unknown,
}

pub fn detect() -> Platform {
    match std::env::consts::OS {
        "macos" => Platform::MacOS,
        "linux" => Platform::Linux,
        "windows" => Platform::Windows,
        _ => Platform::Unknown,
    }
}

pub fn home_dir() -> Option<PathBuf> {
    directories::UserDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(PathBuf::from)
        })
}

/// How a front end hands an activation over to the user: a command to paste
/// into the current shell, or a script file to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    Command,
    Script,
}

#[derive(Debug, Clone)]
pub struct ActivationInstruction {
    pub kind: InstructionKind,
    pub value: String,
}

pub trait PlatformOps {
    fn name(&self) -> &'static str;

    /// Interpreter binary conventionally shipped inside an environment.
    fn interpreter_in_env(&self, env_root: &Path) -> PathBuf;

    /// Activation script conventionally shipped inside an environment.
    fn activation_script(&self, env_root: &Path) -> PathBuf;

    /// Launcher names worth resolving on the execution search path.
    fn launcher_names(&self) -> &'static [&'static str];

    /// Interpreter binaries at this platform's conventional install
    /// locations. Unreadable directories contribute nothing.
    fn installed_interpreters(&self) -> Vec<PathBuf>;

    /// Activation instruction for an environment whose activation script is
    /// known to exist.
    fn activation_instruction(
        &self,
        env_root: &Path,
        script: &Path,
    ) -> io::Result<ActivationInstruction>;

    /// Program and arguments for the interactive session that applies the
    /// instruction. The session is spawned fire-and-forget; the engine never
    /// waits on it.
    fn shell_invocation(&self, instruction: &ActivationInstruction) -> (PathBuf, Vec<OsString>);
}

pub struct UnixPlatform;
pub struct WindowsPlatform;

static UNIX: UnixPlatform = UnixPlatform;
static WINDOWS: WindowsPlatform = WindowsPlatform;

/// Selects the capability variant once at startup. Anything that is not
/// Windows gets the Unix layout, including unrecognized platforms.
pub fn current() -> &'static dyn PlatformOps {
    match detect() {
        Platform::Windows => &WINDOWS,
        Platform::MacOS | Platform::Linux | Platform::Unknown => &UNIX,
    }
}

impl PlatformOps for UnixPlatform {
    fn name(&self) -> &'static str {
        "unix"
    }

    fn interpreter_in_env(&self, env_root: &Path) -> PathBuf {
        env_root.join("bin").join("python")
    }

    fn activation_script(&self, env_root: &Path) -> PathBuf {
        env_root.join("bin").join("activate")
    }

    fn launcher_names(&self) -> &'static [&'static str] {
        &["python3", "python"]
    }

    fn installed_interpreters(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();

        for dir in ["/usr/bin", "/usr/local/bin"] {
            collect_prefixed(Path::new(dir), "python3", &mut found);
        }

        // pyenv keeps one full tree per installed version
        if let Some(home) = home_dir() {
            let versions = home.join(".pyenv").join("versions");
            if let Ok(entries) = fs::read_dir(&versions) {
                for entry in entries.filter_map(|e| e.ok()) {
                    let python = entry.path().join("bin").join("python");
                    if python.is_file() {
                        found.push(python);
                    }
                }
            }
        }

        found
    }

    fn activation_instruction(
        &self,
        _env_root: &Path,
        script: &Path,
    ) -> io::Result<ActivationInstruction> {
        Ok(ActivationInstruction {
            kind: InstructionKind::Command,
            value: format!("source \"{}\"", script.display()),
        })
    }

    fn shell_invocation(&self, instruction: &ActivationInstruction) -> (PathBuf, Vec<OsString>) {
        // run the user's own shell so the activated session behaves like
        // their normal one; sourcing then exec-ing keeps the activation
        // alive for the life of the session
        let shell = std::env::var_os("SHELL")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/bin/bash"));

        let command = format!("{} && exec \"{}\"", instruction.value, shell.display());

        (
            shell,
            vec![
                OsString::from("-i"),
                OsString::from("-c"),
                OsString::from(command),
            ],
        )
    }
}

impl PlatformOps for WindowsPlatform {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn interpreter_in_env(&self, env_root: &Path) -> PathBuf {
        env_root.join("Scripts").join("python.exe")
    }

    fn activation_script(&self, env_root: &Path) -> PathBuf {
        env_root.join("Scripts").join("activate.bat")
    }

    fn launcher_names(&self) -> &'static [&'static str] {
        &["python", "py"]
    }

    fn installed_interpreters(&self) -> Vec<PathBuf> {
        let mut install_roots = vec![
            PathBuf::from("C:\\"),
            PathBuf::from("C:\\Program Files"),
            PathBuf::from("C:\\Program Files (x86)"),
        ];

        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            install_roots.push(PathBuf::from(local).join("Programs").join("Python"));
        }

        let mut found = Vec::new();

        // installers lay out versioned directories: Python39, Python312, ...
        for root in install_roots {
            let Ok(entries) = fs::read_dir(&root) else {
                continue;
            };

            for entry in entries.filter_map(|e| e.ok()) {
                let name = entry.file_name();
                let Some(name) = name.to_str() else { continue };

                if !name.starts_with("Python") {
                    continue;
                }

                let exe = entry.path().join("python.exe");
                if exe.is_file() {
                    found.push(exe);
                }
            }
        }

        found
    }

    fn activation_instruction(
        &self,
        env_root: &Path,
        script: &Path,
    ) -> io::Result<ActivationInstruction> {
        // calling activate.bat directly would activate and immediately exit;
        // a wrapper ending in `cmd /k` keeps the activated shell open
        let env_name = env_root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("venv");

        let wrapper = std::env::temp_dir().join(format!("activate_{env_name}.bat"));

        let body = format!(
            "@echo off\r\ncall \"{}\"\r\necho Virtual environment \"{}\" is now active.\r\necho.\r\ncmd /k\r\n",
            script.display(),
            env_name,
        );

        fs::write(&wrapper, body)?;

        Ok(ActivationInstruction {
            kind: InstructionKind::Script,
            value: wrapper.display().to_string(),
        })
    }

    fn shell_invocation(&self, instruction: &ActivationInstruction) -> (PathBuf, Vec<OsString>) {
        (
            PathBuf::from("cmd"),
            vec![OsString::from("/c"), OsString::from(&instruction.value)],
        )
    }
}

// matches python3, python3.11, ... but not python3-config and friends
fn collect_prefixed(dir: &Path, prefix: &str, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };

        if !name.starts_with(prefix) || name.contains('-') {
            continue;
        }

        let path = entry.path();
        if path.is_file() {
            found.push(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_activation_is_a_source_command() {
        let env_root = Path::new("/home/dev/venvs/web");
        let script = env_root.join("bin").join("activate");

        let instruction = UnixPlatform
            .activation_instruction(env_root, &script)
            .unwrap();

        assert_eq!(instruction.kind, InstructionKind::Command);
        assert_eq!(
            instruction.value,
            "source \"/home/dev/venvs/web/bin/activate\""
        );
    }

    #[test]
    fn unix_shell_invocation_sources_then_execs() {
        let instruction = ActivationInstruction {
            kind: InstructionKind::Command,
            value: String::from("source \"/tmp/v/bin/activate\""),
        };

        let (_, args) = UnixPlatform.shell_invocation(&instruction);

        assert_eq!(args[0], "-i");
        assert_eq!(args[1], "-c");
        let command = args[2].to_str().unwrap();
        assert!(command.starts_with("source \"/tmp/v/bin/activate\" && exec"));
    }

    #[test]
    fn windows_wrapper_keeps_the_shell_open() {
        let env_root = tempfile::tempdir().unwrap();
        let scripts = env_root.path().join("Scripts");
        fs::create_dir_all(&scripts).unwrap();
        let script = scripts.join("activate.bat");
        fs::write(&script, "rem activation").unwrap();

        let instruction = WindowsPlatform
            .activation_instruction(env_root.path(), &script)
            .unwrap();

        assert_eq!(instruction.kind, InstructionKind::Script);

        let body = fs::read_to_string(&instruction.value).unwrap();
        assert!(body.contains("call"));
        assert!(body.contains("cmd /k"));
        assert!(body.contains(&script.display().to_string()));
    }

    #[test]
    fn collect_prefixed_skips_tooling_binaries() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["python3", "python3.11", "python3-config", "perl"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let mut found = Vec::new();
        collect_prefixed(dir.path(), "python3", &mut found);
        found.sort();

        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["python3", "python3.11"]);
    }
}
