//! Terminal table rendering for environment and interpreter listings.

use crate::interpreters::InterpreterRecord;
use crate::scan::classify::ManagerKind;
use crate::scan::ScanResult;

pub fn render_environments(result: &ScanResult) -> String {
    if result.records.is_empty() {
        return String::from("No virtual environments found.\n");
    }

    let mut output = String::from("Virtual environments:\n");

    for record in &result.records {
        output.push_str(&format!(
            "  {:<6} {}\n",
            manager_label(record.manager),
            record.root.display()
        ));
    }

    output
}

/// Numbered so the create picker can reuse the same rendering.
pub fn render_interpreters(records: &[InterpreterRecord]) -> String {
    if records.is_empty() {
        return String::from("No Python interpreters found.\n");
    }

    let mut output = String::from("Installed interpreters:\n");

    for (index, record) in records.iter().enumerate() {
        let marker = if record.is_current_process {
            " (this tool)"
        } else {
            ""
        };
        output.push_str(&format!(
            "  [{}] {:<10} {}{}\n",
            index + 1,
            record.version_label,
            record.path.display(),
            marker
        ));
    }

    output
}

fn manager_label(kind: ManagerKind) -> &'static str {
    match kind {
        ManagerKind::StdlibVenv => "venv",
        ManagerKind::CondaLike => "conda",
        ManagerKind::Unknown => "env",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::classify::EnvironmentRecord;
    use std::path::PathBuf;

    #[test]
    fn empty_scan_renders_a_message() {
        let result = ScanResult::empty();
        assert_eq!(render_environments(&result), "No virtual environments found.\n");
    }

    #[test]
    fn environments_render_with_manager_labels() {
        let result = ScanResult {
            records: vec![
                EnvironmentRecord {
                    root: PathBuf::from("/home/dev/venvs/a"),
                    manager: ManagerKind::StdlibVenv,
                },
                EnvironmentRecord {
                    root: PathBuf::from("/home/dev/venvs/b"),
                    manager: ManagerKind::CondaLike,
                },
            ],
            diagnostics: vec![],
            duration_ms: None,
        };

        let rendered = render_environments(&result);
        assert!(rendered.contains("venv   /home/dev/venvs/a"));
        assert!(rendered.contains("conda  /home/dev/venvs/b"));
    }

    #[test]
    fn interpreters_render_numbered_with_current_marker() {
        let records = vec![
            InterpreterRecord {
                path: PathBuf::from("/usr/bin/python3.12"),
                version: "3.12.1".parse().ok(),
                version_label: String::from("3.12.1"),
                is_current_process: false,
            },
            InterpreterRecord {
                path: PathBuf::from("/usr/local/bin/venvy"),
                version: None,
                version_label: String::from("0.3.0"),
                is_current_process: true,
            },
        ];

        let rendered = render_interpreters(&records);
        assert!(rendered.contains("[1] 3.12.1"));
        assert!(rendered.contains("[2] 0.3.0"));
        assert!(rendered.contains("(this tool)"));
    }
}
