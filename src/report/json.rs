//! JSON output for scripting and piping.

use crate::interpreters::InterpreterRecord;
use crate::scan::ScanResult;

pub fn render_environments(result: &ScanResult) -> String {
    serde_json::to_string_pretty(result).unwrap_or_else(|_| String::from("{}"))
}

pub fn render_interpreters(records: &[InterpreterRecord]) -> String {
    serde_json::to_string_pretty(records).unwrap_or_else(|_| String::from("[]"))
}
