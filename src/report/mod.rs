pub mod json;
pub mod table;

use crate::config::Config;
use crate::interpreters::InterpreterRecord;
use crate::scan::ScanResult;

pub fn print_environments(result: &ScanResult, config: &Config) {
    if config.json_output {
        println!("{}", json::render_environments(result));
    } else {
        print!("{}", table::render_environments(result));
        print_scan_info(result, config.verbose);
        print_diagnostics(result, config.verbose);
    }
}

pub fn print_interpreters(records: &[InterpreterRecord], json_output: bool) {
    if json_output {
        println!("{}", json::render_interpreters(records));
    } else {
        print!("{}", table::render_interpreters(records));
    }
}

fn print_scan_info(result: &ScanResult, verbose: bool) {
    if !verbose {
        return;
    }

    if let Some(duration_ms) = result.duration_ms {
        let duration_sec = duration_ms as f64 / 1000.0;
        println!("\nscan completed in {duration_sec:.2}s");
    }
}

fn print_diagnostics(result: &ScanResult, verbose: bool) {
    if !verbose || result.diagnostics.is_empty() {
        return;
    }

    println!();
    println!("Diagnostics:");
    println!("{}", "-".repeat(40));
    for diagnostic in &result.diagnostics {
        println!("  {diagnostic}");
    }
}
