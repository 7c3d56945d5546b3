use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use venvy::cli::{Cli, Command};
use venvy::config::Config;
use venvy::errors::VenvyError;
use venvy::interpreters;
use venvy::lifecycle::{self, DeleteOutcome};
use venvy::platform::InstructionKind;
use venvy::process::{ProcessRunner, SystemRunner};
use venvy::report;
use venvy::scan;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("VENVY_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let runner = SystemRunner;

    match cli.command {
        Command::List(args) => {
            let config = Config::from_list_args(&args);
            let result = scan::run(&config);
            report::print_environments(&result, &config);
        }
        Command::Interpreters(args) => {
            let config = Config::default();
            let records = interpreters::locate(&config, &runner);
            report::print_interpreters(&records, args.json);
        }
        Command::Create(args) => {
            if venvy::scan::classify::is_environment(&args.target) {
                eprintln!(
                    "{} is already a virtual environment",
                    args.target.display()
                );
                std::process::exit(2);
            }

            let config = Config::default();
            let interpreter = match args.python {
                Some(path) => path,
                None => match pick_interpreter(&config, &runner) {
                    Ok(path) => path,
                    Err(e) => {
                        eprintln!("{e}");
                        std::process::exit(2);
                    }
                },
            };

            if let Err(e) = lifecycle::create(&args.target, &interpreter, &runner) {
                eprintln!("{e}");
                std::process::exit(1);
            }

            println!("Created environment at {}", args.target.display());
        }
        Command::Delete(args) => {
            let confirmed = args.yes || confirm_delete(&args.target);

            match lifecycle::delete(&args.target, confirmed) {
                Ok(DeleteOutcome::Deleted) => {
                    println!("Deleted environment at {}", args.target.display());
                }
                Ok(DeleteOutcome::Cancelled) => {
                    println!("Deletion cancelled.");
                }
                Err(e @ VenvyError::NotAnEnvironment(_)) => {
                    eprintln!("{e}");
                    std::process::exit(2);
                }
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Activate(args) => {
            let config = Config::default();

            let instruction = match lifecycle::activation_instruction(&args.target, config.platform)
            {
                Ok(instruction) => instruction,
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(2);
                }
            };

            match instruction.kind {
                InstructionKind::Command => println!("Run to activate: {}", instruction.value),
                InstructionKind::Script => println!("Activation script: {}", instruction.value),
            }

            if !args.print_only {
                if let Err(e) =
                    lifecycle::spawn_activated_shell(&instruction, config.platform, &runner)
                {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }
    }
}

// numbered picker over the located interpreters, accepting an index or an
// explicit path; the current process is offered last since it cannot
// bootstrap a venv
fn pick_interpreter(config: &Config, runner: &dyn ProcessRunner) -> Result<PathBuf, String> {
    let mut records = interpreters::locate(config, runner);
    records.sort_by_key(|record| record.is_current_process);

    if records.iter().all(|record| record.is_current_process) {
        return Err(VenvyError::NoInterpreterFound.to_string());
    }

    print!("{}", report::table::render_interpreters(&records));

    let stdin = io::stdin();
    loop {
        print!("Enter number (1-{}), or a path: ", records.len());
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => return Err(String::from("no interpreter selected")),
            Ok(_) => {}
        }

        let choice = line.trim();
        if let Ok(index) = choice.parse::<usize>() {
            if (1..=records.len()).contains(&index) {
                return Ok(records[index - 1].path.clone());
            }
        } else if !choice.is_empty() && Path::new(choice).exists() {
            return Ok(PathBuf::from(choice));
        }

        println!("Invalid selection. Try again.");
    }
}

fn confirm_delete(target: &Path) -> bool {
    print!(
        "Are you sure you want to delete the environment at {}? (y/N): ",
        target.display()
    );
    io::stdout().flush().ok();

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return false;
    }

    matches!(line.trim(), "y" | "Y")
}
