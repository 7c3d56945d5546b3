use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "venvy")]
#[command(about = "Manage Python virtual environments from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Find virtual environments in the conventional locations or a chosen directory
    List(ListArgs),

    /// Show Python interpreters installed on this machine
    Interpreters(InterpretersArgs),

    /// Create a new virtual environment
    Create(CreateArgs),

    /// Delete a virtual environment
    Delete(DeleteArgs),

    /// Activate a virtual environment in a new interactive shell
    Activate(ActivateArgs),
}

#[derive(Parser)]
pub struct ListArgs {
    /// Scan this directory instead of the default locations
    #[arg(long)]
    pub base: Option<PathBuf>,

    /// Visit every descendant directory instead of immediate children only
    #[arg(long, default_value_t = false)]
    pub deep: bool,

    /// Output as JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Show diagnostics for skipped and unreadable directories
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,
}

#[derive(Parser)]
pub struct InterpretersArgs {
    /// Output as JSON instead of a table
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Parser)]
pub struct CreateArgs {
    /// Directory the new environment will live in
    pub target: PathBuf,

    /// Interpreter to bootstrap with (skips the interactive picker)
    #[arg(long)]
    pub python: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DeleteArgs {
    /// Environment directory to remove
    pub target: PathBuf,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,
}

#[derive(Parser)]
pub struct ActivateArgs {
    /// Environment directory to activate
    pub target: PathBuf,

    /// Print the activation instruction without spawning a shell
    #[arg(long, default_value_t = false)]
    pub print_only: bool,
}
