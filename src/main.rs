//! giwo - Git worktree manager
//!
//! Command-line entry point: parses the subcommand, sets up logging and
//! dispatches to [`giwo::commands`].

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use giwo::commands::{
    self, CleanOptions, CreateOptions, ListFormat, ListOptions, RemoveOptions, SelectionMode,
    Shell, SwitchOptions,
};
use giwo::constants::{DEFAULT_LOG_FILTER, ENV_LOG};
use giwo::utils::switch_file_from_env;

/// Command-line arguments for giwo
#[derive(Parser)]
#[command(name = "giwo", version)]
#[command(about = "Git WorkTree Manager - Efficiently manage Git worktrees", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new worktree under .worktree/<branch-name>
    Create {
        branch: String,
        /// Base branch to create the worktree from (default: current branch)
        #[arg(long)]
        base: Option<String>,
        /// Create even if the directory already exists
        #[arg(long)]
        force: bool,
    },
    /// Remove a worktree and its local branch
    #[command(visible_alias = "rm", alias = "delete")]
    Remove {
        branch: String,
        /// Remove without confirmation
        #[arg(long)]
        force: bool,
        /// Keep the local branch after removing the worktree
        #[arg(long)]
        keep_branch: bool,
    },
    /// List all worktrees
    #[command(visible_alias = "ls")]
    List {
        /// Show ahead/behind, changes and last commit
        #[arg(short, long)]
        verbose: bool,
        #[arg(long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },
    /// Show worktree statistics and suggested actions
    Status,
    /// Remove worktrees of branches merged into main/master
    Clean {
        /// Show what would be removed without removing it
        #[arg(long)]
        dry_run: bool,
        /// Remove without confirmation
        #[arg(long)]
        force: bool,
    },
    /// Remove administrative files of orphaned worktrees
    Prune,
    /// Switch to a worktree interactively
    #[command(visible_alias = "sw")]
    Switch {
        /// Only offer worktrees whose branch contains this text
        filter: Option<String>,
        #[arg(short = 'f', long = "filter", conflicts_with = "filter")]
        filter_flag: Option<String>,
        /// Print the selected path instead of switching
        #[arg(short, long)]
        print: bool,
        /// Interactive fuzzy search
        #[arg(long, conflicts_with = "picker")]
        fuzzy: bool,
        /// Fuzzy-select widget
        #[arg(long)]
        picker: bool,
    },
    /// Print the shell function that lets `giwo switch` change directory
    ShellInit {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Create {
            branch,
            base,
            force,
        } => commands::create_worktree(&CreateOptions {
            branch,
            base,
            force,
        }),
        Command::Remove {
            branch,
            force,
            keep_branch,
        } => commands::remove_worktree(&RemoveOptions {
            branch,
            force,
            keep_branch,
        }),
        Command::List { verbose, format } => {
            commands::list_worktrees(&ListOptions { verbose, format })
        }
        Command::Status => commands::show_status(),
        Command::Clean { dry_run, force } => {
            commands::clean_worktrees(&CleanOptions { dry_run, force })
        }
        Command::Prune => commands::prune_worktrees(),
        Command::Switch {
            filter,
            filter_flag,
            print,
            fuzzy,
            picker,
        } => {
            let mode = if fuzzy {
                SelectionMode::Fuzzy
            } else if picker {
                SelectionMode::Picker
            } else {
                SelectionMode::Numbered
            };
            commands::switch_worktree(&SwitchOptions {
                filter: filter.or(filter_flag),
                mode,
                print,
                switch_file: switch_file_from_env(),
            })
        }
        Command::ShellInit { shell } => {
            commands::print_shell_init(shell);
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
