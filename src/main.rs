//! # task-cli
//!
//! Track what you need to do from the terminal. Tasks live in `tasks.json` in
//! the current directory (override with `--file` or `TASKS_DB`).
//!
//! ```bash
//! task-cli add "Buy groceries"
//! task-cli update 1 "Buy groceries and cook dinner"
//! task-cli mark-in-progress 1
//! task-cli mark-done 1
//! task-cli delete 1
//! task-cli list
//! task-cli list todo
//! ```
//!
//! Set `RUST_LOG=debug` to see what the store reads and writes.

use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use task_tracker::commands::{Command, Session};
use task_tracker::error::{Error, Result};
use task_tracker::models::Status;
use task_tracker::storage::{Store, DEFAULT_FILE};

#[derive(Parser)]
#[command(name = "task-cli")]
#[command(about = "Task Tracker CLI", long_about = None)]
struct Cli {
    /// Path to the tasks file
    #[arg(short, long, global = true, env = "TASKS_DB", default_value = DEFAULT_FILE)]
    file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task description (quoted if it has spaces)
        description: String,
    },
    /// Update a task's description
    Update {
        id: u64,
        /// New description
        description: String,
    },
    /// Delete a task
    Delete {
        id: u64,
    },
    /// Mark a task as in progress
    MarkInProgress {
        id: u64,
    },
    /// Mark a task as done
    MarkDone {
        id: u64,
    },
    /// List tasks, optionally only those with a given status
    List {
        /// One of: todo, in-progress, done
        filter: Option<String>,
    },
    /// Generate shell completions
    Completions {
        shell: Shell,
    },
}

fn non_empty(description: String) -> Result<String> {
    if description.trim().is_empty() {
        return Err(Error::InvalidArgument("description must not be empty".into()));
    }
    Ok(description)
}

impl Commands {
    fn into_command(self) -> Result<Option<Command>> {
        let command = match self {
            Commands::Add { description } => Command::Add {
                description: non_empty(description)?,
            },
            Commands::Update { id, description } => Command::Update {
                id,
                description: non_empty(description)?,
            },
            Commands::Delete { id } => Command::Delete { id },
            Commands::MarkInProgress { id } => Command::Mark {
                id,
                status: Status::InProgress,
            },
            Commands::MarkDone { id } => Command::Mark {
                id,
                status: Status::Done,
            },
            Commands::List { filter } => Command::List {
                filter: filter.unwrap_or_default().parse()?,
            },
            Commands::Completions { shell } => {
                let mut cmd = Cli::command();
                generate(shell, &mut cmd, "task-cli", &mut io::stdout());
                return Ok(None);
            }
        };
        Ok(Some(command))
    }
}

fn run(cli: Cli) -> Result<()> {
    let Some(command) = cli.command.into_command()? else {
        return Ok(());
    };
    let mut session = Session::open(Store::new(cli.file))?;
    let outcome = session.execute(command)?;
    session.finish()?;
    println!("{outcome}");
    Ok(())
}

fn main() {
    // Tracing is opt-in via RUST_LOG and always goes to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
