//! fieldsync demo
//!
//! A counter and a todo list whose state survives between runs.
//!
//! # Commands
//!
//! - `show` - Print the current state
//! - `increment` - Add to the counter
//! - `todo add|toggle|list` - Edit the todo list
//! - `reset` - Remove every stored value

mod app;
mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Counter and todo list persisted with fieldsync.
#[derive(Parser)]
#[command(name = "fieldsync-demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Storage file (defaults to $FIELDSYNC_STORAGE_PATH or .fieldsync/storage.json)
    #[arg(global = true, short, long)]
    storage: Option<PathBuf>,

    /// Prefix for every storage key
    #[arg(global = true, short, long, default_value = "")]
    prefix: String,

    /// Persist only on matching transition names instead of on every change
    #[arg(global = true, long)]
    named: bool,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current state
    Show {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Add to the counter
    Increment {
        /// Amount to add
        #[arg(default_value = "1")]
        by: u64,
    },

    /// Edit the todo list
    #[command(subcommand)]
    Todo(TodoCommand),

    /// Remove every stored value
    Reset,

    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum TodoCommand {
    /// Append an item
    Add {
        /// Item text
        text: String,
    },
    /// Flip an item between open and done
    Toggle {
        /// Item id
        id: u64,
    },
    /// Print the list
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let options = app::Options {
        storage: cli.storage,
        prefix: cli.prefix,
        named_transitions: cli.named,
    };

    match cli.command {
        Commands::Show { format } => {
            let app = app::open(&options)?;
            commands::counter::show(&app, &format)?;
        }
        Commands::Increment { by } => {
            let app = app::open(&options)?;
            commands::counter::increment(&app, by)?;
        }
        Commands::Todo(TodoCommand::Add { text }) => {
            let app = app::open(&options)?;
            commands::todo::add(&app, &text)?;
        }
        Commands::Todo(TodoCommand::Toggle { id }) => {
            let app = app::open(&options)?;
            commands::todo::toggle(&app, id)?;
        }
        Commands::Todo(TodoCommand::List) => {
            let app = app::open(&options)?;
            commands::todo::list(&app);
        }
        Commands::Reset => {
            app::reset(&options)?;
        }
        Commands::Version => {
            println!("fieldsync demo v{}", env!("CARGO_PKG_VERSION"));
            println!("fieldsync core v{}", fieldsync_core::VERSION);
        }
    }

    Ok(())
}
