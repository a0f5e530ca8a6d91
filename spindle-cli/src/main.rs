//! Spindle CLI - run demo programs on the lazy-evaluation engine.

mod commands;
mod programs;

use clap::{Parser, Subcommand};

/// Main CLI structure.
#[derive(Parser)]
#[command(name = "spindle")]
#[command(author, version, about = "Spindle - a lazy call-by-need evaluation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print every scheduler step while forcing.
    #[arg(short, long, global = true)]
    trace: bool,

    /// Abort after this many force iterations, returning the partial result.
    #[arg(short, long, global = true)]
    limit: Option<usize>,
}

/// Available CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Force a built-in demo program to a value.
    Run {
        /// Name of the program (see `spindle list`).
        program: String,
    },

    /// List the built-in demo programs.
    List,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { program } => commands::run::run(&program, cli.trace, cli.limit),
        Commands::List => commands::run::list(),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
