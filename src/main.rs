use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "tagwatch")]
#[command(about = "Check whether a repository's latest tag matches its default branch")]
#[command(version)]
struct Cli {
    /// Log cache and network decisions (same as RUST_LOG=tagwatch=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the latest tag of a repository and how far the default branch has moved past it
    Status {
        /// Repository as owner/name
        repo: String,
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the on-disk cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Remove every cached entry
    Clear,
    /// Print the cache directory
    Path,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        EnvFilter::new("tagwatch=debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Status { repo, json } => cli::status::run(repo, json).await,
        Commands::Cache { command } => match command {
            CacheCommands::Clear => cli::cache::clear().await,
            CacheCommands::Path => cli::cache::path(),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "\n{}",
                tagwatch::core::error_help::format_error_with_help(&e)
            );
            ExitCode::FAILURE
        }
    }
}
