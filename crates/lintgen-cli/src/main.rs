//! lintgen CLI tool.
//!
//! Usage:
//! ```bash
//! lintgen generate [OPTIONS] [PATH]
//! lintgen init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod config_resolver;

/// Converts natural-language coding rules into an ESLint flat config
#[derive(Parser)]
#[command(name = "lintgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the ESLint config from a rules file
    Generate {
        /// Rules file to read
        #[arg(default_value = ".cursorrules")]
        path: PathBuf,

        /// Output file (default: eslint.config.mjs in the parent directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Capability provider (openai, anthropic, google, ollama, ...)
        #[arg(long)]
        provider: Option<String>,

        /// Model identifier for the provider
        #[arg(long)]
        model: Option<String>,

        /// API key for the capability provider
        #[arg(long, env = "LINTGEN_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Maximum in-flight extraction requests
        #[arg(long)]
        concurrency: Option<usize>,

        /// Overall extraction deadline in seconds
        #[arg(long)]
        deadline: Option<u64>,
    },

    /// Create a starter rules file and bootstrap ignores
    Init {
        /// Overwrite an existing rules file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Generate {
            path,
            out,
            provider,
            model,
            api_key,
            concurrency,
            deadline,
        } => {
            commands::generate::run(
                commands::generate::GenerateArgs {
                    path,
                    out,
                    provider,
                    model,
                    api_key,
                    concurrency,
                    deadline,
                },
                cli.config.as_deref(),
            )
            .await
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
