//! Blueprint module file tool
//!
//! Checks `.bp` files for syntax errors and dumps what the parser sees:
//! tokens, the concrete syntax tree, and the modules a file defines.
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use std::path::PathBuf;
use std::process::ExitCode;

use blueprint_cli::commands::{check, modules, tokens, tree};
use blueprint_cli::{resolve_color_choice, Format};
use blueprint_parser::config::DEFAULT_MAX_DEPTH;
use blueprint_parser::ParserConfig;
use clap::{Parser, Subcommand};
use termcolor::StandardStream;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bp")]
#[command(about = "Blueprint module file checker", long_about = None)]
#[command(version)]
struct Cli {
    /// When to color output
    #[arg(long, global = true, value_parser = ["auto", "always", "never"])]
    color: Option<String>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = Format::Pretty)]
    format: Format,

    /// Deepest nesting of objects and arrays before the rest is skipped
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse files and report syntax errors
    Check {
        /// Files or directories to check
        #[arg(default_value = ".")]
        paths: Vec<String>,
    },

    /// Print the token stream of a file
    Tokens {
        /// Input file
        file: PathBuf,
    },

    /// Print the concrete syntax tree of a file
    Tree {
        /// Input file
        file: PathBuf,
    },

    /// List module types and names
    Modules {
        /// Files or directories to index
        #[arg(default_value = ".")]
        paths: Vec<String>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging();

    let cli = Cli::parse();
    let color = resolve_color_choice(cli.color.as_deref());
    let config = ParserConfig::default().with_max_depth(cli.max_depth);
    let mut stdout = StandardStream::stdout(color);

    match cli.command {
        Commands::Check { paths } => {
            let mut stderr = StandardStream::stderr(color);
            let summary = check::execute(&paths, &config, cli.format, &mut stdout, &mut stderr)?;
            if !summary.is_clean() {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Tokens { file } => tokens::execute(&file, cli.format, &mut stdout)?,

        Commands::Tree { file } => tree::execute(&file, &config, cli.format, &mut stdout)?,

        Commands::Modules { paths } => modules::execute(&paths, &config, cli.format, &mut stdout)?,
    }

    Ok(ExitCode::SUCCESS)
}
