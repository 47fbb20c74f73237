//! CLI tool for transactional batch editing of zip archives.

mod commands;
mod exit_codes;
mod progress;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Transactional batch editor for zip archives
#[derive(Parser)]
#[command(name = "ziped")]
#[command(author, version, about = "Transactional batch editor for zip archives", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Target filename pattern (wildcard; `*` stays within one directory, `**` crosses)
    #[arg(long, global = true)]
    filter: Option<String>,

    /// Target filename pattern (regular expression; takes precedence over --filter)
    #[arg(long, global = true)]
    regexp: Option<String>,

    /// Fallback encoding label for non-UTF-8 entry names
    #[arg(long, global = true, default_value = "windows-1252")]
    encoding: String,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show file list
    Ls {
        /// Archive files to list (wildcards supported)
        #[arg(required = true)]
        archives: Vec<PathBuf>,
    },

    /// Remove entries from archives
    Rm {
        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        batch: BatchArgs,

        /// Archive files to edit (wildcards supported)
        #[arg(required = true)]
        archives: Vec<PathBuf>,
    },

    /// Rename entries inside archives
    Rename {
        /// Text before replacement
        #[arg(long)]
        from: String,

        /// Text after replacement
        #[arg(long)]
        to: String,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        batch: BatchArgs,

        /// Archive files to edit (wildcards supported)
        #[arg(required = true)]
        archives: Vec<PathBuf>,
    },

    /// Convert entry contents through an external command
    Convert {
        /// Convert command, tokenized with shell-style quoting
        #[arg(long)]
        cmd: String,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        batch: BatchArgs,

        /// Archive files to edit (wildcards supported)
        #[arg(required = true)]
        archives: Vec<PathBuf>,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Overwrite the source file in place (atomic swap)
    #[arg(long)]
    overwrite: bool,

    /// Output file name; created exclusively, single input only
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args)]
struct BatchArgs {
    /// Parallel job number
    #[arg(long, default_value = "1")]
    jobs: usize,
}

fn main() {
    // Set up Ctrl+C handler
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = Cli::parse();

    let common = commands::CommonConfig {
        filter: cli.filter.as_deref(),
        regexp: cli.regexp.as_deref(),
        encoding: &cli.encoding,
        quiet: cli.quiet,
    };

    let exit_code = match &cli.command {
        Commands::Ls { archives } => commands::list(&common, archives),

        Commands::Rm {
            output,
            batch,
            archives,
        } => commands::remove(
            &commands::EditConfig {
                common,
                overwrite: output.overwrite,
                out: output.out.as_deref(),
                jobs: batch.jobs,
            },
            archives,
        ),

        Commands::Rename {
            from,
            to,
            output,
            batch,
            archives,
        } => commands::rename(
            &commands::EditConfig {
                common,
                overwrite: output.overwrite,
                out: output.out.as_deref(),
                jobs: batch.jobs,
            },
            archives,
            from,
            to,
        ),

        Commands::Convert {
            cmd,
            output,
            batch,
            archives,
        } => commands::convert(
            &commands::EditConfig {
                common,
                overwrite: output.overwrite,
                out: output.out.as_deref(),
                jobs: batch.jobs,
            },
            archives,
            cmd,
        ),
    };

    std::process::exit(exit_code.code());
}
