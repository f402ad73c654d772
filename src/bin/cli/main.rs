//! CLI tool for zipsession archive operations.

mod commands;
mod exit_codes;
mod file_selector;
mod output;
mod password;
mod progress;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;

use exit_codes::ExitCode;
use zipsession::{DiagnosticSink, NoDiagnostics, sink_fn};

/// ZIP archive tool with AES-256 encryption
#[derive(Parser)]
#[command(name = "zipsession")]
#[command(author, version, about = "ZIP archive tool with AES-256 encryption", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Report every failed operation on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an archive from a directory (alias: a)
    #[command(alias = "a")]
    Create {
        /// Archive file to create (must not exist)
        archive: PathBuf,

        /// Directory whose files are added
        directory: PathBuf,

        /// Compression method
        #[arg(short = 'm', long, value_enum, default_value = "deflate")]
        method: CompressionMethod,

        /// Compression level (0-9)
        #[arg(short = 'l', long)]
        level: Option<u32>,

        /// Encrypt every entry with AES-256 under this password
        #[arg(short = 'p', long, conflicts_with = "prompt_password")]
        password: Option<String>,

        /// Prompt for the encryption password
        #[arg(long)]
        prompt_password: bool,

        /// Keep the directory's own name as the first path component
        #[arg(long)]
        with_root: bool,

        /// Exclude patterns, matched against entry names
        #[arg(short = 'x', long)]
        exclude: Vec<String>,
    },

    /// Extract files from an archive (alias: x)
    #[command(alias = "x")]
    Extract {
        /// Archive file to extract
        archive: PathBuf,

        /// Output directory
        #[arg(short = 'o', long, default_value = ".")]
        output: PathBuf,

        /// Entry patterns to extract (glob patterns supported)
        #[arg(short = 'i', long)]
        include: Vec<String>,

        /// Entry patterns to exclude
        #[arg(short = 'e', long)]
        exclude: Vec<String>,

        /// Leave files that already exist untouched
        #[arg(long)]
        skip_existing: bool,

        /// Password for encrypted entries
        #[arg(short = 'p', long, conflicts_with = "prompt_password")]
        password: Option<String>,

        /// Prompt for the password
        #[arg(long)]
        prompt_password: bool,
    },

    /// List archive contents (alias: l)
    #[command(alias = "l")]
    List {
        /// Archive file to list
        archive: PathBuf,

        /// Password (listing does not need one)
        #[arg(short = 'p', long)]
        password: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum CompressionMethod {
    Store,
    Deflate,
    Bzip2,
    Zstd,
}

/// Routes session failures to stderr when verbose, otherwise drops them.
fn diagnostics(verbose: bool) -> Box<dyn DiagnosticSink> {
    if verbose {
        Box::new(sink_fn(|operation, error| {
            match error.codec_failure() {
                Some(failure) => eprintln!("zipsession: {} failed [{}]: {}", operation, failure, error),
                None => eprintln!("zipsession: {} failed: {}", operation, error),
            }
        }))
    } else {
        Box::new(NoDiagnostics)
    }
}

fn main() {
    ctrlc::set_handler(move || {
        eprintln!("\nInterrupted");
        std::process::exit(exit_codes::USER_INTERRUPT);
    })
    .ok();

    let cli = Cli::parse();
    let sink = diagnostics(cli.verbose);

    let exit_code = match cli.command {
        Commands::Create {
            archive,
            directory,
            method,
            level,
            password,
            prompt_password,
            with_root,
            exclude,
        } => commands::create(
            &commands::CreateConfig {
                archive_path: &archive,
                source_dir: &directory,
                method,
                level,
                password,
                prompt_password,
                with_root,
                exclude: &exclude,
                format: cli.format,
                quiet: cli.quiet,
            },
            sink,
        ),

        Commands::Extract {
            archive,
            output,
            include,
            exclude,
            skip_existing,
            password,
            prompt_password,
        } => commands::extract(
            &commands::ExtractConfig {
                archive_path: &archive,
                output_dir: &output,
                include: &include,
                exclude: &exclude,
                skip_existing,
                password,
                prompt_password,
                format: cli.format,
                quiet: cli.quiet,
            },
            sink,
        ),

        Commands::List { archive, password } => {
            commands::list(&archive, password, cli.format, sink)
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
