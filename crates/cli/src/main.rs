mod commands;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use regionator_core::{FieldTranslationTable, RegionError};
use tracing_subscriber::EnvFilter;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Region Definition Language to region JSON converter.
#[derive(Parser)]
#[command(
    name = "regionator",
    version,
    about = "Region Definition Language to region JSON converter"
)]
struct Cli {
    /// Output format for reports and errors (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log pipeline details to stderr
    #[arg(long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert .rdl files to region JSON
    Convert {
        /// Paths to the .rdl source files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Mod index (YAML or JSON); defaults to ./mod_index.yml when present
        #[arg(long)]
        mod_index: Option<PathBuf>,
        /// Directory to write <region>.json files into (required for several inputs)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Seed for generated mod identities, for reproducible output
        #[arg(long)]
        seed: Option<u64>,
        /// Emit compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Run the full conversion without writing output
    Check {
        /// Paths to the .rdl source files
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Mod index (YAML or JSON); defaults to ./mod_index.yml when present
        #[arg(long)]
        mod_index: Option<PathBuf>,
    },

    /// Validate a generated record array against the record schema
    Validate {
        /// Path to the region JSON file
        file: PathBuf,
    },
}

const DEFAULT_MOD_INDEX: &str = "mod_index.yml";

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Convert {
            files,
            mod_index,
            out,
            seed,
            compact,
        } => {
            let table = load_mod_index(mod_index.as_deref(), cli.output, cli.quiet);
            commands::convert::cmd_convert(
                &files,
                &table,
                commands::convert::ConvertOptions {
                    out: out.as_deref(),
                    seed,
                    compact,
                    output: cli.output,
                    quiet: cli.quiet,
                },
            );
        }
        Commands::Check { files, mod_index } => {
            let table = load_mod_index(mod_index.as_deref(), cli.output, cli.quiet);
            commands::check::cmd_check(&files, &table, cli.output, cli.quiet);
        }
        Commands::Validate { file } => {
            commands::validate::cmd_validate(&file, cli.output, cli.quiet);
        }
    }
}

/// Resolve the mod index: an explicit path must load; the default path is
/// optional and falls back to an empty table.
fn load_mod_index(explicit: Option<&Path>, output: OutputFormat, quiet: bool) -> FieldTranslationTable {
    let result = match explicit {
        Some(path) => FieldTranslationTable::load(path),
        None => {
            let default = Path::new(DEFAULT_MOD_INDEX);
            if default.exists() {
                FieldTranslationTable::load(default)
            } else {
                tracing::warn!(
                    "no {} found; additional mod parameters will be dropped",
                    DEFAULT_MOD_INDEX
                );
                Ok(FieldTranslationTable::new())
            }
        }
    };
    match result {
        Ok(table) => table,
        Err(e) => {
            report_region_error(&e, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}

/// JSON reports are written even under `--quiet`; text reports are not.
pub(crate) fn report_region_error(e: &RegionError, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            let err_json = serde_json::to_string_pretty(&e.to_json_value())
                .unwrap_or_else(|_| format!("{{\"error\": \"{:?}\"}}", e));
            eprintln!("{}", err_json);
        }
        OutputFormat::Text => {
            if !quiet {
                eprintln!("error: {}", e);
            }
        }
    }
}
