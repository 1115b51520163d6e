// tabcompare - keyed comparison of two versions of a table

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use log::{debug, info};

use tabcompare_cli::exit_codes::{EXIT_DIFFS, EXIT_SUCCESS};
use tabcompare_cli::load::{self, Format};
use tabcompare_cli::output;
use tabcompare_cli::CliError;
use tabcompare_engine::{compare, AlignmentMethod, ComparisonConfig};

#[derive(Parser)]
#[command(name = "tabcompare")]
#[command(about = "Compare two versions of a table row by row")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More logging on stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare table A (before) with table B (after)
    #[command(after_help = "\
Examples:
  tabcompare compare before.csv after.csv --key id
  tabcompare compare q1.csv q2.csv --key policy,coverage --sort-column date
  tabcompare compare old.json new.json --by-position --out csv
  cat before.csv | tabcompare compare - after.csv --key id --quiet
  tabcompare compare a.csv b.csv --config policy.toml --case-sensitive

Exit codes:
  0  no differences        3  key column missing    6  IO error
  1  differences found     4  invalid configuration
  2  usage error           5  input parse error")]
    Compare {
        /// Table A (file path, or - for stdin)
        a: String,

        /// Table B (file path, or - for stdin)
        b: String,

        /// Key column(s); repeat or comma-separate for a composite key
        #[arg(long, short = 'k', value_delimiter = ',')]
        key: Vec<String>,

        /// Key rows by their 1-based row number instead of key columns
        #[arg(long, conflicts_with = "key")]
        by_position: bool,

        /// How rows sharing a key are paired
        #[arg(long, value_name = "METHOD")]
        align: Option<AlignArg>,

        /// Sort each key group by this column before pairing (implies --align secondary-sort)
        #[arg(long, value_name = "COLUMN")]
        sort_column: Option<String>,

        /// Treat text differing only in letter case as different
        #[arg(long, overrides_with = "case_insensitive")]
        case_sensitive: bool,

        /// Fold letter case before comparing (the default; overrides the config file)
        #[arg(long, overrides_with = "case_sensitive")]
        case_insensitive: bool,

        /// Keep leading/trailing whitespace in text cells
        #[arg(long, overrides_with = "trim")]
        no_trim: bool,

        /// Trim leading/trailing whitespace (the default; overrides the config file)
        #[arg(long, overrides_with = "no_trim")]
        trim: bool,

        /// TOML configuration file; options on the command line override it
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, alias = "format", default_value = "json")]
        out: OutputFormat,

        /// Output file (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Summary output destination
        #[arg(long, default_value = "stderr")]
        summary: SummaryMode,

        /// Field delimiter for CSV/TSV input
        #[arg(long)]
        delimiter: Option<char>,

        /// Format for stdin when using - (inferred from the other file if omitted)
        #[arg(long, value_name = "FORMAT")]
        stdin_format: Option<Format>,

        /// Quiet mode - suppress the stderr summary
        #[arg(long, short = 'q')]
        quiet: bool,

        /// Exit 0 even when differences are found
        #[arg(long)]
        exit_zero: bool,
    },

    /// Parse and validate a TOML configuration file, then print it
    #[command(after_help = "\
Examples:
  tabcompare validate-config policy.toml
  tabcompare validate-config policy.toml --json")]
    ValidateConfig {
        /// Configuration file
        file: PathBuf,

        /// Print the effective configuration as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlignArg {
    Position,
    SecondarySort,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SummaryMode {
    None,
    Stderr,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\nengine:  tabcompare-engine ",
        env!("CARGO_PKG_VERSION"),
        "\ncontract_version(json): 1",
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Compare {
            a,
            b,
            key,
            by_position,
            align,
            sort_column,
            case_sensitive,
            case_insensitive,
            no_trim,
            trim,
            config,
            out,
            output,
            summary,
            delimiter,
            stdin_format,
            quiet,
            exit_zero,
        } => {
            let overrides = Overrides {
                key,
                by_position,
                align,
                sort_column,
                case_sensitive: flag_pair(case_sensitive, case_insensitive),
                trim_whitespace: flag_pair(trim, no_trim),
            };
            cmd_compare(
                a, b, overrides, config, out, output, summary, delimiter, stdin_format, quiet, exit_zero,
            )
        }
        Commands::ValidateConfig { file, json } => cmd_validate_config(file, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

// ============================================================================
// compare
// ============================================================================

/// Comparison settings given on the command line.
struct Overrides {
    key: Vec<String>,
    by_position: bool,
    align: Option<AlignArg>,
    sort_column: Option<String>,
    case_sensitive: Option<bool>,
    trim_whitespace: Option<bool>,
}

/// `Some(true)` / `Some(false)` when either flag of an on/off pair was given,
/// `None` to keep the config file's value.
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Overrides {
    /// Layer these settings over `base` (the config file, or defaults).
    fn apply(self, mut config: ComparisonConfig) -> ComparisonConfig {
        if !self.key.is_empty() {
            config.key_columns = self.key;
            config.by_position = false;
        }
        if self.by_position {
            config.key_columns.clear();
            config.by_position = true;
        }
        match self.align {
            Some(AlignArg::Position) => {
                config.alignment_method = AlignmentMethod::Position;
                config.secondary_sort_column = None;
            }
            Some(AlignArg::SecondarySort) => config.alignment_method = AlignmentMethod::SecondarySort,
            None => {}
        }
        if let Some(column) = self.sort_column {
            config.secondary_sort_column = Some(column);
            if self.align.is_none() {
                config.alignment_method = AlignmentMethod::SecondarySort;
            }
        }
        if let Some(case_sensitive) = self.case_sensitive {
            config.case_sensitive = case_sensitive;
        }
        if let Some(trim) = self.trim_whitespace {
            config.trim_whitespace = trim;
        }
        config
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_compare(
    a_arg: String,
    b_arg: String,
    overrides: Overrides,
    config_path: Option<PathBuf>,
    out: OutputFormat,
    output: Option<PathBuf>,
    summary_mode: SummaryMode,
    delimiter: Option<char>,
    stdin_format: Option<Format>,
    quiet: bool,
    exit_zero: bool,
) -> Result<(), CliError> {
    let a_is_stdin = a_arg == "-";
    let b_is_stdin = b_arg == "-";

    if a_is_stdin && b_is_stdin {
        return Err(CliError::args("cannot read both tables from stdin")
            .with_hint("provide at least one file path: tabcompare compare - after.csv --key id"));
    }

    let delimiter = match delimiter {
        Some(c) if c.is_ascii() => Some(c as u8),
        Some(c) => return Err(CliError::args(format!("delimiter must be a single ASCII character, got {:?}", c))),
        None => None,
    };

    // Configuration first: a bad config should fail before any input is read.
    let base = match &config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
            ComparisonConfig::parse_toml(&text).map_err(|e| {
                CliError::config(format!("{}: {}", path.display(), e))
            })?
        }
        None => ComparisonConfig::new(Vec::<String>::new()),
    };
    let config = overrides.apply(base);
    config.validate()?;
    debug!("effective configuration: {:?}", config);

    let a_path = if a_is_stdin { None } else { Some(PathBuf::from(&a_arg)) };
    let b_path = if b_is_stdin { None } else { Some(PathBuf::from(&b_arg)) };

    let resolve_stdin_format = |other_path: &Option<PathBuf>| -> Result<Format, CliError> {
        if let Some(fmt) = stdin_format {
            return Ok(fmt);
        }
        if let Some(ref p) = other_path {
            return load::infer_format(p);
        }
        Err(CliError::args("cannot infer stdin format")
            .with_hint("use --stdin-format to specify the format for stdin input"))
    };

    let (table_a, label_a) = match &a_path {
        None => (load::read_stdin(resolve_stdin_format(&b_path)?, delimiter)?, "stdin".to_string()),
        Some(p) => (load_file(p, delimiter)?, p.display().to_string()),
    };
    let (table_b, label_b) = match &b_path {
        None => (load::read_stdin(resolve_stdin_format(&a_path)?, delimiter)?, "stdin".to_string()),
        Some(p) => (load_file(p, delimiter)?, p.display().to_string()),
    };

    let result = compare(&table_a, &table_b, &config)?;
    info!(
        "compared {} ({} rows) with {} ({} rows)",
        label_a,
        table_a.len(),
        label_b,
        table_b.len()
    );

    let output_bytes = match out {
        OutputFormat::Json => output::format_json(&result)?,
        OutputFormat::Csv => output::format_csv(&result)?,
    };

    match output {
        Some(path) => {
            std::fs::write(&path, &output_bytes)
                .map_err(|e| CliError::io(format!("{}: {}", path.display(), e)))?;
        }
        None => {
            io::stdout()
                .write_all(&output_bytes)
                .map_err(|e| CliError::io(e.to_string()))?;
        }
    }

    if !quiet && summary_mode == SummaryMode::Stderr {
        eprint!("{}", output::format_summary(&result, &label_a, &label_b));
    }

    // Like diff(1): exit 1 means "tables differ".
    if result.summary.has_differences() && !exit_zero {
        return Err(CliError::exit(EXIT_DIFFS));
    }

    Ok(())
}

fn load_file(path: &Path, delimiter: Option<u8>) -> Result<tabcompare_engine::Table, CliError> {
    let format = load::infer_format(path)?;
    load::read_file(path, format, delimiter)
}

// ============================================================================
// validate-config
// ============================================================================

fn cmd_validate_config(file: PathBuf, json: bool) -> Result<(), CliError> {
    let text = std::fs::read_to_string(&file)
        .map_err(|e| CliError::io(format!("{}: {}", file.display(), e)))?;
    let config = ComparisonConfig::from_toml(&text).map_err(|e| {
        let err = CliError::from(e);
        CliError { message: format!("{}: {}", file.display(), err.message), ..err }
    })?;

    let rendered = if json {
        let mut s = serde_json::to_string_pretty(&config).map_err(|e| CliError::io(e.to_string()))?;
        s.push('\n');
        s
    } else {
        config.to_toml()?
    };

    io::stdout()
        .write_all(rendered.as_bytes())
        .map_err(|e| CliError::io(e.to_string()))?;
    Ok(())
}
