//! odsheets CLI - OpenDocument Spreadsheet text extraction tool
//!
//! A command-line tool for dumping the text of ODS sheets as JSON or
//! delimited text.

use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use odsheets::render::{JsonFormat, TextOptions};
use odsheets::{ExtractOptions, OdsReader};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// OpenDocument Spreadsheet text extraction to JSON and plain text
#[derive(Parser)]
#[command(
    name = "odsheets",
    author = "iyulab",
    version,
    about = "Extract cell text from ODS spreadsheets",
    long_about = "odsheets - Simple tabular text extraction from OpenDocument Spreadsheets.\n\n\
                  Prints every sheet as a map of \"row,col\" to cell text."
)]
struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print sheets as JSON
    Json {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output compact JSON (no indentation)
        #[arg(long)]
        compact: bool,

        /// Copy text into every column of a repeated cell
        #[arg(long)]
        duplicate_repeated: bool,
    },

    /// Print sheets as delimited text
    Text {
        /// Input file path
        input: PathBuf,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column delimiter
        #[arg(short, long, default_value = "\t")]
        delimiter: String,

        /// Keep rows that have no cells
        #[arg(long)]
        keep_empty_rows: bool,

        /// Omit the [sheet] header lines
        #[arg(long)]
        no_headers: bool,

        /// Copy text into every column of a repeated cell
        #[arg(long)]
        duplicate_repeated: bool,
    },

    /// Show package information and sheet summary
    Info {
        /// Input file path
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_reader(input: &Path, duplicate_repeated: bool) -> OdsReader {
    info!(input = %input.display(), duplicate_repeated, "opening spreadsheet");
    OdsReader::open(input).with_options(
        ExtractOptions::new().with_duplicate_text_on_repeat(duplicate_repeated),
    )
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Json {
            input,
            output,
            compact,
            duplicate_repeated,
        } => {
            let pb = create_spinner("Reading spreadsheet...");

            let sheets = open_reader(&input, duplicate_repeated).clean_sheets()?;
            pb.set_message("Rendering to JSON...");

            let format = if compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            let json = odsheets::render::to_json(&sheets, format)?;

            pb.finish_and_clear();
            write_output(output.as_ref(), &json)?;

            if let Some(path) = output {
                println!("{} Converted to JSON: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Text {
            input,
            output,
            delimiter,
            keep_empty_rows,
            no_headers,
            duplicate_repeated,
        } => {
            let pb = create_spinner("Reading spreadsheet...");

            let sheets = open_reader(&input, duplicate_repeated).sheets()?;
            pb.set_message("Rendering to text...");

            let options = TextOptions::new()
                .with_delimiter(delimiter)
                .with_skip_empty_rows(!keep_empty_rows)
                .with_sheet_headers(!no_headers);
            let text = odsheets::render::to_text(&sheets, &options);

            pb.finish_and_clear();
            write_output(output.as_ref(), &text)?;

            if let Some(path) = output {
                println!("{} Converted to text: {}", "✓".green().bold(), path.display());
            }
        }

        Commands::Info { input } => {
            let pb = create_spinner("Analyzing spreadsheet...");

            let kind = odsheets::detect_kind_from_path(&input)?;
            let reader = OdsReader::open(&input);
            let members = reader.container().list_files()?.len();
            let sheets = reader.sheets()?;

            pb.finish_and_clear();

            println!("{}", "Spreadsheet Information".cyan().bold());
            println!("{}", "─".repeat(40));
            println!(
                "{}: {}",
                "File".bold(),
                input.file_name().unwrap_or_default().to_string_lossy()
            );
            println!("{}: {}", "Kind".bold(), kind);
            if !kind.is_spreadsheet() {
                println!(
                    "{} package does not declare spreadsheet content",
                    "!".yellow().bold()
                );
            }
            println!("{}: {}", "Members".bold(), members);
            println!("{}: {}", "Sheets".bold(), sheets.len());
            println!("{}: {}", "Cells".bold(), sheets.cell_count());

            println!("\n{}", "Sheets".cyan().bold());
            println!("{}", "─".repeat(40));
            for (name, table) in sheets.iter() {
                let extent = match (table.max_row(), table.max_col()) {
                    (Some(row), Some(col)) => format!("{} rows x {} cols", row + 1, col + 1),
                    _ => "empty".to_string(),
                };
                println!("{}: {} cells ({})", name.bold(), table.len(), extent);
            }
        }

        Commands::Version => {
            print_version();
        }
    }

    Ok(())
}

fn print_version() {
    println!("{} {}", "odsheets".green().bold(), env!("CARGO_PKG_VERSION"));
    println!("Simple tabular text extraction from OpenDocument Spreadsheets");
    println!();
    println!("Supported formats: ODS, OTS");
    println!("Repository: https://github.com/iyulab/odsheets");
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", content)?;
        }
    }
    Ok(())
}
