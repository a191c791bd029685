//! The `huffpack` command-line tool.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use log::LevelFilter;

use huffpack::types::code_to_string;
use huffpack::{CodecConfig, HeaderFormat, HuffError, InputStrategy};

/// Static Huffman compression for arbitrary files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compress INPUT into OUTPUT
    Compress {
        input: PathBuf,
        output: PathBuf,

        /// Write the separator-framed legacy layout
        #[arg(long)]
        legacy: bool,

        /// Read the whole input into memory instead of scanning it twice
        #[arg(long)]
        buffered: bool,

        /// JSON file with a CodecConfig; the flags above override it
        #[arg(long, value_name = "JSON")]
        config: Option<PathBuf>,
    },
    /// Decompress INPUT into OUTPUT
    Decompress { input: PathBuf, output: PathBuf },
    /// Print the container header and code table of INPUT
    Inspect { input: PathBuf },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    // RUST_LOG, when set, wins over -v.
    builder.parse_default_env();
    builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));
    let _ = builder.try_init();
}

fn run(cli: Cli) -> Result<(), HuffError> {
    match cli.command {
        Command::Compress {
            input,
            output,
            legacy,
            buffered,
            config,
        } => {
            let mut config = match config {
                Some(path) => CodecConfig::from_json_file(&path)?,
                None => CodecConfig::default(),
            };
            if legacy {
                config.header_format = HeaderFormat::Legacy;
            }
            if buffered {
                config.input_strategy = InputStrategy::Buffered;
            }

            let stats = huffpack::compress(&input, &output, &config)?;
            let ratio = stats
                .ratio()
                .map_or_else(|| "n/a".to_string(), |r| format!("{:.1}%", r * 100.0));
            println!(
                "{} {} -> {} ({} -> {} bytes, {})",
                "compressed".green().bold(),
                input.display(),
                output.display(),
                stats.input_size,
                stats.total_size,
                ratio
            );
        }
        Command::Decompress { input, output } => {
            let stats = huffpack::decompress(&input, &output)?;
            println!(
                "{} {} -> {} ({} -> {} bytes)",
                "decompressed".green().bold(),
                input.display(),
                output.display(),
                stats.input_size,
                stats.output_size
            );
        }
        Command::Inspect { input } => print_header(&input)?,
    }
    Ok(())
}

fn print_header(input: &Path) -> Result<(), HuffError> {
    let bytes = fs::read(input).map_err(|e| HuffError::Open {
        path: input.to_path_buf(),
        source: e,
    })?;
    let info = huffpack::inspect(&bytes)?;

    let stdout = io::stdout();
    let mut handle = io::BufWriter::new(stdout.lock());
    writeln!(handle, "{}", input.display().to_string().bold())?;
    writeln!(handle, "\tFormat: {:?}", info.format)?;
    if let Some(version) = info.format_version {
        writeln!(handle, "\tVersion: {}", version)?;
    }
    writeln!(handle, "\tHeader size: {}", info.header_size)?;
    writeln!(handle, "\tPayload size: {}", info.payload_size)?;
    writeln!(handle, "Code table ({} symbols)", info.code_table.len())?;
    for (symbol, code) in &info.code_table {
        writeln!(handle, "\t{:<14} {}", symbol.to_string(), code_to_string(code))?;
    }
    handle.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
