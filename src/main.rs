use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use automata_minimize::prelude::*;

use owo_colors::OwoColorize;
use tracing::{debug, info, trace, warn};
use tracing_subscriber::{filter, prelude::*};

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("automata-minimize")
        .about("Minimizes a deterministic finite automaton given in the text format")
        .arg(
            Arg::new("input")
                .help("file to read the automaton from, stdin if omitted")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("file to write the minimized automaton to, stdout if omitted")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("algorithm")
                .long("algorithm")
                .value_parser(["valmari", "moore"])
                .default_value("valmari"),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .help("print the transition table instead of the text format")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["info", "debug", "trace"])
                .default_missing_value("info"),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("could not write automaton: {0}")]
    Write(#[from] std::io::Error),
}

/// How the minimized automaton is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Table,
}

/// Reads an automaton from `input`, minimizes it with `algorithm` and writes the result
/// to `output`.
fn minimize_stream<R: Read, W: Write>(
    input: R,
    mut output: W,
    algorithm: &str,
    format: OutputFormat,
) -> Result<(), CliError> {
    let dfa = read_dfa(input)?;
    info!(
        "read automaton with {} states and {} transitions",
        dfa.state_count(),
        dfa.transitions().len()
    );
    if !dfa.is_deterministic() {
        warn!("input automaton is not deterministic, the result may be wrong");
    }

    let start = std::time::Instant::now();
    let minimized = match algorithm {
        "moore" => moore::minimize(&dfa),
        _ => dfa.minimize(),
    };
    info!(
        "{algorithm} minimization to {} states and {} transitions took {}µs",
        minimized.state_count(),
        minimized.transitions().len(),
        start.elapsed().as_micros()
    );

    match format {
        OutputFormat::Text => write_dfa(&minimized, &mut output)?,
        OutputFormat::Table => writeln!(output, "{}", minimized.transition_table())?,
    }
    output.flush()?;
    Ok(())
}

fn open(path: &Path) -> Result<File, CliError> {
    File::open(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn create(path: &Path) -> Result<File, CliError> {
    File::create(path).map_err(|source| CliError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn run(matches: &ArgMatches) -> Result<(), CliError> {
    let algorithm = matches
        .get_one::<String>("algorithm")
        .map_or("valmari", String::as_str);
    let format = if matches.get_flag("table") {
        OutputFormat::Table
    } else {
        OutputFormat::Text
    };

    let input: Box<dyn Read> = match matches.get_one::<PathBuf>("input") {
        Some(path) => {
            debug!("reading automaton from {}", path.display());
            Box::new(BufReader::new(open(path)?))
        }
        None => {
            debug!("reading automaton from stdin");
            Box::new(std::io::stdin().lock())
        }
    };
    let output: Box<dyn Write> = match matches.get_one::<PathBuf>("output") {
        Some(path) => Box::new(BufWriter::new(create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };
    minimize_stream(input, output, algorithm, format)
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{} {error}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
