//! Dumps information on a solver listing: its solves, their status, and the
//! equation and variable records within. Can also run a query on them.

#![allow(clippy::needless_return)] // i'll never forgive rust for this
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{LevelFilter, info, error};
use lst::prelude::*;
use serde::Serialize;

/// The ways we can print things out.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "snake_case")]
enum Format {
  /// Human-readable summary, through the logger.
  Summary,
  /// The parsed structure (or the query results) as JSON.
  Json,
  /// One CSV record per equation/variable row.
  Csv
}

/// The arguments passed to the program.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
  /// Output extra/debug info while parsing.
  #[arg(short, long)]
  verbose: bool,
  /// Output format.
  #[arg(short, long, value_enum, default_value = "summary")]
  format: Format,
  /// Only output rows of this symbol (case-insensitive).
  #[arg(short, long)]
  symbol: Option<String>,
  /// Domain filter for the symbol, one label per index position. Can be
  /// specified more than once, or comma-separated. Use "*" or leave a
  /// position empty to match anything there.
  #[arg(short, long, num_args = 0.., value_delimiter = ',')]
  domain: Vec<String>,
  /// Only look at this solve (0-based).
  #[arg(short = 'n', long)]
  solve: Option<usize>,
  /// Column layout detection settings.
  #[command(flatten)]
  layout: LayoutSettings,
  /// File path (set to "-" to read from standard input).
  file: PathBuf
}

impl Cli {
  /// Builds the domain filter from the arguments.
  fn domain_filter(&self) -> DomainFilter {
    return self.domain.iter().fold(DomainFilter::new(), |f, label| {
      match label.trim() {
        "" | "*" => f.any(),
        l => f.exact(l)
      }
    });
  }
}

/// A flattened record, for CSV output.
#[derive(Serialize)]
struct CsvRow<'r> {
  /// The solve the record came from.
  solve: usize,
  /// The symbol name.
  name: &'r str,
  /// The domain, dot-separated.
  domain: String,
  /// The lower bound.
  lower: f64,
  /// The level.
  level: f64,
  /// The upper bound.
  upper: f64,
  /// The marginal.
  marginal: f64,
  /// The symbol description.
  description: &'r str
}

impl<'r> CsvRow<'r> {
  /// Flattens a record.
  fn new(solve: usize, record: &'r Record) -> Self {
    return Self {
      solve,
      name: &record.name,
      domain: record.domain.join("."),
      lower: record.lower,
      level: record.level,
      upper: record.upper,
      marginal: record.marginal,
      description: &record.description
    };
  }
}

/// A record selected for output, with the solve it came from.
#[derive(Serialize)]
struct Selected<'r> {
  /// The solve index.
  solve: usize,
  /// The record.
  #[serde(flatten)]
  record: &'r Record
}

/// Indentation for the summary.
const INDENT: &str = "  ";

/// Runs the query in the arguments, solve by solve.
fn select<'l>(
  args: &Cli,
  listing: &'l ParsedListing,
  symbol: &str
) -> Result<Vec<Selected<'l>>, QueryError> {
  let filter = args.domain_filter();
  let solves = match args.solve {
    Some(i) => vec![i],
    None => (0..listing.solves.len()).collect()
  };
  let mut selected = Vec::new();
  for solve in solves {
    for record in listing.get(symbol, filter.clone(), Some(solve))? {
      selected.push(Selected { solve, record });
    }
  }
  return Ok(selected);
}

/// Returns every record in the listing, or only those of a solve.
fn everything<'l>(
  args: &Cli,
  listing: &'l ParsedListing
) -> Result<Vec<Selected<'l>>, QueryError> {
  if let Some(i) = args.solve {
    let solve = listing.solves.get(i).ok_or(QueryError::NoSuchSolve {
      requested: i,
      available: listing.solves.len()
    })?;
    return Ok(solve.records().map(|record| Selected { solve: i, record })
      .collect());
  }
  return Ok(
    listing.solves.iter()
      .enumerate()
      .flat_map(|(solve, s)| s.records().map(move |record| {
        Selected { solve, record }
      }))
      .collect()
  );
}

/// Logs a summary of the listing.
fn print_summary(listing: &ParsedListing) {
  info!("Found {} solve(s).", listing.solves.len());
  for (i, solve) in listing.solves.iter().enumerate() {
    let line = solve.line.map_or("unknown".to_string(), |l| l.to_string());
    info!("{}- Solve {} (from line {}):", INDENT, i, line);
    info!("{}{}- objective value: {}", INDENT, INDENT, solve.objective);
    info!("{}{}- model status: {}", INDENT, INDENT, solve.model_status);
    info!("{}{}- solver status: {}", INDENT, INDENT, solve.solver_status);
    info!(
      "{}{}- {} equation rows, {} variable rows",
      INDENT,
      INDENT,
      solve.equations.len(),
      solve.variables.len()
    );
  }
  let names = listing.symbol_names();
  if names.is_empty() {
    info!("No symbols found.");
  } else {
    let names = names.into_iter().collect::<Vec<_>>();
    info!("Symbols: {}", names.join(", "));
  }
}

/// Logs selected records.
fn print_records(selected: &[Selected]) {
  if selected.is_empty() {
    info!("No matching rows.");
    return;
  }
  for Selected { solve, record } in selected {
    info!(
      "{}- [{}] {}: lower {}, level {}, upper {}, marginal {}",
      INDENT,
      solve,
      record,
      record.lower,
      record.level,
      record.upper,
      record.marginal
    );
  }
}

/// Writes selected records as CSV.
fn write_csv<W: Write>(out: W, selected: &[Selected]) -> csv::Result<()> {
  let mut writer = csv::Writer::from_writer(out);
  for Selected { solve, record } in selected {
    writer.serialize(CsvRow::new(*solve, record))?;
  }
  writer.flush()?;
  return Ok(());
}

/// Parses the listing and prints what was asked for.
fn run(args: &Cli) -> Result<(), Box<dyn Error>> {
  let parser = ListingParser::new(args.layout);
  let listing = if args.file.as_os_str().eq_ignore_ascii_case("-") {
    parser.parse_reader(io::stdin().lock())?
  } else if args.file.is_file() {
    if let Some(name) = args.file.file_name().and_then(|n| n.to_str()) {
      info!("Parsing {}...", name);
    }
    parser.parse_file(&args.file)?
  } else {
    return Err("provided path either does not exist or is not a file".into());
  };
  info!("Done parsing.");
  let selected = match &args.symbol {
    Some(symbol) => Some(select(args, &listing, symbol)?),
    None if args.solve.is_some() => Some(everything(args, &listing)?),
    None => None
  };
  let stdout = io::stdout();
  let mut out = BufWriter::new(stdout.lock());
  match (args.format, selected) {
    (Format::Summary, None) => print_summary(&listing),
    (Format::Summary, Some(sel)) => print_records(&sel),
    (Format::Json, None) => serde_json::to_writer_pretty(&mut out, &listing)?,
    (Format::Json, Some(sel)) => serde_json::to_writer_pretty(&mut out, &sel)?,
    (Format::Csv, None) => write_csv(&mut out, &everything(args, &listing)?)?,
    (Format::Csv, Some(sel)) => write_csv(&mut out, &sel)?
  }
  if args.format == Format::Json {
    writeln!(out)?;
  }
  out.flush()?;
  return Ok(());
}

fn main() {
  let args = Cli::parse();
  let log_level = if args.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  };
  env_logger::builder().filter_level(log_level).init();
  if let Err(e) = run(&args) {
    error!("{}", e);
    std::process::exit(1);
  }
}
