//! This module splits a listing into solves and reads the solve summary at
//! the top of each one.

use log::debug;
use serde::{Serialize, Deserialize};

use crate::layout::ColumnWidths;
use crate::parser::ParseError;
use crate::symbols::{extract_symbols, Record, SymbolKind};
use crate::util::*;

/// The first half of the page header that opens a solution report.
const REPORT_MARKER: &str = "Solution Report";

/// The second half, after optional whitespace.
const SOLVE_MARKER: &str = "SOLVE";

/// Marks the objective value line in the solve summary.
const OBJECTIVE_MARKER: &str = "OBJECTIVE VALUE";

/// Where the objective value starts, relative to its marker.
const OBJECTIVE_OFFSET: usize = 15;

/// Marks the model status line in the solve summary.
const MODEL_STATUS_MARKER: &str = "MODEL STATUS";

/// Marks the solver status line in the solve summary.
const SOLVER_STATUS_MARKER: &str = "SOLVER STATUS";

/// Where status codes start, relative to their markers.
const STATUS_OFFSET: usize = 18;

/// Status codes are this many characters wide.
const STATUS_WIDTH: usize = 2;

/// Finds every solve delimiter in a listing: "Solution Report", whitespace,
/// "SOLVE". Returns (start, end) byte ranges.
fn find_delimiters(listing: &str) -> Vec<(usize, usize)> {
  let mut found = Vec::new();
  for (start, _) in listing.match_indices(REPORT_MARKER) {
    let after = &listing[start + REPORT_MARKER.len()..];
    let rest = after.trim_start();
    if rest.starts_with(SOLVE_MARKER) {
      let end = listing.len() - rest.len() + SOLVE_MARKER.len();
      found.push((start, end));
    }
  }
  return found;
}

/// Splits a listing into solve sections, dropping whatever comes before the
/// first one. A listing without any solves most likely failed to compile.
pub fn split_solves(listing: &str) -> Result<Vec<&str>, ParseError> {
  let delimiters = find_delimiters(listing);
  if delimiters.is_empty() {
    return Err(ParseError::NoSolves);
  }
  let ends = delimiters.iter()
    .skip(1)
    .map(|(start, _)| *start)
    .chain(std::iter::once(listing.len()));
  return Ok(
    delimiters.iter()
      .zip(ends)
      .map(|((_, end), next)| &listing[*end..next])
      .collect()
  );
}

/// Returns the text starting `offset` characters after the first occurrence
/// of `marker`.
fn after_marker<'s>(
  section: &'s str,
  marker: &str,
  offset: usize
) -> Option<&'s str> {
  let start = section.find(marker)?;
  let tail = &section[start..];
  let from = tail.char_indices().nth(offset).map(|(i, _)| i)?;
  return Some(&tail[from..]);
}

/// Reads the objective value of a solve. NaN if there's none.
pub fn read_objective(section: &str) -> f64 {
  return after_marker(section, OBJECTIVE_MARKER, OBJECTIVE_OFFSET)
    .map(|s| s.split('\n').next().unwrap_or(""))
    .and_then(decode_leading_float)
    .unwrap_or(f64::NAN);
}

/// Reads a fixed-width status code that comes after a marker.
fn read_status(section: &str, marker: &str) -> f64 {
  return after_marker(section, marker, STATUS_OFFSET)
    .map(|s| s.chars().take(STATUS_WIDTH).collect::<String>())
    .and_then(|s| decode_leading_float(&s))
    .unwrap_or(f64::NAN);
}

/// Reads the model status code of a solve. NaN if there's none.
pub fn read_model_status(section: &str) -> f64 {
  return read_status(section, MODEL_STATUS_MARKER);
}

/// Reads the solver status code of a solve. NaN if there's none.
pub fn read_solver_status(section: &str) -> f64 {
  return read_status(section, SOLVER_STATUS_MARKER);
}

/// Reads the number that ends the first line of a solve section (the source
/// line of the solve statement, in most solvers).
pub fn read_solve_line(section: &str) -> Option<usize> {
  let first = split_lines(section).into_iter().next()?;
  return split_tokens(first).last()?.parse().ok();
}

/// The data for a single solve.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolveResult {
  /// The objective value.
  pub objective: f64,
  /// The number at the end of the report header line.
  pub line: Option<usize>,
  /// The raw model status code.
  pub model_status: f64,
  /// The raw solver status code.
  pub solver_status: f64,
  /// Equation records, in listing order.
  pub equations: Vec<Record>,
  /// Variable records, in listing order.
  pub variables: Vec<Record>
}

impl SolveResult {
  /// Decodes a solve section with a known column layout.
  pub fn from_section(section: &str, widths: &ColumnWidths) -> Self {
    let solve = Self {
      objective: read_objective(section),
      line: read_solve_line(section),
      model_status: read_model_status(section),
      solver_status: read_solver_status(section),
      equations: extract_symbols(section, SymbolKind::Equation, widths),
      variables: extract_symbols(section, SymbolKind::Variable, widths)
    };
    debug!(
      "Solve from line {:?}: objective {}, model status {}, {} equation and \
      {} variable records.",
      solve.line,
      solve.objective,
      solve.model_status,
      solve.equations.len(),
      solve.variables.len()
    );
    return solve;
  }

  /// Iterates over equations, then variables.
  pub fn records(&self) -> impl Iterator<Item = &Record> {
    return self.equations.iter().chain(self.variables.iter());
  }
}
