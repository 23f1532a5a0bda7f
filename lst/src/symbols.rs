//! This module implements the decoding of symbol blocks, i.e. the
//! `---- EQU name` and `---- VAR name` sections of a solution report, into
//! records.

use std::fmt::Display;

use itertools::Itertools;
use log::{debug, warn};
use serde::{Serialize, Deserialize};

use crate::layout::{Column, ColumnWidths};
use crate::util::*;

/// The kinds of symbol blocks in a solution report.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord
)]
pub enum SymbolKind {
  /// Equations come first.
  Equation,
  /// Variables come after the equations.
  Variable
}

impl SymbolKind {
  /// Returns the text that opens a block of this kind.
  pub const fn marker(&self) -> &'static str {
    return match self {
      Self::Equation => "---- EQU ",
      Self::Variable => "---- VAR ",
    };
  }

  /// Returns the text that ends the last block of this kind. Equations are
  /// followed by more dashed blocks, variables by the report summary.
  pub const fn terminator(&self) -> &'static str {
    return match self {
      Self::Equation => "---- ",
      Self::Variable => "****",
    };
  }

  /// Returns a short lowercase name.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::Equation => "equation",
      Self::Variable => "variable",
    };
  }
}

impl Display for SymbolKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}

/// A single row of a symbol: one equation or variable, fully indexed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
  /// The symbol name.
  pub name: String,
  /// The symbol description, empty if there was none.
  pub description: String,
  /// The index tuple. Empty for scalars.
  pub domain: Vec<String>,
  /// The lower bound.
  pub lower: f64,
  /// The level.
  pub level: f64,
  /// The upper bound.
  pub upper: f64,
  /// The marginal.
  pub marginal: f64
}

impl Record {
  /// Returns the value in a column.
  pub fn get(&self, column: Column) -> f64 {
    return match column {
      Column::Lower => self.lower,
      Column::Level => self.level,
      Column::Upper => self.upper,
      Column::Marginal => self.marginal
    };
  }
}

impl Display for Record {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    if self.domain.is_empty() {
      return write!(f, "{}", self.name);
    }
    return write!(f, "{}({})", self.name, self.domain.iter().join("."));
  }
}

/// A decoded data row, before the block's name and description are attached.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParsedRow {
  /// The index tuple.
  pub domain: Vec<String>,
  /// The LOWER cell.
  pub lower: CellValue,
  /// The LEVEL cell.
  pub level: CellValue,
  /// The UPPER cell.
  pub upper: CellValue,
  /// The MARGINAL cell.
  pub marginal: CellValue
}

impl ParsedRow {
  /// Returns the cell in a column.
  pub fn cell(&self, column: Column) -> &CellValue {
    return match column {
      Column::Lower => &self.lower,
      Column::Level => &self.level,
      Column::Upper => &self.upper,
      Column::Marginal => &self.marginal
    };
  }

  /// Returns the columns whose cells held garbage.
  pub fn malformed_columns(&self) -> Vec<Column> {
    return Column::all()
      .iter()
      .copied()
      .filter(|c| self.cell(*c).is_malformed())
      .collect();
  }

  /// Turns this into a record.
  fn into_record(self, name: &str, description: &str) -> Record {
    return Record {
      name: name.to_string(),
      description: description.to_string(),
      lower: self.lower.value(),
      level: self.level.value(),
      upper: self.upper.value(),
      marginal: self.marginal.value(),
      domain: self.domain
    };
  }
}

/// What a block decoder made of a line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LineResponse {
  /// The line was the column header.
  Header,
  /// The line was free text naming the symbol; contains the description.
  Description(String),
  /// The line was free text we don't care about.
  Useless,
  /// The line looked like data but had no domain, so it was dropped.
  NoDomain,
  /// The line was a data row.
  Data(ParsedRow)
}

impl LineResponse {
  /// Returns true if the line deserves a second look.
  pub fn abnormal(&self) -> bool {
    return match self {
      Self::NoDomain => true,
      Self::Data(row) => !row.malformed_columns().is_empty(),
      _ => false
    };
  }
}

/// Keeps the description of a symbol. The last description line seen wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DescriptionAccumulator {
  /// The current description.
  current: Option<String>
}

impl DescriptionAccumulator {
  /// Feeds a description line, replacing whatever came before.
  pub fn push(&mut self, text: String) {
    self.current = Some(text);
  }

  /// Returns the final description, empty if no line was fed.
  pub fn finish(self) -> String {
    return self.current.unwrap_or_default();
  }
}

/// Decodes a single data row: the cells, and the domain left of them.
pub fn decode_row(
  line: &str,
  name: &str,
  widths: &ColumnWidths
) -> LineResponse {
  let mut domain = widths.domain_text(line)
    .split('.')
    .map(|d| d.trim().to_string())
    .collect::<Vec<_>>();
  if domain.first().map_or(true, |d| d.is_empty()) {
    return LineResponse::NoDomain;
  }
  // scalars echo their own name where the domain would be
  if domain.len() == 1 && domain[0] == name {
    domain.clear();
  }
  let cell = |c: Column| decode_cell(widths.cell(line, c));
  return LineResponse::Data(ParsedRow {
    domain,
    lower: cell(Column::Lower),
    level: cell(Column::Level),
    upper: cell(Column::Upper),
    marginal: cell(Column::Marginal)
  });
}

/// Decodes the lines of a single symbol block.
pub struct SymbolBlockDecoder<'w> {
  /// The column layout.
  widths: &'w ColumnWidths,
  /// The symbol name.
  name: String,
  /// The description seen so far.
  description: DescriptionAccumulator,
  /// Rows decoded so far.
  rows: Vec<ParsedRow>
}

impl<'w> SymbolBlockDecoder<'w> {
  /// Starts decoding a block for a symbol.
  pub fn new(name: &str, widths: &'w ColumnWidths) -> Self {
    return Self {
      widths,
      name: name.to_string(),
      description: DescriptionAccumulator::default(),
      rows: Vec::new()
    };
  }

  /// Classifies a line without consuming it.
  pub fn decode(&self, line: &str) -> LineResponse {
    if line.contains(Column::Lower.label()) {
      return LineResponse::Header;
    }
    if !line.contains('.') {
      if line.contains(self.name.as_str()) {
        let text = line.trim()
          .chars()
          .skip(self.name.chars().count())
          .collect::<String>();
        return LineResponse::Description(text.trim().to_string());
      }
      return LineResponse::Useless;
    }
    return decode_row(line, &self.name, self.widths);
  }

  /// Consumes a line into the decoder.
  pub fn consume(&mut self, line: &str) -> LineResponse {
    let resp = self.decode(line);
    match &resp {
      LineResponse::Description(text) => self.description.push(text.clone()),
      LineResponse::Data(row) => self.rows.push(row.clone()),
      _ => {}
    }
    return resp;
  }

  /// Finishes the block, attaching name and description to every row.
  pub fn finalise(self) -> Vec<Record> {
    let description = self.description.finish();
    let name = self.name;
    return self.rows
      .into_iter()
      .map(|row| row.into_record(&name, &description))
      .collect();
  }
}

/// Splits a solve section into the blocks for a kind of symbol. Each block
/// starts right after its marker; the last one is cut at the kind's
/// terminator.
pub fn split_blocks(section: &str, kind: SymbolKind) -> Vec<&str> {
  let mut blocks = section.split(kind.marker()).skip(1).collect::<Vec<_>>();
  if let Some(last) = blocks.last_mut() {
    *last = last.split(kind.terminator()).next().unwrap_or("");
  }
  return blocks;
}

/// Extracts all records of a kind of symbol from a solve section.
pub fn extract_symbols(
  section: &str,
  kind: SymbolKind,
  widths: &ColumnWidths
) -> Vec<Record> {
  let mut records = Vec::new();
  for block in split_blocks(section, kind) {
    let name = first_token(block);
    let mut decoder = SymbolBlockDecoder::new(name, widths);
    let stripped = strip_blank_lines(block);
    for line in split_lines(&stripped) {
      let resp = decoder.consume(line);
      if !resp.abnormal() {
        continue;
      }
      match resp {
        LineResponse::Data(row) => warn!(
          "Malformed {} in {} {}: \"{}\"",
          row.malformed_columns().iter().join(", "),
          kind,
          name,
          line.trim()
        ),
        _ => debug!("Dropped a row without domain in {} {}.", kind, name)
      }
    }
    let decoded = decoder.finalise();
    debug!("Decoded {} rows for {} {}.", decoded.len(), kind, name);
    records.extend(decoded);
  }
  return records;
}
