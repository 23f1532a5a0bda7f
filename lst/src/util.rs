//! This module implements utility functions without much need for defining
//! context or not enough of it to warrant them having their own modules:
//! line and token splitting, and decoding the numbers solvers write.

use serde::{Serialize, Deserialize};

/// The value solvers print as `EPS`: "zero, but present". We use the smallest
/// positive subnormal for it.
pub const EPS_VALUE: f64 = 5e-324;

/// Characters that may appear in a plain decimal literal.
const DECIMAL_CHARS: &str = "0123456789+-.eE";

/// Splits text into lines. Accepts every line terminator under the sun: CRLF,
/// CR, LF, VT, FF, NEL, LS and PS.
pub fn split_lines(text: &str) -> Vec<&str> {
  let mut lines = Vec::new();
  let mut start = 0;
  let mut chars = text.char_indices().peekable();
  while let Some((i, c)) = chars.next() {
    match c {
      '\r' => {
        lines.push(&text[start..i]);
        if let Some((_, '\n')) = chars.peek() {
          chars.next();
          start = i + 2;
        } else {
          start = i + 1;
        }
      },
      '\n' | '\u{0b}' | '\u{0c}' | '\u{85}' | '\u{2028}' | '\u{2029}' => {
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
      },
      _ => continue
    }
  }
  lines.push(&text[start..]);
  return lines;
}

/// Removes lines that hold nothing but whitespace and a line terminator.
pub fn strip_blank_lines(text: &str) -> String {
  return text.split_inclusive('\n')
    .filter(|l| !(l.ends_with('\n') && l.trim().is_empty()))
    .collect();
}

/// Splits text on runs of spaces and/or commas. Empty tokens are dropped.
pub fn split_tokens(text: &str) -> Vec<&str> {
  return text.split([' ', ','])
    .filter(|t| !t.is_empty())
    .collect();
}

/// Returns whatever comes before the first whitespace character.
pub fn first_token(text: &str) -> &str {
  return text.split(char::is_whitespace).next().unwrap_or("");
}

/// Case-insensitive comparison for symbol names and domain labels.
pub fn same_label(a: &str, b: &str) -> bool {
  return a == b || a.to_uppercase() == b.to_uppercase();
}

/// A single decoded cell from a fixed-width row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
  /// A number, including the infinities and the `EPS` stand-in.
  Number(f64),
  /// Nothing in the cell.
  Blank,
  /// The solver explicitly wrote "no value" (`NA`, `UNDF`).
  NotAvailable,
  /// Something we couldn't make sense of. Holds the text.
  Malformed(String)
}

impl CellValue {
  /// Returns the numeric value, NaN for the cells that don't have one.
  pub fn value(&self) -> f64 {
    return match self {
      Self::Number(x) => *x,
      Self::Blank => 0.0,
      Self::NotAvailable | Self::Malformed(_) => f64::NAN
    };
  }

  /// Returns true if the cell held garbage.
  pub fn is_malformed(&self) -> bool {
    return matches!(self, Self::Malformed(_));
  }
}

/// Decodes a cell the way solvers print them. Lenient with whitespace around
/// the value; never fails, malformed cells are tagged as such.
pub fn decode_cell(token: &str) -> CellValue {
  let token = token.trim();
  return match token {
    "" => CellValue::Blank,
    "+INF" => CellValue::Number(f64::INFINITY),
    "-INF" => CellValue::Number(f64::NEG_INFINITY),
    "EPS" => CellValue::Number(EPS_VALUE),
    "." => CellValue::Number(0.0),
    "NA" | "UNDF" => CellValue::NotAvailable,
    // f64's parser takes "inf" and "nan", solvers never mean those.
    t if !t.chars().all(|c| DECIMAL_CHARS.contains(c)) => {
      CellValue::Malformed(t.to_string())
    },
    t => match t.parse::<f64>() {
      Ok(x) => CellValue::Number(x),
      Err(_) => CellValue::Malformed(t.to_string())
    }
  };
}

/// Decodes a solver-formatted number. Anything unrecognisable becomes NaN.
pub fn parse_solver_number(token: &str) -> f64 {
  return decode_cell(token).value();
}

/// Decodes the longest numeric prefix of the first token in a string, like
/// the lenient float readers in scripting languages do. Used on the solve
/// summary, where the numbers are followed by free text.
pub fn decode_leading_float(text: &str) -> Option<f64> {
  let token = text.split_whitespace().next()?;
  let end = token.find(|c| !DECIMAL_CHARS.contains(c)).unwrap_or(token.len());
  let token = &token[..end];
  return (1..=token.len())
    .rev()
    .find_map(|i| token[..i].parse::<f64>().ok());
}
