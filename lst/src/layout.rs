//! This module infers the fixed-width column layout of the LOWER, LEVEL,
//! UPPER and MARGINAL columns of a listing.
//!
//! Rows are right-aligned and ragged on the left (the domain text has no
//! fixed width), so every boundary is stored as a negative offset from the
//! end of the line. The header row and the data rows don't share absolute
//! positions, but they do share these end-anchored boundaries.

use std::fmt::Display;

use clap::Args;
use serde::{Serialize, Deserialize};

use crate::parser::ParseError;
use crate::util::split_lines;

/// Default number of characters data rows extend past the MARGINAL label.
pub const DEFAULT_TRAILING_PADDING: usize = 6;

/// Default width of the MARGINAL label.
pub const DEFAULT_MARGINAL_LABEL_WIDTH: usize = 8;

/// Default width of the LOWER, LEVEL and UPPER labels.
pub const DEFAULT_LABEL_WIDTH: usize = 5;

/// The value columns in a symbol block, in the order they're printed.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
  Hash
)]
pub enum Column {
  /// The lower bound.
  Lower,
  /// The level (the actual value).
  Level,
  /// The upper bound.
  Upper,
  /// The marginal (dual value or reduced cost).
  Marginal
}

impl Column {
  /// Returns all columns, left to right.
  pub const fn all() -> &'static [Self] {
    return &[Self::Lower, Self::Level, Self::Upper, Self::Marginal];
  }

  /// Returns the header label for this column.
  pub const fn label(&self) -> &'static str {
    return match self {
      Self::Lower => "LOWER",
      Self::Level => "LEVEL",
      Self::Upper => "UPPER",
      Self::Marginal => "MARGINAL"
    };
  }
}

impl Display for Column {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.label());
  }
}

/// The constants that go into turning header gaps into column boundaries.
/// They come from the fixed field widths of the report.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Args)]
#[serde(default)]
pub struct LayoutSettings {
  /// Characters that data rows run past the end of the MARGINAL label.
  #[arg(long, default_value_t = DEFAULT_TRAILING_PADDING)]
  pub trailing_padding: usize,
  /// Width of the MARGINAL label.
  #[arg(long = "marginal-width")]
  #[arg(default_value_t = DEFAULT_MARGINAL_LABEL_WIDTH)]
  pub marginal_label_width: usize,
  /// Width of the other labels.
  #[arg(long, default_value_t = DEFAULT_LABEL_WIDTH)]
  pub label_width: usize
}

impl Default for LayoutSettings {
  fn default() -> Self {
    return Self {
      trailing_padding: DEFAULT_TRAILING_PADDING,
      marginal_label_width: DEFAULT_MARGINAL_LABEL_WIDTH,
      label_width: DEFAULT_LABEL_WIDTH
    };
  }
}

/// A column span. Both ends are offsets from the end of a line, so they're
/// zero or negative, and `start > end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpan {
  /// The right edge (exclusive).
  pub start: isize,
  /// The left edge (inclusive).
  pub end: isize
}

impl ColumnSpan {
  /// Slices a line with this span. Out-of-range ends are clamped to the line.
  pub fn slice<'l>(&self, line: &'l str) -> &'l str {
    return slice_from_end(line, Some(self.end), self.start);
  }
}

/// Slices a line between two char offsets counted from its end. A missing
/// left offset means "from the start of the line".
fn slice_from_end(line: &str, from: Option<isize>, to: isize) -> &str {
  let nchars = line.chars().count() as isize;
  let from = from.map_or(0, |f| (nchars + f).clamp(0, nchars)) as usize;
  let to = (nchars + to).clamp(0, nchars) as usize;
  if from >= to {
    return "";
  }
  let byte_index = |chars: usize| line.char_indices()
    .nth(chars)
    .map_or(line.len(), |(i, _)| i);
  return &line[byte_index(from)..byte_index(to)];
}

/// The four column spans of a listing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnWidths {
  /// The MARGINAL column, always running to the end of the line.
  pub marginal: ColumnSpan,
  /// The UPPER column.
  pub upper: ColumnSpan,
  /// The LEVEL column.
  pub level: ColumnSpan,
  /// The LOWER column. Everything to the left of it is the domain.
  pub lower: ColumnSpan
}

impl ColumnWidths {
  /// Returns the span for a column.
  pub const fn span(&self, column: Column) -> ColumnSpan {
    return match column {
      Column::Lower => self.lower,
      Column::Level => self.level,
      Column::Upper => self.upper,
      Column::Marginal => self.marginal
    };
  }

  /// Returns the trimmed contents of a cell in a data row.
  pub fn cell<'l>(&self, line: &'l str, column: Column) -> &'l str {
    return self.span(column).slice(line).trim();
  }

  /// Returns the trimmed text left of the LOWER column.
  pub fn domain_text<'l>(&self, line: &'l str) -> &'l str {
    return slice_from_end(line, None, self.lower.end).trim();
  }
}

/// Returns the number of characters between the end of one label and the
/// start of the next one, looking only past the first occurrence of `left`.
fn label_gap(line: &str, left: &str, right: &str) -> Option<usize> {
  let (_, after) = line.split_once(left)?;
  let (between, _) = after.split_once(right)?;
  return Some(between.chars().count());
}

/// Computes the column layout from a single header line, i.e. one with the
/// LOWER, LEVEL, UPPER and MARGINAL labels. Returns None if a label is
/// missing.
///
/// Each gap between labels is split in half; the boundary between two columns
/// lies in the middle of the gap between their labels. The LOWER column has
/// no label on its left, so it borrows the LOWER-LEVEL gap for both sides.
pub fn widths_from_header(
  line: &str,
  settings: &LayoutSettings
) -> Option<ColumnWidths> {
  let lower_to_level = label_gap(line, "LOWER", "LEVEL")?;
  let level_to_upper = label_gap(line, "LEVEL", "UPPER")?;
  let upper_to_marginal = label_gap(line, "UPPER", "MARGINAL")?;
  let floor_half = |gap: usize| (gap / 2) as isize;
  let ceil_half = |gap: usize| gap.div_ceil(2) as isize;
  let trailing = settings.trailing_padding as isize;
  let marginal_label = settings.marginal_label_width as isize;
  let label = settings.label_width as isize;
  let marginal_end = -trailing
    - marginal_label
    - floor_half(upper_to_marginal);
  let upper_end = marginal_end
    - ceil_half(upper_to_marginal)
    - label
    - floor_half(level_to_upper);
  let level_end = upper_end
    - ceil_half(level_to_upper)
    - label
    - floor_half(lower_to_level);
  let lower_end = level_end
    - ceil_half(lower_to_level)
    - label
    - floor_half(lower_to_level);
  return Some(ColumnWidths {
    marginal: ColumnSpan { start: 0, end: marginal_end },
    upper: ColumnSpan { start: marginal_end, end: upper_end },
    level: ColumnSpan { start: upper_end, end: level_end },
    lower: ColumnSpan { start: level_end, end: lower_end }
  });
}

/// Finds the first column header in a listing and computes the layout from
/// it. The layout is listing-wide: every block is sliced with it.
pub fn detect_layout(
  listing: &str,
  settings: &LayoutSettings
) -> Result<ColumnWidths, ParseError> {
  let header = split_lines(listing)
    .into_iter()
    .find(|l| l.contains(Column::Lower.label()))
    .ok_or(ParseError::NoColumnHeader)?;
  return widths_from_header(header, settings)
    .ok_or_else(|| ParseError::MalformedHeader(header.trim().to_string()));
}
