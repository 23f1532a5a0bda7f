//! This module implements the listing parser and its error type.

use std::error::Error;
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use log::debug;

use crate::layout::{detect_layout, LayoutSettings};
use crate::listing::ParsedListing;
use crate::solve::{split_solves, SolveResult};

/// This is the kind of error that can abort a parse.
#[derive(Debug)]
pub enum ParseError {
  /// No solution report was found. Usually means compilation errors.
  NoSolves,
  /// No line contained the LOWER label, so the column layout is unknown.
  NoColumnHeader,
  /// The column header is missing some labels. Contains the header.
  MalformedHeader(String),
  /// Couldn't read the listing.
  Io(io::Error)
}

impl Display for ParseError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::NoSolves => write!(
        f,
        "no solution reports in the listing; check it for compilation errors"
      ),
      Self::NoColumnHeader => write!(
        f,
        "no column header in the listing; it might be truncated"
      ),
      Self::MalformedHeader(h) => {
        write!(f, "malformed column header \"{}\"", h)
      },
      Self::Io(e) => write!(f, "couldn't read the listing: {}", e)
    };
  }
}

impl Error for ParseError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    return match self {
      Self::Io(e) => Some(e),
      _ => None
    };
  }
}

impl From<io::Error> for ParseError {
  fn from(e: io::Error) -> Self {
    return Self::Io(e);
  }
}

/// This is the listing parser. It takes the whole listing at once, since the
/// column layout has to be known before any row is decoded.
#[derive(Copy, Clone, Debug, Default)]
pub struct ListingParser {
  /// The constants for column layout detection.
  pub settings: LayoutSettings
}

impl ListingParser {
  /// Instantiates a parser with custom layout settings.
  pub fn new(settings: LayoutSettings) -> Self {
    return Self { settings };
  }

  /// Parses a complete listing.
  pub fn parse(&self, listing: &str) -> Result<ParsedListing, ParseError> {
    let sections = split_solves(listing)?;
    debug!("Found {} solve(s) in the listing.", sections.len());
    let widths = detect_layout(listing, &self.settings)?;
    debug!("Detected column layout: {:?}", widths);
    let solves = sections.into_iter()
      .map(|s| SolveResult::from_section(s, &widths))
      .collect();
    return Ok(ParsedListing { solves });
  }

  /// Reads everything from a reader, then parses it.
  pub fn parse_reader<R: Read>(
    &self,
    mut reader: R
  ) -> Result<ParsedListing, ParseError> {
    let mut listing = String::new();
    reader.read_to_string(&mut listing)?;
    return self.parse(&listing);
  }

  /// Utility method -- reads and parses a file.
  pub fn parse_file<P: AsRef<Path>>(
    &self,
    path: P
  ) -> Result<ParsedListing, ParseError> {
    let file = File::open(path.as_ref())?;
    return self.parse_reader(BufReader::new(file));
  }
}
