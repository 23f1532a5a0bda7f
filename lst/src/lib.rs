//! This library implements types and functions to parse the formatted text
//! listings written by algebraic modelling solvers (the `.lst` files) into
//! structured records.
//!
//! A listing is broken into solves, solves into symbol blocks (equations and
//! variables), and symbol blocks into rows. Every row becomes a record with
//! the symbol name, its domain (the dotted index tuple), and the LOWER, LEVEL,
//! UPPER and MARGINAL columns. Records can then be queried by symbol name and
//! by a partial domain.
//!
//! The column layout changes slightly between solver versions, so it's
//! inferred from the header text of the listing itself.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::needless_return)]

pub mod layout;
pub mod listing;
pub mod parser;
pub mod query;
pub mod solve;
pub mod symbols;
pub mod util;


/// Imports the most relevant exports from the library.
pub mod prelude {
  pub use super::layout::*;
  pub use super::listing::*;
  pub use super::parser::*;
  pub use super::query::*;
  pub use super::solve::SolveResult;
  pub use super::symbols::{Record, SymbolKind};
  pub use super::util::CellValue;
}

use crate::listing::ParsedListing;
use crate::parser::{ListingParser, ParseError};

/// Parses a complete listing with the default layout settings.
pub fn parse(listing: &str) -> Result<ParsedListing, ParseError> {
  return ListingParser::default().parse(listing);
}
