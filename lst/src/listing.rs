//! This module implements the structure of a parsed listing as we interpret
//! it: a list of solves, each with its equation and variable records.

use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

use crate::query::{self, DomainFilter, QueryError};
use crate::solve::SolveResult;
use crate::symbols::Record;

/// This is the output of the listing parser.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ParsedListing {
  /// The solves, in listing order.
  pub solves: Vec<SolveResult>
}

impl ParsedListing {
  /// Iterates over every record of every solve, in listing order.
  pub fn records(&self) -> impl Iterator<Item = &Record> {
    return self.solves.iter().flat_map(SolveResult::records);
  }

  /// Returns the distinct symbol names in this listing, sorted.
  pub fn symbol_names(&self) -> BTreeSet<&str> {
    return self.records().map(|r| r.name.as_str()).collect();
  }

  /// Looks up records by symbol name and domain, in a single solve or in all
  /// of them. Asking for a solve that doesn't exist is an error, unlike not
  /// finding anything.
  pub fn get<D: Into<DomainFilter>>(
    &self,
    symbol: &str,
    domain: D,
    solve: Option<usize>
  ) -> Result<Vec<&Record>, QueryError> {
    let filter = domain.into();
    if let Some(i) = solve {
      let found = self.solves.get(i).ok_or(QueryError::NoSuchSolve {
        requested: i,
        available: self.solves.len()
      })?;
      return query::get(found.records(), symbol, &filter);
    }
    return query::get(self.records(), symbol, &filter);
  }
}
