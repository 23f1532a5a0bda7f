//! This module implements lookups of records by symbol name and domain.

use std::error::Error;
use std::fmt::Display;

use derive_more::From;
use serde::{Serialize, Deserialize};

use crate::symbols::Record;
use crate::util::same_label;

/// A filter on the domain of a record. Every slot either requires a label at
/// that position (case-insensitive) or is a wildcard.
#[derive(
  Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, From
)]
pub struct DomainFilter(Vec<Option<String>>);

impl DomainFilter {
  /// An empty filter: matches any domain.
  pub fn new() -> Self {
    return Self::default();
  }

  /// Appends a slot that requires a label.
  pub fn exact<S: Into<String>>(mut self, label: S) -> Self {
    self.0.push(Some(label.into()));
    return self;
  }

  /// Appends a wildcard slot.
  pub fn any(mut self) -> Self {
    self.0.push(None);
    return self;
  }

  /// Returns the slots.
  pub fn slots(&self) -> &[Option<String>] {
    return &self.0;
  }

  /// Returns true if this filter doesn't constrain anything.
  pub fn is_wildcard(&self) -> bool {
    return self.0.iter().all(Option::is_none);
  }

  /// Checks a domain against this filter. Positions past the end of the
  /// domain only pass if they're wildcards.
  pub fn matches<S: AsRef<str>>(&self, domain: &[S]) -> bool {
    return self.0.iter()
      .enumerate()
      .all(|(i, slot)| match slot {
        None => true,
        Some(label) => domain.get(i)
          .is_some_and(|d| same_label(d.as_ref(), label))
      });
  }
}

/// Empty strings become wildcards, any other string requires that label.
fn slot_from_str(s: &str) -> Option<String> {
  if s.is_empty() {
    return None;
  }
  return Some(s.to_string());
}

impl From<&str> for DomainFilter {
  fn from(label: &str) -> Self {
    return Self(vec![slot_from_str(label)]);
  }
}

impl From<String> for DomainFilter {
  fn from(label: String) -> Self {
    return Self::from(label.as_str());
  }
}

impl From<&[&str]> for DomainFilter {
  fn from(labels: &[&str]) -> Self {
    return Self(labels.iter().map(|s| slot_from_str(s)).collect());
  }
}

impl<const N: usize> From<[&str; N]> for DomainFilter {
  fn from(labels: [&str; N]) -> Self {
    return Self::from(labels.as_slice());
  }
}

impl From<Vec<String>> for DomainFilter {
  fn from(labels: Vec<String>) -> Self {
    return Self(labels.iter().map(|s| slot_from_str(s)).collect());
  }
}

impl From<Option<&str>> for DomainFilter {
  fn from(label: Option<&str>) -> Self {
    return label.map_or_else(Self::new, Self::from);
  }
}

/// The kind of error that can be returned by a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryError {
  /// No symbol name was given.
  MissingSymbolName,
  /// A solve index was given, but there's no such solve.
  NoSuchSolve {
    /// The requested index.
    requested: usize,
    /// The number of solves in the listing.
    available: usize
  }
}

impl Display for QueryError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::MissingSymbolName => write!(f, "symbol name required for query"),
      Self::NoSuchSolve { requested, available } => write!(
        f,
        "no solve number {} (the listing has {})",
        requested,
        available
      )
    };
  }
}

impl Error for QueryError {}

/// Filters records by symbol name and domain, both case-insensitive. No
/// matches is not an error; an empty name is.
pub fn get<'r, I>(
  records: I,
  name: &str,
  filter: &DomainFilter
) -> Result<Vec<&'r Record>, QueryError>
  where I: IntoIterator<Item = &'r Record> {
  if name.is_empty() {
    return Err(QueryError::MissingSymbolName);
  }
  return Ok(
    records.into_iter()
      .filter(|r| same_label(&r.name, name))
      .filter(|r| filter.matches(&r.domain))
      .collect()
  );
}
