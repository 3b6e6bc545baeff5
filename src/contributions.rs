//! # Contributions Module
//!
//! This module turns raw per-line authorship facts (as produced by a
//! [`HistorySource`](crate::git::HistorySource)) into the deduplicated,
//! year-ranged contributor list that is rendered into a file's header.
//!
//! ## Example
//!
//! ```rust
//! use std::path::PathBuf;
//!
//! use edcopyright::contributions::{RawFact, Years, aggregate_file};
//!
//! let fact = |year| RawFact {
//!   author: "Alice".to_string(),
//!   email: "alice@example.com".to_string(),
//!   year,
//!   file: PathBuf::from("a.py"),
//! };
//!
//! let records = aggregate_file(vec![fact(2015), fact(2018), fact(2016)]);
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].years, Years::Range(2015, 2018));
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

/// Marker placed in front of every rendered copyright line.
pub const COPYRIGHT_NOTICE: &str = "Copyright (c)";

/// A single authorship fact: one line of a file attributed to the commit that
/// last touched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFact {
  pub author: String,
  pub email: String,
  pub year: i32,
  /// Repository-relative path of the blamed file
  pub file: PathBuf,
}

/// The years a contributor touched a file.
///
/// Only the endpoints of the span are retained; intermediate years are
/// dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Years {
  /// Exactly one distinct year
  Single(i32),
  /// Inclusive `(earliest, latest)` span over more than one distinct year
  Range(i32, i32),
}

impl Years {
  /// Reduces a set of distinct years to a scalar or a span.
  ///
  /// Returns `None` for an empty set.
  pub fn from_distinct(years: &BTreeSet<i32>) -> Option<Self> {
    let first = *years.first()?;
    let last = *years.last()?;
    if first == last {
      Some(Self::Single(first))
    } else {
      Some(Self::Range(first, last))
    }
  }

  pub const fn start(&self) -> i32 {
    match *self {
      Self::Single(year) | Self::Range(year, _) => year,
    }
  }

  pub const fn end(&self) -> i32 {
    match *self {
      Self::Single(year) | Self::Range(_, year) => year,
    }
  }
}

impl fmt::Display for Years {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Single(year) => write!(f, "{year}"),
      Self::Range(start, end) => write!(f, "{start}-{end}"),
    }
  }
}

/// A deduplicated contributor of a single file, keyed by `(author, email)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorRecord {
  pub author: String,
  pub email: String,
  pub years: Years,
}

impl fmt::Display for ContributorRecord {
  /// Renders the copyright line body, without any comment prefix.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {} {} <{}>", COPYRIGHT_NOTICE, self.years, self.author, self.email)
  }
}

/// Ordering used when rendering contributors: most recent activity first.
///
/// Keys, in order:
/// 1. end year, descending
/// 2. start year, descending
/// 3. author, ascending
/// 4. email, ascending
pub fn compare_contributors(a: &ContributorRecord, b: &ContributorRecord) -> Ordering {
  b.years
    .end()
    .cmp(&a.years.end())
    .then_with(|| b.years.start().cmp(&a.years.start()))
    .then_with(|| a.author.cmp(&b.author))
    .then_with(|| a.email.cmp(&b.email))
}

/// The ordered contributor list for one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileHeaderPlan {
  contributors: Vec<ContributorRecord>,
}

impl FileHeaderPlan {
  /// Creates a plan, sorting the records with [`compare_contributors`].
  pub fn new(mut contributors: Vec<ContributorRecord>) -> Self {
    contributors.sort_by(compare_contributors);
    Self { contributors }
  }

  pub fn contributors(&self) -> &[ContributorRecord] {
    &self.contributors
  }

  pub fn is_empty(&self) -> bool {
    self.contributors.is_empty()
  }
}

type ContributorKey = (String, String);

fn reduce(groups: BTreeMap<ContributorKey, BTreeSet<i32>>) -> Vec<ContributorRecord> {
  groups
    .into_iter()
    .filter_map(|((author, email), years)| {
      Years::from_distinct(&years).map(|years| ContributorRecord { author, email, years })
    })
    .collect()
}

/// Aggregates the fact stream of a single file.
///
/// The `file` field of each fact is ignored. Grouping is exact and
/// case-sensitive on `(author, email)`.
pub fn aggregate_file(facts: impl IntoIterator<Item = RawFact>) -> Vec<ContributorRecord> {
  let mut groups: BTreeMap<ContributorKey, BTreeSet<i32>> = BTreeMap::new();
  for fact in facts {
    groups.entry((fact.author, fact.email)).or_default().insert(fact.year);
  }
  reduce(groups)
}

/// Aggregates an unordered fact stream spanning any number of files.
///
/// Files with no facts do not appear in the result.
pub fn aggregate(facts: impl IntoIterator<Item = RawFact>) -> BTreeMap<PathBuf, Vec<ContributorRecord>> {
  let mut by_file: BTreeMap<PathBuf, BTreeMap<ContributorKey, BTreeSet<i32>>> = BTreeMap::new();
  for fact in facts {
    by_file
      .entry(fact.file)
      .or_default()
      .entry((fact.author, fact.email))
      .or_default()
      .insert(fact.year);
  }

  by_file.into_iter().map(|(file, groups)| (file, reduce(groups))).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn fact(author: &str, email: &str, year: i32, file: &str) -> RawFact {
    RawFact {
      author: author.to_string(),
      email: email.to_string(),
      year,
      file: PathBuf::from(file),
    }
  }

  fn record(author: &str, email: &str, years: Years) -> ContributorRecord {
    ContributorRecord {
      author: author.to_string(),
      email: email.to_string(),
      years,
    }
  }

  #[test]
  fn test_two_years_become_range() {
    let records = aggregate_file(vec![fact("A", "a@x", 2015, "f"), fact("A", "a@x", 2018, "f")]);
    assert_eq!(records, vec![record("A", "a@x", Years::Range(2015, 2018))]);
  }

  #[test]
  fn test_single_year_stays_scalar() {
    let records = aggregate_file(vec![fact("B", "b@x", 2020, "f"), fact("B", "b@x", 2020, "f")]);
    assert_eq!(records, vec![record("B", "b@x", Years::Single(2020))]);
  }

  #[test]
  fn test_intermediate_years_are_dropped() {
    let records = aggregate_file(vec![
      fact("A", "a@x", 2017, "f"),
      fact("A", "a@x", 2012, "f"),
      fact("A", "a@x", 2014, "f"),
    ]);
    assert_eq!(records[0].years, Years::Range(2012, 2017));
    assert_eq!(records[0].years.to_string(), "2012-2017");
  }

  #[test]
  fn test_same_name_different_email_are_distinct() {
    let records = aggregate_file(vec![fact("A", "a@x", 2015, "f"), fact("A", "a@y", 2016, "f")]);
    assert_eq!(records.len(), 2);
  }

  #[test]
  fn test_grouping_is_case_sensitive() {
    let records = aggregate_file(vec![fact("Alice", "a@x", 2015, "f"), fact("alice", "a@x", 2016, "f")]);
    assert_eq!(records.len(), 2);
  }

  #[test]
  fn test_empty_stream_yields_nothing() {
    assert!(aggregate_file(Vec::new()).is_empty());
    assert!(aggregate(Vec::new()).is_empty());
  }

  #[test]
  fn test_aggregate_partitions_by_file() {
    let result = aggregate(vec![
      fact("A", "a@x", 2015, "one.py"),
      fact("B", "b@x", 2016, "two.py"),
      fact("A", "a@x", 2019, "one.py"),
    ]);

    assert_eq!(result.len(), 2);
    assert_eq!(
      result[&PathBuf::from("one.py")],
      vec![record("A", "a@x", Years::Range(2015, 2019))]
    );
    assert_eq!(
      result[&PathBuf::from("two.py")],
      vec![record("B", "b@x", Years::Single(2016))]
    );
  }

  #[test]
  fn test_record_display() {
    assert_eq!(
      record("Alice", "alice@x", Years::Single(2019)).to_string(),
      "Copyright (c) 2019 Alice <alice@x>"
    );
    assert_eq!(
      record("Bob", "bob@x", Years::Range(2015, 2021)).to_string(),
      "Copyright (c) 2015-2021 Bob <bob@x>"
    );
  }

  #[test]
  fn test_plan_sorts_most_recent_first() {
    let plan = FileHeaderPlan::new(vec![
      record("Old", "o@x", Years::Single(2010)),
      record("Span", "s@x", Years::Range(2012, 2020)),
      record("Recent", "r@x", Years::Single(2020)),
      record("Mid", "m@x", Years::Range(2014, 2016)),
    ]);

    let authors: Vec<_> = plan.contributors().iter().map(|c| c.author.as_str()).collect();
    // Same end year: the later start year wins
    assert_eq!(authors, vec!["Recent", "Span", "Mid", "Old"]);
  }

  #[test]
  fn test_plan_breaks_year_ties_by_author_ascending() {
    let plan = FileHeaderPlan::new(vec![
      record("Carol", "c@x", Years::Single(2020)),
      record("Alice", "a@x", Years::Single(2020)),
      record("Bob", "b@x", Years::Single(2020)),
    ]);

    let authors: Vec<_> = plan.contributors().iter().map(|c| c.author.as_str()).collect();
    assert_eq!(authors, vec!["Alice", "Bob", "Carol"]);
  }

  #[test]
  fn test_years_from_distinct() {
    assert_eq!(Years::from_distinct(&BTreeSet::new()), None);
    assert_eq!(Years::from_distinct(&BTreeSet::from([2001])), Some(Years::Single(2001)));
    assert_eq!(
      Years::from_distinct(&BTreeSet::from([2003, 2001, 2002])),
      Some(Years::Range(2001, 2003))
    );
  }
}
