//! Column selectors: name one or more columns without evaluating strings.
//!
//! A [`ColumnSelector`] is an explicit tagged value (literal name, name set,
//! contiguous range, prefix/suffix/substring/regex predicate, or complement)
//! resolved against a schema's current column order at call time. The reshape
//! verbs take a selector to decide which columns participate.

use std::collections::HashSet;

use regex::Regex;

use crate::error::{RelationError, RelationResult};
use crate::types::Schema;

/// Selects one or more columns of a [`Schema`].
///
/// Literal forms (`Name`, `Names`, `Range`) must name existing columns and
/// resolve in the order given; predicate forms resolve in schema order and may
/// legitimately match nothing; the calling operation decides whether an empty
/// selection is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    /// A single column by name.
    Name(String),
    /// A set of columns, resolved in the listed order.
    Names(Vec<String>),
    /// A contiguous inclusive range `first..last` in current column order.
    Range { first: String, last: String },
    /// Columns whose name starts with the given prefix.
    StartsWith(String),
    /// Columns whose name ends with the given suffix.
    EndsWith(String),
    /// Columns whose name contains the given substring.
    Contains(String),
    /// Columns whose name matches the given regular expression.
    Matches(String),
    /// All columns except those the inner selector resolves to.
    AllExcept(Box<ColumnSelector>),
}

impl ColumnSelector {
    /// Convenience constructor for [`ColumnSelector::Range`].
    pub fn range(first: impl Into<String>, last: impl Into<String>) -> Self {
        ColumnSelector::Range {
            first: first.into(),
            last: last.into(),
        }
    }

    /// Convenience constructor for [`ColumnSelector::Names`].
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnSelector::Names(names.into_iter().map(Into::into).collect())
    }

    /// Resolve the selector to column names against `schema`.
    ///
    /// - [`RelationError::InvalidColumn`] if a literal name or range endpoint
    ///   is absent.
    /// - [`RelationError::SchemaMismatch`] if a range's endpoints are reversed.
    /// - [`RelationError::InvalidPattern`] if a regex pattern does not parse.
    pub fn resolve(&self, schema: &Schema) -> RelationResult<Vec<String>> {
        match self {
            ColumnSelector::Name(name) => {
                require(schema, name)?;
                Ok(vec![name.clone()])
            }
            ColumnSelector::Names(names) => {
                let mut seen = HashSet::new();
                let mut out = Vec::with_capacity(names.len());
                for name in names {
                    require(schema, name)?;
                    if seen.insert(name.as_str()) {
                        out.push(name.clone());
                    }
                }
                Ok(out)
            }
            ColumnSelector::Range { first, last } => {
                let start = require(schema, first)?;
                let end = require(schema, last)?;
                if start > end {
                    return Err(RelationError::SchemaMismatch {
                        message: format!("column range '{first}'..'{last}' is reversed"),
                    });
                }
                Ok(schema.fields[start..=end]
                    .iter()
                    .map(|f| f.name.clone())
                    .collect())
            }
            ColumnSelector::StartsWith(prefix) => {
                Ok(matching(schema, |name| name.starts_with(prefix)))
            }
            ColumnSelector::EndsWith(suffix) => {
                Ok(matching(schema, |name| name.ends_with(suffix)))
            }
            ColumnSelector::Contains(needle) => {
                Ok(matching(schema, |name| name.contains(needle)))
            }
            ColumnSelector::Matches(pattern) => {
                let re = Regex::new(pattern)?;
                Ok(matching(schema, |name| re.is_match(name)))
            }
            ColumnSelector::AllExcept(inner) => {
                let excluded: HashSet<String> = inner.resolve(schema)?.into_iter().collect();
                Ok(schema
                    .field_names()
                    .filter(|name| !excluded.contains(*name))
                    .map(str::to_string)
                    .collect())
            }
        }
    }
}

fn require(schema: &Schema, name: &str) -> RelationResult<usize> {
    schema
        .index_of(name)
        .ok_or_else(|| RelationError::InvalidColumn {
            operation: "select",
            column: name.to_string(),
        })
}

fn matching<F>(schema: &Schema, pred: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    schema
        .field_names()
        .filter(|name| pred(name))
        .map(str::to_string)
        .collect()
}
