//! `reltab` is a small library of tabular verbs over an immutable in-memory
//! [`types::Relation`]: reshaping between wide and long form, splitting and
//! merging columns, group-and-summarize aggregation, and the six relational
//! join variants.
//!
//! A relation has ordered, uniquely named, typed columns and ordered rows;
//! any cell may be [`types::Value::Null`]. Every operation is a pure function
//! that borrows its inputs and returns a new relation, so relations can be
//! shared across threads without synchronization. Building a relation from an
//! external source (files, databases) is a caller concern; this crate starts
//! once the data is already tabular and in memory.
//!
//! ## Reshaping: wide ↔ long
//!
//! ```rust
//! use reltab::reshape::{gather, spread};
//! use reltab::select::ColumnSelector;
//! use reltab::types::{DataType, Field, Relation, Schema, Value};
//!
//! # fn main() -> Result<(), reltab::RelationError> {
//! let schema = Schema::new(vec![
//!     Field::new("time", DataType::Utf8),
//!     Field::new("Google", DataType::Float64),
//!     Field::new("Facebook", DataType::Float64),
//! ]);
//! let wide = Relation::new(
//!     schema,
//!     vec![
//!         vec![
//!             Value::Utf8("2016-01-05".to_string()),
//!             Value::Float64(742.58),
//!             Value::Float64(102.97),
//!         ],
//!         vec![
//!             Value::Utf8("2016-01-06".to_string()),
//!             Value::Float64(743.62),
//!             Value::Float64(102.26),
//!         ],
//!     ],
//! )?;
//!
//! // One row per (time, company) observation.
//! let long = gather(
//!     &wide,
//!     "company",
//!     "price",
//!     &ColumnSelector::range("Google", "Facebook"),
//! )?;
//! assert_eq!(long.row_count(), 4);
//!
//! // And back again.
//! let back = spread(&long, "company", "price")?;
//! assert_eq!(back, wide);
//! # Ok(())
//! # }
//! ```
//!
//! ## Grouped summaries
//!
//! ```rust
//! use reltab::aggregate::{group_by, summarize_groups, AggSpec, Reducer};
//! use reltab::types::{DataType, Field, Relation, Schema, Value};
//!
//! # fn main() -> Result<(), reltab::RelationError> {
//! let schema = Schema::new(vec![
//!     Field::new("vore", DataType::Utf8),
//!     Field::new("sleep_total", DataType::Float64),
//! ]);
//! let msleep = Relation::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("carni".to_string()), Value::Float64(12.0)],
//!         vec![Value::Utf8("carni".to_string()), Value::Float64(8.0)],
//!         vec![Value::Utf8("herbi".to_string()), Value::Null],
//!     ],
//! )?;
//!
//! let grouped = group_by(&msleep, &["vore"])?;
//! let out = summarize_groups(
//!     &grouped,
//!     &[
//!         AggSpec::new("n", "sleep_total", Reducer::Count),
//!         // Skip missing values instead of propagating them.
//!         AggSpec::new("avg", "sleep_total", Reducer::Mean).skip_missing(),
//!     ],
//! )?;
//!
//! assert_eq!(out.column_names(), vec!["vore", "n", "avg"]);
//! assert_eq!(
//!     out.rows()[0],
//!     vec![
//!         Value::Utf8("carni".to_string()),
//!         Value::Int64(2),
//!         Value::Float64(10.0),
//!     ],
//! );
//! // A group with no non-missing values summarizes to Null, not an error.
//! assert_eq!(out.rows()[1][2], Value::Null);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`types`]: schema, values, and the [`types::Relation`] table
//! - [`select`]: column selectors (names, ranges, predicates, complements)
//! - [`reshape`]: `gather` / `spread` / `separate` / `unite`
//! - [`aggregate`]: `group_by` and `summarize` with explicit missing-value
//!   policy
//! - [`join`]: inner / left / right / full / semi / anti joins
//! - [`pipeline`]: named stages with stage-tagged errors and observer hooks
//! - [`error`]: error types used across all operations

pub mod aggregate;
pub mod error;
pub mod join;
pub mod pipeline;
pub mod reshape;
pub mod select;
pub mod types;

pub use error::{RelationError, RelationResult};
