//! Grouping and summary statistics for [`crate::types::Relation`].
//!
//! [`group_by()`] partitions a relation's rows by the values of one or more
//! key columns; [`summarize()`] / [`summarize_groups()`] reduce columns to
//! named summary statistics with an explicit [`MissingPolicy`].
//!
//! ## Example: mean sleep hours per diet
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
//!         vec![Value::Utf8("herbi".to_string()), Value::Float64(14.4)],
//!         vec![Value::Utf8("carni".to_string()), Value::Float64(8.0)],
//!     ],
//! )?;
//!
//! let grouped = group_by(&msleep, &["vore"])?;
//! let out = summarize_groups(
//!     &grouped,
//!     &[AggSpec::new("avg_sleep", "sleep_total", Reducer::Mean)],
//! )?;
//!
//! assert_eq!(out.column_names(), vec!["vore", "avg_sleep"]);
//! assert_eq!(out.rows()[0][1], Value::Float64(10.0));
//! # Ok(())
//! # }
//! ```

pub mod group;
pub mod summarize;

pub use group::{Group, GroupedRelation, group_by};
pub use summarize::{AggSpec, MissingPolicy, Reducer, summarize, summarize_groups};
