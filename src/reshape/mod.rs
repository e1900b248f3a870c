//! Reshape verbs for [`crate::types::Relation`].
//!
//! Wide-to-long and long-to-wide transforms plus column splitting/merging:
//!
//! - [`gather()`]: replace a selection of columns with a key column and a
//!   value column (wide → long)
//! - [`spread()`]: the inverse, generating one column per distinct key value
//!   (long → wide)
//! - [`separate()`]: split one column into several by a delimiter
//! - [`unite()`]: merge several columns into one with a delimiter
//!
//! All four are pure: they borrow the input relation and return a new one.
//!
//! ## Example: wide stock prices to long observations
//!
//! ```rust
//! use reltab::reshape::gather;
//! use reltab::select::ColumnSelector;
//! use reltab::types::{DataType, Field, Relation, Schema, Value};
//!
//! # fn main() -> Result<(), reltab::RelationError> {
//! let schema = Schema::new(vec![
//!     Field::new("time", DataType::Utf8),
//!     Field::new("Google", DataType::Float64),
//!     Field::new("Facebook", DataType::Float64),
//!     Field::new("Twitter", DataType::Float64),
//! ]);
//! let prices = Relation::new(
//!     schema,
//!     vec![
//!         vec![
//!             Value::Utf8("2016-01-05".to_string()),
//!             Value::Float64(742.58),
//!             Value::Float64(102.97),
//!             Value::Float64(22.32),
//!         ],
//!         vec![
//!             Value::Utf8("2016-01-06".to_string()),
//!             Value::Float64(743.62),
//!             Value::Float64(102.26),
//!             Value::Float64(21.98),
//!         ],
//!         vec![
//!             Value::Utf8("2016-01-07".to_string()),
//!             Value::Float64(726.39),
//!             Value::Float64(97.92),
//!             Value::Float64(21.05),
//!         ],
//!     ],
//! )?;
//!
//! let selector = ColumnSelector::range("Google", "Twitter");
//! let long = gather(&prices, "company", "price", &selector)?;
//!
//! assert_eq!(long.column_names(), vec!["time", "company", "price"]);
//! assert_eq!(long.row_count(), 9);
//! # Ok(())
//! # }
//! ```

pub mod gather;
pub mod separate;
pub mod spread;
pub mod unite;

pub use gather::gather;
pub use separate::separate;
pub use spread::spread;
pub use unite::unite;
