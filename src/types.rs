//! Core data model: typed schemas and the immutable [`Relation`] table.
//!
//! A [`Relation`] is an ordered sequence of uniquely named, typed columns plus
//! an ordered sequence of rows. Every cell is a [`Value`], and any cell may be
//! [`Value::Null`] regardless of its column's declared [`DataType`]. No method
//! on a constructed relation mutates it; all transforms in this crate borrow a
//! relation and return a new one.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RelationError, RelationResult};

/// Logical data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Calendar date (no time component).
    Date,
}

impl DataType {
    /// Whether this type participates in numeric reductions (sum, mean, ...).
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int64 | DataType::Float64)
    }
}

/// A single named, typed column in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Column data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// An ordered list of fields describing a relation's columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the field with the given name, if present.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A single typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Missing value. Valid in a column of any [`DataType`].
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Calendar date.
    Date(NaiveDate),
}

impl Value {
    /// Whether this value is the missing marker.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The data type this value carries, or `None` for [`Value::Null`].
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float64(_) => Some(DataType::Float64),
            Value::Bool(_) => Some(DataType::Bool),
            Value::Utf8(_) => Some(DataType::Utf8),
            Value::Date(_) => Some(DataType::Date),
        }
    }

    /// Numeric view of the value, if it is numeric.
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Hashable/equatable token used for group and join keys.
    ///
    /// Floats are compared by bit pattern, so `-0.0` and `0.0` are distinct
    /// keys and equal-bit NaNs group together. Join code must still apply the
    /// "null never matches" rule itself; for grouping, `Null` tokens equal
    /// `Null` tokens so missing values form their own partition.
    pub(crate) fn key_token(&self) -> KeyToken {
        match self {
            Value::Null => KeyToken::Null,
            Value::Int64(v) => KeyToken::Int(*v),
            Value::Float64(v) => KeyToken::Float(v.to_bits()),
            Value::Bool(v) => KeyToken::Bool(*v),
            Value::Utf8(s) => KeyToken::Str(s.clone()),
            Value::Date(d) => KeyToken::Date(*d),
        }
    }
}

/// Display renders the value the way the text table does; `Null` prints as `NA`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NA"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Utf8(s) => write!(f, "{s}"),
            Value::Date(d) => write!(f, "{d}"),
        }
    }
}

/// Hashable key form of a [`Value`]. See [`Value::key_token`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum KeyToken {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Str(String),
    Date(NaiveDate),
}

/// In-memory relation: ordered typed columns, ordered rows.
///
/// Rows are stored row-major as `Vec<Vec<Value>>`, positionally aligned with
/// the schema fields. [`Relation::new`] enforces the shape invariant (unique
/// column names, every row exactly as wide as the schema); after construction
/// no method mutates the relation, so shared references may be used from
/// multiple threads without synchronization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    schema: Schema,
    rows: Vec<Vec<Value>>,
}

impl Relation {
    /// Construct a relation, validating the shape invariant.
    ///
    /// Fails with [`RelationError::SchemaMismatch`] if two fields share a name
    /// or if any row's length differs from the schema's column count.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> RelationResult<Self> {
        for (i, field) in schema.fields.iter().enumerate() {
            if schema.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(RelationError::SchemaMismatch {
                    message: format!("duplicate column name '{}'", field.name),
                });
            }
        }
        let width = schema.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(RelationError::SchemaMismatch {
                    message: format!(
                        "row {i} has {} values but the schema declares {width} columns",
                        row.len()
                    ),
                });
            }
        }
        Ok(Self { schema, rows })
    }

    /// Construct a relation whose shape the caller has already established.
    ///
    /// Used by operations that build rows directly from a schema they just
    /// assembled; the invariant is still checked in debug builds.
    pub(crate) fn new_unchecked(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == schema.len()));
        Self { schema, rows }
    }

    /// The relation's schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The relation's rows, in order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.field_names().collect()
    }

    /// A single cell, by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.schema.index_of(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Project and/or reorder columns by name.
    ///
    /// Fails with [`RelationError::InvalidColumn`] if any name is absent.
    pub fn select_columns(&self, names: &[&str]) -> RelationResult<Relation> {
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx =
                self.schema
                    .index_of(name)
                    .ok_or_else(|| RelationError::InvalidColumn {
                        operation: "select_columns",
                        column: (*name).to_string(),
                    })?;
            indices.push(idx);
        }
        let fields = indices
            .iter()
            .map(|&i| self.schema.fields[i].clone())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Relation::new(Schema::new(fields), rows)
    }

    /// A new relation containing only rows matching `predicate`.
    ///
    /// The returned relation keeps the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Relation
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }
}

/// Renders an aligned text table; `Null` cells print as `NA`.
impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self
            .schema
            .fields
            .iter()
            .map(|field| field.name.len())
            .collect();
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect())
            .collect();
        for row in &rendered {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
        }

        for (i, field) in self.schema.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "  ")?;
            }
            write!(f, "{:<w$}", field.name, w = widths[i])?;
        }
        for row in &rendered {
            writeln!(f)?;
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    write!(f, "  ")?;
                }
                write!(f, "{:<w$}", cell, w = widths[i])?;
            }
        }
        Ok(())
    }
}
