//! Relational joins on a shared equality key.
//!
//! All six verbs take two relations `x` and `y` and one or more key columns
//! present in both, matched by exact equality on every key column at once. A
//! missing key value never matches anything, including another missing value.
//!
//! Row order is deterministic: rows originating from `x` keep `x`'s input
//! order (expanded in place when a key matches several `y` rows), and any
//! `y`-only rows (`right`/`full`) follow in `y`'s input order.
//!
//! ## Example: award nominations per movie
//!
//! ```rust
//! use reltab::join::{anti_join, inner_join};
//! use reltab::types::{DataType, Field, Relation, Schema, Value};
//!
//! # fn main() -> Result<(), reltab::RelationError> {
//! let screenings = Relation::new(
//!     Schema::new(vec![
//!         Field::new("movie", DataType::Utf8),
//!         Field::new("week", DataType::Int64),
//!     ]),
//!     vec![
//!         vec![Value::Utf8("Room".to_string()), Value::Int64(1)],
//!         vec![Value::Utf8("Room".to_string()), Value::Int64(2)],
//!     ],
//! )?;
//! let nominations = Relation::new(
//!     Schema::new(vec![
//!         Field::new("movie", DataType::Utf8),
//!         Field::new("category", DataType::Utf8),
//!     ]),
//!     vec![vec![
//!         Value::Utf8("Room".to_string()),
//!         Value::Utf8("Best Picture".to_string()),
//!     ]],
//! )?;
//!
//! let matched = inner_join(&screenings, &nominations, &["movie"])?;
//! assert_eq!(matched.row_count(), 2);
//!
//! let unmatched = anti_join(&screenings, &nominations, &["movie"])?;
//! assert_eq!(unmatched.row_count(), 0);
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

use crate::error::{RelationError, RelationResult};
use crate::types::{KeyToken, Relation, Schema, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
    Semi,
    Anti,
}

/// Inner join: one output row per matching `(x, y)` row pair.
///
/// A key value appearing `m` times in `x` and `n` times in `y` contributes
/// `m * n` rows. Output columns are `x`'s columns followed by `y`'s non-key
/// columns (the key columns are not duplicated).
pub fn inner_join(x: &Relation, y: &Relation, keys: &[&str]) -> RelationResult<Relation> {
    join(x, y, keys, JoinKind::Inner)
}

/// Left join: every inner-join row, plus one row per unmatched `x` row with
/// `y`'s non-key columns filled with `Null`.
pub fn left_join(x: &Relation, y: &Relation, keys: &[&str]) -> RelationResult<Relation> {
    join(x, y, keys, JoinKind::Left)
}

/// Right join: every inner-join row, plus one row per unmatched `y` row with
/// `x`'s non-key columns filled with `Null`. Column order still follows
/// `x`-then-`y`; key values for `y`-only rows come from `y`.
pub fn right_join(x: &Relation, y: &Relation, keys: &[&str]) -> RelationResult<Relation> {
    join(x, y, keys, JoinKind::Right)
}

/// Full join: inner-join rows plus unmatched rows from both sides, none
/// duplicated. Unmatched `y` rows follow all `x`-originating rows.
pub fn full_join(x: &Relation, y: &Relation, keys: &[&str]) -> RelationResult<Relation> {
    join(x, y, keys, JoinKind::Full)
}

/// Semi join: each `x` row whose key has at least one match in `y`, once,
/// with `x`'s columns only.
pub fn semi_join(x: &Relation, y: &Relation, keys: &[&str]) -> RelationResult<Relation> {
    join(x, y, keys, JoinKind::Semi)
}

/// Anti join: each `x` row whose key has no match in `y`, with `x`'s columns
/// only. A missing key value never matches, so such rows are always kept.
pub fn anti_join(x: &Relation, y: &Relation, keys: &[&str]) -> RelationResult<Relation> {
    join(x, y, keys, JoinKind::Anti)
}

fn join(x: &Relation, y: &Relation, keys: &[&str], kind: JoinKind) -> RelationResult<Relation> {
    let (x_key_indices, y_key_indices) = key_indices(x.schema(), y.schema(), keys)?;

    let y_other_indices: Vec<usize> = (0..y.schema().len())
        .filter(|i| !y_key_indices.contains(i))
        .collect();

    // Output schema (inner/left/right/full): x's columns then y's non-key columns.
    if matches!(kind, JoinKind::Inner | JoinKind::Left | JoinKind::Right | JoinKind::Full) {
        for &i in &y_other_indices {
            let name = &y.schema().fields[i].name;
            if x.schema().index_of(name).is_some() {
                return Err(RelationError::NameCollision {
                    operation: "join",
                    column: name.clone(),
                });
            }
        }
    }

    // Hash-probe: build a multimap over y's key values, skipping missing keys
    // so that Null never matches Null.
    let mut y_map: HashMap<Vec<KeyToken>, Vec<usize>> = HashMap::new();
    for (row_idx, row) in y.rows().iter().enumerate() {
        if let Some(tokens) = key_tokens(row, &y_key_indices) {
            y_map.entry(tokens).or_default().push(row_idx);
        }
    }

    if matches!(kind, JoinKind::Semi | JoinKind::Anti) {
        let want_match = kind == JoinKind::Semi;
        let rows = x
            .rows()
            .iter()
            .filter(|row| {
                let matched = key_tokens(row, &x_key_indices)
                    .is_some_and(|tokens| y_map.contains_key(&tokens));
                matched == want_match
            })
            .cloned()
            .collect();
        return Ok(Relation::new_unchecked(x.schema().clone(), rows));
    }

    let mut fields = x.schema().fields.clone();
    fields.extend(y_other_indices.iter().map(|&i| y.schema().fields[i].clone()));
    let schema = Schema::new(fields);
    let width = schema.len();

    let mut y_matched = vec![false; y.row_count()];
    let mut rows: Vec<Vec<Value>> = Vec::new();

    for x_row in x.rows() {
        let matches = key_tokens(x_row, &x_key_indices).and_then(|tokens| y_map.get(&tokens));
        match matches {
            Some(y_rows) => {
                for &y_idx in y_rows {
                    y_matched[y_idx] = true;
                    let mut out = Vec::with_capacity(width);
                    out.extend(x_row.iter().cloned());
                    out.extend(y_other_indices.iter().map(|&i| y.rows()[y_idx][i].clone()));
                    rows.push(out);
                }
            }
            None => {
                if matches!(kind, JoinKind::Left | JoinKind::Full) {
                    let mut out = Vec::with_capacity(width);
                    out.extend(x_row.iter().cloned());
                    out.extend(std::iter::repeat_n(Value::Null, y_other_indices.len()));
                    rows.push(out);
                }
            }
        }
    }

    if matches!(kind, JoinKind::Right | JoinKind::Full) {
        for (y_idx, y_row) in y.rows().iter().enumerate() {
            if y_matched[y_idx] {
                continue;
            }
            let mut out = vec![Value::Null; x.schema().len()];
            // Key values live in x's column positions; take them from y.
            for (k, &x_pos) in x_key_indices.iter().enumerate() {
                out[x_pos] = y_row[y_key_indices[k]].clone();
            }
            out.extend(y_other_indices.iter().map(|&i| y_row[i].clone()));
            rows.push(out);
        }
    }

    Ok(Relation::new_unchecked(schema, rows))
}

fn key_indices(
    x: &Schema,
    y: &Schema,
    keys: &[&str],
) -> RelationResult<(Vec<usize>, Vec<usize>)> {
    if keys.is_empty() {
        return Err(RelationError::SchemaMismatch {
            message: "join: at least one key column is required".to_string(),
        });
    }
    let mut x_indices = Vec::with_capacity(keys.len());
    let mut y_indices = Vec::with_capacity(keys.len());
    for name in keys {
        let xi = x.index_of(name).ok_or_else(|| RelationError::InvalidColumn {
            operation: "join",
            column: (*name).to_string(),
        })?;
        let yi = y.index_of(name).ok_or_else(|| RelationError::InvalidColumn {
            operation: "join",
            column: (*name).to_string(),
        })?;
        let (xt, yt) = (x.fields[xi].data_type, y.fields[yi].data_type);
        if xt != yt {
            return Err(RelationError::SchemaMismatch {
                message: format!(
                    "join: key column '{name}' is {xt:?} on the left but {yt:?} on the right"
                ),
            });
        }
        x_indices.push(xi);
        y_indices.push(yi);
    }
    Ok((x_indices, y_indices))
}

/// Key tokens for a row, or `None` if any key value is missing.
fn key_tokens(row: &[Value], indices: &[usize]) -> Option<Vec<KeyToken>> {
    let mut tokens = Vec::with_capacity(indices.len());
    for &i in indices {
        if row[i].is_null() {
            return None;
        }
        tokens.push(row[i].key_token());
    }
    Some(tokens)
}
