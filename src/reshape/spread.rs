//! Long-to-wide reshape.

use std::collections::HashMap;

use crate::error::{RelationError, RelationResult};
use crate::types::{Field, KeyToken, Relation, Schema, Value};

/// Spread `(key, value)` observation rows into one column per key value.
///
/// Rows are grouped by every column except `key_column` and `value_column`.
/// For each distinct value observed in `key_column` across the whole relation
/// (in first-occurrence order) the output gains one column named after that
/// key's string form, typed like `value_column`. A group's cell holds the
/// group's `value_column` entry for that key, or `Null` if the group has no
/// row for it. Output rows follow first-occurrence order of the groups, which
/// makes `spread` the inverse of [`crate::reshape::gather`] up to column order
/// when keys are unique within each group.
///
/// Errors:
///
/// - [`RelationError::InvalidColumn`] if either column is absent.
/// - [`RelationError::DuplicateKey`] if a group holds more than one row for
///   the same key value (the wide cell would be ambiguous; this is rejected,
///   never resolved by picking one).
/// - [`RelationError::SchemaMismatch`] if `key_column` contains `Null` (a
///   missing value cannot name a generated column).
/// - [`RelationError::NameCollision`] if a generated column name collides
///   with a retained column.
pub fn spread(relation: &Relation, key_column: &str, value_column: &str) -> RelationResult<Relation> {
    let schema = relation.schema();
    let key_idx = require(schema, key_column)?;
    let value_idx = require(schema, value_column)?;
    if key_idx == value_idx {
        return Err(RelationError::SchemaMismatch {
            message: format!("spread: key and value are the same column '{key_column}'"),
        });
    }

    let remaining_indices: Vec<usize> = (0..schema.len())
        .filter(|&i| i != key_idx && i != value_idx)
        .collect();
    let remaining_names: Vec<&str> = remaining_indices
        .iter()
        .map(|&i| schema.fields[i].name.as_str())
        .collect();

    // Distinct key values in first-occurrence order across the whole relation.
    let mut key_order: Vec<(KeyToken, String)> = Vec::new();
    let mut key_slot: HashMap<KeyToken, usize> = HashMap::new();
    for row in relation.rows() {
        let key_value = &row[key_idx];
        if key_value.is_null() {
            return Err(RelationError::SchemaMismatch {
                message: format!("spread: key column '{key_column}' contains a missing value"),
            });
        }
        let token = key_value.key_token();
        if !key_slot.contains_key(&token) {
            let name = key_value.to_string();
            if remaining_names.iter().any(|n| *n == name) {
                return Err(RelationError::NameCollision {
                    operation: "spread",
                    column: name,
                });
            }
            key_slot.insert(token.clone(), key_order.len());
            key_order.push((token, name));
        }
    }

    // Partition rows by the remaining columns, first-occurrence order.
    let mut groups: Vec<(Vec<Value>, Vec<Option<Value>>)> = Vec::new();
    let mut group_index: HashMap<Vec<KeyToken>, usize> = HashMap::new();
    for row in relation.rows() {
        let group_tokens: Vec<KeyToken> = remaining_indices
            .iter()
            .map(|&i| row[i].key_token())
            .collect();
        let slot = *group_index.entry(group_tokens).or_insert_with(|| {
            let group_values = remaining_indices.iter().map(|&i| row[i].clone()).collect();
            groups.push((group_values, vec![None; key_order.len()]));
            groups.len() - 1
        });

        let key_pos = key_slot[&row[key_idx].key_token()];
        let (group_values, cells) = &mut groups[slot];
        if cells[key_pos].is_some() {
            let group = group_values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(RelationError::DuplicateKey {
                column: key_column.to_string(),
                key: row[key_idx].to_string(),
                group,
            });
        }
        cells[key_pos] = Some(row[value_idx].clone());
    }

    let value_type = schema.fields[value_idx].data_type;
    let mut fields: Vec<Field> = remaining_indices
        .iter()
        .map(|&i| schema.fields[i].clone())
        .collect();
    for (_, name) in &key_order {
        fields.push(Field::new(name.clone(), value_type));
    }

    let rows = groups
        .into_iter()
        .map(|(mut group_values, cells)| {
            group_values.extend(cells.into_iter().map(|c| c.unwrap_or(Value::Null)));
            group_values
        })
        .collect();

    Ok(Relation::new_unchecked(Schema::new(fields), rows))
}

fn require(schema: &Schema, name: &str) -> RelationResult<usize> {
    schema
        .index_of(name)
        .ok_or_else(|| RelationError::InvalidColumn {
            operation: "spread",
            column: name.to_string(),
        })
}
