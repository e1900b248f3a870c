//! Column splitting.

use crate::error::{RelationError, RelationResult};
use crate::types::{DataType, Field, Relation, Schema, Value};

/// Split `source_column` into several columns by a delimiter.
///
/// Each row's value is rendered to its string form and split by `delimiter`;
/// the split must produce exactly `target_names.len()` pieces. The target
/// columns are `Utf8` and replace the source column in place (same position).
/// A `Null` source value yields `Null` in every target rather than an arity
/// error (missing stays missing).
///
/// Errors:
///
/// - [`RelationError::InvalidColumn`] if `source_column` is absent.
/// - [`RelationError::SchemaMismatch`] if `target_names` is empty or contains
///   a duplicate.
/// - [`RelationError::NameCollision`] if a target name collides with a
///   retained column (a target may reuse the source column's own name).
/// - [`RelationError::SplitArityMismatch`] if any row splits into the wrong
///   number of pieces; the error names the column and the offending value.
pub fn separate(
    relation: &Relation,
    source_column: &str,
    target_names: &[&str],
    delimiter: &str,
) -> RelationResult<Relation> {
    let schema = relation.schema();
    let source_idx =
        schema
            .index_of(source_column)
            .ok_or_else(|| RelationError::InvalidColumn {
                operation: "separate",
                column: source_column.to_string(),
            })?;
    if target_names.is_empty() {
        return Err(RelationError::SchemaMismatch {
            message: "separate: at least one target column is required".to_string(),
        });
    }
    for (i, name) in target_names.iter().enumerate() {
        if target_names[..i].contains(name) {
            return Err(RelationError::SchemaMismatch {
                message: format!("separate: duplicate target column '{name}'"),
            });
        }
        let collides = schema
            .fields
            .iter()
            .enumerate()
            .any(|(j, f)| j != source_idx && f.name == *name);
        if collides {
            return Err(RelationError::NameCollision {
                operation: "separate",
                column: (*name).to_string(),
            });
        }
    }

    let mut fields = Vec::with_capacity(schema.len() - 1 + target_names.len());
    for (i, field) in schema.fields.iter().enumerate() {
        if i == source_idx {
            fields.extend(
                target_names
                    .iter()
                    .map(|name| Field::new(*name, DataType::Utf8)),
            );
        } else {
            fields.push(field.clone());
        }
    }

    let expected = target_names.len();
    let mut rows = Vec::with_capacity(relation.row_count());
    for row in relation.rows() {
        let mut out = Vec::with_capacity(fields.len());
        for (i, value) in row.iter().enumerate() {
            if i != source_idx {
                out.push(value.clone());
                continue;
            }
            match value {
                Value::Null => out.extend(std::iter::repeat_n(Value::Null, expected)),
                other => {
                    let text = other.to_string();
                    let pieces: Vec<&str> = text.split(delimiter).collect();
                    if pieces.len() != expected {
                        let actual = pieces.len();
                        return Err(RelationError::SplitArityMismatch {
                            column: source_column.to_string(),
                            value: text,
                            expected,
                            actual,
                        });
                    }
                    out.extend(pieces.into_iter().map(|p| Value::Utf8(p.to_string())));
                }
            }
        }
        rows.push(out);
    }

    Ok(Relation::new_unchecked(Schema::new(fields), rows))
}
