//! Column merging.

use crate::error::{RelationError, RelationResult};
use crate::types::{DataType, Field, Relation, Schema, Value};

/// Merge several columns into one `Utf8` column joined by a delimiter.
///
/// The string forms of the listed source columns are joined with `delimiter`
/// into a new column named `target_name`, placed at the position of the first
/// source column; the other source columns are dropped. A `Null` source value
/// contributes the string `NA`, matching how values print.
///
/// Errors:
///
/// - [`RelationError::InvalidColumn`] if a source column is absent.
/// - [`RelationError::SchemaMismatch`] if `source_names` is empty or lists a
///   column twice.
/// - [`RelationError::NameCollision`] if `target_name` collides with a column
///   that is not among the sources.
pub fn unite(
    relation: &Relation,
    target_name: &str,
    source_names: &[&str],
    delimiter: &str,
) -> RelationResult<Relation> {
    let schema = relation.schema();
    if source_names.is_empty() {
        return Err(RelationError::SchemaMismatch {
            message: "unite: at least one source column is required".to_string(),
        });
    }

    let mut source_indices = Vec::with_capacity(source_names.len());
    for (i, name) in source_names.iter().enumerate() {
        if source_names[..i].contains(name) {
            return Err(RelationError::SchemaMismatch {
                message: format!("unite: source column '{name}' listed twice"),
            });
        }
        let idx = schema
            .index_of(name)
            .ok_or_else(|| RelationError::InvalidColumn {
                operation: "unite",
                column: (*name).to_string(),
            })?;
        source_indices.push(idx);
    }

    let retained_collision = schema
        .fields
        .iter()
        .enumerate()
        .any(|(i, f)| !source_indices.contains(&i) && f.name == target_name);
    if retained_collision {
        return Err(RelationError::NameCollision {
            operation: "unite",
            column: target_name.to_string(),
        });
    }

    let first_source = source_indices[0];
    let mut fields = Vec::with_capacity(schema.len() + 1 - source_indices.len());
    for (i, field) in schema.fields.iter().enumerate() {
        if i == first_source {
            fields.push(Field::new(target_name, DataType::Utf8));
        } else if !source_indices.contains(&i) {
            fields.push(field.clone());
        }
    }

    let mut rows = Vec::with_capacity(relation.row_count());
    for row in relation.rows() {
        let joined = source_indices
            .iter()
            .map(|&i| row[i].to_string())
            .collect::<Vec<_>>()
            .join(delimiter);
        let mut out = Vec::with_capacity(fields.len());
        for (i, value) in row.iter().enumerate() {
            if i == first_source {
                out.push(Value::Utf8(joined.clone()));
            } else if !source_indices.contains(&i) {
                out.push(value.clone());
            }
        }
        rows.push(out);
    }

    Ok(Relation::new_unchecked(Schema::new(fields), rows))
}
