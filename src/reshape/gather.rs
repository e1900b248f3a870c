//! Wide-to-long reshape.

use crate::error::{RelationError, RelationResult};
use crate::select::ColumnSelector;
use crate::types::{DataType, Field, Relation, Schema, Value};

/// Gather a selection of columns into `(key, value)` observation rows.
///
/// The selected columns are removed and replaced by two new columns: `key_name`
/// holds the original column's name (as `Utf8`), `value_name` holds that
/// column's value for the row. Non-selected columns are retained in their
/// original order (then key, then value) and repeated once per selected
/// column, so an `r`-row input gathered over `n` columns yields `r * n` rows.
/// Output rows follow input row order, expanding each input row across the
/// selected columns in resolved order.
///
/// Errors:
///
/// - [`RelationError::EmptySelection`] if `selector` resolves to zero columns.
/// - [`RelationError::NameCollision`] if `key_name` or `value_name` is already
///   a retained column name, or if the two are equal.
/// - [`RelationError::SchemaMismatch`] if the selected columns do not share a
///   single [`DataType`] (one typed value column cannot hold mixed kinds).
pub fn gather(
    relation: &Relation,
    key_name: &str,
    value_name: &str,
    selector: &ColumnSelector,
) -> RelationResult<Relation> {
    let schema = relation.schema();
    let selected = selector.resolve(schema)?;
    if selected.is_empty() {
        return Err(RelationError::EmptySelection {
            operation: "gather",
        });
    }

    let mut selected_indices = Vec::with_capacity(selected.len());
    for name in &selected {
        let idx = schema
            .index_of(name)
            .ok_or_else(|| RelationError::InvalidColumn {
                operation: "gather",
                column: name.clone(),
            })?;
        selected_indices.push(idx);
    }
    let retained_indices: Vec<usize> = (0..schema.len())
        .filter(|i| !selected_indices.contains(i))
        .collect();

    if key_name == value_name {
        return Err(RelationError::NameCollision {
            operation: "gather",
            column: key_name.to_string(),
        });
    }
    for &i in &retained_indices {
        let name = &schema.fields[i].name;
        if name == key_name || name == value_name {
            return Err(RelationError::NameCollision {
                operation: "gather",
                column: name.clone(),
            });
        }
    }

    let value_type = common_type(schema, &selected_indices)?;

    let mut fields: Vec<Field> = retained_indices
        .iter()
        .map(|&i| schema.fields[i].clone())
        .collect();
    fields.push(Field::new(key_name, DataType::Utf8));
    fields.push(Field::new(value_name, value_type));

    let mut rows = Vec::with_capacity(relation.row_count() * selected_indices.len());
    for row in relation.rows() {
        for &col in &selected_indices {
            let mut out = Vec::with_capacity(fields.len());
            for &i in &retained_indices {
                out.push(row[i].clone());
            }
            out.push(Value::Utf8(schema.fields[col].name.clone()));
            out.push(row[col].clone());
            rows.push(out);
        }
    }

    Ok(Relation::new_unchecked(Schema::new(fields), rows))
}

fn common_type(schema: &Schema, selected: &[usize]) -> RelationResult<DataType> {
    let first = &schema.fields[selected[0]];
    for &i in &selected[1..] {
        let field = &schema.fields[i];
        if field.data_type != first.data_type {
            return Err(RelationError::SchemaMismatch {
                message: format!(
                    "gather: selected columns '{}' ({:?}) and '{}' ({:?}) have different types",
                    first.name, first.data_type, field.name, field.data_type
                ),
            });
        }
    }
    Ok(first.data_type)
}
