//! Group-by partitioning.

use std::collections::HashMap;

use crate::error::{RelationError, RelationResult};
use crate::types::{KeyToken, Relation, Value};

/// One partition: the key's values and the input row indices sharing them.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Key column values identifying this partition, in key-column order.
    pub key: Vec<Value>,
    /// Input row indices belonging to this partition, in input order.
    pub rows: Vec<usize>,
}

/// A relation partitioned by one or more key columns.
///
/// Partitions are pairwise disjoint, their row indices union to all input
/// rows, and they appear in first-occurrence order of the key's distinct
/// value combinations. Missing key values form their own partition (`Null`
/// groups with `Null`); they are never dropped.
#[derive(Debug, Clone)]
pub struct GroupedRelation<'a> {
    relation: &'a Relation,
    key_columns: Vec<String>,
    groups: Vec<Group>,
}

impl<'a> GroupedRelation<'a> {
    /// The underlying relation.
    pub fn relation(&self) -> &'a Relation {
        self.relation
    }

    /// The key column names, in the order given to [`group_by`].
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    /// The partitions, in first-occurrence order.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Number of partitions.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no partitions (the input had no rows).
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Partition `relation` by the values of `key_columns`.
///
/// Fails with [`RelationError::InvalidColumn`] if a key column is absent.
pub fn group_by<'a>(
    relation: &'a Relation,
    key_columns: &[&str],
) -> RelationResult<GroupedRelation<'a>> {
    let schema = relation.schema();
    let mut key_indices = Vec::with_capacity(key_columns.len());
    for name in key_columns {
        let idx = schema
            .index_of(name)
            .ok_or_else(|| RelationError::InvalidColumn {
                operation: "group_by",
                column: (*name).to_string(),
            })?;
        key_indices.push(idx);
    }

    let mut groups: Vec<Group> = Vec::new();
    let mut slots: HashMap<Vec<KeyToken>, usize> = HashMap::new();
    for (row_idx, row) in relation.rows().iter().enumerate() {
        let tokens: Vec<KeyToken> = key_indices.iter().map(|&i| row[i].key_token()).collect();
        match slots.get(&tokens) {
            Some(&slot) => groups[slot].rows.push(row_idx),
            None => {
                slots.insert(tokens, groups.len());
                groups.push(Group {
                    key: key_indices.iter().map(|&i| row[i].clone()).collect(),
                    rows: vec![row_idx],
                });
            }
        }
    }

    Ok(GroupedRelation {
        relation,
        key_columns: key_columns.iter().map(|s| s.to_string()).collect(),
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::group_by;
    use crate::types::{DataType, Field, Relation, Schema, Value};

    fn sleep_relation() -> Relation {
        let schema = Schema::new(vec![
            Field::new("vore", DataType::Utf8),
            Field::new("sleep_total", DataType::Float64),
        ]);
        Relation::new(
            schema,
            vec![
                vec![Value::Utf8("carni".to_string()), Value::Float64(12.0)],
                vec![Value::Utf8("herbi".to_string()), Value::Float64(14.4)],
                vec![Value::Utf8("carni".to_string()), Value::Float64(8.0)],
                vec![Value::Null, Value::Float64(10.0)],
                vec![Value::Null, Value::Float64(9.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn groups_follow_first_occurrence_order() {
        let rel = sleep_relation();
        let grouped = group_by(&rel, &["vore"]).unwrap();
        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped.groups()[0].key, vec![Value::Utf8("carni".to_string())]);
        assert_eq!(grouped.groups()[1].key, vec![Value::Utf8("herbi".to_string())]);
        assert_eq!(grouped.groups()[2].key, vec![Value::Null]);
    }

    #[test]
    fn missing_keys_form_their_own_partition() {
        let rel = sleep_relation();
        let grouped = group_by(&rel, &["vore"]).unwrap();
        assert_eq!(grouped.groups()[2].rows, vec![3, 4]);
    }

    #[test]
    fn partitions_are_disjoint_and_cover_all_rows() {
        let rel = sleep_relation();
        let grouped = group_by(&rel, &["vore"]).unwrap();
        let mut all: Vec<usize> = grouped
            .groups()
            .iter()
            .flat_map(|g| g.rows.iter().copied())
            .collect();
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn multi_column_keys_combine() {
        let schema = Schema::new(vec![
            Field::new("a", DataType::Int64),
            Field::new("b", DataType::Int64),
        ]);
        let rel = Relation::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Int64(1)],
                vec![Value::Int64(1), Value::Int64(2)],
                vec![Value::Int64(1), Value::Int64(1)],
            ],
        )
        .unwrap();
        let grouped = group_by(&rel, &["a", "b"]).unwrap();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.groups()[0].rows, vec![0, 2]);
    }

    #[test]
    fn group_by_fails_on_unknown_column() {
        let rel = sleep_relation();
        let err = group_by(&rel, &["nope"]).unwrap_err();
        assert!(err.to_string().contains("group_by: column 'nope' not found"));
    }
}
