//! Summary-statistic reducers.

use std::collections::HashSet;

use crate::aggregate::group::GroupedRelation;
use crate::error::{RelationError, RelationResult};
use crate::types::{DataType, Field, Relation, Schema, Value};

/// Built-in reducers over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// Arithmetic mean (`Float64`).
    Mean,
    /// Minimum value (preserves the column type).
    Min,
    /// Maximum value (preserves the column type).
    Max,
    /// Sum (preserves the column type).
    Sum,
    /// Number of rows, missing included (`Int64`).
    Count,
    /// Number of distinct values, `Null` counting as one (`Int64`).
    CountDistinct,
    /// First value in row order (preserves the column type).
    First,
    /// Last value in row order (preserves the column type).
    Last,
    /// Sample standard deviation, n−1 denominator (`Float64`).
    StdDev,
}

impl Reducer {
    fn is_numeric(&self) -> bool {
        matches!(
            self,
            Reducer::Mean | Reducer::Min | Reducer::Max | Reducer::Sum | Reducer::StdDev
        )
    }
}

/// How a reducer treats missing input values.
///
/// The default is [`MissingPolicy::Propagate`]: any `Null` input makes the
/// result `Null`. Opting into [`MissingPolicy::Skip`] ignores `Null`s instead;
/// if that leaves zero eligible values the result is `Null`: an empty
/// reduction is reported as a missing value, never as an error. Count-family
/// reducers count every row regardless of the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// Any missing input makes the result missing.
    #[default]
    Propagate,
    /// Ignore missing inputs.
    Skip,
}

/// One named aggregation: apply `reducer` to `column`, call the result `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggSpec {
    /// Output column name.
    pub output: String,
    /// Input column name.
    pub column: String,
    /// Reducer to apply.
    pub reducer: Reducer,
    /// Missing-value handling.
    pub missing: MissingPolicy,
}

impl AggSpec {
    /// Create a spec with the default [`MissingPolicy::Propagate`].
    pub fn new(output: impl Into<String>, column: impl Into<String>, reducer: Reducer) -> Self {
        Self {
            output: output.into(),
            column: column.into(),
            reducer,
            missing: MissingPolicy::default(),
        }
    }

    /// Switch this spec to [`MissingPolicy::Skip`] (the `na.rm = TRUE` of the
    /// tutorial world, made explicit).
    pub fn skip_missing(mut self) -> Self {
        self.missing = MissingPolicy::Skip;
        self
    }
}

/// Reduce a whole relation to a single summary row.
///
/// Errors: [`RelationError::InvalidColumn`] if a spec's input column is
/// absent; [`RelationError::NameCollision`] if two specs share an output name;
/// [`RelationError::SchemaMismatch`] if a numeric reducer targets a
/// non-numeric column.
pub fn summarize(relation: &Relation, specs: &[AggSpec]) -> RelationResult<Relation> {
    let fields = output_fields(relation, specs, &[])?;
    let all_rows: Vec<usize> = (0..relation.row_count()).collect();
    let row = specs
        .iter()
        .map(|spec| reduce_column(relation, &all_rows, spec))
        .collect::<RelationResult<Vec<Value>>>()?;
    Ok(Relation::new_unchecked(Schema::new(fields), vec![row]))
}

/// Reduce each partition of a grouped relation to one summary row.
///
/// The key columns are prepended to the summary columns; rows appear in
/// partition (first-occurrence) order. Errors as in [`summarize`], plus
/// [`RelationError::NameCollision`] if an output name collides with a key
/// column.
pub fn summarize_groups(
    grouped: &GroupedRelation<'_>,
    specs: &[AggSpec],
) -> RelationResult<Relation> {
    let relation = grouped.relation();
    let schema = relation.schema();

    let mut fields = Vec::with_capacity(grouped.key_columns().len() + specs.len());
    for name in grouped.key_columns() {
        let field = schema
            .field(name)
            .ok_or_else(|| RelationError::InvalidColumn {
                operation: "summarize",
                column: name.clone(),
            })?;
        fields.push(field.clone());
    }
    fields.extend(output_fields(relation, specs, grouped.key_columns())?);

    let mut rows = Vec::with_capacity(grouped.len());
    for group in grouped.groups() {
        let mut row = group.key.clone();
        for spec in specs {
            row.push(reduce_column(relation, &group.rows, spec)?);
        }
        rows.push(row);
    }

    Ok(Relation::new_unchecked(Schema::new(fields), rows))
}

fn output_fields(
    relation: &Relation,
    specs: &[AggSpec],
    reserved: &[String],
) -> RelationResult<Vec<Field>> {
    let mut names: HashSet<&str> = reserved.iter().map(String::as_str).collect();
    let mut fields = Vec::with_capacity(specs.len());
    for spec in specs {
        let input = relation
            .schema()
            .field(&spec.column)
            .ok_or_else(|| RelationError::InvalidColumn {
                operation: "summarize",
                column: spec.column.clone(),
            })?;
        if spec.reducer.is_numeric() && !input.data_type.is_numeric() {
            return Err(RelationError::SchemaMismatch {
                message: format!(
                    "summarize: reducer {:?} requires a numeric column, but '{}' is {:?}",
                    spec.reducer, input.name, input.data_type
                ),
            });
        }
        if !names.insert(&spec.output) {
            return Err(RelationError::NameCollision {
                operation: "summarize",
                column: spec.output.clone(),
            });
        }
        let data_type = match spec.reducer {
            Reducer::Mean | Reducer::StdDev => DataType::Float64,
            Reducer::Count | Reducer::CountDistinct => DataType::Int64,
            Reducer::Sum | Reducer::Min | Reducer::Max | Reducer::First | Reducer::Last => {
                input.data_type
            }
        };
        fields.push(Field::new(spec.output.clone(), data_type));
    }
    Ok(fields)
}

fn reduce_column(relation: &Relation, rows: &[usize], spec: &AggSpec) -> RelationResult<Value> {
    let idx = relation
        .schema()
        .index_of(&spec.column)
        .ok_or_else(|| RelationError::InvalidColumn {
            operation: "summarize",
            column: spec.column.clone(),
        })?;
    let values = rows.iter().map(|&r| &relation.rows()[r][idx]);

    match spec.reducer {
        Reducer::Count => Ok(Value::Int64(rows.len() as i64)),
        Reducer::CountDistinct => {
            let distinct: HashSet<_> = values.map(|v| v.key_token()).collect();
            Ok(Value::Int64(distinct.len() as i64))
        }
        Reducer::First | Reducer::Last => {
            let mut iter = values;
            let picked = match (spec.reducer, spec.missing) {
                (Reducer::First, MissingPolicy::Propagate) => iter.next(),
                (Reducer::Last, MissingPolicy::Propagate) => iter.last(),
                (Reducer::First, MissingPolicy::Skip) => iter.find(|v| !v.is_null()),
                (Reducer::Last, MissingPolicy::Skip) => iter.filter(|v| !v.is_null()).last(),
                _ => unreachable!("outer match covers first/last only"),
            };
            Ok(picked.cloned().unwrap_or(Value::Null))
        }
        Reducer::Sum | Reducer::Min | Reducer::Max | Reducer::Mean | Reducer::StdDev => {
            let mut eligible: Vec<&Value> = Vec::with_capacity(rows.len());
            for value in values {
                if value.is_null() {
                    match spec.missing {
                        MissingPolicy::Propagate => return Ok(Value::Null),
                        MissingPolicy::Skip => continue,
                    }
                }
                eligible.push(value);
            }
            if eligible.is_empty() {
                // Empty reduction is a missing result, not an error.
                return Ok(Value::Null);
            }
            let input_type = relation.schema().fields[idx].data_type;
            Ok(reduce_numeric(&eligible, input_type, spec.reducer))
        }
    }
}

fn reduce_numeric(values: &[&Value], input_type: DataType, reducer: Reducer) -> Value {
    match reducer {
        Reducer::Sum | Reducer::Min | Reducer::Max if input_type == DataType::Int64 => {
            let ints = values.iter().filter_map(|v| match v {
                Value::Int64(x) => Some(*x),
                _ => None,
            });
            let out = match reducer {
                Reducer::Sum => ints.sum(),
                Reducer::Min => ints.fold(i64::MAX, i64::min),
                Reducer::Max => ints.fold(i64::MIN, i64::max),
                _ => unreachable!(),
            };
            Value::Int64(out)
        }
        Reducer::Sum | Reducer::Min | Reducer::Max => {
            let floats = values.iter().filter_map(|v| v.as_f64());
            let out = match reducer {
                Reducer::Sum => floats.sum(),
                Reducer::Min => floats.fold(f64::INFINITY, f64::min),
                Reducer::Max => floats.fold(f64::NEG_INFINITY, f64::max),
                _ => unreachable!(),
            };
            Value::Float64(out)
        }
        Reducer::Mean => {
            let (sum, n) = sum_count(values);
            Value::Float64(sum / n as f64)
        }
        Reducer::StdDev => {
            let (sum, n) = sum_count(values);
            if n < 2 {
                // Sample standard deviation is undefined for a single value.
                return Value::Null;
            }
            let mean = sum / n as f64;
            let ss: f64 = values
                .iter()
                .filter_map(|v| v.as_f64())
                .map(|x| (x - mean) * (x - mean))
                .sum();
            Value::Float64((ss / (n as f64 - 1.0)).sqrt())
        }
        _ => unreachable!("count/first/last handled before reduce_numeric"),
    }
}

fn sum_count(values: &[&Value]) -> (f64, usize) {
    let mut sum = 0.0;
    let mut n = 0usize;
    for v in values {
        if let Some(x) = v.as_f64() {
            sum += x;
            n += 1;
        }
    }
    (sum, n)
}
