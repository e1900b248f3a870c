use reltab::aggregate::{AggSpec, Reducer, group_by, summarize, summarize_groups};
use reltab::types::{DataType, Field, Relation, Schema, Value};

fn msleep() -> Relation {
    let schema = Schema::new(vec![
        Field::new("name", DataType::Utf8),
        Field::new("vore", DataType::Utf8),
        Field::new("sleep_total", DataType::Float64),
    ]);
    let data: [(&str, Option<&str>, Option<f64>); 6] = [
        ("Cheetah", Some("carni"), Some(12.1)),
        ("Cow", Some("herbi"), Some(4.0)),
        ("Dog", Some("carni"), Some(10.1)),
        ("Goat", Some("herbi"), Some(5.3)),
        ("Vesper mouse", None, Some(7.0)),
        ("Mole rat", None, None),
    ];
    let rows = data
        .iter()
        .map(|(name, vore, sleep)| {
            vec![
                Value::Utf8(name.to_string()),
                vore.map(|v| Value::Utf8(v.to_string())).unwrap_or(Value::Null),
                sleep.map(Value::Float64).unwrap_or(Value::Null),
            ]
        })
        .collect();
    Relation::new(schema, rows).unwrap()
}

#[test]
fn partitions_are_disjoint_and_cover_the_input() {
    let rel = msleep();
    let grouped = group_by(&rel, &["vore"]).unwrap();

    let mut seen = vec![false; rel.row_count()];
    for group in grouped.groups() {
        for &row in &group.rows {
            assert!(!seen[row], "row {row} appeared in two partitions");
            seen[row] = true;
        }
    }
    assert!(seen.iter().all(|&s| s), "every row must land in a partition");
}

#[test]
fn missing_group_keys_form_their_own_partition() {
    let rel = msleep();
    let grouped = group_by(&rel, &["vore"]).unwrap();
    assert_eq!(grouped.len(), 3);
    assert_eq!(grouped.groups()[2].key, vec![Value::Null]);
    assert_eq!(grouped.groups()[2].rows.len(), 2);
}

#[test]
fn grouped_summary_has_one_row_per_partition_with_keys_prepended() {
    let rel = msleep();
    let grouped = group_by(&rel, &["vore"]).unwrap();
    let out = summarize_groups(
        &grouped,
        &[
            AggSpec::new("n", "sleep_total", Reducer::Count),
            AggSpec::new("avg_sleep", "sleep_total", Reducer::Mean).skip_missing(),
        ],
    )
    .unwrap();

    assert_eq!(out.column_names(), vec!["vore", "n", "avg_sleep"]);
    assert_eq!(out.row_count(), 3);
    assert_eq!(
        out.rows()[0],
        vec![
            Value::Utf8("carni".to_string()),
            Value::Int64(2),
            Value::Float64((12.1 + 10.1) / 2.0),
        ]
    );
    // The Null-vore partition still counts its missing sleep row.
    assert_eq!(out.rows()[2][1], Value::Int64(2));
    assert_eq!(out.rows()[2][2], Value::Float64(7.0));
}

#[test]
fn propagate_policy_surfaces_missing_inputs() {
    let rel = msleep();
    let grouped = group_by(&rel, &["vore"]).unwrap();
    let out = summarize_groups(
        &grouped,
        &[AggSpec::new("avg_sleep", "sleep_total", Reducer::Mean)],
    )
    .unwrap();

    // carni/herbi have complete data; the Null-vore group contains a missing
    // sleep value and so summarizes to Null under the default policy.
    assert!(matches!(out.rows()[0][1], Value::Float64(_)));
    assert!(matches!(out.rows()[1][1], Value::Float64(_)));
    assert_eq!(out.rows()[2][1], Value::Null);
}

#[test]
fn whole_relation_summary_spans_all_rows() {
    let rel = msleep();
    let out = summarize(
        &rel,
        &[
            AggSpec::new("n", "name", Reducer::Count),
            AggSpec::new("species", "name", Reducer::CountDistinct),
            AggSpec::new("longest", "sleep_total", Reducer::Max).skip_missing(),
            AggSpec::new("shortest", "sleep_total", Reducer::Min).skip_missing(),
        ],
    )
    .unwrap();

    assert_eq!(out.row_count(), 1);
    assert_eq!(
        out.rows()[0],
        vec![
            Value::Int64(6),
            Value::Int64(6),
            Value::Float64(12.1),
            Value::Float64(4.0),
        ]
    );
}

#[test]
fn multi_key_grouping_orders_by_first_occurrence() {
    let schema = Schema::new(vec![
        Field::new("a", DataType::Utf8),
        Field::new("b", DataType::Int64),
        Field::new("v", DataType::Int64),
    ]);
    let rel = Relation::new(
        schema,
        vec![
            vec![
                Value::Utf8("q".to_string()),
                Value::Int64(2),
                Value::Int64(1),
            ],
            vec![
                Value::Utf8("p".to_string()),
                Value::Int64(1),
                Value::Int64(2),
            ],
            vec![
                Value::Utf8("q".to_string()),
                Value::Int64(2),
                Value::Int64(3),
            ],
        ],
    )
    .unwrap();

    let grouped = group_by(&rel, &["a", "b"]).unwrap();
    let out = summarize_groups(&grouped, &[AggSpec::new("total", "v", Reducer::Sum)]).unwrap();

    // ("q", 2) was seen first, so it leads the output.
    assert_eq!(
        out.rows(),
        &[
            vec![
                Value::Utf8("q".to_string()),
                Value::Int64(2),
                Value::Int64(4),
            ],
            vec![
                Value::Utf8("p".to_string()),
                Value::Int64(1),
                Value::Int64(2),
            ],
        ]
    );
}
