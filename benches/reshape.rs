use criterion::{Criterion, black_box, criterion_group, criterion_main};
use reltab::reshape::{gather, spread};
use reltab::select::ColumnSelector;
use reltab::types::{DataType, Field, Relation, Schema, Value};

fn wide_prices(rows: usize, companies: usize) -> Relation {
    let mut fields = vec![Field::new("time", DataType::Int64)];
    for c in 0..companies {
        fields.push(Field::new(format!("company_{c}"), DataType::Float64));
    }
    let data = (0..rows)
        .map(|r| {
            let mut row = vec![Value::Int64(r as i64)];
            for c in 0..companies {
                row.push(Value::Float64(100.0 + (r * companies + c) as f64));
            }
            row
        })
        .collect();
    Relation::new(Schema::new(fields), data).unwrap()
}

fn bench_gather(c: &mut Criterion) {
    let wide = wide_prices(1_000, 20);
    let selector = ColumnSelector::StartsWith("company_".to_string());
    c.bench_function("gather 1000x20", |b| {
        b.iter(|| gather(black_box(&wide), "company", "price", &selector).unwrap())
    });
}

fn bench_spread(c: &mut Criterion) {
    let wide = wide_prices(1_000, 20);
    let selector = ColumnSelector::StartsWith("company_".to_string());
    let long = gather(&wide, "company", "price", &selector).unwrap();
    c.bench_function("spread 20000 long rows", |b| {
        b.iter(|| spread(black_box(&long), "company", "price").unwrap())
    });
}

fn bench_round_trip(c: &mut Criterion) {
    let wide = wide_prices(200, 20);
    let selector = ColumnSelector::StartsWith("company_".to_string());
    c.bench_function("gather then spread 200x20", |b| {
        b.iter(|| {
            let long = gather(black_box(&wide), "company", "price", &selector).unwrap();
            spread(&long, "company", "price").unwrap()
        })
    });
}

criterion_group!(benches, bench_gather, bench_spread, bench_round_trip);
criterion_main!(benches);
