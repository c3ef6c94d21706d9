//! Bench request translation: path keys, filter parsing and full
//! statement assembly against a small clustered table.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::json;

use rowgate_core::{
    build_path_predicates, insert_row, parse_where, ColumnType, SelectBuilder, SortSpec, Table,
};

fn events() -> Table {
    Table::builder("metrics", "events")
        .partition_key("tenant", ColumnType::Text)
        .partition_key("day", ColumnType::Date)
        .clustering("at", ColumnType::Timestamp)
        .clustering("seq", ColumnType::BigInt)
        .column("kind", ColumnType::Text)
        .column("payload", ColumnType::Map(Box::new(ColumnType::Text), Box::new(ColumnType::Double)))
        .column("tags", ColumnType::Set(Box::new(ColumnType::Text)))
        .build()
        .expect("valid table")
}

fn bench_path_predicates(c: &mut Criterion) {
    let table = events();
    let segments = ["acme", "2024-05-01", "2024-05-01T10:00:00Z", "42"];
    c.bench_function("path_predicates/full_key", |b| {
        b.iter(|| build_path_predicates(black_box(&table), black_box(&segments)).unwrap())
    });
}

fn bench_parse_where(c: &mut Criterion) {
    let table = events();
    let filter = r#"{"tenant": {"$eq": "acme"}, "day": {"$in": ["2024-05-01", "2024-05-02"]},
                     "at": {"$gte": 1714557600000, "$lt": "2024-05-02T00:00:00Z"},
                     "tags": {"$contains": "prod"}}"#;
    c.bench_function("parse_where/mixed", |b| {
        b.iter(|| parse_where(black_box(filter), black_box(&table)).unwrap())
    });
}

fn bench_select(c: &mut Criterion) {
    let table = events();
    c.bench_function("select/filtered_sorted", |b| {
        b.iter(|| {
            let predicates = parse_where(
                r#"{"tenant": {"$eq": "acme"}, "day": {"$eq": "2024-05-01"}, "kind": {"$ne": "noop"}}"#,
                &table,
            )
            .unwrap();
            SelectBuilder::new(&table)
                .columns(["at", "seq", "kind"])
                .unwrap()
                .filter(predicates)
                .order_by(SortSpec::new().desc("at").asc("seq"))
                .unwrap()
                .page_size(Some(50))
                .build()
                .unwrap()
        })
    });
}

fn bench_insert(c: &mut Criterion) {
    let table = events();
    let row = json!({
        "tenant": "acme",
        "day": "2024-05-01",
        "at": 1714557600000i64,
        "seq": 7,
        "kind": "click",
        "payload": {"x": 1.5, "y": 2.25},
        "tags": ["prod", "web"]
    });
    let row = row.as_object().expect("object").clone();
    c.bench_function("insert/full_row", |b| {
        b.iter(|| insert_row(black_box(&table), black_box(&row)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_path_predicates,
    bench_parse_where,
    bench_select,
    bench_insert
);
criterion_main!(benches);
