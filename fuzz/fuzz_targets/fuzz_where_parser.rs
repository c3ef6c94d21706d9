#![no_main]

use libfuzzer_sys::fuzz_target;
use rowgate_core::{parse_where, ColumnType, SelectBuilder, Table};

fn table() -> Option<Table> {
    Table::builder("ks", "t")
        .partition_key("id", ColumnType::Int)
        .clustering("at", ColumnType::Timestamp)
        .column("name", ColumnType::Text)
        .column("tags", ColumnType::Set(Box::new(ColumnType::Text)))
        .column(
            "attrs",
            ColumnType::Map(Box::new(ColumnType::Text), Box::new(ColumnType::Double)),
        )
        .column("raw", ColumnType::Blob)
        .build()
        .ok()
}

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if text.len() > 10_000 {
        return;
    }
    let Some(table) = table() else {
        return;
    };

    // Parsing and assembly must never panic
    if let Ok(predicates) = parse_where(text, &table) {
        if let Ok(stmt) = SelectBuilder::new(&table).filter(predicates).build() {
            let _ = stmt.to_inlined_cql();
        }
    }
});
