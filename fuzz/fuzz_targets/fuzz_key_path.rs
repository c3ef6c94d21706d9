#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rowgate_core::{build_path_predicates, ColumnType, DeleteBuilder, Table};

#[derive(Arbitrary, Debug)]
struct KeyPath {
    segments: Vec<String>,
}

fuzz_target!(|path: KeyPath| {
    if path.segments.len() > 16 || path.segments.iter().any(|s| s.len() > 1024) {
        return;
    }
    let Ok(table) = Table::builder("ks", "t")
        .partition_key("tenant", ColumnType::Text)
        .partition_key("bucket", ColumnType::SmallInt)
        .clustering("id", ColumnType::Uuid)
        .clustering("at", ColumnType::Timestamp)
        .column("body", ColumnType::Text)
        .build()
    else {
        return;
    };

    if let Ok(predicates) = build_path_predicates(&table, path.segments.as_slice()) {
        // Only partition-or-longer prefixes may succeed
        assert!(predicates.len() >= 2 && predicates.len() <= 4);
        let _ = DeleteBuilder::new(&table).filter(predicates).build();
    }
});
