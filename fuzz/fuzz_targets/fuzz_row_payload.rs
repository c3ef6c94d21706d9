#![no_main]

use libfuzzer_sys::fuzz_target;
use rowgate_core::{insert_row, ColumnType, RowMap, Table};

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }
    let Ok(row) = serde_json::from_slice::<RowMap>(data) else {
        return;
    };
    let Ok(table) = Table::builder("ks", "t")
        .partition_key("id", ColumnType::BigInt)
        .column("n", ColumnType::Varint)
        .column("d", ColumnType::Decimal)
        .column("ip", ColumnType::Inet)
        .column("day", ColumnType::Date)
        .column("span", ColumnType::Duration)
        .column("pairs", ColumnType::List(Box::new(ColumnType::Tuple(vec![
            ColumnType::Int,
            ColumnType::Text,
        ]))))
        .build()
    else {
        return;
    };

    if let Ok((stmt, _keys)) = insert_row(&table, &row) {
        let _ = stmt.to_inlined_cql();
    }
});
