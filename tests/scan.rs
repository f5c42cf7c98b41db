use anyhow::Result;
use binscan::testing::{f32_rows, sample_rows, write_record_file};
use binscan::{
    ByteOrder, CmpOp, FileGeometry, NumericKind, Predicate, RecordLayout, Value, scan,
};
use proptest::prelude::*;
use std::fs::File;

fn sample_layout() -> RecordLayout {
    RecordLayout::new(10, 4, NumericKind::F32, ByteOrder::Little).unwrap()
}

/// Independent full-load scan: decode every record in one pass, no chunking,
/// no engine code beyond the value decoder.
fn reference_scan(
    file_bytes: &[u8],
    geometry: &FileGeometry,
    layout: &RecordLayout,
    predicate: &Predicate,
    projection_column: usize,
) -> Vec<Value> {
    let record_size = layout.record_size_bytes();
    let width = layout.field_width_bytes();
    let area = &file_bytes[geometry.header_bytes() as usize..];
    let mut out = Vec::new();
    for r in 0..geometry.record_count() as usize {
        let record = &area[r * record_size..(r + 1) * record_size];
        let decode = |col: usize| {
            Value::decode(
                &record[col * width..(col + 1) * width],
                layout.numeric_kind(),
                layout.byte_order(),
            )
        };
        if predicate
            .op
            .matches(decode(predicate.column).compare(&predicate.threshold))
        {
            out.push(decode(projection_column));
        }
    }
    out
}

#[test]
fn concrete_scenario_yields_1_6_12_for_every_chunk_size() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("sample.bin");
    let layout = sample_layout();
    let geometry = write_record_file(&path, 10, 10, &layout, &sample_rows())?;
    let pred = Predicate::new(3, CmpOp::Gt, Value::F32(0.0));

    for chunk_size in [1usize, 7, 10_000, 12] {
        let mut file = File::open(&path)?;
        let out = scan(&mut file, &geometry, &layout, &pred, 0, chunk_size)?;
        assert_eq!(
            out,
            vec![Value::F32(1.0), Value::F32(6.0), Value::F32(12.0)],
            "chunk_size {chunk_size}"
        );
    }
    Ok(())
}

#[test]
fn boundary_records_survive_uneven_chunking() -> Result<()> {
    // Matches at the very first and very last record; chunk size 5 does not
    // divide the 12-record area.
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("edges.bin");
    let layout = sample_layout();
    let geometry = write_record_file(&path, 10, 10, &layout, &sample_rows())?;
    let pred = Predicate::new(3, CmpOp::Gt, Value::F32(0.0));

    let mut file = File::open(&path)?;
    let out = scan(&mut file, &geometry, &layout, &pred, 0, 5)?;
    assert_eq!(out.first(), Some(&Value::F32(1.0)));
    assert_eq!(out.last(), Some(&Value::F32(12.0)));
    Ok(())
}

#[test]
fn chunked_scan_agrees_with_unchunked_reference() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("ref.bin");
    let layout = RecordLayout::new(4, 4, NumericKind::F32, ByteOrder::Little)?;
    // 23 records, field 2 alternating through a few bands around the
    // threshold, field 1 carrying a recognizable payload.
    let rows: Vec<Vec<f32>> = (0..23)
        .map(|i| {
            let i = i as f32;
            vec![i, 100.0 + i, (i % 5.0) - 2.0, -i]
        })
        .collect();
    let geometry = write_record_file(&path, 64, 16, &layout, &f32_rows(&rows))?;
    let pred = Predicate::new(2, CmpOp::Ge, Value::F32(0.0));

    let file_bytes = std::fs::read(&path)?;
    let expected = reference_scan(&file_bytes, &geometry, &layout, &pred, 1);
    assert!(!expected.is_empty());

    for chunk_size in [1usize, 3, 23, 1000] {
        let mut file = File::open(&path)?;
        let out = scan(&mut file, &geometry, &layout, &pred, 1, chunk_size)?;
        assert_eq!(out, expected, "chunk_size {chunk_size}");
    }
    Ok(())
}

#[test]
fn big_endian_i64_records_scan_correctly() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("be.bin");
    let layout = RecordLayout::new(2, 8, NumericKind::I64, ByteOrder::Big)?;
    let rows: Vec<Vec<Value>> = vec![
        vec![Value::I64(10), Value::I64(-3)],
        vec![Value::I64(20), Value::I64(7)],
        vec![Value::I64(30), Value::I64(0)],
    ];
    let geometry = write_record_file(&path, 4, 0, &layout, &rows)?;
    let pred = Predicate::new(1, CmpOp::Gt, Value::I64(-1));

    let mut file = File::open(&path)?;
    let out = scan(&mut file, &geometry, &layout, &pred, 0, 2)?;
    assert_eq!(out, vec![Value::I64(20), Value::I64(30)]);
    Ok(())
}

proptest! {
    /// Chunk size is an optimization knob: every chunk size produces the
    /// same result sequence as a record-at-a-time scan.
    #[test]
    fn chunk_size_never_changes_the_result(
        rows in prop::collection::vec(
            prop::collection::vec(-100.0f32..100.0, 4),
            0..40,
        ),
        chunk_size in 1usize..50,
        header in 0u64..32,
        footer in 0u64..32,
    ) {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("prop.bin");
        let layout = RecordLayout::new(4, 4, NumericKind::F32, ByteOrder::Little).unwrap();
        let geometry = write_record_file(&path, header, footer, &layout, &f32_rows(&rows)).unwrap();
        let pred = Predicate::new(1, CmpOp::Lt, Value::F32(0.0));

        let mut file = File::open(&path).unwrap();
        let baseline = scan(&mut file, &geometry, &layout, &pred, 3, 1).unwrap();

        let mut file = File::open(&path).unwrap();
        let chunked = scan(&mut file, &geometry, &layout, &pred, 3, chunk_size).unwrap();
        prop_assert_eq!(baseline, chunked);
    }
}
