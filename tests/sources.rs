use anyhow::Result;
use binscan::testing::{CountingSource, SliceSource, sample_rows, write_record_file};
use binscan::{
    ByteOrder, ChunkReader, CmpOp, NumericKind, Predicate, RecordLayout, Value, scan,
};
use std::fs::File;

fn sample_layout() -> RecordLayout {
    RecordLayout::new(10, 4, NumericKind::F32, ByteOrder::Little).unwrap()
}

fn sample_pred() -> Predicate {
    Predicate::new(3, CmpOp::Gt, Value::F32(0.0))
}

#[test]
fn full_scan_requests_exactly_the_record_area_once() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("count.bin");
    let layout = sample_layout();
    let geometry = write_record_file(&path, 10, 10, &layout, &sample_rows())?;

    for chunk_size in [1u64, 5, 12, 100] {
        let mut source = CountingSource::new(File::open(&path)?);
        scan(
            &mut source,
            &geometry,
            &layout,
            &sample_pred(),
            0,
            chunk_size as usize,
        )?;
        assert_eq!(
            source.bytes_requested(),
            geometry.record_count() * geometry.record_size_bytes() as u64,
            "chunk_size {chunk_size}"
        );
        assert_eq!(
            source.reads(),
            geometry.record_count().div_ceil(chunk_size),
            "chunk_size {chunk_size}"
        );
    }
    Ok(())
}

#[test]
fn in_memory_source_scans_like_a_file() -> Result<()> {
    let tmp = tempfile::tempdir()?;
    let path = tmp.path().join("mem.bin");
    let layout = sample_layout();
    let geometry = write_record_file(&path, 10, 10, &layout, &sample_rows())?;

    let mut mem: SliceSource = SliceSource::new(std::fs::read(&path)?);
    let out = scan(&mut mem, &geometry, &layout, &sample_pred(), 0, 7)?;
    assert_eq!(out, vec![Value::F32(1.0), Value::F32(6.0), Value::F32(12.0)]);
    Ok(())
}

#[test]
fn chunk_reader_overwrites_between_windows() {
    // Window 2 is shorter than window 1; no byte of window 1 may leak.
    let bytes: Vec<u8> = (0u8..64).collect();
    let mut src = SliceSource::new(bytes);
    let mut reader = ChunkReader::new(&mut src);

    let w1 = reader.read_window(0, 32).unwrap().to_vec();
    assert_eq!(w1, (0u8..32).collect::<Vec<_>>());

    let w2 = reader.read_window(40, 8).unwrap();
    assert_eq!(w2, (40u8..48).collect::<Vec<_>>());
}

#[cfg(feature = "mmap")]
mod mmap {
    use super::*;
    use binscan::{MmapSource, ScanError};
    use std::fs::OpenOptions;

    #[test]
    fn mmap_source_matches_the_file_source() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("map.bin");
        let layout = sample_layout();
        let geometry = write_record_file(&path, 10, 10, &layout, &sample_rows())?;

        let mut file = File::open(&path)?;
        let via_file = scan(&mut file, &geometry, &layout, &sample_pred(), 0, 5)?;

        let mut mapped = MmapSource::open(&path)?;
        let via_map = scan(&mut mapped, &geometry, &layout, &sample_pred(), 0, 5)?;
        assert_eq!(via_file, via_map);
        Ok(())
    }

    #[test]
    fn mmap_of_truncated_file_reports_short_read() -> Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("mapshort.bin");
        let layout = sample_layout();
        let geometry = write_record_file(&path, 10, 0, &layout, &sample_rows())?;
        OpenOptions::new()
            .write(true)
            .open(&path)?
            .set_len(geometry.total_file_size() - 1)?;

        let mut mapped = MmapSource::open(&path)?;
        let err = scan(&mut mapped, &geometry, &layout, &sample_pred(), 0, 12).unwrap_err();
        assert!(matches!(err, ScanError::ShortRead { got: 479, .. }));
        Ok(())
    }
}
