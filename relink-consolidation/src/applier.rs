//! Chunked application of a resolved identity map to the full dataset.
//!
//! The dataset can be far larger than memory; records flow through in
//! bounded-size sequential chunks and only one chunk is held at a time.
//! Record order is preserved. The remap itself is an O(1) lookup per id
//! field, parallelized within a chunk.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use relink_core::config::ConsolidationConfig;
use relink_core::errors::{ApplyError, RelinkResult};
use relink_core::models::ResolvedIdentityMap;
use relink_core::traits::{RawRecord, RecordSink, RecordSource};
use tracing::info;

/// Counters for one apply pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ApplyStats {
    pub records: usize,
    pub chunks: usize,
    /// Id fields whose value actually changed.
    pub ids_rewritten: usize,
}

/// Stream the dataset from `source` to `sink`, rewriting entity ids.
///
/// Unknown ids and non-numeric/missing id fields pass through unchanged.
/// Any sink failure aborts the run before `finish()` commits, so a
/// failed run leaves no partial visible output.
pub fn apply(
    source: &mut dyn RecordSource,
    sink: &mut dyn RecordSink,
    resolved: &ResolvedIdentityMap,
    config: &ConsolidationConfig,
) -> RelinkResult<ApplyStats> {
    config.validate()?;

    let mut stats = ApplyStats::default();
    loop {
        let mut chunk = source.next_chunk(config.chunk_size)?;
        if chunk.is_empty() {
            break;
        }
        let rewritten: usize = chunk
            .par_iter_mut()
            .map(|record| remap_record(record, resolved, &config.secondary_id_fields))
            .sum();
        stats.records += chunk.len();
        stats.chunks += 1;
        stats.ids_rewritten += rewritten;
        sink.write_chunk(chunk)?;
    }
    sink.finish()?;

    info!(
        records = stats.records,
        chunks = stats.chunks,
        ids_rewritten = stats.ids_rewritten,
        "dataset rewrite complete"
    );
    Ok(stats)
}

/// Rewrite every configured id field of one record; returns the number
/// of fields changed.
fn remap_record(
    record: &mut RawRecord,
    resolved: &ResolvedIdentityMap,
    secondary_fields: &[String],
) -> usize {
    let mut rewritten = remap_field(record, "entity_id", resolved);
    for field in secondary_fields {
        rewritten += remap_field(record, field, resolved);
    }
    rewritten
}

fn remap_field(record: &mut RawRecord, field: &str, resolved: &ResolvedIdentityMap) -> usize {
    let Some(value) = record.get_mut(field) else {
        return 0;
    };
    // Non-numeric ids pass through rather than failing the chunk.
    let Some(id) = value.as_i64() else {
        return 0;
    };
    let canonical = resolved.canonical(id);
    if canonical == id {
        return 0;
    }
    *value = RawRecord::from(canonical);
    1
}

/// In-memory source backed by a vec of records.
#[derive(Debug)]
pub struct VecSource {
    records: std::vec::IntoIter<RawRecord>,
}

impl VecSource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl RecordSource for VecSource {
    fn next_chunk(&mut self, max_records: usize) -> RelinkResult<Vec<RawRecord>> {
        Ok(self.records.by_ref().take(max_records).collect())
    }
}

/// In-memory sink collecting records; commits on `finish()`.
#[derive(Debug, Default)]
pub struct VecSink {
    buffered: Vec<RawRecord>,
    committed: Option<Vec<RawRecord>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed records; `None` until `finish()` succeeds.
    pub fn committed(&self) -> Option<&[RawRecord]> {
        self.committed.as_deref()
    }
}

impl RecordSink for VecSink {
    fn write_chunk(&mut self, records: Vec<RawRecord>) -> RelinkResult<()> {
        if self.committed.is_some() {
            return Err(ApplyError::SinkFinalized.into());
        }
        self.buffered.extend(records);
        Ok(())
    }

    fn finish(&mut self) -> RelinkResult<()> {
        if self.committed.is_some() {
            return Err(ApplyError::SinkFinalized.into());
        }
        self.committed = Some(std::mem::take(&mut self.buffered));
        Ok(())
    }
}

/// Newline-delimited-JSON sink that writes to a sibling temp file and
/// renames into place on `finish()`. Dropping an unfinished sink removes
/// the temp file, so aborted runs leave nothing behind.
#[derive(Debug)]
pub struct JsonLinesSink {
    final_path: PathBuf,
    tmp_path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl JsonLinesSink {
    pub fn create(path: impl AsRef<Path>) -> RelinkResult<Self> {
        let final_path = path.as_ref().to_path_buf();
        let mut tmp_name = final_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = final_path.with_file_name(tmp_name);
        let file = File::create(&tmp_path).map_err(ApplyError::from)?;
        Ok(Self {
            final_path,
            tmp_path,
            writer: Some(BufWriter::new(file)),
        })
    }
}

impl RecordSink for JsonLinesSink {
    fn write_chunk(&mut self, records: Vec<RawRecord>) -> RelinkResult<()> {
        let Some(writer) = self.writer.as_mut() else {
            return Err(ApplyError::SinkFinalized.into());
        };
        for record in &records {
            serde_json::to_writer(&mut *writer, record).map_err(ApplyError::from)?;
            writer.write_all(b"\n").map_err(ApplyError::from)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> RelinkResult<()> {
        let Some(mut writer) = self.writer.take() else {
            return Err(ApplyError::SinkFinalized.into());
        };
        writer.flush().map_err(ApplyError::from)?;
        drop(writer);
        fs::rename(&self.tmp_path, &self.final_path).map_err(ApplyError::from)?;
        Ok(())
    }
}

impl Drop for JsonLinesSink {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map() -> ResolvedIdentityMap {
        [(9, 5), (5, 5)].into_iter().collect()
    }

    #[test]
    fn remaps_primary_and_secondary_fields() {
        let config = ConsolidationConfig {
            secondary_id_fields: vec!["holder_id".into()],
            ..Default::default()
        };
        let mut source = VecSource::new(vec![
            json!({"entity_id": 9, "frame_index": 0, "holder_id": 9}),
            json!({"entity_id": 5, "frame_index": 1, "holder_id": 2}),
        ]);
        let mut sink = VecSink::new();
        let stats = apply(&mut source, &mut sink, &map(), &config).unwrap();
        let out = sink.committed().unwrap();
        assert_eq!(out[0]["entity_id"], 5);
        assert_eq!(out[0]["holder_id"], 5);
        // Unknown id 2 passes through.
        assert_eq!(out[1]["holder_id"], 2);
        assert_eq!(stats.ids_rewritten, 2);
    }

    #[test]
    fn non_numeric_ids_pass_through() {
        let mut source = VecSource::new(vec![
            json!({"entity_id": "corrupt", "frame_index": 0}),
            json!({"frame_index": 1}),
        ]);
        let mut sink = VecSink::new();
        let stats = apply(
            &mut source,
            &mut sink,
            &map(),
            &ConsolidationConfig::default(),
        )
        .unwrap();
        let out = sink.committed().unwrap();
        assert_eq!(out[0]["entity_id"], "corrupt");
        assert_eq!(stats.ids_rewritten, 0);
    }

    #[test]
    fn preserves_record_order_across_chunks() {
        let records: Vec<RawRecord> = (0..10)
            .map(|i| json!({"entity_id": 1, "frame_index": i}))
            .collect();
        let config = ConsolidationConfig {
            chunk_size: 3,
            ..Default::default()
        };
        let mut source = VecSource::new(records.clone());
        let mut sink = VecSink::new();
        let stats = apply(&mut source, &mut sink, &map(), &config).unwrap();
        assert_eq!(stats.chunks, 4);
        assert_eq!(sink.committed().unwrap(), &records[..]);
    }

    #[test]
    fn writes_after_finish_are_rejected() {
        let mut sink = VecSink::new();
        sink.finish().unwrap();
        assert!(sink.write_chunk(vec![json!({})]).is_err());
    }
}
