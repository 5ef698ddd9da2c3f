use crate::errors::RelinkResult;

/// A loosely-shaped dataset record as handed over by the external loader.
/// The engine only interprets the id and frame fields it knows about;
/// everything else passes through untouched.
pub type RawRecord = serde_json::Value;

/// Sequential chunked access to a (possibly huge) dataset.
///
/// Implementations must preserve the original record order across chunks.
pub trait RecordSource {
    /// Return up to `max_records` records, or an empty vec at the end of
    /// the dataset.
    fn next_chunk(&mut self, max_records: usize) -> RelinkResult<Vec<RawRecord>>;
}

/// Sequential chunked output for rewritten records.
///
/// Output must not become visible to other readers until `finish()`
/// succeeds; an aborted run leaves no partial file behind.
pub trait RecordSink {
    fn write_chunk(&mut self, records: Vec<RawRecord>) -> RelinkResult<()>;

    /// Commit the output atomically.
    fn finish(&mut self) -> RelinkResult<()>;
}
