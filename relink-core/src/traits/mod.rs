//! Seams to the surrounding tooling: chunked record streams.

mod records;

pub use records::{RawRecord, RecordSink, RecordSource};
