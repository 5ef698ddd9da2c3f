/// Errors raised by the consolidation engine itself.
#[derive(Debug, thiserror::Error)]
pub enum ConsolidationError {
    #[error("a consolidation run is already in progress")]
    AlreadyRunning,

    #[error(
        "candidate set of {candidates} entries (~{estimated_bytes} bytes) exceeds the \
         configured memory ceiling of {ceiling_bytes} bytes; lower `max_merge_count` \
         or raise `candidate_memory_ceiling_bytes`"
    )]
    CandidateSetOversized {
        candidates: usize,
        estimated_bytes: usize,
        ceiling_bytes: usize,
    },
}
