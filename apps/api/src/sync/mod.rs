// Ingestion pipeline: contact resolution, pacing, and the per-item /
// batch sync orchestration. Store-side pieces (mapping, dedup) live in `store`.

pub mod contacts;
pub mod handlers;
pub mod orchestrator;
pub mod pacer;
