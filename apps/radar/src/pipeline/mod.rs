// Pipeline: wires ingest → dedup → skills → scoring for one run, plus the
// HTTP handlers that expose each stage.

pub mod handlers;
pub mod run;
