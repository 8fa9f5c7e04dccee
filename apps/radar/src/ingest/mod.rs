// Ingest: provider payloads → canonical JobRecord.
// One typed DTO and one mapping function per provider; no I/O here.

pub mod dates;
pub mod fields;
pub mod normalizer;
pub mod providers;
pub mod tavily;

pub use normalizer::{normalize_batches, DroppedRecord};
pub use providers::{Provider, ProviderBatch};
