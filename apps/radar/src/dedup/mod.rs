// Dedup: exact → fuzzy → seen passes over one normalized batch,
// plus the seen-id registry rebuilt from tracker history.

pub mod passes;
pub mod priority;
pub mod seen;
pub mod title_key;

pub use passes::{DedupConfig, DedupStats, Deduplicator};
pub use priority::SourcePriority;
pub use seen::build_seen_set;
