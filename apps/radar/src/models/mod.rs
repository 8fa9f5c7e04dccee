pub mod history;
pub mod job;

pub use history::PersistedRecord;
pub use job::{job_id_for_url, JobRecord, JobSource, ScoredJobRecord};
