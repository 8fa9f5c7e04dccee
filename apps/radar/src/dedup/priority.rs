use crate::models::JobSource;

/// Boards listed first win when two records describe the same posting.
pub const DEFAULT_SOURCE_PRIORITY: [JobSource; 5] = [
    JobSource::Linkedin,
    JobSource::Indeed,
    JobSource::Glassdoor,
    JobSource::Builtin,
    JobSource::Wellfound,
];

/// Ordered ranking of job boards. Sources not in the list rank below every
/// listed source and tie with each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePriority {
    ranks: Vec<JobSource>,
}

impl SourcePriority {
    /// Later duplicates of an already-listed source are ignored.
    pub fn new(ranks: impl IntoIterator<Item = JobSource>) -> Self {
        let mut ordered: Vec<JobSource> = Vec::new();
        for source in ranks {
            if !ordered.contains(&source) {
                ordered.push(source);
            }
        }
        Self { ranks: ordered }
    }

    /// Lower is better.
    pub fn rank(&self, source: JobSource) -> usize {
        self.ranks
            .iter()
            .position(|s| *s == source)
            .unwrap_or(self.ranks.len())
    }

    /// True if `a` strictly outranks `b`. Equal ranks never outrank, so the
    /// earlier record of a tie is kept.
    pub fn outranks(&self, a: JobSource, b: JobSource) -> bool {
        self.rank(a) < self.rank(b)
    }

    pub fn sources(&self) -> &[JobSource] {
        &self.ranks
    }
}

impl Default for SourcePriority {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_PRIORITY)
    }
}
