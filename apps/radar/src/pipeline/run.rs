//! One full run: normalize → dedup → extract skills → score and rank.
//!
//! Pure over its inputs. The caller supplies the run timestamp and the
//! tracker history, so the same input always yields the same ranked output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::dedup::{build_seen_set, DedupStats, Deduplicator};
use crate::ingest::{normalize_batches, DroppedRecord, ProviderBatch};
use crate::models::{PersistedRecord, ScoredJobRecord};
use crate::scoring::score_and_rank;
use crate::skills::{extract_skills, SkillCatalog, SkillProfile};

#[derive(Debug, Clone, Default)]
pub struct PipelineInput {
    pub batches: Vec<ProviderBatch>,
    pub resume_text: String,
    /// Skip cross-run suppression and keep postings already in the tracker.
    pub include_seen: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub raw_records: usize,
    pub normalized: usize,
    pub dropped: usize,
    pub history_ids: usize,
    pub dedup: DedupStats,
    pub scored: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Ranked by descending `match_score`.
    pub jobs: Vec<ScoredJobRecord>,
    pub dropped: Vec<DroppedRecord>,
    pub profile: SkillProfile,
    pub fallback_profile: bool,
    pub stats: PipelineStats,
}

pub fn run_pipeline(
    input: PipelineInput,
    catalog: &SkillCatalog,
    dedup: &Deduplicator,
    history: &[PersistedRecord],
    now: DateTime<Utc>,
) -> PipelineOutcome {
    let raw_records = input.batches.iter().map(|b| b.records.len()).sum();

    let normalized = normalize_batches(input.batches, now);
    let normalized_count = normalized.jobs.len();

    let seen = if input.include_seen {
        Default::default()
    } else {
        build_seen_set(history)
    };

    let deduped = dedup.deduplicate(normalized.jobs, &seen);
    let extraction = extract_skills(&input.resume_text, catalog);
    let jobs = score_and_rank(deduped.jobs, &extraction.profile);

    let stats = PipelineStats {
        raw_records,
        normalized: normalized_count,
        dropped: normalized.dropped.len(),
        history_ids: seen.len(),
        dedup: deduped.stats,
        scored: jobs.len(),
    };

    info!(
        "Pipeline run: {} raw → {} normalized ({} dropped) → {} unique → {} new; profile has {} skills{}",
        stats.raw_records,
        stats.normalized,
        stats.dropped,
        stats.dedup.input - stats.dedup.exact_duplicates - stats.dedup.fuzzy_duplicates,
        stats.scored,
        extraction.profile.len(),
        if extraction.fallback_used { " (fallback)" } else { "" }
    );

    PipelineOutcome {
        jobs,
        dropped: normalized.dropped,
        profile: extraction.profile,
        fallback_profile: extraction.fallback_used,
        stats,
    }
}
