//! Deduplicator: collapses one batch of normalized postings in three passes.
//!
//! Algorithm:
//! 1. Exact: records sharing an `id` (same URL) keep the best-priority source.
//! 2. Fuzzy: records sharing (title key, company) keep the best-priority source.
//!    Empty-company records join the single named group with their title key,
//!    or merge with each other on a location/description-length signal.
//! 3. Seen: records whose `id` was surfaced in an earlier run are dropped.
//!
//! Ties keep the earlier record. Every surviving group is emitted at the
//! position of its first member, so output order follows input order.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::dedup::priority::SourcePriority;
use crate::dedup::title_key::{normalized_label, normalized_title_key};
use crate::models::JobRecord;

pub const DEFAULT_DESCRIPTION_LENGTH_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DedupConfig {
    /// Max relative length difference for two empty-company descriptions to
    /// count as the same posting.
    pub description_length_tolerance: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            description_length_tolerance: DEFAULT_DESCRIPTION_LENGTH_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    pub input: usize,
    pub exact_duplicates: usize,
    pub fuzzy_duplicates: usize,
    pub previously_seen: usize,
    pub output: usize,
}

#[derive(Debug, Clone)]
pub struct DedupOutcome {
    pub jobs: Vec<JobRecord>,
    pub stats: DedupStats,
}

#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    priority: SourcePriority,
    config: DedupConfig,
}

impl Deduplicator {
    pub fn new(priority: SourcePriority, config: DedupConfig) -> Self {
        Self { priority, config }
    }

    pub fn priority(&self) -> &SourcePriority {
        &self.priority
    }

    /// Runs the exact, fuzzy and seen passes in that order. Surviving records
    /// are unaltered copies of batch members; the stats carry per-pass counts.
    pub fn deduplicate(&self, batch: Vec<JobRecord>, seen_ids: &HashSet<String>) -> DedupOutcome {
        let input = batch.len();

        let exact = self.collapse_exact(batch);
        let after_exact = exact.len();
        debug!("Exact pass: {input} → {after_exact}");

        let fuzzy = self.collapse_fuzzy(exact);
        let after_fuzzy = fuzzy.len();
        debug!("Fuzzy pass: {after_exact} → {after_fuzzy}");

        let jobs = suppress_seen(fuzzy, seen_ids);
        debug!("Seen pass: {after_fuzzy} → {}", jobs.len());

        let stats = DedupStats {
            input,
            exact_duplicates: input - after_exact,
            fuzzy_duplicates: after_exact - after_fuzzy,
            previously_seen: after_fuzzy - jobs.len(),
            output: jobs.len(),
        };
        DedupOutcome { jobs, stats }
    }

    /// Pass 1. One record per `id`; records with an empty `id` pass through.
    pub fn collapse_exact(&self, batch: Vec<JobRecord>) -> Vec<JobRecord> {
        let mut out: Vec<JobRecord> = Vec::with_capacity(batch.len());
        let mut slot_by_id: HashMap<String, usize> = HashMap::with_capacity(batch.len());

        for job in batch {
            if job.id.is_empty() {
                out.push(job);
                continue;
            }
            match slot_by_id.entry(job.id.clone()) {
                Entry::Occupied(slot) => {
                    let kept = &mut out[*slot.get()];
                    if self.priority.outranks(job.source, kept.source) {
                        *kept = job;
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(out.len());
                    out.push(job);
                }
            }
        }

        out
    }

    /// Pass 2. One record per (title key, company); records with an empty
    /// title key pass through.
    pub fn collapse_fuzzy(&self, batch: Vec<JobRecord>) -> Vec<JobRecord> {
        let keys: Vec<(String, String)> = batch
            .iter()
            .map(|j| (normalized_title_key(&j.title), normalized_label(&j.company)))
            .collect();

        let mut group_of: Vec<Option<usize>> = vec![None; batch.len()];
        let mut group_count = 0usize;

        // Named companies first: empty-company records may precede the
        // named record they belong with.
        let mut named: HashMap<(&str, &str), usize> = HashMap::new();
        for (i, (title, company)) in keys.iter().enumerate() {
            if title.is_empty() || company.is_empty() {
                continue;
            }
            let group = *named
                .entry((title.as_str(), company.as_str()))
                .or_insert_with(|| {
                    group_count += 1;
                    group_count - 1
                });
            group_of[i] = Some(group);
        }

        let mut named_by_title: HashMap<&str, Vec<usize>> = HashMap::new();
        for (&(title, _), &group) in &named {
            named_by_title.entry(title).or_default().push(group);
        }

        // (group, first member) for empty-company clusters
        let mut unnamed: Vec<(usize, usize)> = Vec::new();
        for (i, (title, company)) in keys.iter().enumerate() {
            if title.is_empty() || !company.is_empty() {
                continue;
            }
            if let Some([only]) = named_by_title.get(title.as_str()).map(Vec::as_slice) {
                group_of[i] = Some(*only);
                continue;
            }
            let cluster = unnamed
                .iter()
                .find(|&&(_, first)| {
                    keys[first].0 == *title && self.same_unnamed_posting(&batch[first], &batch[i])
                })
                .map(|&(group, _)| group);
            group_of[i] = Some(match cluster {
                Some(group) => group,
                None => {
                    unnamed.push((group_count, i));
                    group_count += 1;
                    group_count - 1
                }
            });
        }

        let group_of: Vec<usize> = group_of
            .into_iter()
            .map(|g| {
                g.unwrap_or_else(|| {
                    group_count += 1;
                    group_count - 1
                })
            })
            .collect();

        let mut winner: Vec<Option<usize>> = vec![None; group_count];
        let mut order: Vec<usize> = Vec::with_capacity(group_count);
        for (i, &group) in group_of.iter().enumerate() {
            match winner[group] {
                None => {
                    winner[group] = Some(i);
                    order.push(group);
                }
                Some(w) if self.priority.outranks(batch[i].source, batch[w].source) => {
                    winner[group] = Some(i);
                }
                Some(_) => {}
            }
        }

        let mut records: Vec<Option<JobRecord>> = batch.into_iter().map(Some).collect();
        order
            .into_iter()
            .filter_map(|group| winner[group].and_then(|w| records[w].take()))
            .collect()
    }

    /// Two empty-company records are the same posting only with a second
    /// signal: identical location, or near-identical description length.
    fn same_unnamed_posting(&self, a: &JobRecord, b: &JobRecord) -> bool {
        let location = |j: &JobRecord| {
            j.location
                .as_deref()
                .map(normalized_label)
                .filter(|l| !l.is_empty())
        };
        if let (Some(la), Some(lb)) = (location(a), location(b)) {
            if la == lb {
                return true;
            }
        }
        descriptions_close(
            &a.description,
            &b.description,
            self.config.description_length_tolerance,
        )
    }
}

fn descriptions_close(a: &str, b: &str, tolerance: f64) -> bool {
    let (la, lb) = (a.trim().chars().count(), b.trim().chars().count());
    if la == 0 || lb == 0 {
        return false;
    }
    let longer = la.max(lb) as f64;
    la.abs_diff(lb) as f64 <= tolerance * longer
}

/// Pass 3. Drops records already surfaced in an earlier run.
pub fn suppress_seen(batch: Vec<JobRecord>, seen_ids: &HashSet<String>) -> Vec<JobRecord> {
    batch
        .into_iter()
        .filter(|job| job.id.is_empty() || !seen_ids.contains(&job.id))
        .collect()
}
