use std::collections::HashSet;

use tracing::debug;

use crate::models::{job_id_for_url, PersistedRecord};

/// Builds the set of job ids surfaced in earlier runs.
///
/// Each row contributes its own `id` and the id re-derived from its `url`, so
/// trackers that only kept links still suppress reposts.
pub fn build_seen_set(rows: &[PersistedRecord]) -> HashSet<String> {
    let mut seen = HashSet::with_capacity(rows.len());
    let mut skipped = 0usize;

    for row in rows {
        let id = row.id.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let url = row.url.as_deref().map(str::trim).filter(|s| !s.is_empty());

        if id.is_none() && url.is_none() {
            skipped += 1;
            continue;
        }
        if let Some(id) = id {
            seen.insert(id.to_string());
        }
        if let Some(url) = url {
            seen.insert(job_id_for_url(url));
        }
    }

    if skipped > 0 {
        debug!("Skipped {skipped} history rows with neither id nor url");
    }
    debug!("Seen set holds {} ids from {} history rows", seen.len(), rows.len());
    seen
}
