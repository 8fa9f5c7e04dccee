use std::sync::Arc;

use crate::config::Config;
use crate::dedup::Deduplicator;
use crate::skills::SkillCatalog;
use crate::tracker::HistorySource;

/// Shared application state injected into all route handlers via Axum extractors.
/// Immutable after startup; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<SkillCatalog>,
    /// Built from `SOURCE_PRIORITY` and `DEDUP_DESCRIPTION_TOLERANCE`.
    pub deduplicator: Deduplicator,
    /// Tracker history used when a request carries none. Default: `StaticHistory` (empty).
    pub history: Arc<dyn HistorySource>,
}
