use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dedup::{build_seen_set, DedupStats};
use crate::errors::{AppError, PipelineError};
use crate::ingest::{normalize_batches, DroppedRecord, Provider, ProviderBatch};
use crate::models::{job_id_for_url, JobRecord, PersistedRecord, ScoredJobRecord};
use crate::pipeline::run::{run_pipeline, PipelineInput, PipelineStats};
use crate::scoring::score_and_rank;
use crate::skills::{extract_skills, resume_text_or_configured, SkillProfile};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BatchPayload {
    pub provider: String,
    #[serde(default)]
    pub records: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct PipelineRunRequest {
    #[serde(default)]
    pub batches: Vec<BatchPayload>,
    pub resume_text: Option<String>,
    /// Overrides the configured tracker history for this run.
    pub history: Option<Vec<PersistedRecord>>,
    #[serde(default)]
    pub include_seen: bool,
}

#[derive(Debug, Serialize)]
pub struct PipelineRunResponse {
    pub run_id: Uuid,
    pub scraped_at: DateTime<Utc>,
    pub jobs: Vec<ScoredJobRecord>,
    pub dropped: Vec<DroppedRecord>,
    pub profile: SkillProfile,
    pub fallback_profile: bool,
    pub stats: PipelineStats,
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    #[serde(default)]
    pub batches: Vec<BatchPayload>,
    /// Fail on the first malformed record instead of reporting it.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub jobs: Vec<JobRecord>,
    pub dropped: Vec<DroppedRecord>,
}

#[derive(Debug, Deserialize)]
pub struct DedupRequest {
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
    pub history: Option<Vec<PersistedRecord>>,
    #[serde(default)]
    pub include_seen: bool,
}

#[derive(Debug, Serialize)]
pub struct DedupResponse {
    pub jobs: Vec<JobRecord>,
    pub stats: DedupStats,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
    pub resume_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub jobs: Vec<ScoredJobRecord>,
    pub profile: SkillProfile,
    pub fallback_profile: bool,
}

/// Maps provider names to `Provider`. An unknown name rejects the whole request.
fn parse_batches(payload: Vec<BatchPayload>) -> Result<Vec<ProviderBatch>, AppError> {
    payload
        .into_iter()
        .map(|batch| {
            let provider = Provider::parse(&batch.provider).ok_or_else(|| {
                AppError::Validation(format!("Unknown provider '{}'", batch.provider))
            })?;
            Ok(ProviderBatch {
                provider,
                records: batch.records,
            })
        })
        .collect()
}

/// Request history when given; otherwise the configured source. A failing
/// source degrades to no history. `include_seen` disables history entirely.
async fn resolve_history(
    state: &AppState,
    history: Option<Vec<PersistedRecord>>,
    include_seen: bool,
) -> Vec<PersistedRecord> {
    if include_seen {
        return Vec::new();
    }
    match history {
        Some(rows) => rows,
        None => state.history.load().await.unwrap_or_else(|e| {
            warn!("Tracker history unavailable, continuing without it: {e:#}");
            Vec::new()
        }),
    }
}

/// Client-supplied records carry whatever `id` the caller sent. The exact and
/// seen passes key on the url hash, so it is recomputed here.
fn rederive_ids(jobs: &mut [JobRecord]) {
    for job in jobs.iter_mut().filter(|job| !job.url.trim().is_empty()) {
        job.id = job_id_for_url(&job.url);
    }
}

/// POST /api/v1/pipeline/run
pub async fn handle_run_pipeline(
    State(state): State<AppState>,
    Json(req): Json<PipelineRunRequest>,
) -> Result<Json<PipelineRunResponse>, AppError> {
    let batches = parse_batches(req.batches)?;
    let history = resolve_history(&state, req.history, req.include_seen).await;
    let resume_text =
        resume_text_or_configured(req.resume_text, state.config.resume_path.as_deref()).await;

    let run_id = Uuid::new_v4();
    let scraped_at = Utc::now();
    info!("Pipeline run {run_id}: {} batches, {} history rows", batches.len(), history.len());

    let input = PipelineInput {
        batches,
        resume_text,
        include_seen: req.include_seen,
    };
    let outcome = run_pipeline(input, &state.catalog, &state.deduplicator, &history, scraped_at);

    Ok(Json(PipelineRunResponse {
        run_id,
        scraped_at,
        jobs: outcome.jobs,
        dropped: outcome.dropped,
        profile: outcome.profile,
        fallback_profile: outcome.fallback_profile,
        stats: outcome.stats,
    }))
}

/// POST /api/v1/jobs/normalize
pub async fn handle_normalize(
    Json(req): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    let batches = parse_batches(req.batches)?;
    let normalized = normalize_batches(batches, Utc::now());
    if req.strict {
        if let Some(first) = normalized.dropped.first() {
            return Err(PipelineError::malformed(first.provider, first.reason.clone()).into());
        }
    }
    Ok(Json(NormalizeResponse {
        jobs: normalized.jobs,
        dropped: normalized.dropped,
    }))
}

/// POST /api/v1/jobs/dedup
pub async fn handle_dedup(
    State(state): State<AppState>,
    Json(req): Json<DedupRequest>,
) -> Result<Json<DedupResponse>, AppError> {
    let mut jobs = req.jobs;
    rederive_ids(&mut jobs);
    let history = resolve_history(&state, req.history, req.include_seen).await;
    let seen = build_seen_set(&history);
    let outcome = state.deduplicator.deduplicate(jobs, &seen);
    Ok(Json(DedupResponse {
        jobs: outcome.jobs,
        stats: outcome.stats,
    }))
}

/// POST /api/v1/jobs/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let resume_text =
        resume_text_or_configured(req.resume_text, state.config.resume_path.as_deref()).await;
    let extraction = extract_skills(&resume_text, &state.catalog);
    let mut jobs = req.jobs;
    rederive_ids(&mut jobs);
    let jobs = score_and_rank(jobs, &extraction.profile);
    Ok(Json(ScoreResponse {
        jobs,
        profile: extraction.profile,
        fallback_profile: extraction.fallback_used,
    }))
}
