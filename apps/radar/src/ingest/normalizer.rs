//! Job Normalizer: maps provider-specific raw records onto `JobRecord`.
//!
//! A record without a usable URL is rejected with `MalformedRecord`; every
//! other missing or unparseable field degrades to its default. Running a
//! normalized record back through `normalize` returns it unchanged.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::PipelineError;
use crate::ingest::dates::parse_posted_date;
use crate::ingest::fields::{
    amount, coerce_flag, format_salary, mentions_remote, non_empty, period_label, resolve_remote,
    text_or_empty,
};
use crate::ingest::providers::{
    CanonicalRow, JSearchResult, JobSpyRow, Provider, ProviderBatch, RawPosting, TavilyResult,
};
use crate::ingest::tavily;
use crate::models::{job_id_for_url, JobRecord, JobSource};

/// A raw record the normalizer could not turn into a `JobRecord`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedRecord {
    pub provider: Provider,
    /// Position of the record inside its provider batch.
    pub index: usize,
    pub reason: String,
}

impl DroppedRecord {
    fn new(provider: Provider, index: usize, err: PipelineError) -> Self {
        let reason = match err {
            PipelineError::MalformedRecord { reason, .. } => reason,
            other => other.to_string(),
        };
        Self {
            provider,
            index,
            reason,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub jobs: Vec<JobRecord>,
    pub dropped: Vec<DroppedRecord>,
}

/// Normalizes one raw record. `scraped_at` is the run timestamp; it also
/// anchors relative posting dates ("3 days ago").
pub fn normalize(raw: RawPosting, scraped_at: DateTime<Utc>) -> Result<JobRecord, PipelineError> {
    match raw {
        RawPosting::JobSpy(row) => from_jobspy(row, scraped_at),
        RawPosting::JSearch(row) => from_jsearch(row, scraped_at),
        RawPosting::Tavily(row) => from_tavily(row, scraped_at),
        RawPosting::Canonical(row) => from_canonical(row, scraped_at),
    }
}

/// Normalizes every record of every batch. Failures are collected per record
/// and never abort the batch.
pub fn normalize_batches(batches: Vec<ProviderBatch>, scraped_at: DateTime<Utc>) -> NormalizedBatch {
    let mut out = NormalizedBatch::default();

    for batch in batches {
        let provider = batch.provider;
        let total = batch.records.len();
        let before = out.jobs.len();

        for (index, value) in batch.records.into_iter().enumerate() {
            match RawPosting::from_value(provider, value).and_then(|raw| normalize(raw, scraped_at)) {
                Ok(job) => out.jobs.push(job),
                Err(e) => {
                    warn!("Dropping {provider} record #{index}: {e}");
                    out.dropped.push(DroppedRecord::new(provider, index, e));
                }
            }
        }

        debug!(
            "Normalized {}/{} {provider} records",
            out.jobs.len() - before,
            total
        );
    }

    out
}

fn require_url(provider: Provider, candidates: [Option<String>; 2]) -> Result<String, PipelineError> {
    candidates
        .into_iter()
        .find_map(non_empty)
        .ok_or_else(|| PipelineError::malformed(provider, "record has no usable URL"))
}

/// "FULLTIME" / "full_time" → "fulltime" / "full time".
fn employment_type(raw: Option<String>) -> Option<String> {
    non_empty(raw).map(|t| t.to_lowercase().replace('_', " "))
}

/// Board named by the provider, else the one the URL points at.
fn source_or_url(label: Option<&str>, url: &str) -> JobSource {
    match label.map(JobSource::from_label) {
        Some(source) if source != JobSource::Other => source,
        _ => tavily::detect_source(url),
    }
}

fn from_jobspy(row: JobSpyRow, scraped_at: DateTime<Utc>) -> Result<JobRecord, PipelineError> {
    let url = require_url(Provider::Jobspy, [row.job_url, row.job_url_direct])?;
    let title = text_or_empty(row.title);
    let location = non_empty(row.location);
    let remote = resolve_remote(
        row.is_remote.as_ref(),
        &[title.as_str(), location.as_deref().unwrap_or_default()],
    );
    let salary = format_salary(
        amount(row.min_amount.as_ref()),
        amount(row.max_amount.as_ref()),
        &period_label(row.interval.as_deref().unwrap_or_default()),
    );

    Ok(JobRecord {
        id: job_id_for_url(&url),
        source: source_or_url(row.site.as_deref(), &url),
        company: text_or_empty(row.company),
        description: text_or_empty(row.description),
        posted_date: row
            .date_posted
            .as_ref()
            .and_then(|v| parse_posted_date(v, scraped_at)),
        employment_type: employment_type(row.job_type),
        experience_level: non_empty(row.job_level),
        title,
        location,
        url,
        salary,
        remote,
        scraped_at,
    })
}

fn from_jsearch(row: JSearchResult, scraped_at: DateTime<Utc>) -> Result<JobRecord, PipelineError> {
    let url = require_url(Provider::Jsearch, [row.job_apply_link, row.job_google_link])?;
    let title = text_or_empty(row.job_title);

    let city_state: Vec<String> = [row.job_city, row.job_state]
        .into_iter()
        .filter_map(non_empty)
        .collect();
    let location = if city_state.is_empty() {
        non_empty(row.job_country)
    } else {
        Some(city_state.join(", "))
    };

    let remote = resolve_remote(
        row.job_is_remote.as_ref(),
        &[title.as_str(), location.as_deref().unwrap_or_default()],
    );
    let posted_date = row
        .job_posted_at_datetime_utc
        .as_ref()
        .and_then(|v| parse_posted_date(v, scraped_at))
        .or_else(|| {
            row.job_posted_at_timestamp
                .as_ref()
                .and_then(|v| parse_posted_date(v, scraped_at))
        });
    let salary = format_salary(
        amount(row.job_min_salary.as_ref()),
        amount(row.job_max_salary.as_ref()),
        &period_label(row.job_salary_period.as_deref().unwrap_or_default()),
    );

    Ok(JobRecord {
        id: job_id_for_url(&url),
        source: source_or_url(row.job_publisher.as_deref(), &url),
        company: text_or_empty(row.employer_name),
        description: text_or_empty(row.job_description),
        employment_type: employment_type(row.job_employment_type),
        experience_level: None,
        title,
        location,
        url,
        posted_date,
        salary,
        remote,
        scraped_at,
    })
}

fn from_tavily(row: TavilyResult, scraped_at: DateTime<Utc>) -> Result<JobRecord, PipelineError> {
    let url = require_url(Provider::Tavily, [row.url, None])?;
    let page_title = row.title.unwrap_or_default();

    if !tavily::is_individual_job_posting(&url, &page_title) {
        return Err(PipelineError::malformed(
            Provider::Tavily,
            format!("search results page, not a posting: {url}"),
        ));
    }

    let content = row.content.unwrap_or_default();
    let raw_content = row.raw_content.unwrap_or_default();
    let full_text = format!("{content}\n{raw_content}");

    let title = tavily::extract_job_title(&page_title);
    let location = tavily::extract_location(&full_text);
    let remote = mentions_remote(&[title.as_str(), location.as_deref().unwrap_or_default(), content.as_str()]);

    let description = match content.trim() {
        "" => raw_content.trim().to_string(),
        snippet => snippet.to_string(),
    };

    Ok(JobRecord {
        id: job_id_for_url(&url),
        source: tavily::detect_source(&url),
        company: tavily::extract_company(&page_title, &url, &content, &raw_content),
        salary: tavily::extract_salary(&full_text),
        posted_date: row
            .published_date
            .as_ref()
            .and_then(|v| parse_posted_date(v, scraped_at)),
        employment_type: None,
        experience_level: None,
        title,
        location,
        description,
        url,
        remote,
        scraped_at,
    })
}

fn from_canonical(row: CanonicalRow, scraped_at: DateTime<Utc>) -> Result<JobRecord, PipelineError> {
    let url = require_url(Provider::Canonical, [row.url, None])?;
    let title = text_or_empty(row.title);
    let location = non_empty(row.location);

    // An explicit canonical flag is authoritative; text clues only fill a gap.
    let remote = row
        .remote
        .as_ref()
        .and_then(coerce_flag)
        .unwrap_or_else(|| mentions_remote(&[title.as_str(), location.as_deref().unwrap_or_default()]));

    let source = match non_empty(row.source) {
        Some(label) => JobSource::from_label(&label),
        None => tavily::detect_source(&url),
    };

    Ok(JobRecord {
        id: job_id_for_url(&url),
        company: text_or_empty(row.company),
        description: text_or_empty(row.description),
        posted_date: row
            .posted_date
            .as_ref()
            .and_then(|v| parse_posted_date(v, scraped_at)),
        salary: non_empty(row.salary),
        employment_type: employment_type(row.employment_type),
        experience_level: non_empty(row.experience_level),
        scraped_at: row.scraped_at.unwrap_or(scraped_at),
        source,
        title,
        location,
        url,
        remote,
    })
}
