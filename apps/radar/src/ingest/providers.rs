//! Per-provider raw record shapes. Each provider gets its own DTO and the
//! normalizer has one explicit mapping per variant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::PipelineError;
use crate::models::JobRecord;

/// Upstream producer of raw postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// python-jobspy rows (LinkedIn / Indeed / Glassdoor / ZipRecruiter).
    Jobspy,
    /// JSearch (RapidAPI, Google Jobs aggregate).
    Jsearch,
    /// Tavily web search results.
    Tavily,
    /// Records already in canonical shape.
    Canonical,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Jobspy => "jobspy",
            Provider::Jsearch => "jsearch",
            Provider::Tavily => "tavily",
            Provider::Canonical => "canonical",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "jobspy" => Some(Provider::Jobspy),
            "jsearch" => Some(Provider::Jsearch),
            "tavily" => Some(Provider::Tavily),
            "canonical" => Some(Provider::Canonical),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A python-jobspy DataFrame row (as JSON).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobSpyRow {
    pub job_url: Option<String>,
    pub job_url_direct: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub site: Option<String>,
    pub date_posted: Option<Value>,
    pub is_remote: Option<Value>,
    pub job_type: Option<String>,
    pub job_level: Option<String>,
    pub min_amount: Option<Value>,
    pub max_amount: Option<Value>,
    pub interval: Option<String>,
}

/// One entry of a JSearch `data` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JSearchResult {
    pub job_apply_link: Option<String>,
    pub job_google_link: Option<String>,
    pub job_title: Option<String>,
    pub employer_name: Option<String>,
    pub job_city: Option<String>,
    pub job_state: Option<String>,
    pub job_country: Option<String>,
    pub job_description: Option<String>,
    pub job_publisher: Option<String>,
    pub job_posted_at_datetime_utc: Option<Value>,
    pub job_posted_at_timestamp: Option<Value>,
    pub job_is_remote: Option<Value>,
    pub job_employment_type: Option<String>,
    pub job_min_salary: Option<Value>,
    pub job_max_salary: Option<Value>,
    pub job_salary_period: Option<String>,
}

/// One entry of a Tavily search `results` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TavilyResult {
    pub url: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub raw_content: Option<String>,
    pub published_date: Option<Value>,
}

/// A record that already follows the canonical schema, possibly loosely typed
/// (e.g. emitted by another provider run or read back from JSON).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CanonicalRow {
    pub source: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub posted_date: Option<Value>,
    pub salary: Option<String>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub remote: Option<Value>,
    pub scraped_at: Option<DateTime<Utc>>,
}

impl From<JobRecord> for CanonicalRow {
    fn from(job: JobRecord) -> Self {
        Self {
            source: Some(job.source.as_str().to_string()),
            title: Some(job.title),
            company: Some(job.company),
            location: job.location,
            description: Some(job.description),
            url: Some(job.url),
            posted_date: job.posted_date.map(|d| Value::String(d.to_rfc3339())),
            salary: job.salary,
            employment_type: job.employment_type,
            experience_level: job.experience_level,
            remote: Some(Value::Bool(job.remote)),
            scraped_at: Some(job.scraped_at),
        }
    }
}

/// A raw posting tagged with the provider that produced it.
#[derive(Debug, Clone)]
pub enum RawPosting {
    JobSpy(JobSpyRow),
    JSearch(JSearchResult),
    Tavily(TavilyResult),
    Canonical(CanonicalRow),
}

impl RawPosting {
    /// Decodes an untyped provider record. Type mismatches are reported as
    /// `MalformedRecord` for this record only.
    pub fn from_value(provider: Provider, value: Value) -> Result<Self, PipelineError> {
        let malformed = |e: serde_json::Error| PipelineError::malformed(provider, e.to_string());
        Ok(match provider {
            Provider::Jobspy => RawPosting::JobSpy(serde_json::from_value(value).map_err(malformed)?),
            Provider::Jsearch => {
                RawPosting::JSearch(serde_json::from_value(value).map_err(malformed)?)
            }
            Provider::Tavily => RawPosting::Tavily(serde_json::from_value(value).map_err(malformed)?),
            Provider::Canonical => {
                RawPosting::Canonical(serde_json::from_value(value).map_err(malformed)?)
            }
        })
    }
}

impl From<JobRecord> for RawPosting {
    fn from(job: JobRecord) -> Self {
        RawPosting::Canonical(job.into())
    }
}

/// All raw records fetched from one provider, fully materialized.
#[derive(Debug, Clone)]
pub struct ProviderBatch {
    pub provider: Provider,
    pub records: Vec<Value>,
}
