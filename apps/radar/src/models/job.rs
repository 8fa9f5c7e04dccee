use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const JOB_ID_LEN: usize = 12;

/// Derives the stable job identifier from a posting URL.
///
/// First 12 hex characters of SHA-256 over the trimmed URL. The same URL always
/// yields the same id, whichever provider or run produced it.
pub fn job_id_for_url(url: &str) -> String {
    let digest = Sha256::digest(url.trim().as_bytes());
    let mut id = format!("{digest:x}");
    id.truncate(JOB_ID_LEN);
    id
}

/// Job board a posting was listed on. Drives the dedup source priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobSource {
    Linkedin,
    Indeed,
    Glassdoor,
    Builtin,
    Wellfound,
    ZipRecruiter,
    #[default]
    Other,
}

impl JobSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobSource::Linkedin => "linkedin",
            JobSource::Indeed => "indeed",
            JobSource::Glassdoor => "glassdoor",
            JobSource::Builtin => "builtin",
            JobSource::Wellfound => "wellfound",
            JobSource::ZipRecruiter => "zip_recruiter",
            JobSource::Other => "other",
        }
    }

    /// Maps a free-form board label ("LinkedIn", "zip_recruiter", "indeed.com")
    /// to a source. Anything unrecognized is `Other`.
    pub fn from_label(label: &str) -> Self {
        let squashed: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if squashed.contains("linkedin") {
            JobSource::Linkedin
        } else if squashed.contains("indeed") {
            JobSource::Indeed
        } else if squashed.contains("glassdoor") {
            JobSource::Glassdoor
        } else if squashed.contains("builtin") {
            JobSource::Builtin
        } else if squashed.contains("wellfound") {
            JobSource::Wellfound
        } else if squashed.contains("ziprecruiter") {
            JobSource::ZipRecruiter
        } else {
            JobSource::Other
        }
    }

    /// Like `from_label`, but `None` for labels that name no known board.
    /// Used where an unknown name is a configuration mistake.
    pub fn parse_known(label: &str) -> Option<Self> {
        let source = JobSource::from_label(label);
        if source == JobSource::Other && !label.trim().eq_ignore_ascii_case("other") {
            None
        } else {
            Some(source)
        }
    }
}

impl From<String> for JobSource {
    fn from(label: String) -> Self {
        JobSource::from_label(&label)
    }
}

impl From<JobSource> for String {
    fn from(source: JobSource) -> Self {
        source.as_str().to_string()
    }
}

impl std::fmt::Display for JobSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical posting produced by the normalizer. All stages after
/// normalization work on this shape only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    /// `job_id_for_url(url)`; empty only for hand-built records.
    pub id: String,
    pub source: JobSource,
    /// Empty placeholder when upstream had no title.
    pub title: String,
    /// Empty placeholder when upstream had no company.
    pub company: String,
    pub location: Option<String>,
    pub description: String,
    pub url: String,
    pub posted_date: Option<DateTime<Utc>>,
    pub salary: Option<String>,
    pub employment_type: Option<String>,
    pub experience_level: Option<String>,
    pub remote: bool,
    pub scraped_at: DateTime<Utc>,
}

/// A job record with its fit score. Created once by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredJobRecord {
    #[serde(flatten)]
    pub job: JobRecord,
    pub match_score: u32, // 0 – 100
    pub match_reason: String,
}
