use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::dedup::{DedupConfig, SourcePriority};
use crate::models::JobSource;

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub source_priority: SourcePriority,
    pub description_length_tolerance: f64,
    /// Directory holding `Job Tracker*.md` files.
    pub tracker_dir: Option<PathBuf>,
    /// Custom skill vocabulary, one term per line.
    pub skill_catalog_path: Option<PathBuf>,
    /// Resume used when a request carries no `resume_text`.
    pub resume_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            source_priority: match optional_env("SOURCE_PRIORITY") {
                Some(raw) => parse_source_priority(&raw).context("Invalid SOURCE_PRIORITY")?,
                None => SourcePriority::default(),
            },
            description_length_tolerance: match optional_env("DEDUP_DESCRIPTION_TOLERANCE") {
                Some(raw) => parse_tolerance(&raw).context("Invalid DEDUP_DESCRIPTION_TOLERANCE")?,
                None => DedupConfig::default().description_length_tolerance,
            },
            tracker_dir: optional_env("TRACKER_DIR").map(PathBuf::from),
            skill_catalog_path: optional_env("SKILL_CATALOG_PATH").map(PathBuf::from),
            resume_path: optional_env("RESUME_PATH").map(PathBuf::from),
        })
    }

    pub fn dedup_config(&self) -> DedupConfig {
        DedupConfig {
            description_length_tolerance: self.description_length_tolerance,
        }
    }
}

/// Set and non-blank, trimmed.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// "linkedin, indeed,glassdoor" → ordered priority. Unknown boards are an error.
pub fn parse_source_priority(raw: &str) -> Result<SourcePriority> {
    let mut sources = Vec::new();
    for label in raw.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        match JobSource::parse_known(label) {
            Some(source) => sources.push(source),
            None => bail!("unknown job source '{label}'"),
        }
    }
    if sources.is_empty() {
        bail!("source priority list is empty");
    }
    Ok(SourcePriority::new(sources))
}

pub fn parse_tolerance(raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .with_context(|| format!("'{raw}' is not a number"))?;
    if !(0.0..=1.0).contains(&value) {
        bail!("tolerance {value} must be between 0 and 1");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_priority_keeps_order() {
        let p = parse_source_priority("indeed, LinkedIn ,zip_recruiter").unwrap();
        assert_eq!(
            p.sources(),
            &[JobSource::Indeed, JobSource::Linkedin, JobSource::ZipRecruiter]
        );
    }

    #[test]
    fn test_parse_source_priority_rejects_unknown_and_empty() {
        assert!(parse_source_priority("linkedin,monster").is_err());
        assert!(parse_source_priority(" , ").is_err());
    }

    #[test]
    fn test_parse_tolerance_bounds() {
        assert_eq!(parse_tolerance("0.1").unwrap(), 0.1);
        assert_eq!(parse_tolerance(" 0 ").unwrap(), 0.0);
        assert!(parse_tolerance("1.5").is_err());
        assert!(parse_tolerance("-0.1").is_err());
        assert!(parse_tolerance("abc").is_err());
        assert!(parse_tolerance("NaN").is_err());
    }
}
