//! Tracker history: where previously surfaced postings are read from.
//!
//! `AppState` holds an `Arc<dyn HistorySource>`: a Markdown tracker directory
//! when `TRACKER_DIR` is set, otherwise an in-memory list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::PersistedRecord;

const TRACKER_FILE_PREFIX: &str = "Job Tracker";
const TRACKER_FILE_SUFFIX: &str = ".md";

static TRACKER_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(?:Apply|Link)\]\(([^)]+)\)").expect("tracker link pattern is valid")
});

/// Source of persisted tracker rows. Implementations must be cheap to call
/// once per pipeline run.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn load(&self) -> Result<Vec<PersistedRecord>>;
}

/// Fixed rows held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticHistory {
    rows: Vec<PersistedRecord>,
}

impl StaticHistory {
    pub fn new(rows: Vec<PersistedRecord>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl HistorySource for StaticHistory {
    async fn load(&self) -> Result<Vec<PersistedRecord>> {
        Ok(self.rows.clone())
    }
}

/// Reads every `Job Tracker*.md` file in a directory (an Obsidian vault, say).
#[derive(Debug, Clone)]
pub struct MarkdownTrackerSource {
    dir: PathBuf,
}

impl MarkdownTrackerSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn tracker_files(&self) -> Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("Failed to list tracker dir {}", self.dir.display()))?;

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(TRACKER_FILE_PREFIX) && name.ends_with(TRACKER_FILE_SUFFIX) {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}

#[async_trait]
impl HistorySource for MarkdownTrackerSource {
    async fn load(&self) -> Result<Vec<PersistedRecord>> {
        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            warn!("Tracker dir {} does not exist; no history loaded", self.dir.display());
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        for path in self.tracker_files().await? {
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => {
                    let parsed = parse_tracker_markdown(&content);
                    debug!("{} tracker rows from {}", parsed.len(), path.display());
                    rows.extend(parsed);
                }
                Err(e) => warn!("Skipping unreadable tracker {}: {e}", path.display()),
            }
        }
        Ok(rows)
    }
}

/// Extracts `[Apply](url)` / `[Link](url)` targets from Markdown table rows.
pub fn parse_tracker_markdown(content: &str) -> Vec<PersistedRecord> {
    content
        .lines()
        .filter(|line| line.contains('|') && !line.starts_with("|--"))
        .flat_map(|line| TRACKER_LINK.captures_iter(line))
        .map(|caps| PersistedRecord::from_url(caps[1].trim()))
        .collect()
}
