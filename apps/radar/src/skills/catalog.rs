//! Skill Catalog: the vocabulary shared by resume extraction and job scoring.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::errors::PipelineError;

/// Terms that commonly appear in both resumes and job postings.
const BUILTIN_TERMS: &[&str] = &[
    // Programming & databases
    "python", "java", "kotlin", "c++", "sql", "postgresql", "mongodb",
    "pandas", "numpy", "scikit-learn", "scipy",
    // ML / AI
    "machine learning", "deep learning", "pytorch", "tensorflow",
    "neural network", "cnn", "rnn", "lstm", "transformer",
    "nlp", "natural language processing", "large language model", "llm",
    "computer vision", "fair ml", "fairness", "predictive modeling",
    "feature engineering", "statistical modeling", "statistics",
    "regression", "classification", "clustering", "a/b testing",
    // Cloud / infra
    "aws", "lambda", "dynamodb", "ec2", "s3", "docker",
    "distributed systems", "etl", "data pipeline", "cloud",
    // Data / visualization
    "tableau", "matplotlib", "seaborn", "excel", "power bi",
    "arcgis", "geospatial", "exploratory data analysis",
    "business intelligence", "data visualization",
    // Healthcare / clinical
    "healthcare", "clinical", "ehr", "electronic health record",
    "omop", "fhir", "hipaa", "informatics", "health informatics",
    "clinical data", "medical", "patient data", "all of us",
    // Research
    "research", "data scientist", "data analyst", "data science",
    "informatics analyst", "research analyst",
    // Wearable / IoT
    "wearable", "sensor", "iot", "fitbit", "mobile",
    // Other
    "flutter", "git", "web scraping",
];

/// Used when a resume is empty or yields no catalog terms.
const BUILTIN_FALLBACK: &[&str] = &[
    "python", "sql", "tableau", "data analyst", "data science", "data scientist",
    "machine learning", "deep learning", "research", "healthcare", "clinical",
    "ehr", "informatics", "aws", "pytorch", "pandas", "statistics",
];

/// Known skill terms plus the fallback subset. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillCatalog {
    terms: Vec<String>,
    fallback: Vec<String>,
}

impl SkillCatalog {
    /// Builds a catalog from raw term lists. Terms are trimmed, lower-cased and
    /// deduplicated in order of first occurrence.
    pub fn new<T, F>(terms: T, fallback: F) -> Result<Self, PipelineError>
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        let terms = clean_terms(terms);
        if terms.is_empty() {
            return Err(PipelineError::EmptyCatalog);
        }
        let fallback = clean_terms(fallback);
        if fallback.is_empty() {
            return Err(PipelineError::EmptyFallback);
        }
        Ok(Self { terms, fallback })
    }

    /// The curated catalog shipped with the service.
    pub fn builtin() -> Self {
        Self {
            terms: clean_terms(BUILTIN_TERMS),
            fallback: clean_terms(BUILTIN_FALLBACK),
        }
    }

    /// Loads one term per line. Blank lines and `#` comments are ignored.
    /// The built-in fallback subset is kept.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skill catalog {}", path.display()))?;
        let terms = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));
        Self::new(terms, BUILTIN_FALLBACK)
            .with_context(|| format!("Skill catalog {} is unusable", path.display()))
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn fallback(&self) -> &[String] {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }
}

fn clean_terms<I>(raw: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

/// True if `term` occurs in `haystack` as a whole term.
///
/// Both arguments must already be lower-cased. The character before a match
/// must not be alphanumeric; the character after must not be alphanumeric
/// either, except for a single plural `s` ("sensors" matches "sensor").
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(start, _)| {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && is_boundary_after(&haystack[start + term.len()..])
    })
}

fn is_boundary_after(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        None => true,
        Some('s') => chars.next().map_or(true, |c| !c.is_alphanumeric()),
        Some(c) => !c.is_alphanumeric(),
    }
}
