//! Resume Skill Extractor: turns raw resume text into a `SkillProfile`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::skills::catalog::{contains_term, SkillCatalog};

/// Ordered, lower-cased, deduplicated skills for one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillProfile {
    skills: Vec<String>,
}

impl SkillProfile {
    pub fn new<I>(skills: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let skills = skills
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { skills }
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }
}

/// Profile plus whether it came from the catalog's fallback subset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillExtraction {
    pub profile: SkillProfile,
    pub fallback_used: bool,
}

/// Returns the catalog skills present in the resume, in catalog order.
///
/// Blank text, or text that contains no catalog term, yields the fallback subset
/// so the scorer never works against an empty profile.
pub fn extract_skills(resume_text: &str, catalog: &SkillCatalog) -> SkillExtraction {
    let text = resume_text.to_lowercase();

    let found: Vec<&str> = if text.trim().is_empty() {
        Vec::new()
    } else {
        catalog
            .terms()
            .iter()
            .filter(|term| contains_term(&text, term))
            .map(String::as_str)
            .collect()
    };

    if found.is_empty() {
        debug!(
            "Resume text yielded no catalog skills; using {} fallback skills",
            catalog.fallback().len()
        );
        return SkillExtraction {
            profile: SkillProfile::new(catalog.fallback()),
            fallback_used: true,
        };
    }

    debug!("Extracted {} skills from resume", found.len());
    SkillExtraction {
        profile: SkillProfile::new(found),
        fallback_used: false,
    }
}
