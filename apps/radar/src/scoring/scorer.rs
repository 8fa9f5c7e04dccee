//! Scorer: rates each job's fit against the resume skill profile.
//!
//! Algorithm:
//! 1. Blank title and description → 0 with an empty reason.
//! 2. +5 for every profile skill found in title + description (once per skill).
//! 3. Each bonus rule in `BONUS_RULES` adds its points at most once.
//! 4. Clamp to 0 – 100.
//!
//! `match_reason` lists the first six matched skills, then each fired rule
//! with its points, in evaluation order.

use crate::models::{JobRecord, ScoredJobRecord};
use crate::scoring::rules::{BonusRule, RuleScope, BONUS_RULES};
use crate::skills::{contains_term, SkillProfile};

pub const POINTS_PER_SKILL: u32 = 5;
pub const MAX_SCORE: u32 = 100;
const REASON_SKILL_LIMIT: usize = 6;

pub fn score(job: JobRecord, profile: &SkillProfile) -> ScoredJobRecord {
    if job.title.trim().is_empty() && job.description.trim().is_empty() {
        return ScoredJobRecord {
            job,
            match_score: 0,
            match_reason: String::new(),
        };
    }

    let title = job.title.to_lowercase();
    let text = format!("{title} {}", job.description.to_lowercase());

    let matched: Vec<&str> = profile
        .skills()
        .iter()
        .filter(|skill| contains_term(&text, skill))
        .map(String::as_str)
        .collect();

    let mut total = matched.len() as u32 * POINTS_PER_SKILL;
    let mut reasons: Vec<String> = Vec::new();
    if !matched.is_empty() {
        let listed = &matched[..matched.len().min(REASON_SKILL_LIMIT)];
        reasons.push(format!("skills: {}", listed.join(", ")));
    }

    for rule in BONUS_RULES {
        if rule_fires(rule, &title, &text, job.remote) {
            total += rule.points;
            reasons.push(format!("{} (+{})", rule.label, rule.points));
        }
    }

    ScoredJobRecord {
        job,
        match_score: total.min(MAX_SCORE),
        match_reason: reasons.join("; "),
    }
}

fn rule_fires(rule: &BonusRule, title: &str, text: &str, remote: bool) -> bool {
    match rule.scope {
        RuleScope::Title => rule.keywords.iter().any(|kw| contains_term(title, kw)),
        RuleScope::Text => rule.keywords.iter().any(|kw| contains_term(text, kw)),
        RuleScope::RemoteFlag => remote,
    }
}

/// Scores every record and orders by descending score. Equal scores keep
/// their input order.
pub fn score_and_rank(batch: Vec<JobRecord>, profile: &SkillProfile) -> Vec<ScoredJobRecord> {
    let mut scored: Vec<ScoredJobRecord> = batch.into_iter().map(|job| score(job, profile)).collect();
    scored.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use crate::models::{job_id_for_url, JobSource};

    fn job(url: &str, title: &str, description: &str) -> JobRecord {
        JobRecord {
            id: job_id_for_url(url),
            source: JobSource::Linkedin,
            title: title.to_string(),
            company: "Acme".to_string(),
            location: None,
            description: description.to_string(),
            url: url.to_string(),
            posted_date: None,
            salary: None,
            employment_type: None,
            experience_level: None,
            remote: false,
            scraped_at: Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_skill_points_and_reason() {
        let profile = SkillProfile::new(["python", "sql"]);
        let scored = score(job("u1", "Data Engineer", "Python SQL"), &profile);
        assert_eq!(scored.match_score, 10);
        assert_eq!(scored.match_reason, "skills: python, sql");
    }

    #[test]
    fn test_blank_posting_scores_zero_even_when_remote() {
        let profile = SkillProfile::new(["python"]);
        let mut blank = job("u1", "  ", "");
        blank.remote = true;
        let scored = score(blank, &profile);
        assert_eq!(scored.match_score, 0);
        assert_eq!(scored.match_reason, "");
    }

    #[test]
    fn test_bonus_rules_fire_in_order() {
        let profile = SkillProfile::new(["sql"]);
        let mut posting = job("u1", "Clinical Data Analyst", "EHR research in a hospital");
        posting.remote = true;

        let scored = score(posting, &profile);
        assert_eq!(scored.match_score, 65);
        assert_eq!(
            scored.match_reason,
            "data analyst role (+15); clinical data role (+15); healthcare (+10); \
             ehr / clinical data (+10); research (+10); remote (+5)"
        );
    }

    #[test]
    fn test_role_rules_only_look_at_title() {
        let profile = SkillProfile::new(["python"]);
        let scored = score(job("u1", "Analyst", "Partner with our data scientist team"), &profile);
        assert!(!scored.match_reason.contains("data scientist role"));
        assert!(scored.match_reason.contains("research (+10)"));
    }

    #[test]
    fn test_rule_counts_once_with_many_keywords() {
        let profile = SkillProfile::new(["python"]);
        let scored = score(
            job("u1", "Analyst", "Epic, Cerner, FHIR and OMOP pipelines"),
            &profile,
        );
        assert_eq!(scored.match_score, 10);
        assert_eq!(scored.match_reason, "ehr / clinical data (+10)");
    }

    #[test]
    fn test_reason_lists_first_six_skills_but_counts_all() {
        let skills = ["python", "sql", "tableau", "excel", "aws", "docker", "git", "pandas"];
        let profile = SkillProfile::new(skills);
        let scored = score(job("u1", "Analyst", &skills.join(" ")), &profile);
        assert_eq!(scored.match_score, 40);
        assert_eq!(
            scored.match_reason,
            "skills: python, sql, tableau, excel, aws, docker"
        );
    }

    #[test]
    fn test_score_is_clamped_to_100() {
        let profile = SkillProfile::new([
            "python", "sql", "r", "tableau", "excel", "aws", "pandas", "numpy", "pytorch",
            "statistics",
        ]);
        let mut posting = job(
            "u1",
            "Data Scientist / Clinical Data Analyst, Health Informatics",
            "Python SQL R Tableau Excel AWS pandas numpy PyTorch statistics; \
             clinical research with EHR data, PhD preferred, wearable sensors",
        );
        posting.remote = true;
        assert_eq!(score(posting, &profile).match_score, MAX_SCORE);
    }

    #[test]
    fn test_rank_is_descending_and_stable() {
        let profile = SkillProfile::new(["python", "sql"]);
        let batch = vec![
            job("u1", "Analyst", "python"),
            job("u2", "Analyst", "python sql"),
            job("u3", "Analyst", "sql"),
            job("u4", "Analyst", "nothing relevant"),
        ];
        let ranked = score_and_rank(batch, &profile);
        let order: Vec<&str> = ranked.iter().map(|s| s.job.url.as_str()).collect();
        assert_eq!(order, vec!["u2", "u1", "u3", "u4"]);
    }

    #[test]
    fn test_rank_is_deterministic_and_bounded() {
        let profile = SkillProfile::new(["python", "sql", "healthcare"]);
        let batch = vec![
            job("u1", "Data Scientist", "Healthcare research, Python"),
            job("u2", "Research Analyst", "SQL"),
            job("u3", "", ""),
        ];
        let first = score_and_rank(batch.clone(), &profile);
        let second = score_and_rank(batch, &profile);
        assert_eq!(first, second);
        assert!(first.iter().all(|s| s.match_score <= MAX_SCORE));
    }
}
