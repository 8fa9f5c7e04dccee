//! Field extraction for Tavily web-search results. Tavily returns pages, not
//! postings, so title/company/location/salary are recovered heuristically.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::JobSource;

const SITE_SUFFIXES: &[&str] = &[
    " | LinkedIn",
    " - Indeed",
    " | Indeed.com",
    " - Glassdoor",
    " | Glassdoor",
    " | Built In",
    " | Wellfound",
];

const TITLE_SEPARATORS: &[&str] = &[" - ", " at "];

const MAX_COMPANY_LEN: usize = 60;
const MAX_LOCATION_LEN: usize = 80;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern is valid")
}

static TRAILING_JOB_ID: Lazy<Regex> = Lazy::new(|| compile(r"-\d+$"));

static LOCATION_OR_JUNK: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^(\d|remote|hybrid|boston|new york|san francisco|chicago)"));

static AT_COMPANY: Lazy<Regex> =
    Lazy::new(|| compile(r"\bat\s+([A-Z][A-Za-z0-9&'\-,. ]{2,50})(?:\s*[|\n(]|$)"));

static AT_COMPANY_REJECT: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(least|years?|experience|remote|all|our|the|a)\b"));

static LOCATION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:location|where)\s*[:\-]\s*([^\n.|]+)",
        r"\b((?i:remote|hybrid|on-site)(?:\s+in)?\s+[A-Z][a-z]+(?:[ .][A-Z][a-z]+)*(?:,\s*[A-Z]{2})?)",
        r"\b([A-Z][a-z]+(?:[ .][A-Z][a-z]+)*,\s*[A-Z]{2}\s*\d{5})\b",
        r"\b([A-Z][a-z]+(?:[ .][A-Z][a-z]+)*,\s*[A-Z]{2})\b",
    ]
    .iter()
    .map(|p| compile(p))
    .collect()
});

static SALARY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\$[\d,]+(?:\s*k)?\s*[-–]\s*\$[\d,]+(?:\s*k)?(?:\s*(?:per\s+)?(?:year|yr|annually|a\s+year))?",
        r"(?i)\$[\d,]+(?:\s*k)?\s*(?:per\s+|an?\s+|/\s*)?(?:year|yr|annually|hour|hr)\b",
    ]
    .iter()
    .map(|p| compile(p))
    .collect()
});

/// Search/aggregator result pages, not individual postings.
static REJECT_URLS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"indeed\.com/q-",
        r"indeed\.com/jobs\?",
        r"indeed\.com/m/",
        r"glassdoor\.com/job/.*srch_",
        r"glassdoor\.com/jobs/",
        r"linkedin\.com/jobs/search/",
        r"linkedin\.com/jobs/[a-z-]+jobs",
        r"wellfound\.com/jobs$",
        r"builtin\.com/jobs",
    ]
    .iter()
    .map(|p| compile(p))
    .collect()
});

static REJECT_TITLES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"^\d+\s+\w",
        r"\bjobs? in\b.*(remote|boston|ma)",
        r"\bjob openings? from\b",
        r"\bjobs?,?\s+employment\b",
        r"^flexible .+ jobs?$",
        r"^remote .+ jobs? in\b",
        r"browse \d+",
        r"search .+ jobs? in\b",
    ]
    .iter()
    .map(|p| compile(p))
    .collect()
});

fn strip_site_suffix(title: &str) -> &str {
    let mut title = title.trim();
    for suffix in SITE_SUFFIXES {
        if let Some(stripped) = title.strip_suffix(suffix) {
            title = stripped;
        }
    }
    title.trim()
}

/// "Data Analyst - Acme | LinkedIn" → "Data Analyst".
pub fn extract_job_title(page_title: &str) -> String {
    let title = strip_site_suffix(page_title);
    for sep in TITLE_SEPARATORS {
        if let Some((head, _)) = title.split_once(sep) {
            return head.trim().to_string();
        }
    }
    title.to_string()
}

/// Best-effort company name from the URL slug, page title, then page text.
pub fn extract_company(page_title: &str, url: &str, content: &str, raw_content: &str) -> String {
    if let Some(company) = company_from_linkedin_slug(url) {
        return company;
    }

    let title = strip_site_suffix(page_title);
    for sep in TITLE_SEPARATORS {
        if title.contains(sep) {
            if let Some(candidate) = title.rsplit(sep).next().map(str::trim) {
                if !candidate.is_empty()
                    && candidate.len() < MAX_COMPANY_LEN
                    && !LOCATION_OR_JUNK.is_match(candidate)
                {
                    return candidate.to_string();
                }
            }
        }
    }

    let full_text = format!("{content}\n{raw_content}");
    if let Some(caps) = AT_COMPANY.captures(&full_text) {
        let candidate = caps[1].trim().trim_end_matches(['.', ',']).trim();
        if !AT_COMPANY_REJECT.is_match(candidate) {
            return candidate.to_string();
        }
    }

    String::new()
}

/// LinkedIn posting URLs look like `/jobs/view/data-analyst-at-acme-corp-123456`.
fn company_from_linkedin_slug(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("linkedin.com/jobs/view/")?;
    let slug = rest.trim_end_matches('/').split(['/', '?']).next()?;
    let slug = TRAILING_JOB_ID.replace(slug, "");
    let (_, company_slug) = slug.split_once("-at-")?;
    let company = company_slug
        .split('-')
        .filter(|w| !w.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ");
    (!company.is_empty()).then_some(company)
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn extract_location(content: &str) -> Option<String> {
    LOCATION_PATTERNS.iter().find_map(|re| {
        re.captures(content)
            .map(|caps| caps[1].trim().to_string())
            .filter(|loc| !loc.is_empty() && loc.len() < MAX_LOCATION_LEN)
    })
}

pub fn extract_salary(content: &str) -> Option<String> {
    SALARY_PATTERNS
        .iter()
        .find_map(|re| re.find(content).map(|m| m.as_str().trim().to_string()))
}

/// Source board from the URL host. Non-board hosts are `Other`.
pub fn detect_source(url: &str) -> JobSource {
    let host = url
        .split_once("://")
        .map_or(url, |(_, rest)| rest)
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    JobSource::from_label(host)
}

/// False for search-results and listing-index pages.
pub fn is_individual_job_posting(url: &str, page_title: &str) -> bool {
    let url = url.to_lowercase();
    if REJECT_URLS.iter().any(|re| re.is_match(&url)) {
        return false;
    }
    let title = page_title.to_lowercase();
    !REJECT_TITLES.iter().any(|re| re.is_match(&title))
}
