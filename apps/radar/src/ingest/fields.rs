use serde_json::Value;

use crate::skills::contains_term;

/// Interprets a loosely-typed truthy/falsy signal.
/// `None` when the value carries no signal (null, empty, unrecognized text).
pub fn coerce_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" | "1" | "remote" => Some(true),
            "false" | "no" | "n" | "0" | "onsite" | "on-site" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// True if any of the texts mentions remote work.
pub fn mentions_remote(texts: &[&str]) -> bool {
    texts
        .iter()
        .any(|t| contains_term(&t.to_lowercase(), "remote"))
}

/// Remote if the explicit flag says so, or the text clues mention it.
/// An explicit `false` is overridden by textual clues; upstream flags are
/// frequently unset-as-false.
pub fn resolve_remote(flag: Option<&Value>, clues: &[&str]) -> bool {
    flag.and_then(coerce_flag).unwrap_or(false) || mentions_remote(clues)
}

/// Trims and drops empty strings.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Trimmed text, or the empty placeholder.
pub fn text_or_empty(value: Option<String>) -> String {
    non_empty(value).unwrap_or_default()
}

/// Reads a positive salary amount from a number or numeric string.
pub fn amount(value: Option<&Value>) -> Option<u64> {
    let raw = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().replace([',', '$'], "").parse::<f64>().ok()?,
        _ => return None,
    };
    if raw.is_finite() && raw >= 1.0 {
        Some(raw.trunc() as u64)
    } else {
        None
    }
}

/// Formats a salary range: `$90,000–$120,000 yr`, `$90,000+ yr`, `up to $120,000 yr`.
pub fn format_salary(min: Option<u64>, max: Option<u64>, period: &str) -> Option<String> {
    let body = match (min, max) {
        (Some(lo), Some(hi)) => format!("${}–${}", group_thousands(lo), group_thousands(hi)),
        (Some(lo), None) => format!("${}+", group_thousands(lo)),
        (None, Some(hi)) => format!("up to ${}", group_thousands(hi)),
        (None, None) => return None,
    };
    Some(format!("{body} {}", period.trim()).trim().to_string())
}

/// Short label for a pay period ("YEAR" → "yr").
pub fn period_label(period: &str) -> String {
    match period.trim().to_ascii_lowercase().as_str() {
        "year" | "yearly" | "annual" => "yr".to_string(),
        "hour" | "hourly" => "hr".to_string(),
        "month" | "monthly" => "mo".to_string(),
        other => other.to_string(),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_flag_variants() {
        assert_eq!(coerce_flag(&json!(true)), Some(true));
        assert_eq!(coerce_flag(&json!(0)), Some(false));
        assert_eq!(coerce_flag(&json!(1.0)), Some(true));
        assert_eq!(coerce_flag(&json!("Yes")), Some(true));
        assert_eq!(coerce_flag(&json!("false")), Some(false));
        assert_eq!(coerce_flag(&json!("maybe")), None);
        assert_eq!(coerce_flag(&json!(null)), None);
    }

    #[test]
    fn test_resolve_remote_uses_text_clues() {
        assert!(resolve_remote(None, &["Remote, US"]));
        assert!(resolve_remote(Some(&json!(false)), &["Boston, MA (Remote)"]));
        assert!(resolve_remote(Some(&json!("true")), &["Boston, MA"]));
        assert!(!resolve_remote(Some(&json!(false)), &["Boston, MA"]));
        assert!(!resolve_remote(None, &["Remotely sensed imagery lab"]));
    }

    #[test]
    fn test_non_empty_trims() {
        assert_eq!(non_empty(Some("  Acme ".to_string())), Some("Acme".to_string()));
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(text_or_empty(None), "");
    }

    #[test]
    fn test_amount_accepts_numbers_and_strings() {
        assert_eq!(amount(Some(&json!(95000.7))), Some(95000));
        assert_eq!(amount(Some(&json!("$120,000"))), Some(120000));
        assert_eq!(amount(Some(&json!(0))), None);
        assert_eq!(amount(Some(&json!("n/a"))), None);
        assert_eq!(amount(None), None);
    }

    #[test]
    fn test_format_salary_shapes() {
        assert_eq!(
            format_salary(Some(90000), Some(120000), "yearly"),
            Some("$90,000–$120,000 yearly".to_string())
        );
        assert_eq!(format_salary(Some(45), None, "hr"), Some("$45+ hr".to_string()));
        assert_eq!(
            format_salary(None, Some(1_500_000), ""),
            Some("up to $1,500,000".to_string())
        );
        assert_eq!(format_salary(None, None, "yr"), None);
    }

    #[test]
    fn test_period_label() {
        assert_eq!(period_label("YEAR"), "yr");
        assert_eq!(period_label("hour"), "hr");
        assert_eq!(period_label("week"), "week");
    }
}
