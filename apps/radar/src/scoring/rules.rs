//! Bonus rules applied after skill matching. Order matters: it is the order
//! the fired rules appear in `match_reason`.

/// What a rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    /// Job title only.
    Title,
    /// Title and description.
    Text,
    /// The normalized `remote` flag.
    RemoteFlag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusRule {
    pub label: &'static str,
    pub scope: RuleScope,
    /// Any one keyword fires the rule. Unused for `RemoteFlag`.
    pub keywords: &'static [&'static str],
    pub points: u32,
}

pub const BONUS_RULES: &[BonusRule] = &[
    // Role alignment
    BonusRule {
        label: "data analyst role",
        scope: RuleScope::Title,
        keywords: &["data analyst", "data analysis"],
        points: 15,
    },
    BonusRule {
        label: "research analyst role",
        scope: RuleScope::Title,
        keywords: &["research analyst"],
        points: 15,
    },
    BonusRule {
        label: "informatics role",
        scope: RuleScope::Title,
        keywords: &["informatics analyst", "health informatics"],
        points: 15,
    },
    BonusRule {
        label: "clinical data role",
        scope: RuleScope::Title,
        keywords: &["clinical data analyst", "clinical analyst"],
        points: 15,
    },
    BonusRule {
        label: "data scientist role",
        scope: RuleScope::Title,
        keywords: &["data scientist", "data science"],
        points: 15,
    },
    BonusRule {
        label: "ml engineer role",
        scope: RuleScope::Title,
        keywords: &["machine learning engineer", "ml engineer"],
        points: 10,
    },
    // Domain
    BonusRule {
        label: "healthcare",
        scope: RuleScope::Text,
        keywords: &["healthcare", "clinical", "medical", "health system"],
        points: 10,
    },
    BonusRule {
        label: "ehr / clinical data",
        scope: RuleScope::Text,
        keywords: &[
            "ehr",
            "electronic health record",
            "epic",
            "cerner",
            "omop",
            "i2b2",
            "fhir",
        ],
        points: 10,
    },
    BonusRule {
        label: "research",
        scope: RuleScope::Text,
        keywords: &["research", "scientist"],
        points: 10,
    },
    // Tools / credentials
    BonusRule {
        label: "graduate degree",
        scope: RuleScope::Text,
        keywords: &["phd", "doctoral", "graduate"],
        points: 8,
    },
    BonusRule {
        label: "wearables / sensors",
        scope: RuleScope::Text,
        keywords: &["wearable", "sensor", "iot", "fitbit"],
        points: 8,
    },
    BonusRule {
        label: "remote",
        scope: RuleScope::RemoteFlag,
        keywords: &[],
        points: 5,
    },
];
