//! Eligibility criteria extraction.
//!
//! Scholarship listings describe eligibility as free text. Each clause type
//! (score threshold, qualification, gender, region) is pulled out by its own
//! independent pass, and a clause that is absent or unclear leaves the
//! matching field unconstrained. Ambiguous fragments are kept as
//! [`ParseWarning`]s so the scorer can explain them without treating them as
//! binding.

mod clauses;

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::domain::{Gender, QualificationTier};

/// Unit a threshold was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScale {
    Percentage,
    TenPoint,
}

impl ScoreScale {
    pub(crate) fn maximum(&self) -> f64 {
        match self {
            ScoreScale::Percentage => 100.0,
            ScoreScale::TenPoint => 10.0,
        }
    }
}

impl fmt::Display for ScoreScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreScale::Percentage => f.write_str("percentage"),
            ScoreScale::TenPoint => f.write_str("10-point"),
        }
    }
}

/// Minimum score tagged with the scale it was stated on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreThreshold {
    pub value: f64,
    pub scale: ScoreScale,
}

impl ScoreThreshold {
    /// Threshold expressed on the 0-100 scale profiles are normalized to.
    pub fn normalized(&self) -> f64 {
        let value = match self.scale {
            ScoreScale::Percentage => self.value,
            ScoreScale::TenPoint => self.value * 10.0,
        };
        value.clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QualificationSet {
    #[default]
    Any,
    Only(BTreeSet<QualificationTier>),
}

impl QualificationSet {
    pub fn admits(&self, tier: QualificationTier) -> bool {
        match self {
            QualificationSet::Any => true,
            QualificationSet::Only(tiers) => tiers.contains(&tier),
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, QualificationSet::Any)
    }

    pub fn describe(&self) -> String {
        match self {
            QualificationSet::Any => "any".to_string(),
            QualificationSet::Only(tiers) => tiers
                .iter()
                .map(QualificationTier::label)
                .collect::<Vec<_>>()
                .join("/"),
        }
    }
}

/// Sparse constraint set extracted from one listing's eligibility text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EligibilityPredicate {
    pub min_score: Option<ScoreThreshold>,
    pub allowed_qualifications: QualificationSet,
    pub gender_constraint: Option<Gender>,
    pub region_constraint: Option<String>,
    /// Fragments that looked like constraints but could not be structured.
    pub unstructured: Vec<ParseWarning>,
}

impl EligibilityPredicate {
    pub fn unconstrained() -> Self {
        Self::default()
    }

    /// True when no binding constraint was extracted.
    pub fn is_open(&self) -> bool {
        self.min_score.is_none()
            && self.allowed_qualifications.is_any()
            && self.gender_constraint.is_none()
            && self.region_constraint.is_none()
    }
}

/// Non-fatal note about a clause the parser declined to enforce.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseWarning {
    #[error("score threshold {value} is outside the {scale} scale")]
    ThresholdOutOfRange { value: f64, scale: ScoreScale },
    #[error("score requirement without a usable threshold: \"{0}\"")]
    UnstructuredScoreClause(String),
    #[error("several regions named ({}); region left unconstrained", .0.join(", "))]
    AmbiguousRegion(Vec<String>),
    #[error("\"{0}\" named without residency wording; region left unconstrained")]
    UnconfirmedRegion(String),
}

/// Extracts the eligibility predicate for a listing. Never fails.
pub fn parse(eligibility_text: &str) -> EligibilityPredicate {
    let text = eligibility_text.trim();
    if is_open_text(text) {
        return EligibilityPredicate::unconstrained();
    }

    let mut warnings = Vec::new();
    let min_score = clauses::score_threshold(text, &mut warnings);
    let allowed_qualifications = clauses::qualifications(text);
    let gender_constraint = clauses::gender(text);
    let region_constraint = clauses::region(text, &mut warnings);

    for warning in &warnings {
        tracing::debug!(%warning, "eligibility clause left unconstrained");
    }

    EligibilityPredicate {
        min_score,
        allowed_qualifications,
        gender_constraint,
        region_constraint,
        unstructured: warnings,
    }
}

/// Scraped listings use placeholders such as "None" for "open to all".
fn is_open_text(text: &str) -> bool {
    text.is_empty()
        || matches!(
            text.to_ascii_lowercase().as_str(),
            "none" | "nil" | "na" | "n/a" | "-" | "open to all" | "all"
        )
}
