use chrono::NaiveDate;

use super::{AwardRanking, CriterionStatus, SubScoreKind};
use crate::recommendations::criteria::{QualificationSet, ScoreThreshold};
use crate::recommendations::domain::{Gender, QualificationTier};

/// Outcome of one sub-score, before weighting.
pub(crate) struct Assessment {
    pub kind: SubScoreKind,
    /// `None` when the sub-score does not apply and is left out of both sums.
    pub value: Option<f64>,
    pub status: CriterionStatus,
    /// Set when a hard constraint failed; forces the overall score to zero.
    pub excludes: bool,
    pub reason: String,
}

impl Assessment {
    fn new(kind: SubScoreKind, value: f64, status: CriterionStatus, reason: String) -> Self {
        Self {
            kind,
            value: Some(value),
            status,
            excludes: false,
            reason,
        }
    }

    fn excluding(kind: SubScoreKind, reason: String) -> Self {
        Self {
            kind,
            value: Some(0.0),
            status: CriterionStatus::Failed,
            excludes: true,
            reason,
        }
    }
}

pub(crate) fn qualification_fit(tier: QualificationTier, allowed: &QualificationSet) -> Assessment {
    let kind = SubScoreKind::Qualification;
    match allowed {
        QualificationSet::Any => Assessment::new(
            kind,
            1.0,
            CriterionStatus::Satisfied,
            "qualification: open to any level".to_string(),
        ),
        set if set.admits(tier) => Assessment::new(
            kind,
            1.0,
            CriterionStatus::Satisfied,
            format!("qualification: {tier} accepted"),
        ),
        set => Assessment::excluding(
            kind,
            format!("qualification: {tier} not in {}", set.describe()),
        ),
    }
}

pub(crate) fn score_threshold_fit(
    user_score: Option<f64>,
    threshold: Option<ScoreThreshold>,
) -> Assessment {
    let kind = SubScoreKind::ScoreThreshold;
    let Some(threshold) = threshold else {
        return Assessment::new(
            kind,
            1.0,
            CriterionStatus::Satisfied,
            "score threshold: none stated".to_string(),
        );
    };
    let required = threshold.normalized();

    let Some(user_score) = user_score else {
        return Assessment {
            kind,
            value: None,
            status: CriterionStatus::Skipped,
            excludes: false,
            reason: format!(
                "score threshold: {} required, profile score unknown (skipped)",
                figure(required)
            ),
        };
    };

    if user_score >= required {
        return Assessment::new(
            kind,
            1.0,
            CriterionStatus::Satisfied,
            format!(
                "score threshold: {} >= {}",
                figure(user_score),
                figure(required)
            ),
        );
    }

    let credit = (1.0 - (required - user_score) / required).max(0.0);
    if credit > 0.0 {
        Assessment::new(
            kind,
            credit,
            CriterionStatus::Partial,
            format!(
                "score threshold: {} < {} (partial)",
                figure(user_score),
                figure(required)
            ),
        )
    } else {
        Assessment::new(
            kind,
            0.0,
            CriterionStatus::Failed,
            format!(
                "score threshold: {} < {}",
                figure(user_score),
                figure(required)
            ),
        )
    }
}

pub(crate) fn gender_fit(gender: Gender, constraint: Option<Gender>) -> Assessment {
    let kind = SubScoreKind::Gender;
    match constraint {
        None => Assessment::new(
            kind,
            1.0,
            CriterionStatus::Satisfied,
            "gender: unrestricted".to_string(),
        ),
        Some(required) if required == gender => Assessment::new(
            kind,
            1.0,
            CriterionStatus::Satisfied,
            format!("gender: {}", required.label()),
        ),
        Some(required) => {
            Assessment::excluding(kind, format!("gender: {} only", required.label()))
        }
    }
}

pub(crate) fn region_fit(region: &str, constraint: Option<&str>) -> Assessment {
    let kind = SubScoreKind::Region;
    let Some(required) = constraint else {
        return Assessment::new(
            kind,
            1.0,
            CriterionStatus::Satisfied,
            "region: unrestricted".to_string(),
        );
    };

    if !region.is_empty() && contains_ignore_case(region, required) {
        Assessment::new(
            kind,
            1.0,
            CriterionStatus::Satisfied,
            format!("region: {required}"),
        )
    } else {
        Assessment::excluding(kind, format!("region: {required} only"))
    }
}

pub(crate) fn deadline_freshness(
    deadline: Option<NaiveDate>,
    today: NaiveDate,
    decay_days: i64,
) -> Assessment {
    let kind = SubScoreKind::Deadline;
    let Some(deadline) = deadline else {
        return Assessment::new(
            kind,
            1.0,
            CriterionStatus::Satisfied,
            "deadline: rolling".to_string(),
        );
    };

    let days_past = (today - deadline).num_days();
    if days_past <= 0 {
        return Assessment::new(
            kind,
            1.0,
            CriterionStatus::Satisfied,
            format!("deadline: open until {deadline}"),
        );
    }

    let decay = decay_days.max(1) as f64;
    let freshness = (1.0 - days_past as f64 / decay).max(0.0);
    if freshness > 0.0 {
        Assessment::new(
            kind,
            freshness,
            CriterionStatus::Partial,
            format!("deadline: closed {days_past} days ago (partial)"),
        )
    } else {
        Assessment::new(
            kind,
            0.0,
            CriterionStatus::Failed,
            format!("deadline: closed {days_past} days ago"),
        )
    }
}

pub(crate) fn award_attractiveness(amount: f64, ranking: &AwardRanking) -> Assessment {
    let kind = SubScoreKind::Award;
    let position = ranking.position(amount);
    let amount = figure(amount);

    if position >= 0.5 {
        Assessment::new(
            kind,
            position,
            CriterionStatus::Satisfied,
            format!("award: {amount} (upper half of catalog)"),
        )
    } else if position > 0.0 {
        Assessment::new(
            kind,
            position,
            CriterionStatus::Partial,
            format!("award: {amount} (lower half of catalog, partial)"),
        )
    } else {
        Assessment::new(
            kind,
            0.0,
            CriterionStatus::Failed,
            format!("award: {amount} (lowest in catalog)"),
        )
    }
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.trim().to_lowercase())
}

/// Renders a number without trailing zeros: `72`, `7.5`, `66.67`.
pub(crate) fn figure(value: f64) -> String {
    let rendered = format!("{value:.2}");
    rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}
