mod config;
pub(crate) mod rules;

pub use config::ScoringConfig;

use chrono::NaiveDate;
use serde::Serialize;

use super::criteria::EligibilityPredicate;
use super::domain::{ScholarshipId, ScholarshipRecord};
use super::normalizer::NormalizedProfile;
use rules::Assessment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubScoreKind {
    Qualification,
    ScoreThreshold,
    Gender,
    Region,
    Deadline,
    Award,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    Satisfied,
    Partial,
    Failed,
    /// The sub-score could not be evaluated and was left out of the total.
    Skipped,
}

/// Discrete contribution to a match score, kept for transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubScore {
    pub kind: SubScoreKind,
    pub weight: f64,
    pub value: Option<f64>,
    pub status: CriterionStatus,
}

/// Scored recommendation for one scholarship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub scholarship_id: ScholarshipId,
    pub name: String,
    pub award_amount: f64,
    pub deadline: Option<NaiveDate>,
    pub eligibility_text: String,
    pub apply_link: String,
    /// 0-100, rounded to two decimals.
    pub score: f64,
    pub sub_scores: Vec<SubScore>,
    pub matched_criteria: Vec<String>,
    pub unmet_criteria: Vec<String>,
    /// Non-binding notes: clauses left unstructured, profile fields left unknown.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    /// Index in the catalog snapshot; the last tie-break when ranking.
    #[serde(skip)]
    pub catalog_position: usize,
}

/// Award amounts of the current catalog, ranked for the attractiveness sub-score.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AwardRanking {
    distinct: Vec<f64>,
}

impl AwardRanking {
    pub fn from_catalog(catalog: &[ScholarshipRecord]) -> Self {
        let mut distinct: Vec<f64> = catalog
            .iter()
            .map(|record| sanitize_amount(record.award_amount))
            .collect();
        distinct.sort_by(f64::total_cmp);
        distinct.dedup();
        Self { distinct }
    }

    /// Position of `amount` among distinct catalog awards, from 0.0 (lowest)
    /// to 1.0 (highest). Equal awards share a position.
    pub fn position(&self, amount: f64) -> f64 {
        if self.distinct.len() <= 1 {
            return 1.0;
        }
        let amount = sanitize_amount(amount);
        let index = self
            .distinct
            .partition_point(|candidate| *candidate < amount)
            .min(self.distinct.len() - 1);
        index as f64 / (self.distinct.len() - 1) as f64
    }
}

fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount > 0.0 {
        amount
    } else {
        0.0
    }
}

/// Per-request inputs shared by every scholarship scored in that request.
#[derive(Debug, Clone)]
pub struct ScoringContext {
    pub today: NaiveDate,
    pub config: ScoringConfig,
    pub awards: AwardRanking,
}

impl ScoringContext {
    pub fn new(catalog: &[ScholarshipRecord], today: NaiveDate, config: ScoringConfig) -> Self {
        Self {
            today,
            config,
            awards: AwardRanking::from_catalog(catalog),
        }
    }
}

/// Scores one scholarship for one profile.
///
/// The total is `100 * Σ(weight * value) / Σ(weight)` over the sub-scores that
/// apply. A failed hard constraint (qualification, gender, region) forces the
/// total to zero.
pub fn score(
    profile: &NormalizedProfile,
    predicate: &EligibilityPredicate,
    scholarship: &ScholarshipRecord,
    context: &ScoringContext,
) -> MatchResult {
    let config = &context.config;
    let assessments: [(f64, Assessment); 6] = [
        (
            config.qualification_weight,
            rules::qualification_fit(
                profile.qualification_tier,
                &predicate.allowed_qualifications,
            ),
        ),
        (
            config.score_threshold_weight,
            rules::score_threshold_fit(profile.score_0_to_100, predicate.min_score),
        ),
        (
            config.gender_weight,
            rules::gender_fit(profile.gender, predicate.gender_constraint),
        ),
        (
            config.region_weight,
            rules::region_fit(&profile.region, predicate.region_constraint.as_deref()),
        ),
        (
            config.deadline_weight,
            rules::deadline_freshness(
                scholarship.deadline,
                context.today,
                config.deadline_decay_days,
            ),
        ),
        (
            config.award_weight,
            rules::award_attractiveness(scholarship.award_amount, &context.awards),
        ),
    ];

    let mut weighted = 0.0;
    let mut applicable = 0.0;
    let mut excluded = false;
    let mut sub_scores = Vec::with_capacity(assessments.len());
    let mut matched_criteria = Vec::new();
    let mut unmet_criteria = Vec::new();

    for (weight, assessment) in assessments {
        if let Some(value) = assessment.value {
            weighted += weight * value;
            applicable += weight;
        }
        excluded |= assessment.excludes;

        match assessment.status {
            CriterionStatus::Satisfied => matched_criteria.push(assessment.reason),
            _ => unmet_criteria.push(assessment.reason),
        }
        sub_scores.push(SubScore {
            kind: assessment.kind,
            weight,
            value: assessment.value,
            status: assessment.status,
        });
    }

    if let Some(institution) = &profile.institution {
        if rules::contains_ignore_case(&scholarship.eligibility_text, institution) {
            matched_criteria.push(format!("institution: {institution} named in eligibility"));
        }
    }

    let mut notes: Vec<String> = predicate
        .unstructured
        .iter()
        .map(|warning| format!("eligibility: {warning}"))
        .collect();
    notes.extend(
        profile
            .warnings
            .iter()
            .map(|warning| format!("profile: {warning}")),
    );

    let raw = if excluded || applicable <= 0.0 {
        0.0
    } else {
        100.0 * weighted / applicable
    };

    MatchResult {
        scholarship_id: scholarship.id.clone(),
        name: scholarship.name.clone(),
        award_amount: scholarship.award_amount,
        deadline: scholarship.deadline,
        eligibility_text: scholarship.eligibility_text.clone(),
        apply_link: scholarship.apply_link.clone(),
        score: round_to_cents(raw),
        sub_scores,
        matched_criteria,
        unmet_criteria,
        notes,
        catalog_position: 0,
    }
}

fn round_to_cents(value: f64) -> f64 {
    ((value * 100.0).round() / 100.0).clamp(0.0, 100.0)
}
