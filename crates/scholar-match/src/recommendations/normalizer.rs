use serde::Serialize;

use super::domain::{Gender, Profile, QualificationTier, ScoreType};

/// Derived view of a profile in the vocabulary the scorer compares against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedProfile {
    /// `None` when the stored score could not be interpreted.
    pub score_0_to_100: Option<f64>,
    pub qualification_tier: QualificationTier,
    pub gender: Gender,
    /// Trimmed region text, matched case-insensitively.
    pub region: String,
    pub institution: Option<String>,
    #[serde(skip)]
    pub warnings: Vec<NormalizationWarning>,
}

/// Non-fatal problem found while interpreting a profile field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizationWarning {
    #[error("score value '{raw}' is not numeric; score-based matching skipped")]
    ScoreNotNumeric { raw: String },
}

pub fn normalize(profile: &Profile) -> NormalizedProfile {
    let mut warnings = Vec::new();
    let score_0_to_100 = match try_normalize_score(profile.score_type, &profile.score_value) {
        Ok(score) => Some(score),
        Err(warning) => {
            tracing::debug!(%warning, "profile score left unknown");
            warnings.push(warning);
            None
        }
    };

    NormalizedProfile {
        score_0_to_100,
        qualification_tier: profile.qualification,
        gender: profile.gender,
        region: profile.region.trim().to_string(),
        institution: profile
            .institution_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        warnings,
    }
}

/// Converts a raw score on its native scale to 0-100.
///
/// Percentages pass through, 10-point values are multiplied by ten, and the
/// result is clamped to `[0, 100]`.
pub fn try_normalize_score(score_type: ScoreType, raw: &str) -> Result<f64, NormalizationWarning> {
    let value = raw
        .trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| NormalizationWarning::ScoreNotNumeric {
            raw: raw.to_string(),
        })?;

    let scaled = match score_type {
        ScoreType::Percentage => value,
        ScoreType::GpaOn10 => value * 10.0,
    };

    Ok(scaled.clamp(0.0, 100.0))
}
