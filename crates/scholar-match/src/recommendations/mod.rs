//! Scholarship recommendations for a single profile.
//!
//! Eligibility text is parsed into a predicate, the profile is normalized to a
//! shared 0-100 scale, each catalog entry is scored with a transparent set of
//! sub-scores, and the results are ranked deterministically.

pub mod criteria;
pub mod domain;
pub mod normalizer;
pub mod ranking;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use criteria::{EligibilityPredicate, ParseWarning, QualificationSet, ScoreScale, ScoreThreshold};
pub use domain::{
    Gender, Profile, QualificationTier, ScholarshipId, ScholarshipRecord, ScoreType, UserId,
};
pub use normalizer::{normalize, NormalizationWarning, NormalizedProfile};
pub use ranking::{rank, InvalidLimit};
pub use repository::{ProfileStore, ScholarshipCatalog, StoreError};
pub use router::recommendation_router;
pub use scoring::{
    CriterionStatus, MatchResult, ScoringConfig, ScoringContext, SubScore, SubScoreKind,
};
pub use service::{RecommendationError, RecommendationService, DEFAULT_LIMIT};
