use std::sync::Arc;

use chrono::{Local, NaiveDate};
use rayon::prelude::*;
use tracing::{debug, info};

use super::criteria;
use super::domain::UserId;
use super::normalizer::normalize;
use super::ranking::{self, validate_limit, InvalidLimit};
use super::repository::{ProfileStore, ScholarshipCatalog, StoreError};
use super::scoring::{self, MatchResult, ScoringConfig, ScoringContext};

pub const DEFAULT_LIMIT: i64 = 20;

/// Entry point composing the collaborators with the scoring pipeline.
pub struct RecommendationService<P, C> {
    profiles: Arc<P>,
    catalog: Arc<C>,
    scoring: ScoringConfig,
    default_limit: i64,
}

impl<P, C> RecommendationService<P, C>
where
    P: ProfileStore + 'static,
    C: ScholarshipCatalog + 'static,
{
    pub fn new(profiles: Arc<P>, catalog: Arc<C>, scoring: ScoringConfig) -> Self {
        Self {
            profiles,
            catalog,
            scoring,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// Replaces the cutoff used when a request does not name one.
    pub fn with_default_limit(mut self, limit: i64) -> Result<Self, InvalidLimit> {
        validate_limit(limit)?;
        self.default_limit = limit;
        Ok(self)
    }

    pub fn default_limit(&self) -> i64 {
        self.default_limit
    }

    /// Ranked recommendations for `user`, evaluated against today's date.
    pub fn recommend(
        &self,
        user: &UserId,
        limit: Option<i64>,
    ) -> Result<Vec<MatchResult>, RecommendationError> {
        self.recommend_on(user, limit, Local::now().date_naive())
    }

    /// Same as [`recommend`](Self::recommend) with the evaluation date pinned,
    /// so identical inputs always produce identical output.
    pub fn recommend_on(
        &self,
        user: &UserId,
        limit: Option<i64>,
        today: NaiveDate,
    ) -> Result<Vec<MatchResult>, RecommendationError> {
        let limit = limit.unwrap_or(self.default_limit);
        validate_limit(limit)?;

        let (profile, catalog) = rayon::join(|| self.profiles.fetch(user), || self.catalog.list());
        let profile = profile?.ok_or_else(|| RecommendationError::ProfileNotFound(user.clone()))?;
        let catalog = catalog?;

        if catalog.is_empty() {
            info!(user = %user, "catalog empty; no recommendations");
            return Ok(Vec::new());
        }

        let normalized = normalize(&profile);
        let context = ScoringContext::new(&catalog, today, self.scoring.clone());

        let results: Vec<MatchResult> = catalog
            .par_iter()
            .enumerate()
            .map(|(position, record)| {
                let predicate = criteria::parse(&record.eligibility_text);
                let mut result = scoring::score(&normalized, &predicate, record, &context);
                result.catalog_position = position;
                debug!(
                    scholarship = %record.id,
                    score = result.score,
                    "scholarship scored"
                );
                result
            })
            .collect();

        let ranked = ranking::rank(results, limit)?;
        info!(
            user = %user,
            catalog_size = catalog.len(),
            returned = ranked.len(),
            "recommendations ranked"
        );
        Ok(ranked)
    }
}

/// Error raised by the recommendation service.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("no profile found for '{0}'")]
    ProfileNotFound(UserId),
    #[error(transparent)]
    InvalidLimit(#[from] InvalidLimit),
    #[error(transparent)]
    Store(#[from] StoreError),
}
