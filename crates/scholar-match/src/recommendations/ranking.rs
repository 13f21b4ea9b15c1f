use std::cmp::Ordering;

use super::scoring::MatchResult;

/// Rejected ranking cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("limit must be greater than zero (got {0})")]
pub struct InvalidLimit(pub i64);

/// Checks a caller-supplied cutoff and converts it to a length.
pub fn validate_limit(limit: i64) -> Result<usize, InvalidLimit> {
    if limit <= 0 {
        return Err(InvalidLimit(limit));
    }
    Ok(usize::try_from(limit).unwrap_or(usize::MAX))
}

/// Orders results and keeps the top `limit`.
///
/// Score descending, then nearer deadline (rolling deadlines last), then larger
/// award, then catalog position.
pub fn rank(mut results: Vec<MatchResult>, limit: i64) -> Result<Vec<MatchResult>, InvalidLimit> {
    let limit = validate_limit(limit)?;
    results.sort_by(compare);
    results.truncate(limit);
    Ok(results)
}

fn compare(left: &MatchResult, right: &MatchResult) -> Ordering {
    right
        .score
        .total_cmp(&left.score)
        .then_with(|| match (left.deadline, right.deadline) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| right.award_amount.total_cmp(&left.award_amount))
        .then_with(|| left.catalog_position.cmp(&right.catalog_position))
}
