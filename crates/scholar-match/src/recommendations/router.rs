use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::UserId;
use super::repository::{ProfileStore, ScholarshipCatalog};
use super::service::{RecommendationError, RecommendationService};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RecommendationQuery {
    pub email: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct LimitQuery {
    pub limit: Option<i64>,
}

/// Router builder exposing the recommendation endpoints.
pub fn recommendation_router<P, C>(service: Arc<RecommendationService<P, C>>) -> Router
where
    P: ProfileStore + 'static,
    C: ScholarshipCatalog + 'static,
{
    Router::new()
        .route("/api/v1/recommendations", get(by_email_handler::<P, C>))
        .route(
            "/api/v1/users/:user_id/recommendations",
            get(by_user_handler::<P, C>),
        )
        .with_state(service)
}

pub(crate) async fn by_email_handler<P, C>(
    State(service): State<Arc<RecommendationService<P, C>>>,
    Query(query): Query<RecommendationQuery>,
) -> Response
where
    P: ProfileStore + 'static,
    C: ScholarshipCatalog + 'static,
{
    let Some(email) = query.email.filter(|email| !email.trim().is_empty()) else {
        let payload = json!({
            "error": "email query parameter is required",
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };
    respond(service, UserId(email.trim().to_string()), query.limit).await
}

pub(crate) async fn by_user_handler<P, C>(
    State(service): State<Arc<RecommendationService<P, C>>>,
    Path(user_id): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Response
where
    P: ProfileStore + 'static,
    C: ScholarshipCatalog + 'static,
{
    respond(service, UserId(user_id), query.limit).await
}

async fn respond<P, C>(
    service: Arc<RecommendationService<P, C>>,
    user: UserId,
    limit: Option<i64>,
) -> Response
where
    P: ProfileStore + 'static,
    C: ScholarshipCatalog + 'static,
{
    // Scoring fans out on the rayon pool; keep it off the async workers.
    let lookup = user.clone();
    let outcome =
        tokio::task::spawn_blocking(move || service.recommend(&lookup, limit)).await;

    match outcome {
        Ok(Ok(results)) => {
            let payload = json!({
                "user_id": user.0,
                "count": results.len(),
                "recommendations": results,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Ok(Err(RecommendationError::ProfileNotFound(user))) => {
            let payload = json!({
                "error": "profile not found",
                "user_id": user.0,
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Ok(Err(RecommendationError::InvalidLimit(error))) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Ok(Err(RecommendationError::Store(error))) => {
            warn!(user = %user, error = %error, "recommendation store failure");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
        Err(join_error) => {
            warn!(user = %user, error = %join_error, "recommendation task aborted");
            let payload = json!({
                "error": "recommendation task failed",
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
