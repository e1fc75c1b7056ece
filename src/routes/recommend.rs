use axum::{extract::State, Json};

use crate::{
    models::{RecommendResponse, RecommendationRequest},
    state::AppState,
};

/// Handler for the recommendation endpoint
///
/// Failures never surface as transport errors here: whatever the pipeline
/// reports - a fatal retrieval stage or anything unexpected - lands in the
/// payload's `error` field with an empty movie list and a 200 status.
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> Json<RecommendResponse> {
    match state.recommender.recommend(&request).await {
        Ok(response) => Json(response),
        Err(e) => {
            tracing::error!(error = %e, "Recommendation request degraded to error payload");
            Json(RecommendResponse::fatal(e.to_string()))
        }
    }
}
