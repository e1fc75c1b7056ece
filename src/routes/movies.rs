use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{ListMeta, MovieListResponse, MovieListing},
    services::poster::resolve_poster_url,
    state::AppState,
};

const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    page: Option<u32>,
    limit: Option<u32>,
}

/// Handler for the paginated catalog listing
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<MovieListResponse>> {
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(24);

    if page < 1 {
        return Err(AppError::InvalidInput("page must be at least 1".to_string()));
    }
    if limit < 1 || limit > MAX_PAGE_SIZE {
        return Err(AppError::InvalidInput(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let rows = state.catalog.list_page(page, limit).await?;
    let total = state.catalog.count().await?;

    let data: Vec<MovieListing> = rows
        .into_iter()
        .map(|row| MovieListing {
            poster_url: resolve_poster_url(row.poster_path.as_deref(), &state.image_base_url),
            id: row.id,
            title: row.title,
            overview: row.overview,
            // The catalog column is vote_average; the API speaks score
            score: row.vote_average,
            release_date: row.release_date,
        })
        .collect();

    let limit_wide = i64::from(limit);
    let meta = ListMeta {
        current_page: page,
        limit,
        total_items: total,
        total_pages: (total + limit_wide - 1) / limit_wide,
    };

    Ok(Json(MovieListResponse { data, meta }))
}
