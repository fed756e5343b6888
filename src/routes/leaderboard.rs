use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::error::AppError;
use crate::models::views::{CategoryView, LeaderboardEntry};
use crate::state::AppState;

pub const MAX_LEADERBOARD_LIMIT: u64 = 100;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardQuery {
    /// Number of entries to return (default from configuration, capped at 100).
    pub limit: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/leaderboard",
    tag = "Leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Reviewed pizzas ranked by average score", body = Vec<LeaderboardEntry>)
    )
)]
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, AppError> {
    let limit = query
        .limit
        .unwrap_or(state.leaderboard_limit)
        .min(MAX_LEADERBOARD_LIMIT);
    Ok(Json(state.store.top_pizzas_by_average_score(limit).await?))
}

#[utoipa::path(
    get,
    path = "/review-categories",
    tag = "Leaderboard",
    responses(
        (status = 200, description = "The scoring categories", body = Vec<CategoryView>)
    )
)]
pub async fn review_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryView>>, AppError> {
    let categories = state
        .store
        .list_review_categories()
        .await?
        .into_iter()
        .map(|c| CategoryView { id: c.id, name: c.name })
        .collect();
    Ok(Json(categories))
}
