use crate::{
    api::middleware::{ApiError, ApiResult, AppState},
    models::{SearchListResponse, VideoListResponse},
    services::session_service,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

const DEFAULT_MAX_RESULTS: u32 = 12;
const DEFAULT_REGION: &str = "US";

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub max_results: Option<u32>,
    pub region: Option<String>,
    pub page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub max_results: Option<u32>,
    pub page_token: Option<String>,
}

fn access_token(jar: &CookieJar) -> Option<String> {
    session_service::peek_session(jar).map(|session| session.access_token)
}

pub async fn most_popular(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<VideoListResponse>> {
    let token = access_token(&jar);

    let response = state
        .video_service
        .most_popular(
            params.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            params.region.as_deref().unwrap_or(DEFAULT_REGION),
            params.page_token.as_deref(),
            token.as_deref(),
        )
        .await?;

    Ok(Json(response))
}

pub async fn by_category(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(category_id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<VideoListResponse>> {
    let token = access_token(&jar);

    let response = state
        .video_service
        .videos_by_category(
            &category_id,
            params.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            params.region.as_deref().unwrap_or(DEFAULT_REGION),
            params.page_token.as_deref(),
            token.as_deref(),
        )
        .await?;

    Ok(Json(response))
}

pub async fn search(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<SearchListResponse>> {
    if params.q.trim().is_empty() {
        return Err(ApiError::BadRequest("Search query must not be empty".to_string()));
    }

    let token = access_token(&jar);

    let response = state
        .video_service
        .search_videos(
            &params.q,
            params.max_results.unwrap_or(DEFAULT_MAX_RESULTS),
            params.page_token.as_deref(),
            token.as_deref(),
        )
        .await?;

    Ok(Json(response))
}
