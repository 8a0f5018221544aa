use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Html,
    Extension,
};
use chrono::Utc;

pub mod response;

use crate::{
    auth::Viewer,
    request::PageParam,
    response::{render, ApiResponse, IntoApiResponse},
    ApiError, ApiState,
};

use self::response::{CategoryTemplate, IndexTemplate};

/// Public feed of every visible post.
pub async fn index(
    State(state): State<Arc<ApiState>>,
    Extension(viewer): Extension<Viewer>,
    Query(params): Query<PageParam>,
) -> ApiResponse<Html<String>> {
    let page = state
        .repo
        .post
        .find_published(
            Utc::now().naive_utc(),
            params.page(),
            state.config.blog.paginate_by,
        )
        .await
        .into_response("500-001")?;

    render(&IndexTemplate {
        viewer: viewer.0,
        page,
    })
}

/// Visible posts of one published category.
pub async fn category_posts(
    State(state): State<Arc<ApiState>>,
    Extension(viewer): Extension<Viewer>,
    Path(slug): Path<String>,
    Query(params): Query<PageParam>,
) -> ApiResponse<Html<String>> {
    let category = state
        .repo
        .category
        .find_published_by_slug(&slug)
        .await
        .into_response("500-003")?;

    let Some(category) = category else {
        return Err(ApiError::NotFound);
    };

    let page = state
        .repo
        .post
        .find_published_by_category(
            category.id,
            Utc::now().naive_utc(),
            params.page(),
            state.config.blog.paginate_by,
        )
        .await
        .into_response("500-001")?;

    render(&CategoryTemplate {
        viewer: viewer.0,
        category,
        page,
    })
}
