use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use entity::prelude::*;
use tracing::{debug, info};

pub mod request;
pub mod response;

use crate::{
    form::FormErrors,
    post::detail_url,
    response::{render, ApiResponse, IntoApiResponse},
    ApiError, ApiState,
};

use self::{request::CommentForm, response::CommentTemplate};

const CANNOT_EDIT: &str = "Вы не можете редактировать этот комментарий";
const CANNOT_DELETE: &str = "Вы не можете удалить этот комментарий";

/// Invalid or unreadable submissions are dropped without feedback.
pub async fn add_comment(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Path(id): Path<i32>,
    form: Option<Form<CommentForm>>,
) -> ApiResponse<Redirect> {
    let post = state
        .repo
        .post
        .find_by_id(id)
        .await
        .into_response("500-002")?
        .ok_or(ApiError::NotFound)?;

    let text = form.map(|Form(form)| form.clean());
    match text {
        Some(Ok(text)) => {
            let comment = state
                .repo
                .comment
                .insert(CommentEntity {
                    text,
                    post_id: post.id,
                    author_id: user.id,
                    ..Default::default()
                })
                .await
                .into_response("500-008")?;

            info!(task = "add comment", id = comment.id, post_id = post.id);
        }
        _ => debug!(task = "add comment", post_id = post.id, "form rejected"),
    }

    Ok(Redirect::to(&detail_url(id)))
}

pub async fn get_edit_comment(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Path((id, comment_id)): Path<(i32, i32)>,
) -> ApiResponse<Response> {
    let (post, comment) =
        find_own_comment(&state, &user, id, comment_id, CANNOT_EDIT).await?;

    let page = CommentTemplate {
        viewer: Some(user),
        form: CommentForm {
            text: comment.text.clone(),
        },
        errors: FormErrors::default(),
        action: format!("/posts/{}/edit_comment/{}/", id, comment_id),
        is_delete: false,
        post,
        comment,
    };

    Ok(render(&page)?.into_response())
}

pub async fn edit_comment(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Path((id, comment_id)): Path<(i32, i32)>,
    Form(form): Form<CommentForm>,
) -> ApiResponse<Response> {
    let (post, comment) =
        find_own_comment(&state, &user, id, comment_id, CANNOT_EDIT).await?;

    match form.clean() {
        Ok(text) => {
            state
                .repo
                .comment
                .update_text(comment.id, text)
                .await
                .into_response("500-008")?;

            Ok(Redirect::to(&detail_url(id)).into_response())
        }
        Err(errors) => {
            let page = CommentTemplate {
                viewer: Some(user),
                form,
                errors,
                action: format!("/posts/{}/edit_comment/{}/", id, comment_id),
                is_delete: false,
                post,
                comment,
            };

            Ok(render(&page)?.into_response())
        }
    }
}

pub async fn get_delete_comment(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Path((id, comment_id)): Path<(i32, i32)>,
) -> ApiResponse<Response> {
    let (post, comment) =
        find_own_comment(&state, &user, id, comment_id, CANNOT_DELETE).await?;

    let page = CommentTemplate {
        viewer: Some(user),
        form: CommentForm {
            text: comment.text.clone(),
        },
        errors: FormErrors::default(),
        action: format!("/posts/{}/delete_comment/{}/", id, comment_id),
        is_delete: true,
        post,
        comment,
    };

    Ok(render(&page)?.into_response())
}

pub async fn delete_comment(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Path((id, comment_id)): Path<(i32, i32)>,
) -> ApiResponse<Redirect> {
    let (_, comment) =
        find_own_comment(&state, &user, id, comment_id, CANNOT_DELETE).await?;

    state
        .repo
        .comment
        .delete(comment.id)
        .await
        .into_response("500-009")?;

    info!(task = "delete comment", id = comment.id, post_id = id);

    Ok(Redirect::to(&detail_url(id)))
}

/// Post and comment must exist and belong together (404), and the comment
/// must be the user's own (403 with `denied`).
async fn find_own_comment(
    state: &ApiState,
    user: &UserEntity,
    post_id: i32,
    comment_id: i32,
    denied: &str,
) -> ApiResponse<(PostEntity, CommentEntity)> {
    let post = state
        .repo
        .post
        .find_by_id(post_id)
        .await
        .into_response("500-002")?
        .ok_or(ApiError::NotFound)?;

    let comment = state
        .repo
        .comment
        .find_in_post(post_id, comment_id)
        .await
        .into_response("500-007")?
        .ok_or(ApiError::NotFound)?;

    if comment.author_id != user.id {
        return Err(ApiError::Forbidden(denied.to_string()));
    }

    Ok((post, comment))
}
