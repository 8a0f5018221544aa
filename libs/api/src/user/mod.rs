use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use entity::prelude::*;
use tracing::info;

pub mod request;
pub mod response;

use crate::{
    auth::Viewer,
    form::FormErrors,
    post::profile_url,
    request::PageParam,
    response::{render, ApiResponse, IntoApiResponse},
    ApiError, ApiState,
};

use self::{
    request::{UserForm, USERNAME_TAKEN},
    response::{ProfileTemplate, UserTemplate},
};

/// Public profile page with the user's posts.
pub async fn profile(
    State(state): State<Arc<ApiState>>,
    Extension(viewer): Extension<Viewer>,
    Path(username): Path<String>,
    Query(params): Query<PageParam>,
) -> ApiResponse<Html<String>> {
    let profile = state
        .repo
        .user
        .find_by_username(&username)
        .await
        .into_response("500-004")?
        .ok_or(ApiError::NotFound)?;

    let page = state
        .repo
        .post
        .find_by_author(profile.id, params.page(), state.config.blog.paginate_by)
        .await
        .into_response("500-001")?;

    render(&ProfileTemplate {
        is_owner: viewer.user().is_some_and(|user| user.id == profile.id),
        viewer: viewer.0,
        profile,
        page,
    })
}

pub async fn get_edit_profile(
    Extension(user): Extension<UserEntity>,
) -> ApiResponse<Html<String>> {
    render(&UserTemplate {
        form: UserForm::from_user(&user),
        errors: FormErrors::default(),
        viewer: Some(user),
    })
}

pub async fn edit_profile(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Form(form): Form<UserForm>,
) -> ApiResponse<Response> {
    let changes = match form.clean() {
        Ok(changes) => {
            let taken = state
                .repo
                .user
                .username_taken(&changes.username, Some(user.id))
                .await
                .into_response("500-004")?;
            if taken {
                let mut errors = FormErrors::default();
                errors.add("username", USERNAME_TAKEN);
                Err(errors)
            } else {
                Ok(changes)
            }
        }
        Err(errors) => Err(errors),
    };

    let changes = match changes {
        Ok(changes) => changes,
        Err(errors) => {
            let page = UserTemplate {
                viewer: Some(user),
                form,
                errors,
            };
            return Ok(render(&page)?.into_response());
        }
    };

    let updated = state
        .repo
        .user
        .update_profile(user.id, changes)
        .await
        .into_response("500-010")?;

    info!(task = "edit profile", id = updated.id);

    Ok(Redirect::to(&profile_url(&updated.username)).into_response())
}
