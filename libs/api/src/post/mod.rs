use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use chrono::Utc;
use entity::prelude::*;
use tracing::info;

pub mod request;
pub mod response;

use crate::{
    auth::Viewer,
    comment::request::CommentForm,
    form::FormErrors,
    response::{render, ApiResponse, IntoApiResponse},
    ApiError, ApiState,
};

use self::{
    request::PostForm,
    response::{CommentView, CreateTemplate, DetailTemplate},
};

pub(crate) fn detail_url(id: i32) -> String {
    format!("/posts/{}/", id)
}

/// The username is percent-encoded into the path segment.
pub(crate) fn profile_url(username: &str) -> String {
    let username: String =
        url::form_urlencoded::byte_serialize(username.as_bytes()).collect();
    format!("/profile/{}/", username)
}

/// A single visible post with its comments.
pub async fn post_detail(
    State(state): State<Arc<ApiState>>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<i32>,
) -> ApiResponse<Html<String>> {
    let item = state
        .repo
        .post
        .find_visible_by_id(id, Utc::now().naive_utc())
        .await
        .into_response("500-002")?;

    let Some(item) = item else {
        return Err(ApiError::NotFound);
    };

    let comments = state
        .repo
        .comment
        .find_by_post(id)
        .await
        .into_response("500-007")?;

    let viewer_id = viewer.user().map(|user| user.id);
    let comments = comments
        .into_iter()
        .map(|comment| CommentView {
            can_edit: viewer_id == Some(comment.author.id),
            comment,
        })
        .collect();

    render(&DetailTemplate {
        is_author: viewer_id == Some(item.post.author_id),
        form: viewer.user().map(|_| CommentForm::default()),
        viewer: viewer.0,
        item,
        comments,
    })
}

pub async fn get_create_post(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
) -> ApiResponse<Html<String>> {
    let form = PostForm::initial(Utc::now().naive_utc());

    render_form(&state, user, form, FormPage::Create).await
}

pub async fn create_post(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Form(form): Form<PostForm>,
) -> ApiResponse<Response> {
    let (categories, locations) = load_choices(&state).await?;

    let fields = match form.clean(&categories, &locations) {
        Ok(fields) => fields,
        Err(errors) => {
            let page = FormPage::Create
                .template(user, form, errors, categories, locations);
            return Ok(render(&page)?.into_response());
        }
    };

    let mut post = PostEntity {
        author_id: user.id,
        ..Default::default()
    };
    fields.apply(&mut post);

    let post = state.repo.post.insert(post).await.into_response("500-005")?;

    info!(
        task = "create post",
        id = post.id,
        author = user.username.as_str()
    );

    Ok(Redirect::to(&profile_url(&user.username)).into_response())
}

pub async fn get_edit_post(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Path(id): Path<i32>,
) -> ApiResponse<Response> {
    let post = find_post(&state, id).await?;
    if post.author_id != user.id {
        return Ok(Redirect::to(&detail_url(id)).into_response());
    }

    let form = PostForm::from_post(&post);
    let page = FormPage::Edit(id);

    Ok(render_form(&state, user, form, page).await?.into_response())
}

pub async fn edit_post(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Path(id): Path<i32>,
    Form(form): Form<PostForm>,
) -> ApiResponse<Response> {
    let mut post = find_post(&state, id).await?;
    if post.author_id != user.id {
        return Ok(Redirect::to(&detail_url(id)).into_response());
    }

    let (categories, locations) = load_choices(&state).await?;

    let fields = match form.clean(&categories, &locations) {
        Ok(fields) => fields,
        Err(errors) => {
            let page = FormPage::Edit(id)
                .template(user, form, errors, categories, locations);
            return Ok(render(&page)?.into_response());
        }
    };

    fields.apply(&mut post);
    state.repo.post.update(post).await.into_response("500-005")?;

    Ok(Redirect::to(&detail_url(id)).into_response())
}

/// Confirmation page, pre-filled with the current values.
pub async fn get_delete_post(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Path(id): Path<i32>,
) -> ApiResponse<Response> {
    let post = find_post(&state, id).await?;
    if post.author_id != user.id {
        return Ok(Redirect::to(&detail_url(id)).into_response());
    }

    let form = PostForm::from_post(&post);
    let page = FormPage::Delete(id);

    Ok(render_form(&state, user, form, page).await?.into_response())
}

pub async fn delete_post(
    State(state): State<Arc<ApiState>>,
    Extension(user): Extension<UserEntity>,
    Path(id): Path<i32>,
) -> ApiResponse<Response> {
    let post = find_post(&state, id).await?;
    if post.author_id != user.id {
        return Ok(Redirect::to(&detail_url(id)).into_response());
    }

    state.repo.post.delete(id).await.into_response("500-006")?;

    info!(task = "delete post", id, author = user.username.as_str());

    Ok(Redirect::to("/").into_response())
}

#[derive(Clone, Copy)]
enum FormPage {
    Create,
    Edit(i32),
    Delete(i32),
}

impl FormPage {
    fn action(self) -> String {
        match self {
            FormPage::Create => "/posts/create/".to_string(),
            FormPage::Edit(id) => format!("/posts/{}/edit/", id),
            FormPage::Delete(id) => format!("/posts/{}/delete/", id),
        }
    }

    fn template(
        self,
        user: UserEntity,
        form: PostForm,
        errors: FormErrors,
        categories: Vec<CategoryEntity>,
        locations: Vec<LocationEntity>,
    ) -> CreateTemplate {
        CreateTemplate {
            viewer: Some(user),
            form,
            errors,
            categories,
            locations,
            action: self.action(),
            is_edit: !matches!(self, FormPage::Create),
            is_delete: matches!(self, FormPage::Delete(_)),
        }
    }
}

async fn find_post(state: &ApiState, id: i32) -> ApiResponse<PostEntity> {
    state
        .repo
        .post
        .find_by_id(id)
        .await
        .into_response("500-002")?
        .ok_or(ApiError::NotFound)
}

async fn load_choices(
    state: &ApiState,
) -> ApiResponse<(Vec<CategoryEntity>, Vec<LocationEntity>)> {
    let categories = state
        .repo
        .category
        .find_all()
        .await
        .into_response("500-011")?;
    let locations = state
        .repo
        .location
        .find_all()
        .await
        .into_response("500-011")?;

    Ok((categories, locations))
}

async fn render_form(
    state: &ApiState,
    user: UserEntity,
    form: PostForm,
    page: FormPage,
) -> ApiResponse<Html<String>> {
    let (categories, locations) = load_choices(state).await?;
    let errors = FormErrors::default();

    render(&page.template(user, form, errors, categories, locations))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_profile_url_encodes_username() {
        assert_eq!(profile_url("leo"), "/profile/leo/");
        assert_eq!(profile_url("лев"), "/profile/%D0%BB%D0%B5%D0%B2/");
        assert_eq!(profile_url("a+b@c"), "/profile/a%2Bb%40c/");
    }
}
