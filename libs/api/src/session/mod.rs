use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;
use entity::prelude::*;
use tracing::info;

pub mod request;
pub mod response;

use crate::{
    auth::{
        hash_password, issue_token, removal_cookie, safe_next, session_cookie,
        verify_password, Viewer, LOGIN_URL,
    },
    form::{FormErrors, NON_FIELD},
    post::profile_url,
    response::{render, ApiResponse, IntoApiResponse},
    user::request::USERNAME_TAKEN,
    ApiState,
};

use self::{
    request::{LoginForm, LoginQuery, RegistrationForm},
    response::{LoginTemplate, RegistrationTemplate},
};

const INVALID_LOGIN: &str =
    "Пожалуйста, введите правильные имя пользователя и пароль. Оба поля \
     могут быть чувствительны к регистру.";

pub async fn get_login(
    Extension(viewer): Extension<Viewer>,
    Query(query): Query<LoginQuery>,
) -> ApiResponse<Html<String>> {
    render(&LoginTemplate {
        viewer: viewer.0,
        username: String::new(),
        next: query.next,
        errors: FormErrors::default(),
    })
}

pub async fn login(
    State(state): State<Arc<ApiState>>,
    Extension(viewer): Extension<Viewer>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResponse<Response> {
    let user = match form.clean() {
        Ok((username, password)) => {
            let user = state
                .repo
                .user
                .find_by_username(&username)
                .await
                .into_response("500-004")?;

            user.filter(|user| {
                user.is_active && verify_password(&password, &user.password)
            })
            .ok_or_else(|| {
                let mut errors = FormErrors::default();
                errors.add(NON_FIELD, INVALID_LOGIN);
                errors
            })
        }
        Err(errors) => Err(errors),
    };

    let user = match user {
        Ok(user) => user,
        Err(errors) => {
            let page = LoginTemplate {
                viewer: viewer.0,
                username: form.username,
                next: form.next,
                errors,
            };
            return Ok(render(&page)?.into_response());
        }
    };

    let token = issue_token(&state, &user).into_response("500-013")?;
    let target = safe_next(form.next.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| profile_url(&user.username));

    info!(task = "login", id = user.id);

    Ok((jar.add(session_cookie(&state, token)), Redirect::to(&target))
        .into_response())
}

pub async fn logout(
    State(state): State<Arc<ApiState>>,
    jar: CookieJar,
) -> impl IntoResponse {
    (jar.remove(removal_cookie(&state)), Redirect::to("/"))
}

pub async fn get_registration(
    Extension(viewer): Extension<Viewer>,
) -> ApiResponse<Html<String>> {
    render(&RegistrationTemplate {
        viewer: viewer.0,
        username: String::new(),
        errors: FormErrors::default(),
    })
}

pub async fn registration(
    State(state): State<Arc<ApiState>>,
    Extension(viewer): Extension<Viewer>,
    Form(form): Form<RegistrationForm>,
) -> ApiResponse<Response> {
    let credentials = match form.clean() {
        Ok((username, password)) => {
            let taken = state
                .repo
                .user
                .username_taken(&username, None)
                .await
                .into_response("500-004")?;
            if taken {
                let mut errors = FormErrors::default();
                errors.add("username", USERNAME_TAKEN);
                Err(errors)
            } else {
                Ok((username, password))
            }
        }
        Err(errors) => Err(errors),
    };

    let (username, password) = match credentials {
        Ok(credentials) => credentials,
        Err(errors) => {
            let page = RegistrationTemplate {
                viewer: viewer.0,
                username: form.username,
                errors,
            };
            return Ok(render(&page)?.into_response());
        }
    };

    let password = hash_password(&password).into_response("500-014")?;
    let user = state
        .repo
        .user
        .create(UserEntity {
            username,
            password,
            is_active: true,
            ..Default::default()
        })
        .await
        .into_response("500-010")?;

    info!(task = "registration", id = user.id);

    Ok(Redirect::to(LOGIN_URL).into_response())
}
