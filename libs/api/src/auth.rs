use std::sync::Arc;

use anyhow::anyhow;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use entity::prelude::*;
use jsonwebtoken::{
    decode, encode, DecodingKey, EncodingKey, Header, Validation,
};
use password_hash::{rand_core::OsRng, SaltString};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::ApiState;

pub const LOGIN_URL: &str = "/auth/login/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub username: String,
    pub exp: usize,
}

/// The signed-in user of the current request, if any.
#[derive(Debug, Clone, Default)]
pub struct Viewer(pub Option<UserEntity>);

impl Viewer {
    pub fn user(&self) -> Option<&UserEntity> {
        self.0.as_ref()
    }
}

#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKeys")
    }
}

pub fn issue_token(
    state: &ApiState,
    user: &UserEntity,
) -> anyhow::Result<String> {
    let exp =
        Utc::now() + Duration::hours(state.config.auth.token_ttl_hours);
    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        exp: exp.timestamp().max(0) as usize,
    };

    Ok(encode(&Header::default(), &claims, &state.keys.encoding)?)
}

pub fn session_cookie(state: &ApiState, token: String) -> Cookie<'static> {
    Cookie::build((state.config.auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub fn removal_cookie(state: &ApiState) -> Cookie<'static> {
    Cookie::build((state.config.auth.cookie_name.clone(), ""))
        .path("/")
        .build()
}

/// Resolves the session cookie into a [`Viewer`] for every request.
pub async fn session(
    State(state): State<Arc<ApiState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let viewer = match jar.get(&state.config.auth.cookie_name) {
        Some(cookie) => resolve_viewer(&state, cookie.value()).await,
        None => Viewer::default(),
    };

    req.extensions_mut().insert(viewer);

    next.run(req).await
}

async fn resolve_viewer(state: &ApiState, token: &str) -> Viewer {
    let claims = match decode::<Claims>(
        token,
        &state.keys.decoding,
        &Validation::default(),
    ) {
        Ok(data) => data.claims,
        Err(e) => {
            debug!(task = "decode session", error = e.to_string());
            return Viewer::default();
        }
    };

    match state.repo.user.find_by_id(claims.sub).await {
        Ok(Some(user)) if user.is_active => Viewer(Some(user)),
        Ok(_) => Viewer::default(),
        Err(e) => {
            warn!(task = "load session user", error = e.to_string());
            Viewer::default()
        }
    }
}

/// Lets signed-in users through with their [`UserEntity`] as an extension,
/// sends everybody else to the login page.
pub async fn login_required(mut req: Request, next: Next) -> Response {
    let user = req
        .extensions()
        .get::<Viewer>()
        .and_then(|viewer| viewer.0.clone());

    let Some(user) = user else {
        let next_path = req
            .uri()
            .path_and_query()
            .map(|x| x.as_str())
            .unwrap_or("/");
        return Redirect::to(&login_url(next_path)).into_response();
    };

    req.extensions_mut().insert(user);

    next.run(req).await
}

pub fn login_url(next_path: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("next", next_path)
        .finish();
    format!("{}?{}", LOGIN_URL, query)
}

/// Only same-site absolute paths are followed after login.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|x| is_local_path(x))
}

fn is_local_path(next: &str) -> bool {
    if !next.starts_with('/')
        || next.contains('\\')
        || next.chars().any(char::is_control)
    {
        return false;
    }

    let Ok(base) = Url::parse("http://localhost/") else {
        return false;
    };
    base.join(next)
        .is_ok_and(|url| url.host_str() == Some("localhost"))
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("failed to hash password: {}", e))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        // Arrange
        let hash = hash_password("correct horse").unwrap();

        // Act & Assert
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not a phc string"));
    }

    #[test]
    fn test_login_url_encodes_next() {
        assert_eq!(
            login_url("/posts/create/"),
            "/auth/login/?next=%2Fposts%2Fcreate%2F"
        );
        assert_eq!(
            login_url("/profile/a+b/"),
            "/auth/login/?next=%2Fprofile%2Fa%2Bb%2F"
        );
    }

    #[test]
    fn test_safe_next() {
        assert_eq!(safe_next(Some("/posts/1/")), Some("/posts/1/"));
        assert_eq!(safe_next(Some("//evil.example")), None);
        assert_eq!(safe_next(Some("https://evil.example")), None);
        assert_eq!(safe_next(Some("/\\evil.example/")), None);
        assert_eq!(safe_next(Some("/posts/\\1/")), None);
        assert_eq!(safe_next(Some("/\tevil.example")), None);
        assert_eq!(
            safe_next(Some("/profile/leo/?page=2")),
            Some("/profile/leo/?page=2")
        );
        assert_eq!(safe_next(None), None);
    }
}
