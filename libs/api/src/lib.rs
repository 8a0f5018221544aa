use std::sync::Arc;

use axum::{middleware, routing::get, routing::post, Router};
use repository::Repository;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::SessionKeys;

pub mod auth;
pub mod comment;
pub mod feed;
mod form;
pub mod healthz;
pub mod not_found;
pub mod post;
mod request;
mod response;
pub mod session;
pub mod user;

pub use response::{ApiResponse, IntoApiResponse};

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    Forbidden(String),
    ClientError(String),
    ServerError(String),
}

#[derive(Clone, Debug)]
pub struct ApiState {
    repo: Repository,
    config: Config,
    keys: SessionKeys,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub blog: Blog,
    pub auth: Auth,
    pub database: Database,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Blog {
    pub paginate_by: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Auth {
    pub cookie_name: String,
    pub token_ttl_hours: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Database {
    pub max_connections: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blog: Blog { paginate_by: 10 },
            auth: Auth {
                cookie_name: "blogicum_session".to_string(),
                token_ttl_hours: 24 * 14,
            },
            database: Database { max_connections: 5 },
        }
    }
}

pub fn load_config(config_name: &str) -> anyhow::Result<Config> {
    ::util::load_config::<Config>(config_name)
}

pub fn serve(
    repository: Repository,
    config: Config,
    secret_key: &str,
) -> Router {
    info!(task = "start api serving");

    let state = Arc::new(ApiState {
        repo: repository,
        config,
        keys: SessionKeys::new(secret_key.as_bytes()),
    });

    // signed-in users only
    let protected_router = Router::new()
        .route(
            "/posts/create/",
            get(post::get_create_post).post(post::create_post),
        )
        .route("/posts/:id/edit/", get(post::get_edit_post).post(post::edit_post))
        .route(
            "/posts/:id/delete/",
            get(post::get_delete_post).post(post::delete_post),
        )
        .route("/posts/:id/comment", post(comment::add_comment))
        .route(
            "/posts/:id/edit_comment/:comment_id/",
            get(comment::get_edit_comment).post(comment::edit_comment),
        )
        .route(
            "/posts/:id/delete_comment/:comment_id/",
            get(comment::get_delete_comment).post(comment::delete_comment),
        )
        .route(
            "/edit_profile/",
            get(user::get_edit_profile).post(user::edit_profile),
        )
        .route_layer(middleware::from_fn(auth::login_required));

    // session
    let session_router = Router::new()
        .route("/login/", get(session::get_login).post(session::login))
        .route("/logout/", get(session::logout).post(session::logout))
        .route(
            "/registration/",
            get(session::get_registration).post(session::registration),
        );

    Router::new()
        .route("/", get(feed::index))
        .route("/posts/:id/", get(post::post_detail))
        .route("/category/:slug/", get(feed::category_posts))
        .route("/profile/:username/", get(user::profile))
        .merge(protected_router)
        .nest("/auth", session_router)
        .route("/healthz", get(healthz::get_health))
        .fallback(not_found::get_404)
        .layer(middleware::from_fn_with_state(state.clone(), auth::session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
