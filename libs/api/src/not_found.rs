use askama::Template;

use crate::ApiError;

#[derive(Template)]
#[template(path = "pages/404.html")]
pub(crate) struct NotFoundTemplate;

pub(super) async fn get_404() -> ApiError {
    ApiError::NotFound
}
