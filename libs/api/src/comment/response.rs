use askama::Template;
use entity::prelude::*;

use crate::form::FormErrors;

use super::request::CommentForm;

/// Edit form or delete confirmation of a single comment.
#[derive(Template)]
#[template(path = "blog/comment.html")]
pub struct CommentTemplate {
    pub viewer: Option<UserEntity>,
    pub post: PostEntity,
    pub comment: CommentEntity,
    pub form: CommentForm,
    pub errors: FormErrors,
    pub action: String,
    pub is_delete: bool,
}
