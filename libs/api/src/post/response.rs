use askama::Template;
use entity::prelude::*;

use crate::{comment::request::CommentForm, form::FormErrors};

use super::request::PostForm;

pub struct CommentView {
    pub comment: CommentWithAuthorEntity,
    pub can_edit: bool,
}

#[derive(Template)]
#[template(path = "blog/detail.html")]
pub struct DetailTemplate {
    pub viewer: Option<UserEntity>,
    pub item: FeedPostEntity,
    pub comments: Vec<CommentView>,
    pub is_author: bool,
    /// Only signed-in readers get a comment form.
    pub form: Option<CommentForm>,
}

/// Shared by the create, edit and delete-confirmation pages.
#[derive(Template)]
#[template(path = "blog/create.html")]
pub struct CreateTemplate {
    pub viewer: Option<UserEntity>,
    pub form: PostForm,
    pub errors: FormErrors,
    pub categories: Vec<CategoryEntity>,
    pub locations: Vec<LocationEntity>,
    pub action: String,
    pub is_edit: bool,
    pub is_delete: bool,
}
