use askama::Template;
use entity::prelude::*;

use crate::form::FormErrors;

use super::request::UserForm;

#[derive(Template)]
#[template(path = "blog/profile.html")]
pub struct ProfileTemplate {
    pub viewer: Option<UserEntity>,
    pub profile: UserEntity,
    pub page: Paginated<FeedPostEntity>,
    pub is_owner: bool,
}

#[derive(Template)]
#[template(path = "blog/user.html")]
pub struct UserTemplate {
    pub viewer: Option<UserEntity>,
    pub form: UserForm,
    pub errors: FormErrors,
}
