use askama::Template;
use entity::prelude::*;

use crate::form::FormErrors;

#[derive(Template)]
#[template(path = "registration/login.html")]
pub struct LoginTemplate {
    pub viewer: Option<UserEntity>,
    pub username: String,
    pub next: Option<String>,
    pub errors: FormErrors,
}

#[derive(Template)]
#[template(path = "registration/registration_form.html")]
pub struct RegistrationTemplate {
    pub viewer: Option<UserEntity>,
    pub username: String,
    pub errors: FormErrors,
}
