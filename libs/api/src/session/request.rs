use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};
use validator::Validate;

use crate::{
    form::{not_blank, FormErrors},
    user::request::USERNAME,
};

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub next: Option<String>,
}

#[serde_as]
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(custom = "not_blank")]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Обязательное поле."))]
    pub password: String,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    pub next: Option<String>,
}

impl LoginForm {
    pub fn clean(&self) -> Result<(String, String), FormErrors> {
        let username = self.username.trim().to_string();

        FormErrors::check(self).into_result((username, self.password.clone()))
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct RegistrationForm {
    #[serde(default)]
    #[validate(
        custom = "not_blank",
        length(
            max = 150,
            message = "Убедитесь, что это значение содержит не более 150 \
                       символов."
        ),
        regex(
            path = "USERNAME",
            message = "Введите правильное имя пользователя. Оно может \
                       содержать только буквы, цифры и знаки @/./+/-/_."
        )
    )]
    pub username: String,
    #[serde(default)]
    #[validate(length(
        min = 8,
        message = "Введённый пароль слишком короткий. Он должен содержать как \
                   минимум 8 символов."
    ))]
    pub password1: String,
    #[serde(default)]
    #[validate(must_match(
        other = "password1",
        message = "Введенные пароли не совпадают."
    ))]
    pub password2: String,
}

impl RegistrationForm {
    /// Username and the chosen password; uniqueness is checked separately.
    pub fn clean(&self) -> Result<(String, String), FormErrors> {
        FormErrors::check(self)
            .into_result((self.username.clone(), self.password1.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn registration(password1: &str, password2: &str) -> RegistrationForm {
        RegistrationForm {
            username: "reader".to_string(),
            password1: password1.to_string(),
            password2: password2.to_string(),
        }
    }

    #[test]
    fn test_registration_passwords() {
        assert_eq!(
            registration("s3cret-pass", "s3cret-pass").clean().unwrap(),
            ("reader".to_string(), "s3cret-pass".to_string())
        );
        assert!(registration("short", "short")
            .clean()
            .unwrap_err()
            .has("password1"));
        assert!(registration("s3cret-pass", "s3cret-pas")
            .clean()
            .unwrap_err()
            .has("password2"));
    }

    #[test]
    fn test_registration_username_rules() {
        let form = RegistrationForm {
            username: "no spaces".to_string(),
            ..registration("s3cret-pass", "s3cret-pass")
        };

        assert!(form.clean().unwrap_err().has("username"));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let errors = LoginForm::default().clean().unwrap_err();

        assert!(errors.has("username"));
        assert!(errors.has("password"));
    }
}
