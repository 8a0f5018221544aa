use entity::prelude::*;
use once_cell::sync::Lazy;
use regex::Regex;
use repository::user::ProfileChanges;
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};
use validator::Validate;

use crate::form::{not_blank, FormErrors};

pub const USERNAME_TAKEN: &str = "Пользователь с таким именем уже существует.";

/// Letters, digits and `@.+-_`.
pub static USERNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.@+-]+$").expect("regex compile should not fail")
});

/// Account fields the owner may edit.
#[serde_as]
#[derive(Debug, Default, Clone, Deserialize, Validate)]
pub struct UserForm {
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
        max = 150,
        message = "Убедитесь, что это значение содержит не более 150 символов."
    ))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(
        max = 150,
        message = "Убедитесь, что это значение содержит не более 150 символов."
    ))]
    pub last_name: String,
    #[serde(default)]
    #[serde_as(as = "NoneAsEmptyString")]
    #[validate(
        email(message = "Введите правильный адрес электронной почты."),
        length(
            max = 254,
            message = "Убедитесь, что это значение содержит не более 254 \
                       символов."
        )
    )]
    pub email: Option<String>,
}

impl UserForm {
    pub fn from_user(user: &UserEntity) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: Some(user.email.clone()).filter(|x| !x.is_empty()),
        }
    }

    pub fn email_value(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    /// Format checks only; uniqueness of the username needs the database.
    pub fn clean(&self) -> Result<ProfileChanges, FormErrors> {
        FormErrors::check(self).into_result(ProfileChanges {
            username: self.username.clone(),
            email: self.email_value().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn form(username: &str, email: &str) -> UserForm {
        UserForm {
            username: username.to_string(),
            first_name: " Lev ".to_string(),
            last_name: "Tolstoy".to_string(),
            email: Some(email.to_string()).filter(|x| !x.is_empty()),
        }
    }

    #[test]
    fn test_valid_profile() {
        let changes = form("lev.tolstoy", "lev@example.com").clean().unwrap();

        assert_eq!(changes.username, "lev.tolstoy");
        assert_eq!(changes.first_name, "Lev");
        assert_eq!(changes.email, "lev@example.com");
    }

    #[test]
    fn test_email_may_be_blank() {
        let changes = form("lev", "").clean().unwrap();

        assert_eq!(changes.email, "");
    }

    #[test]
    fn test_rejects_bad_username_and_email() {
        // Act
        let errors = form("lev tolstoy!", "lev@").clean().unwrap_err();
        let blank = form("", "not-an-email").clean().unwrap_err();

        // Assert
        assert_eq!(
            errors.field("username"),
            vec!["Введите правильное имя пользователя. Оно может содержать \
                  только буквы, цифры и знаки @/./+/-/_."
                .to_string()]
        );
        assert_eq!(
            errors.field("email"),
            vec!["Введите правильный адрес электронной почты.".to_string()]
        );
        assert!(blank.has("username"));
        assert!(blank.has("email"));
    }

    #[test]
    fn test_unicode_username_is_allowed() {
        assert!(form("лев_толстой", "").clean().is_ok());
        assert!(USERNAME.is_match("lev.t@o+l-s_toy"));
    }
}
