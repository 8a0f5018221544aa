use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_active: bool,
    pub date_joined: NaiveDateTime,
}

impl User {
    /// "First Last", or the username when neither name is filled in.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_display_name_falls_back_to_username() {
        let mut user = User {
            username: "leo".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "leo");

        user.first_name = "Lev".to_string();
        assert_eq!(user.display_name(), "Lev");

        user.last_name = "Tolstoy".to_string();
        assert_eq!(user.display_name(), "Lev Tolstoy");
    }
}
