use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct Location {
    pub id: i32,
    pub name: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}
