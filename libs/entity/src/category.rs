use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct Category {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}
