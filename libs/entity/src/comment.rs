use chrono::NaiveDateTime;
use serde::Serialize;

use crate::user::User;

#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct CommentWithAuthor {
    pub comment: Comment,
    pub author: User,
}
