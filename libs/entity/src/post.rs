use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{category::Category, location::Location, user::User};

#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
    pub author_id: i32,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
}

impl Post {
    /// Whether anonymous readers may see this post at `now`, given its
    /// category.
    pub fn is_visible(
        &self,
        category: Option<&Category>,
        now: NaiveDateTime,
    ) -> bool {
        self.is_published
            && self.pub_date <= now
            && category.is_some_and(|c| c.is_published)
    }
}

/// A post together with everything a feed card or detail page shows.
#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct FeedPost {
    pub post: Post,
    pub author: User,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}
