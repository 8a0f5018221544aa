use askama::Template;
use entity::prelude::*;

#[derive(Template)]
#[template(path = "blog/index.html")]
pub struct IndexTemplate {
    pub viewer: Option<UserEntity>,
    pub page: Paginated<FeedPostEntity>,
}

#[derive(Template)]
#[template(path = "blog/category.html")]
pub struct CategoryTemplate {
    pub viewer: Option<UserEntity>,
    pub category: CategoryEntity,
    pub page: Paginated<FeedPostEntity>,
}
