use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use entity::paginated::resolve_page_number;
use sea_orm::{
    entity::*, sea_query::Expr, ActiveValue, ColumnTrait, DatabaseConnection,
    EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, TransactionTrait,
};
use tracing::info;

use crate::active_models::{prelude::*, *};
use crate::category::find_categories_by_ids;
use crate::location::find_locations_by_ids;
use crate::user::find_users_by_ids;
use entity::prelude::*;

#[derive(Clone, Debug)]
pub struct PostRepository {
    db: DatabaseConnection,
}

impl PostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<post::Model> for PostEntity {
    fn from(value: post::Model) -> Self {
        Self {
            id: value.id,
            title: value.title,
            text: value.text,
            pub_date: value.pub_date,
            is_published: value.is_published,
            created_at: value.created_at,
            author_id: value.author_id,
            category_id: value.category_id,
            location_id: value.location_id,
        }
    }
}

impl From<PostEntity> for post::ActiveModel {
    fn from(value: PostEntity) -> Self {
        Self {
            id: {
                if value.id == i32::default() {
                    ActiveValue::not_set()
                } else {
                    ActiveValue::Unchanged(value.id)
                }
            },
            title: ActiveValue::set(value.title),
            text: ActiveValue::set(value.text),
            pub_date: ActiveValue::set(value.pub_date),
            is_published: ActiveValue::set(value.is_published),
            created_at: if value.created_at == NaiveDateTime::default() {
                ActiveValue::set(Utc::now().naive_utc())
            } else {
                ActiveValue::set(value.created_at)
            },
            author_id: ActiveValue::set(value.author_id),
            category_id: ActiveValue::set(value.category_id),
            location_id: ActiveValue::set(value.location_id),
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct CommentCount {
    post_id: i32,
    count: i64,
}

impl PostRepository {
    /// Public feed: published posts of published categories whose
    /// publication date has come.
    pub async fn find_published(
        &self,
        now: NaiveDateTime,
        page: Option<&str>,
        per_page: u64,
    ) -> anyhow::Result<Paginated<FeedPostEntity>> {
        let query = Post::find()
            .inner_join(Category)
            .filter(post::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(now))
            .filter(category::Column::IsPublished.eq(true));

        self.paginate(query, page, per_page).await
    }

    /// Feed of one category. The caller checks that the category itself
    /// is published.
    pub async fn find_published_by_category(
        &self,
        category_id: i32,
        now: NaiveDateTime,
        page: Option<&str>,
        per_page: u64,
    ) -> anyhow::Result<Paginated<FeedPostEntity>> {
        let query = Post::find()
            .filter(post::Column::CategoryId.eq(category_id))
            .filter(post::Column::IsPublished.eq(true))
            .filter(post::Column::PubDate.lte(now));

        self.paginate(query, page, per_page).await
    }

    /// Posts listed on an author's profile. Scheduled posts are included,
    /// drafts and posts of hidden categories are not.
    pub async fn find_by_author(
        &self,
        author_id: i32,
        page: Option<&str>,
        per_page: u64,
    ) -> anyhow::Result<Paginated<FeedPostEntity>> {
        let query = Post::find()
            .inner_join(Category)
            .filter(post::Column::AuthorId.eq(author_id))
            .filter(post::Column::IsPublished.eq(true))
            .filter(category::Column::IsPublished.eq(true));

        self.paginate(query, page, per_page).await
    }

    /// The post behind a detail page, if [`PostEntity::is_visible`] now.
    pub async fn find_visible_by_id(
        &self,
        id: i32,
        now: NaiveDateTime,
    ) -> anyhow::Result<Option<FeedPostEntity>> {
        let Some(post) = Post::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let item = self.load_feed(vec![post]).await?.pop();

        Ok(item.filter(|x| x.post.is_visible(x.category.as_ref(), now)))
    }

    pub async fn find_by_id(
        &self,
        id: i32,
    ) -> anyhow::Result<Option<PostEntity>> {
        let post = Post::find_by_id(id).one(&self.db).await?;

        Ok(post.map(PostEntity::from))
    }

    pub async fn insert(&self, post: PostEntity) -> anyhow::Result<PostEntity> {
        let mut model = post::ActiveModel::from(post);
        model.id = ActiveValue::not_set();
        let post = model.insert(&self.db).await?;

        info!(task = "insert post", id = post.id, author_id = post.author_id);

        Ok(PostEntity::from(post))
    }

    pub async fn update(&self, post: PostEntity) -> anyhow::Result<PostEntity> {
        let post = post::ActiveModel::from(post).update(&self.db).await?;

        Ok(PostEntity::from(post))
    }

    /// Removes the post together with its comments.
    pub async fn delete(&self, post_id: i32) -> anyhow::Result<()> {
        let txn = self.db.begin().await?;

        let comments = Comment::delete_many()
            .filter(comment::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
        Post::delete_by_id(post_id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            task = "delete post",
            id = post_id,
            comments = comments.rows_affected
        );

        Ok(())
    }

    async fn paginate(
        &self,
        query: Select<post::Entity>,
        page: Option<&str>,
        per_page: u64,
    ) -> anyhow::Result<Paginated<FeedPostEntity>> {
        let paginator = query
            .order_by_desc(post::Column::PubDate)
            .order_by_desc(post::Column::Id)
            .paginate(&self.db, per_page.max(1));

        let numbers = paginator.num_items_and_pages().await?;
        let num_pages = numbers.number_of_pages.max(1);
        let number = resolve_page_number(page, num_pages);

        let posts = paginator.fetch_page(number - 1).await?;

        Ok(Paginated {
            items: self.load_feed(posts).await?,
            number,
            num_pages,
            count: numbers.number_of_items,
        })
    }

    /// Attaches authors, categories, locations and comment counts.
    async fn load_feed(
        &self,
        posts: Vec<post::Model>,
    ) -> anyhow::Result<Vec<FeedPostEntity>> {
        if posts.is_empty() {
            return Ok(vec![]);
        }

        let post_ids: Vec<_> = posts.iter().map(|x| x.id).collect();
        let author_ids: Vec<_> = posts.iter().map(|x| x.author_id).collect();
        let category_ids: Vec<_> =
            posts.iter().filter_map(|x| x.category_id).collect();
        let location_ids: Vec<_> =
            posts.iter().filter_map(|x| x.location_id).collect();

        let authors = find_users_by_ids(&self.db, author_ids).await?;
        let categories = find_categories_by_ids(&self.db, category_ids).await?;
        let locations = find_locations_by_ids(&self.db, location_ids).await?;

        let counts: HashMap<_, _> = Comment::find()
            .select_only()
            .column(comment::Column::PostId)
            .column_as(Expr::col(comment::Column::Id).count(), "count")
            .filter(comment::Column::PostId.is_in(post_ids))
            .group_by(comment::Column::PostId)
            .into_model::<CommentCount>()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|x| (x.post_id, x.count.max(0) as u64))
            .collect();

        let mut results = vec![];
        for post in posts {
            let Some(author) = authors.get(&post.author_id).cloned() else {
                continue;
            };
            results.push(FeedPostEntity {
                author,
                category: post
                    .category_id
                    .and_then(|id| categories.get(&id).cloned()),
                location: post
                    .location_id
                    .and_then(|id| locations.get(&id).cloned()),
                comment_count: counts.get(&post.id).copied().unwrap_or(0),
                post: PostEntity::from(post),
            });
        }

        Ok(results)
    }
}
