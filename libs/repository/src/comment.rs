use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    entity::*, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::active_models::{prelude::*, *};
use entity::prelude::*;

#[derive(Clone, Debug)]
pub struct CommentRepository {
    db: DatabaseConnection,
}

impl CommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<comment::Model> for CommentEntity {
    fn from(value: comment::Model) -> Self {
        Self {
            id: value.id,
            text: value.text,
            post_id: value.post_id,
            author_id: value.author_id,
            created_at: value.created_at,
        }
    }
}

impl From<CommentEntity> for comment::ActiveModel {
    fn from(value: CommentEntity) -> Self {
        Self {
            id: ActiveValue::not_set(),
            text: ActiveValue::set(value.text),
            post_id: ActiveValue::set(value.post_id),
            author_id: ActiveValue::set(value.author_id),
            created_at: if value.created_at == NaiveDateTime::default() {
                ActiveValue::set(Utc::now().naive_utc())
            } else {
                ActiveValue::set(value.created_at)
            },
        }
    }
}

impl CommentRepository {
    /// Comments of a post, oldest first.
    pub async fn find_by_post(
        &self,
        post_id: i32,
    ) -> anyhow::Result<Vec<CommentWithAuthorEntity>> {
        let comments = Comment::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(Users)
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await?;

        Ok(comments
            .into_iter()
            .filter_map(|(comment, author)| {
                Some(CommentWithAuthorEntity {
                    author: UserEntity::from(author?),
                    comment: CommentEntity::from(comment),
                })
            })
            .collect())
    }

    /// Looks the comment up within one post only.
    pub async fn find_in_post(
        &self,
        post_id: i32,
        comment_id: i32,
    ) -> anyhow::Result<Option<CommentEntity>> {
        let comment = Comment::find_by_id(comment_id)
            .filter(comment::Column::PostId.eq(post_id))
            .one(&self.db)
            .await?;

        Ok(comment.map(CommentEntity::from))
    }

    pub async fn insert(
        &self,
        comment: CommentEntity,
    ) -> anyhow::Result<CommentEntity> {
        let comment = comment::ActiveModel::from(comment)
            .insert(&self.db)
            .await?;

        Ok(CommentEntity::from(comment))
    }

    pub async fn update_text(
        &self,
        comment_id: i32,
        text: String,
    ) -> anyhow::Result<CommentEntity> {
        let comment = comment::ActiveModel {
            id: ActiveValue::Unchanged(comment_id),
            text: ActiveValue::Set(text),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        Ok(CommentEntity::from(comment))
    }

    pub async fn delete(&self, comment_id: i32) -> anyhow::Result<()> {
        Comment::delete_by_id(comment_id).exec(&self.db).await?;

        Ok(())
    }
}
