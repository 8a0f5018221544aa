use sea_orm_migration::prelude::*;

use crate::{
    m20240601_090030_create_post_table::Post,
    m20240601_090040_create_comment_table::Comment,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Post::Table)
                    .name("idx_post_pub_date")
                    .col(Post::PubDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Comment::Table)
                    .name("idx_comment_post_id")
                    .col(Comment::PostId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .table(Comment::Table)
                    .name("idx_comment_post_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .table(Post::Table)
                    .name("idx_post_pub_date")
                    .to_owned(),
            )
            .await
    }
}
