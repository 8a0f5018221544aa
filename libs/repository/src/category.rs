use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    entity::*, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::active_models::{prelude::*, *};
use entity::prelude::*;

#[derive(Clone, Debug)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<category::Model> for CategoryEntity {
    fn from(value: category::Model) -> Self {
        Self {
            id: value.id,
            title: value.title,
            description: value.description,
            slug: value.slug,
            is_published: value.is_published,
            created_at: value.created_at,
        }
    }
}

impl From<CategoryEntity> for category::ActiveModel {
    fn from(value: CategoryEntity) -> Self {
        Self {
            id: ActiveValue::not_set(),
            title: ActiveValue::set(value.title),
            description: ActiveValue::set(value.description),
            slug: ActiveValue::set(value.slug),
            is_published: ActiveValue::set(value.is_published),
            created_at: if value.created_at == NaiveDateTime::default() {
                ActiveValue::set(Utc::now().naive_utc())
            } else {
                ActiveValue::set(value.created_at)
            },
        }
    }
}

impl CategoryRepository {
    pub async fn find_all(&self) -> anyhow::Result<Vec<CategoryEntity>> {
        let categories = Category::find()
            .order_by_asc(category::Column::Title)
            .all(&self.db)
            .await?;

        Ok(categories.into_iter().map(CategoryEntity::from).collect())
    }

    pub async fn find_by_id(
        &self,
        id: i32,
    ) -> anyhow::Result<Option<CategoryEntity>> {
        let category = Category::find_by_id(id).one(&self.db).await?;

        Ok(category.map(CategoryEntity::from))
    }

    pub async fn find_published_by_slug(
        &self,
        slug: &str,
    ) -> anyhow::Result<Option<CategoryEntity>> {
        let category = Category::find()
            .filter(category::Column::Slug.eq(slug))
            .filter(category::Column::IsPublished.eq(true))
            .one(&self.db)
            .await?;

        Ok(category.map(CategoryEntity::from))
    }

    pub async fn create(
        &self,
        category: CategoryEntity,
    ) -> anyhow::Result<CategoryEntity> {
        let category = category::ActiveModel::from(category)
            .insert(&self.db)
            .await?;

        Ok(CategoryEntity::from(category))
    }
}

pub(crate) async fn find_categories_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: Vec<i32>,
) -> anyhow::Result<HashMap<i32, CategoryEntity>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let categories = Category::find()
        .filter(category::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|x| (x.id, CategoryEntity::from(x)))
        .collect();

    Ok(categories)
}
