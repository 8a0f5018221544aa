use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    entity::*, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::active_models::{prelude::*, *};
use entity::prelude::*;

#[derive(Clone, Debug)]
pub struct LocationRepository {
    db: DatabaseConnection,
}

impl LocationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<location::Model> for LocationEntity {
    fn from(value: location::Model) -> Self {
        Self {
            id: value.id,
            name: value.name,
            is_published: value.is_published,
            created_at: value.created_at,
        }
    }
}

impl From<LocationEntity> for location::ActiveModel {
    fn from(value: LocationEntity) -> Self {
        Self {
            id: ActiveValue::not_set(),
            name: ActiveValue::set(value.name),
            is_published: ActiveValue::set(value.is_published),
            created_at: if value.created_at == NaiveDateTime::default() {
                ActiveValue::set(Utc::now().naive_utc())
            } else {
                ActiveValue::set(value.created_at)
            },
        }
    }
}

impl LocationRepository {
    pub async fn find_all(&self) -> anyhow::Result<Vec<LocationEntity>> {
        let locations = Location::find()
            .order_by_asc(location::Column::Name)
            .all(&self.db)
            .await?;

        Ok(locations.into_iter().map(LocationEntity::from).collect())
    }

    pub async fn find_by_id(
        &self,
        id: i32,
    ) -> anyhow::Result<Option<LocationEntity>> {
        let location = Location::find_by_id(id).one(&self.db).await?;

        Ok(location.map(LocationEntity::from))
    }

    pub async fn create(
        &self,
        location: LocationEntity,
    ) -> anyhow::Result<LocationEntity> {
        let location = location::ActiveModel::from(location)
            .insert(&self.db)
            .await?;

        Ok(LocationEntity::from(location))
    }
}

pub(crate) async fn find_locations_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: Vec<i32>,
) -> anyhow::Result<HashMap<i32, LocationEntity>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let locations = Location::find()
        .filter(location::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|x| (x.id, LocationEntity::from(x)))
        .collect();

    Ok(locations)
}
