use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    entity::*, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter,
};

use crate::active_models::{prelude::*, *};
use entity::prelude::*;

#[derive(Clone, Debug)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<users::Model> for UserEntity {
    fn from(value: users::Model) -> Self {
        UserEntity {
            id: value.id,
            username: value.username,
            email: value.email,
            first_name: value.first_name,
            last_name: value.last_name,
            password: value.password,
            is_active: value.is_active,
            date_joined: value.date_joined,
        }
    }
}

impl From<UserEntity> for users::ActiveModel {
    fn from(value: UserEntity) -> Self {
        Self {
            id: {
                if value.id == i32::default() {
                    ActiveValue::not_set()
                } else {
                    ActiveValue::Set(value.id)
                }
            },
            username: ActiveValue::Set(value.username),
            email: ActiveValue::Set(value.email),
            first_name: ActiveValue::Set(value.first_name),
            last_name: ActiveValue::Set(value.last_name),
            password: ActiveValue::Set(value.password),
            is_active: ActiveValue::Set(value.is_active),
            date_joined: if value.date_joined == NaiveDateTime::default() {
                ActiveValue::Set(Utc::now().naive_utc())
            } else {
                ActiveValue::Set(value.date_joined)
            },
        }
    }
}

/// Fields of a user that the owner may change from the profile page.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct ProfileChanges {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserRepository {
    pub async fn find_by_id(
        &self,
        id: i32,
    ) -> anyhow::Result<Option<UserEntity>> {
        let user = Users::find_by_id(id).one(&self.db).await?;

        Ok(user.map(UserEntity::from))
    }

    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> anyhow::Result<Option<UserEntity>> {
        let user = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(user.map(UserEntity::from))
    }

    /// Whether `username` belongs to any user other than `except_id`.
    pub async fn username_taken(
        &self,
        username: &str,
        except_id: Option<i32>,
    ) -> anyhow::Result<bool> {
        let mut query =
            Users::find().filter(users::Column::Username.eq(username));
        if let Some(id) = except_id {
            query = query.filter(users::Column::Id.ne(id));
        }

        Ok(query.one(&self.db).await?.is_some())
    }

    pub async fn create(&self, user: UserEntity) -> anyhow::Result<UserEntity> {
        let mut model = users::ActiveModel::from(user);
        model.id = ActiveValue::not_set();
        let user = model.insert(&self.db).await?;

        Ok(UserEntity::from(user))
    }

    pub async fn update_profile(
        &self,
        user_id: i32,
        changes: ProfileChanges,
    ) -> anyhow::Result<UserEntity> {
        let user = users::ActiveModel {
            id: ActiveValue::Unchanged(user_id),
            username: ActiveValue::Set(changes.username),
            email: ActiveValue::Set(changes.email),
            first_name: ActiveValue::Set(changes.first_name),
            last_name: ActiveValue::Set(changes.last_name),
            ..Default::default()
        }
        .update(&self.db)
        .await?;

        Ok(UserEntity::from(user))
    }
}

pub(crate) async fn find_users_by_ids<C: ConnectionTrait>(
    db: &C,
    ids: Vec<i32>,
) -> anyhow::Result<HashMap<i32, UserEntity>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = Users::find()
        .filter(users::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|x| (x.id, UserEntity::from(x)))
        .collect();

    Ok(users)
}
