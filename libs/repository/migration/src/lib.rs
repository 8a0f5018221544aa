pub use sea_orm_migration::prelude::*;

mod m20240601_090000_create_users_table;
mod m20240601_090010_create_category_table;
mod m20240601_090020_create_location_table;
mod m20240601_090030_create_post_table;
mod m20240601_090040_create_comment_table;
mod m20240601_090050_create_index_at_post;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_090000_create_users_table::Migration),
            Box::new(m20240601_090010_create_category_table::Migration),
            Box::new(m20240601_090020_create_location_table::Migration),
            Box::new(m20240601_090030_create_post_table::Migration),
            Box::new(m20240601_090040_create_comment_table::Migration),
            Box::new(m20240601_090050_create_index_at_post::Migration),
        ]
    }
}
