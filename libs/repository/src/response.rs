use sea_orm::DbErr;

use crate::RepositoryError;

pub type DbResult<T> = Result<T, RepositoryError>;

/// Tags a sea-orm failure with the step that produced it.
pub(crate) trait DbContext<T> {
    fn db_context(self, step: &str) -> DbResult<T>;
}

impl<T> DbContext<T> for Result<T, DbErr> {
    fn db_context(self, step: &str) -> DbResult<T> {
        self.map_err(|source| RepositoryError::InSeaOrmDbErr {
            message: step.to_string(),
            source,
        })
    }
}
