use category::CategoryRepository;
use comment::CommentRepository;
use location::LocationRepository;
use migration::Migrator;
use migration::MigratorTrait;
use post::PostRepository;
pub use response::DbResult;
use response::DbContext;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement,
};
use tracing::info;
use user::UserRepository;

mod active_models;
pub mod category;
pub mod comment;
pub mod location;
pub mod post;
mod response;
pub mod user;

#[derive(Clone, Debug)]
pub struct Repository {
    pub user: UserRepository,
    pub category: CategoryRepository,
    pub location: LocationRepository,
    pub post: PostRepository,
    pub comment: CommentRepository,
    db: DatabaseConnection,
}

impl Repository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user: UserRepository::new(db.clone()),
            category: CategoryRepository::new(db.clone()),
            location: LocationRepository::new(db.clone()),
            post: PostRepository::new(db.clone()),
            comment: CommentRepository::new(db.clone()),
            db,
        }
    }

    /// Round trip to the database.
    pub async fn ping(&self) -> DbResult<()> {
        let backend = self.db.get_database_backend();
        self.db
            .execute(Statement::from_string(backend, "SELECT 1"))
            .await
            .db_context("in ping")?;

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error(
        "in sea-orm crate from unsuccessful database operations: {}: {}",
        message,
        source
    )]
    InSeaOrmDbErr {
        message: String,
        source: sea_orm::DbErr,
    },
}

/// Connects, applies pending migrations and builds the repositories.
///
/// In-memory SQLite needs `max_connections = 1`, every pooled connection
/// would otherwise see its own empty database.
pub async fn init_repository(
    db_url: &str,
    max_connections: u32,
) -> DbResult<Repository> {
    let db = init_db(db_url, max_connections).await?;

    Ok(Repository::new(db))
}

async fn init_db(
    db_url: &str,
    max_connections: u32,
) -> DbResult<DatabaseConnection> {
    let mut opt = ConnectOptions::new(db_url);
    opt.max_connections(max_connections.max(1))
        .min_connections(1)
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let db = Database::connect(opt)
        .await
        .db_context("in database connect")?;

    Migrator::up(&db, None)
        .await
        .db_context("in migrator up")?;

    info!(task = "database ready", max_connections);

    Ok(db)
}
