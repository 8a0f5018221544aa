use shuttle_runtime::{Error, SecretStore, Secrets};

#[shuttle_runtime::main]
async fn main(
    #[Secrets] secret_store: SecretStore,
    #[shuttle_shared_db::Postgres(local_uri = "{secrets.DATABASE_URL}")]
    conn_string: String,
) -> shuttle_axum::ShuttleAxum {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let Some(secret_key) = secret_store.get("SECRET_KEY") else {
        return Err(Error::BuildPanic("SECRET_KEY was not found".to_string()));
    };

    let config = api::load_config("Config.toml")
        .map_err(|e| Error::BuildPanic(e.to_string()))?;
    let repository = repository::init_repository(
        &conn_string,
        config.database.max_connections,
    )
    .await
    .map_err(|e| Error::BuildPanic(e.to_string()))?;

    let router = api::serve(repository, config, &secret_key);

    Ok(router.into())
}
