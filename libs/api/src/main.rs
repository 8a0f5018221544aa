use std::net::{Ipv4Addr, SocketAddr};

use api::{load_config, serve};
use repository::init_repository;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use util::{load_env, secret};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let secrets = load_env()?;
    let conn_string = secret(&secrets, "DATABASE_URL")?;
    let secret_key = secret(&secrets, "SECRET_KEY")?;

    let config = load_config("Config.toml")?;
    let repository =
        init_repository(conn_string, config.database.max_connections).await?;

    let router = serve(repository, config, secret_key);

    let address = SocketAddr::from((Ipv4Addr::UNSPECIFIED, 8000));
    let listener = TcpListener::bind(&address).await?;
    Ok(axum::serve(listener, router).await?)
}
