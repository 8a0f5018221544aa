use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;
use toml::{map::Map, Value};

/// Root of the cargo workspace, where `Config.toml` and `Secrets.toml` live.
pub fn workspace_dir() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .unwrap_or(manifest_dir)
        .to_path_buf()
}

pub fn load_config<T: DeserializeOwned>(config_name: &str) -> anyhow::Result<T> {
    let workspace_dir = workspace_dir();
    let config = std::fs::read_to_string(workspace_dir.join(config_name))
        .with_context(|| format!("failed to read {}", config_name))?;

    toml::from_str::<T>(&config)
        .with_context(|| format!("failed to parse {}", config_name))
}

pub fn load_env() -> anyhow::Result<Map<String, Value>> {
    let workspace_dir = workspace_dir();
    let secrets = std::fs::read_to_string(workspace_dir.join("Secrets.toml"))
        .context("failed to read Secrets.toml")?;

    toml::from_str::<Map<String, Value>>(&secrets)
        .context("failed to parse Secrets.toml")
}

pub fn secret<'a>(
    secrets: &'a Map<String, Value>,
    key: &str,
) -> anyhow::Result<&'a str> {
    secrets
        .get(key)
        .and_then(Value::as_str)
        .with_context(|| format!("{} was not found", key))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_workspace_dir_contains_root_manifest() {
        // Act
        let dir = workspace_dir();

        // Assert
        assert!(dir.join("Cargo.toml").exists());
        assert!(dir.join("libs").is_dir());
    }

    #[test]
    fn test_secret_lookup() {
        // Arrange
        let secrets = toml::from_str::<Map<String, Value>>(
            "DATABASE_URL = \"sqlite::memory:\"\nPORT = 8000",
        )
        .unwrap();

        // Act & Assert
        assert_eq!(
            secret(&secrets, "DATABASE_URL").unwrap(),
            "sqlite::memory:"
        );
        assert!(secret(&secrets, "PORT").is_err());
        assert!(secret(&secrets, "SECRET_KEY").is_err());
    }
}
