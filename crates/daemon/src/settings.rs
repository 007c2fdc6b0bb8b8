//! Daemon Settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! file (`COURIER_CONFIG`, default `courier.toml`), then `COURIER_*`
//! environment variables.

use anyhow::{bail, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use courier_api_rpc::KeyManager;
use courier_core::application::AccessManager;
use courier_core::domain::Policy;
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "courier.toml";
const DEFAULT_DATABASE_URL: &str = "sqlite://~/.courier/courier.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// One access key. Exactly one of `password` / `password_hash` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct KeySettings {
    pub name: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_hash: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccessSettings {
    #[serde(default)]
    pub keys: Vec<KeySettings>,
    #[serde(default)]
    pub policies: Vec<Policy>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub storage: StorageBackend,
    pub database_url: String,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub log_format: LogFormat,
    #[serde(default)]
    pub access: AccessSettings,
}

impl Settings {
    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("storage", "memory")?
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("rpc_host", courier_api_rpc::server::DEFAULT_RPC_HOST)?
            .set_default("rpc_port", courier_api_rpc::server::DEFAULT_RPC_PORT as i64)?
            .set_default("log_format", "pretty")?)
    }

    /// Load defaults, config file and environment overrides
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("COURIER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let path = shellexpand::tilde(&path).into_owned();

        let settings = Self::defaults()?
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix("COURIER").try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read configuration ({})", path))?
            .try_deserialize::<Settings>()
            .context("Invalid configuration")?;

        Ok(settings)
    }

    /// Database URL with a leading `~` in the path expanded
    pub fn database_url(&self) -> String {
        match self.database_url.strip_prefix("sqlite://") {
            Some(path) => format!("sqlite://{}", shellexpand::tilde(path)),
            None => shellexpand::tilde(&self.database_url).into_owned(),
        }
    }

    pub fn access_manager(&self) -> Result<AccessManager> {
        let mut access = AccessManager::new();
        for (i, policy) in self.access.policies.iter().enumerate() {
            access
                .add_policy(policy.clone())
                .with_context(|| format!("Invalid policy #{}", i + 1))?;
        }
        Ok(access)
    }

    pub fn key_manager(&self) -> Result<KeyManager> {
        let mut keys = KeyManager::new();
        for key in &self.access.keys {
            match (&key.password, &key.password_hash) {
                (Some(password), None) => keys.add_key(&key.name, password)?,
                (None, Some(hash)) => keys.add_hashed_credentials(&key.name, hash)?,
                _ => bail!(
                    "Access key '{}' needs exactly one of password or password_hash",
                    key.name
                ),
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use courier_core::port::CredentialVerifier;

    fn from_toml(toml: &str) -> Settings {
        Settings::defaults()
            .unwrap()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = from_toml("");
        assert_eq!(settings.storage, StorageBackend::Memory);
        assert_eq!(settings.rpc_host, "127.0.0.1");
        assert_eq!(settings.rpc_port, 9527);
        assert_eq!(settings.log_format, LogFormat::Pretty);
        assert!(settings.access.keys.is_empty());
    }

    #[test]
    fn test_file_with_access_section() {
        let settings = from_toml(
            r#"
            storage = "sqlite"
            database_url = "sqlite:///var/lib/courier/courier.db"
            rpc_port = 9000
            log_format = "json"

            [[access.keys]]
            name = "producer"
            password = "pw"

            [[access.policies]]
            id = "producers-push"
            usernames = ["producer"]
            resources = ["msg:queue:*"]
            permissions = ["msg::PushMessage"]

            [[access.policies]]
            resources = ["msg:queue:secret*"]
            permissions = ["*"]
            effect = "DENY"
            "#,
        );

        assert_eq!(settings.storage, StorageBackend::Sqlite);
        assert_eq!(settings.rpc_port, 9000);
        assert_eq!(settings.log_format, LogFormat::Json);
        assert_eq!(settings.database_url(), "sqlite:///var/lib/courier/courier.db");

        let access = settings.access_manager().unwrap();
        assert_eq!(access.len(), 2);
        assert!(access.is_granted("msg:queue:01", "producer", "msg::PushMessage"));
        assert!(!access.is_granted("msg:queue:secret1", "producer", "msg::PushMessage"));

        let keys = settings.key_manager().unwrap();
        assert!(keys.valid_credentials("producer", "pw"));
    }

    #[test]
    fn test_key_needs_exactly_one_secret() {
        let settings = from_toml(
            r#"
            [[access.keys]]
            name = "nobody"
            "#,
        );
        assert!(settings.key_manager().is_err());
    }

    #[test]
    fn test_database_url_expands_home() {
        let mut settings = from_toml("");
        settings.database_url = "sqlite://~/courier.db".to_string();
        assert!(!settings.database_url().contains('~'));
        assert!(settings.database_url().starts_with("sqlite://"));
    }
}
