use std::{net::IpAddr, path::Path};

use anyhow::Context;
use config::{Environment, File, FileFormat};
use serde::Deserialize;
use siasis_models::Sensitive;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config.toml");

/// Colon separated list of config files, later files take precedence.
pub const CONFIG_PATH_ENV: &str = "SIASIS_CONFIG";

/// Environment variables like `SIASIS_DISPATCH__TOKEN` override file values.
pub const ENV_PREFIX: &str = "SIASIS";

pub fn load() -> anyhow::Result<Config> {
    let paths = match std::env::var(CONFIG_PATH_ENV) {
        Ok(paths) => paths.split(':').map(Into::into).collect(),
        Err(_) => vec![DEFAULT_CONFIG_PATH.to_owned()],
    };
    load_with_override(&paths, &[])
}

pub fn load_with_override(
    paths: &[impl AsRef<Path>],
    overrides: &[&str],
) -> anyhow::Result<Config> {
    let builder = paths
        .iter()
        .try_fold(config::Config::builder(), |builder, path| {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at {}", path.display()))?;
            let source = File::from_str(&content, FileFormat::Toml);
            anyhow::Ok(builder.add_source(source))
        })?
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

    overrides
        .iter()
        .fold(builder, |builder, &content| {
            builder.add_source(File::from_str(content, FileFormat::Toml))
        })
        .build()?
        .try_deserialize()
        .context("Failed to load config")
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub dispatch: DispatchConfig,
    pub notification: NotificationConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DispatchConfig {
    pub endpoint_override: Option<Url>,
    pub owner: String,
    pub repo: String,
    pub api_version: String,
    pub token: Option<Sensitive<String>>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationConfig {
    pub smtp_url: String,
    pub sender_name: String,
    pub username: Option<String>,
    pub password: Option<Sensitive<String>>,
    pub recipient: Option<String>,
}
