use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::generation::DEFAULT_MAX_TOKENS;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit for multipart uploads, in bytes.
    pub max_upload_bytes: usize,
    pub cors: CorsConfig,
}

/// Secret store entry holding the database password.
#[derive(Debug, Deserialize, Clone)]
pub struct SecretRef {
    pub secret_id: String,
    pub key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Full connection URL. Takes precedence over the discrete fields below.
    pub url: Option<String>,
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub name: String,
    pub password: Option<String>,
    pub password_secret: Option<SecretRef>,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Connection URL, with `password` spliced in when the URL is assembled
    /// from discrete fields.
    pub fn connection_url(&self, password: Option<&str>) -> String {
        if let Some(url) = &self.url {
            return url.clone();
        }
        let credentials = match password {
            Some(pw) => format!(
                "{}:{}",
                urlencoding::encode(&self.user),
                urlencoding::encode(pw)
            ),
            None => urlencoding::encode(&self.user).into_owned(),
        };
        format!(
            "{}://{}@{}:{}/{}",
            self.scheme, credentials, self.host, self.port, self.name
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AwsConfig {
    pub region: String,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Filesystem,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub prefix: String,
    pub endpoint: Option<String>,
    /// Static S3 keys. Without them S3 falls back to rust-s3's own
    /// env/profile/instance-metadata lookup, not the `[aws]` SDK chain.
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub public_url_base: Option<String>,
    /// Root directory for the filesystem backend.
    pub root: PathBuf,
    pub visibility_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub aws: AwsConfig,
    pub storage: StorageConfig,
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.scheme", "mysql")?
            .set_default("database.host", "127.0.0.1")?
            .set_default("database.port", 3306)?
            .set_default("database.user", "moviebox")?
            .set_default("database.name", "moviebox")?
            .set_default("database.max_connections", 20)?
            .set_default("aws.region", "us-east-1")?
            .set_default("storage.backend", "s3")?
            .set_default("storage.bucket", "")?
            .set_default("storage.prefix", "images")?
            .set_default("storage.root", "./data/objects")?
            .set_default("storage.visibility_timeout_secs", 60)?
            .set_default("generation.model_id", "amazon.nova-lite-v1:0")?
            .set_default("generation.max_tokens", DEFAULT_MAX_TOKENS)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., MOVIEBOX__STORAGE__BUCKET)
            .add_source(
                Environment::with_prefix("MOVIEBOX")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        s.try_deserialize()
    }
}
