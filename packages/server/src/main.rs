use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use common::secrets::SecretProvider;
use common::secrets::aws::AwsSecretsManager;
use common::storage::ObjectStore;
use common::storage::filesystem::FilesystemObjectStore;
use common::storage::s3::{S3Config, S3ObjectStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::config::{AppConfig, StorageBackend, StorageConfig};
use server::database::init_db;
use server::generation::BedrockSummaryGenerator;
use server::repositories::SeaOrmMovieRepository;
use server::services::MovieService;
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let aws = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws.region.clone()))
        .load()
        .await;

    let password = resolve_db_password(&config, &aws).await?;
    let db_url = config.database.connection_url(password.as_deref());
    let db = init_db(&db_url, config.database.max_connections)
        .await
        .context("Failed to connect to database")?;
    info!("Database connected and schema synced");

    let store = build_object_store(&config.storage, &config.aws.region).await?;
    let generator = BedrockSummaryGenerator::new(
        &aws,
        config.generation.model_id.clone(),
        config.generation.max_tokens,
    );

    let movies = MovieService::new(
        Arc::new(SeaOrmMovieRepository::new(db)),
        Arc::new(generator),
        store,
    );
    let state = AppState {
        config: config.clone(),
        movies: Arc::new(movies),
    };
    let app = server::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    info!("Swagger UI: http://{}/swagger-ui", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Plain-text password from config, or one fetched from the secret store.
async fn resolve_db_password(config: &AppConfig, aws: &SdkConfig) -> anyhow::Result<Option<String>> {
    if let Some(password) = &config.database.password {
        return Ok(Some(password.clone()));
    }
    let Some(secret) = &config.database.password_secret else {
        return Ok(None);
    };

    let provider = AwsSecretsManager::new(aws);
    let password = provider
        .get_secret_value(&secret.secret_id, &secret.key)
        .await
        .with_context(|| format!("Failed to read database password from {}", secret.secret_id))?;
    info!(secret_id = %secret.secret_id, "Database password loaded from secret store");
    Ok(Some(password))
}

async fn build_object_store(
    storage: &StorageConfig,
    region: &str,
) -> anyhow::Result<Arc<dyn ObjectStore>> {
    match storage.backend {
        StorageBackend::S3 => {
            let store = S3ObjectStore::new(S3Config {
                bucket: storage.bucket.clone(),
                region: region.to_string(),
                prefix: storage.prefix.clone(),
                endpoint: storage.endpoint.clone(),
                access_key: storage.access_key.clone(),
                secret_key: storage.secret_key.clone(),
                public_url_base: storage.public_url_base.clone(),
                visibility_timeout: Duration::from_secs(storage.visibility_timeout_secs),
            })
            .context("Failed to initialize S3 object store")?;
            let credentials = if storage.access_key.is_some() {
                "static keys"
            } else {
                "rust-s3 env/profile/instance chain"
            };
            info!(bucket = %storage.bucket, credentials, "Using S3 object store");
            Ok(Arc::new(store))
        }
        StorageBackend::Filesystem => {
            let public_url_base = match &storage.public_url_base {
                Some(base) => base.clone(),
                None => {
                    let root = std::path::absolute(&storage.root)
                        .context("Failed to resolve storage root")?;
                    format!("file://{}", root.display())
                }
            };
            let store =
                FilesystemObjectStore::new(storage.root.clone(), &storage.prefix, public_url_base)
                    .await
                    .context("Failed to initialize filesystem object store")?;
            info!(root = %storage.root.display(), "Using filesystem object store");
            Ok(Arc::new(store))
        }
    }
}
