use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use common::storage::filesystem::FilesystemObjectStore;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tempfile::TempDir;

use server::config::{
    AppConfig, AwsConfig, CorsConfig, DatabaseConfig, GenerationConfig, ServerConfig,
    StorageBackend, StorageConfig,
};
use server::generation::{GenerationError, SummaryGenerator};
use server::repositories::SeaOrmMovieRepository;
use server::services::MovieService;
use server::state::AppState;

pub const PUBLIC_URL_BASE: &str = "http://covers.test";

pub mod routes {
    pub const MOVIES: &str = "/api/movies";
    pub const HEALTHCHECK: &str = "/healthcheck";
    pub const OPENAPI: &str = "/api-docs/openapi.json";

    pub fn movie(id: i64) -> String {
        format!("/api/movies/{id}")
    }

    pub fn movies_in_year(year: &str) -> String {
        format!("/api/movies?year={year}")
    }

    pub fn summary(id: i64) -> String {
        format!("/api/movies/{id}/summary")
    }
}

/// Deterministic stand-in for the language model that counts its calls.
#[derive(Default)]
pub struct FakeGenerator {
    pub calls: AtomicUsize,
}

#[async_trait]
impl SummaryGenerator for FakeGenerator {
    async fn generate(
        &self,
        title: &str,
        release_year: u16,
        genre: &str,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{title} is a {release_year} {genre} film."))
    }
}

/// A running test server.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub generator: Arc<FakeGenerator>,
    /// Backing directory of the object store; removed on drop.
    pub storage_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Multipart fields for create and update. `None` leaves the part out.
#[derive(Default)]
pub struct MovieFormParts<'a> {
    pub title: Option<&'a str>,
    pub release_year: Option<&'a str>,
    pub genre: Option<&'a str>,
    /// `(file name, bytes)`
    pub cover: Option<(&'a str, Vec<u8>)>,
}

impl<'a> MovieFormParts<'a> {
    pub fn new(title: &'a str, release_year: &'a str, genre: &'a str) -> Self {
        Self {
            title: Some(title),
            release_year: Some(release_year),
            genre: Some(genre),
            cover: None,
        }
    }

    pub fn with_cover(mut self, file_name: &'a str, bytes: Vec<u8>) -> Self {
        self.cover = Some((file_name, bytes));
        self
    }

    fn into_form(self) -> Form {
        let mut form = Form::new();
        if let Some(title) = self.title {
            form = form.text("title", title.to_string());
        }
        if let Some(year) = self.release_year {
            form = form.text("releaseYear", year.to_string());
        }
        if let Some(genre) = self.genre {
            form = form.text("genre", genre.to_string());
        }
        if let Some((file_name, bytes)) = self.cover {
            let part = Part::bytes(bytes)
                .file_name(file_name.to_string())
                .mime_str("image/jpeg")
                .expect("Failed to set MIME type");
            form = form.part("coverImage", part);
        }
        form
    }
}

fn test_config(storage_root: PathBuf) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            max_upload_bytes: 10 * 1024 * 1024,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: Some("sqlite::memory:".to_string()),
            scheme: "sqlite".to_string(),
            host: String::new(),
            port: 0,
            user: String::new(),
            name: String::new(),
            password: None,
            password_secret: None,
            max_connections: 1,
        },
        aws: AwsConfig {
            region: "us-east-1".to_string(),
        },
        storage: StorageConfig {
            backend: StorageBackend::Filesystem,
            bucket: String::new(),
            prefix: "images".to_string(),
            endpoint: None,
            access_key: None,
            secret_key: None,
            public_url_base: Some(PUBLIC_URL_BASE.to_string()),
            root: storage_root,
            visibility_timeout_secs: 5,
        },
        generation: GenerationConfig {
            model_id: "test-model".to_string(),
            max_tokens: 500,
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let storage_dir = TempDir::new().expect("Failed to create storage dir");
        let config = test_config(storage_dir.path().to_path_buf());

        let db_url = config.database.connection_url(None);
        let db = server::database::init_db(&db_url, config.database.max_connections)
            .await
            .expect("Failed to initialize test database");

        let store = FilesystemObjectStore::new(
            config.storage.root.clone(),
            &config.storage.prefix,
            PUBLIC_URL_BASE,
        )
        .await
        .expect("Failed to create object store");
        let generator = Arc::new(FakeGenerator::default());

        let movies = MovieService::new(
            Arc::new(SeaOrmMovieRepository::new(db)),
            generator.clone(),
            Arc::new(store),
        );
        let state = AppState {
            config,
            movies: Arc::new(movies),
        };

        let app = server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            generator,
            storage_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn generator_calls(&self) -> usize {
        self.generator.calls.load(Ordering::SeqCst)
    }

    /// Path on disk of a stored cover, given its public URL.
    pub fn cover_path(&self, url: &str) -> PathBuf {
        let key = url.rsplit('/').next().expect("cover URL has a key");
        self.storage_dir.path().join("images").join(key)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn post_form(&self, path: &str, parts: MovieFormParts<'_>) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .multipart(parts.into_form())
            .send()
            .await
            .expect("Failed to send multipart POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put_form(&self, path: &str, parts: MovieFormParts<'_>) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .multipart(parts.into_form())
            .send()
            .await
            .expect("Failed to send multipart PUT request");

        TestResponse::from_response(res).await
    }

    /// Create a movie via the API and return its `movieId`.
    pub async fn create_movie(&self, title: &str, year: &str, genre: &str) -> i64 {
        let res = self
            .post_form(routes::MOVIES, MovieFormParts::new(title, year, genre))
            .await;
        assert_eq!(res.status, 200, "create_movie failed: {}", res.text);
        self.movie_id_by_title(title).await
    }

    /// Look up a movie's id through the list endpoint.
    pub async fn movie_id_by_title(&self, title: &str) -> i64 {
        let res = self.get(routes::MOVIES).await;
        assert_eq!(res.status, 200, "list failed: {}", res.text);
        res.body["data"]
            .as_array()
            .expect("data should be an array")
            .iter()
            .find(|movie| movie["title"] == title)
            .and_then(|movie| movie["movieId"].as_i64())
            .unwrap_or_else(|| panic!("movie {title:?} not listed"))
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    /// Assert the standard failure envelope with the given message.
    pub fn assert_failure(&self, status: u16, message: &str) {
        assert_eq!(self.status, status, "unexpected status: {}", self.text);
        assert_eq!(self.body["status"], false, "{}", self.text);
        assert_eq!(self.body["statusCode"], status, "{}", self.text);
        assert_eq!(self.message(), message, "{}", self.text);
        assert!(self.body["data"].is_null(), "{}", self.text);
    }
}
