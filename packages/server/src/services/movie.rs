use std::hash::Hash;
use std::sync::Arc;

use common::storage::ObjectStore;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::entity::movie;
use crate::error::AppError;
use crate::generation::SummaryGenerator;
use crate::models::movie::{CoverUpload, MovieSubmission};
use crate::repositories::movie::normalize_title;
use crate::repositories::{MovieFields, MovieRepository};
use crate::utils::object_key::{key_from_url, new_cover_key};

pub const EMPTY_FIELDS: &str = "'title' or 'releaseYear' or 'genre' field cannot be empty";
pub const INVALID_YEAR: &str = "Error converting string to int";
pub const DUPLICATE_TITLE: &str = "movie with same title already exists";

/// Business rules for movies: lazy summaries, unique titles, cover handling.
pub struct MovieService {
    repo: Arc<dyn MovieRepository>,
    generator: Arc<dyn SummaryGenerator>,
    store: Arc<dyn ObjectStore>,
    /// One lock per movie with a generation in flight.
    summary_locks: DashMap<i32, Arc<Mutex<()>>>,
    /// One lock per normalized title being created or renamed to. Held from
    /// the uniqueness check through the write that follows it.
    title_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl MovieService {
    pub fn new(
        repo: Arc<dyn MovieRepository>,
        generator: Arc<dyn SummaryGenerator>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            repo,
            generator,
            store,
            summary_locks: DashMap::new(),
            title_locks: DashMap::new(),
        }
    }

    /// All movies, or only those released in `year` when given.
    pub async fn list_movies(&self, year: Option<&str>) -> Result<Vec<movie::Model>, AppError> {
        match year.filter(|y| !y.is_empty()) {
            Some(year) => self.repo.list_by_year(year).await,
            None => self.repo.list_all().await,
        }
    }

    pub async fn get_movie(&self, movie_id: &str) -> Result<movie::Model, AppError> {
        self.repo.find_by_id(movie_id).await
    }

    /// Return the stored summary, generating and persisting it on first use.
    #[instrument(skip(self))]
    pub async fn get_summary(&self, movie_id: &str) -> Result<String, AppError> {
        let movie = self.repo.find_by_id(movie_id).await?;
        if let Some(summary) = stored_summary(&movie) {
            return Ok(summary.to_string());
        }

        run_locked(
            &self.summary_locks,
            movie.movie_id,
            self.generate_once(movie.movie_id),
        )
        .await
    }

    /// Must be called with the movie's summary lock held.
    async fn generate_once(&self, movie_id: i32) -> Result<String, AppError> {
        // Another request may have finished while we waited for the lock.
        let movie = self.repo.find_by_id(&movie_id.to_string()).await?;
        if let Some(summary) = stored_summary(&movie) {
            return Ok(summary.to_string());
        }

        let summary = self
            .generator
            .generate(&movie.title, movie.release_year, &movie.genre)
            .await?;
        self.repo.update_summary(movie_id, &summary).await?;
        tracing::info!(movie_id, "Generated movie summary");
        Ok(summary)
    }

    #[instrument(skip(self, submission), fields(title = %submission.title))]
    pub async fn create_movie(&self, submission: MovieSubmission) -> Result<(), AppError> {
        let (mut fields, cover) = validate(submission)?;

        let title_key = normalize_title(&fields.title);
        run_locked(&self.title_locks, title_key, async {
            self.ensure_title_available(&fields.title, None).await?;

            if let Some(cover) = cover {
                fields.cover_url = Some(self.upload_cover(&cover).await?);
            }
            let movie_id = self.repo.insert(fields).await?;
            tracing::info!(movie_id, "Movie created");
            Ok::<_, AppError>(())
        })
        .await
    }

    #[instrument(skip(self, submission), fields(title = %submission.title))]
    pub async fn update_movie(
        &self,
        movie_id: &str,
        submission: MovieSubmission,
    ) -> Result<(), AppError> {
        let (mut fields, cover) = validate(submission)?;

        let title_key = normalize_title(&fields.title);
        run_locked(&self.title_locks, title_key.clone(), async {
            let existing = self.repo.find_by_id(movie_id).await?;
            if title_key != normalize_title(&existing.title) {
                self.ensure_title_available(&fields.title, Some(existing.movie_id))
                    .await?;
            }

            if let Some(cover) = cover {
                fields.cover_url = Some(self.upload_cover(&cover).await?);
            }
            self.repo.update_by_id(movie_id, fields).await?;
            tracing::info!(movie_id = existing.movie_id, "Movie updated");
            Ok::<_, AppError>(())
        })
        .await
    }

    /// Delete the row, then try to remove its cover object.
    #[instrument(skip(self))]
    pub async fn delete_movie(&self, movie_id: &str) -> Result<(), AppError> {
        let existing = self.repo.find_by_id(movie_id).await?;
        self.repo.delete_by_id(movie_id).await?;

        if let Some(key) = existing.cover_url.as_deref().and_then(key_from_url) {
            if let Err(e) = self.store.delete(key).await {
                tracing::warn!(movie_id = existing.movie_id, key, error = %e, "Failed to delete cover image");
            }
        }
        Ok(())
    }

    /// Conflict if another row already uses `title` after normalization.
    async fn ensure_title_available(
        &self,
        title: &str,
        current_id: Option<i32>,
    ) -> Result<(), AppError> {
        match self.repo.find_by_title(title).await {
            Ok(other) if Some(other.movie_id) != current_id => {
                Err(AppError::Conflict(DUPLICATE_TITLE.into()))
            }
            Ok(_) | Err(AppError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn upload_cover(&self, cover: &CoverUpload) -> Result<String, AppError> {
        let key = new_cover_key(&cover.file_name);
        let content_type = cover
            .content_type
            .clone()
            .unwrap_or_else(|| {
                mime_guess::from_path(&cover.file_name)
                    .first_or_octet_stream()
                    .to_string()
            });

        let url = self.store.put(&key, &cover.bytes, &content_type).await?;
        tracing::debug!(key = %key, url = %url, "Uploaded cover image");
        Ok(url)
    }
}

/// Run `body` while holding the lock for `key`. The map entry is dropped once
/// no other caller holds or waits on it.
async fn run_locked<K, T>(
    locks: &DashMap<K, Arc<Mutex<()>>>,
    key: K,
    body: impl Future<Output = T>,
) -> T
where
    K: Eq + Hash + Clone,
{
    let lock = locks
        .entry(key.clone())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone();
    let result = {
        let _guard = lock.lock().await;
        body.await
    };

    drop(lock);
    locks.remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
    result
}

fn stored_summary(movie: &movie::Model) -> Option<&str> {
    movie
        .generated_summary
        .as_deref()
        .filter(|summary| !summary.is_empty())
}

/// Check the mandatory fields and split off the cover.
fn validate(submission: MovieSubmission) -> Result<(MovieFields, Option<CoverUpload>), AppError> {
    let MovieSubmission {
        title,
        release_year,
        genre,
        cover,
    } = submission;

    if title.is_empty() || release_year.is_empty() || genre.is_empty() {
        return Err(AppError::Validation(EMPTY_FIELDS.into()));
    }
    let release_year = release_year
        .trim()
        .parse::<u16>()
        .map_err(|_| AppError::Validation(INVALID_YEAR.into()))?;

    let fields = MovieFields {
        title,
        release_year,
        genre,
        cover_url: None,
    };
    Ok((fields, cover))
}
