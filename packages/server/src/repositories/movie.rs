use async_trait::async_trait;
use sea_orm::sea_query::{Alias, Expr, ExprTrait, Func};
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entity::movie;
use crate::error::AppError;

pub const MOVIE_NOT_FOUND: &str = "No movie found with given movieId";
pub const TITLE_NOT_FOUND: &str = "No movie found with given movie title";

/// Validated column values for an insert or a full update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieFields {
    pub title: String,
    pub release_year: u16,
    pub genre: String,
    /// New cover URL. `None` or empty leaves the column untouched.
    pub cover_url: Option<String>,
}

impl MovieFields {
    fn new_cover(&self) -> Option<&str> {
        self.cover_url.as_deref().filter(|url| !url.is_empty())
    }
}

/// Lowercased, trimmed title used for uniqueness comparisons.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Row ids arrive as path strings; anything non-numeric matches no row.
fn parse_movie_id(movie_id: &str) -> Option<i32> {
    movie_id.trim().parse().ok()
}

/// Persistence for `movie_details` rows.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<movie::Model>, AppError>;

    /// Exact match on release year. Non-numeric input yields no rows.
    async fn list_by_year(&self, year: &str) -> Result<Vec<movie::Model>, AppError>;

    async fn find_by_id(&self, movie_id: &str) -> Result<movie::Model, AppError>;

    /// Case- and surrounding-whitespace-insensitive title lookup.
    async fn find_by_title(&self, title: &str) -> Result<movie::Model, AppError>;

    /// Insert a row and return its id. The cover column is only written when
    /// a non-empty URL is given.
    async fn insert(&self, fields: MovieFields) -> Result<i32, AppError>;

    /// Overwrite title, year and genre; the cover only when a new one is given.
    async fn update_by_id(&self, movie_id: &str, fields: MovieFields) -> Result<(), AppError>;

    async fn update_summary(&self, movie_id: i32, summary: &str) -> Result<(), AppError>;

    /// Delete a row. Deleting a missing row succeeds.
    async fn delete_by_id(&self, movie_id: &str) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct SeaOrmMovieRepository {
    db: DatabaseConnection,
}

impl SeaOrmMovieRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MovieRepository for SeaOrmMovieRepository {
    async fn list_all(&self) -> Result<Vec<movie::Model>, AppError> {
        Ok(movie::Entity::find()
            .order_by_asc(movie::Column::MovieId)
            .all(&self.db)
            .await?)
    }

    /// Strict filter: the trimmed text must parse as a whole year, so a value
    /// with trailing junk such as `2021abc` matches nothing.
    async fn list_by_year(&self, year: &str) -> Result<Vec<movie::Model>, AppError> {
        let Ok(year) = year.trim().parse::<u16>() else {
            return Ok(Vec::new());
        };
        Ok(movie::Entity::find()
            .filter(movie::Column::ReleaseYear.eq(year))
            .order_by_asc(movie::Column::MovieId)
            .all(&self.db)
            .await?)
    }

    async fn find_by_id(&self, movie_id: &str) -> Result<movie::Model, AppError> {
        let id = parse_movie_id(movie_id)
            .ok_or_else(|| AppError::NotFound(MOVIE_NOT_FOUND.into()))?;
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(MOVIE_NOT_FOUND.into()))
    }

    async fn find_by_title(&self, title: &str) -> Result<movie::Model, AppError> {
        let normalized_column = Expr::expr(Func::lower(
            Func::cust(Alias::new("TRIM")).arg(Expr::col(movie::Column::Title)),
        ));
        movie::Entity::find()
            .filter(normalized_column.eq(normalize_title(title)))
            .order_by_asc(movie::Column::MovieId)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(TITLE_NOT_FOUND.into()))
    }

    async fn insert(&self, fields: MovieFields) -> Result<i32, AppError> {
        let cover_url = match fields.new_cover() {
            Some(url) => Set(Some(url.to_string())),
            None => NotSet,
        };
        let new_movie = movie::ActiveModel {
            title: Set(fields.title),
            release_year: Set(fields.release_year),
            genre: Set(fields.genre),
            cover_url,
            ..Default::default()
        };

        let result = movie::Entity::insert(new_movie).exec(&self.db).await?;
        Ok(result.last_insert_id)
    }

    async fn update_by_id(&self, movie_id: &str, fields: MovieFields) -> Result<(), AppError> {
        let Some(id) = parse_movie_id(movie_id) else {
            return Ok(());
        };
        let cover_url = match fields.new_cover() {
            Some(url) => Set(Some(url.to_string())),
            None => NotSet,
        };
        let changes = movie::ActiveModel {
            title: Set(fields.title),
            release_year: Set(fields.release_year),
            genre: Set(fields.genre),
            cover_url,
            ..Default::default()
        };

        movie::Entity::update_many()
            .set(changes)
            .filter(movie::Column::MovieId.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn update_summary(&self, movie_id: i32, summary: &str) -> Result<(), AppError> {
        movie::Entity::update_many()
            .col_expr(movie::Column::GeneratedSummary, Expr::value(summary))
            .filter(movie::Column::MovieId.eq(movie_id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn delete_by_id(&self, movie_id: &str) -> Result<(), AppError> {
        let Some(id) = parse_movie_id(movie_id) else {
            return Ok(());
        };
        movie::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
