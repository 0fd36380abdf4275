use axum::body::Bytes;
use axum_typed_multipart::{FieldData, TryFromMultipart};
use serde::{Deserialize, Serialize};

use crate::entity::movie;

/// Response DTO for a single movie.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieResponse {
    #[schema(example = 1)]
    pub movie_id: i32,
    #[schema(example = "Dune")]
    pub title: String,
    #[schema(example = 2021)]
    pub release_year: u16,
    #[schema(example = "Sci-Fi")]
    pub genre: String,
    /// Public URL of the cover image, if one was uploaded.
    #[schema(example = "https://movie-covers.s3.us-east-1.amazonaws.com/images/0192f1c6-7d1e-7a4b-9c8e-1f2a3b4c5d6e.jpg")]
    pub cover_url: Option<String>,
    /// Cached summary, `null` until first requested.
    pub generated_summary: Option<String>,
}

impl From<movie::Model> for MovieResponse {
    fn from(model: movie::Model) -> Self {
        Self {
            movie_id: model.movie_id,
            title: model.title,
            release_year: model.release_year,
            genre: model.genre,
            cover_url: model.cover_url,
            generated_summary: model.generated_summary,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SummaryResponse {
    #[schema(example = "A noble family becomes embroiled in a war for control of a desert planet...")]
    pub summary: String,
}

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MovieListQuery {
    /// Only return movies released in this year.
    pub year: Option<String>,
}

/// Multipart body accepted by create and update.
///
/// Every field is optional at the extractor level so that a missing field is
/// reported with the same message as an empty one.
#[derive(TryFromMultipart)]
pub struct MovieForm {
    pub title: Option<String>,

    #[form_data(field_name = "releaseYear")]
    pub release_year: Option<String>,

    pub genre: Option<String>,

    #[form_data(field_name = "coverImage", limit = "10MiB")]
    pub cover_image: Option<FieldData<Bytes>>,
}

/// A cover image received from the client.
#[derive(Debug, Clone)]
pub struct CoverUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Raw, unvalidated create/update input.
#[derive(Debug, Clone, Default)]
pub struct MovieSubmission {
    pub title: String,
    pub release_year: String,
    pub genre: String,
    pub cover: Option<CoverUpload>,
}

impl From<MovieForm> for MovieSubmission {
    fn from(form: MovieForm) -> Self {
        // A file part without a filename is what browsers send for an empty
        // file input; treat it as no cover.
        let cover = form.cover_image.and_then(|field| {
            let file_name = field.metadata.file_name.filter(|name| !name.is_empty())?;
            Some(CoverUpload {
                file_name,
                content_type: field.metadata.content_type,
                bytes: field.contents,
            })
        });

        Self {
            title: form.title.unwrap_or_default(),
            release_year: form.release_year.unwrap_or_default(),
            genre: form.genre.unwrap_or_default(),
            cover,
        }
    }
}
