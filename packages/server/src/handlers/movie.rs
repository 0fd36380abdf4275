use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::multipart::AppMultipart;
use crate::models::movie::{MovieForm, MovieListQuery, MovieResponse, SummaryResponse};
use crate::models::shared::{ApiResponse, Empty};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Movies",
    operation_id = "listMovies",
    summary = "List movies",
    description = "Returns every movie, or only those released in `year` when the query \
        parameter is present. A non-numeric year matches nothing. An empty result is \
        reported as 404 with message `No movies found`.",
    params(MovieListQuery),
    responses(
        (status = 200, description = "Movies fetched", body = ApiResponse<Vec<MovieResponse>>),
        (status = 400, description = "Store error", body = ApiResponse<Empty>),
        (status = 404, description = "No movies found", body = ApiResponse<Empty>),
    ),
)]
#[instrument(skip(state, query), fields(year = ?query.year))]
pub async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let movies = state.movies.list_movies(query.year.as_deref()).await?;

    if movies.is_empty() {
        return Ok(
            ApiResponse::<Empty>::failure(StatusCode::NOT_FOUND, "No movies found").into_response(),
        );
    }

    let data: Vec<MovieResponse> = movies.into_iter().map(MovieResponse::from).collect();
    Ok(ApiResponse::ok("Movies fetched successfully.", data).into_response())
}

#[utoipa::path(
    get,
    path = "/{movie_id}",
    tag = "Movies",
    operation_id = "getMovie",
    summary = "Get a movie by id",
    params(("movie_id" = String, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie fetched", body = ApiResponse<MovieResponse>),
        (status = 400, description = "No movie with this id, or store error", body = ApiResponse<Empty>),
    ),
)]
#[instrument(skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let movie = state.movies.get_movie(&movie_id).await?;
    Ok(ApiResponse::ok(
        "Movie fetched successfully",
        MovieResponse::from(movie),
    ))
}

#[utoipa::path(
    get,
    path = "/{movie_id}/summary",
    tag = "Movies",
    operation_id = "getMovieSummary",
    summary = "Get the generated summary of a movie",
    description = "Returns the cached summary. On first request the summary is generated by \
        the language model and stored; later requests never regenerate it. Concurrent first \
        requests for the same movie share a single generation.",
    params(("movie_id" = String, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Summary fetched", body = ApiResponse<SummaryResponse>),
        (status = 400, description = "No movie with this id, or generation failed", body = ApiResponse<Empty>),
    ),
)]
#[instrument(skip(state))]
pub async fn get_movie_summary(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let summary = state.movies.get_summary(&movie_id).await?;
    Ok(ApiResponse::ok(
        "Movie summary fetched.",
        SummaryResponse { summary },
    ))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Movies",
    operation_id = "createMovie",
    summary = "Create a movie",
    description = "Multipart form with `title`, `releaseYear` and `genre` (all required) and \
        an optional `coverImage` file. Titles must be unique ignoring case and surrounding \
        whitespace. The cover is uploaded to object storage before the row is written.",
    request_body(content_type = "multipart/form-data", description = "Movie fields with optional cover image"),
    responses(
        (status = 200, description = "Movie added", body = ApiResponse<Empty>),
        (status = 400, description = "Validation error, duplicate title, or upload failure", body = ApiResponse<Empty>),
    ),
)]
#[instrument(skip(state, form))]
pub async fn create_movie(
    State(state): State<AppState>,
    form: AppMultipart<MovieForm>,
) -> Result<impl IntoResponse, AppError> {
    state.movies.create_movie(form.data.into()).await?;
    Ok(ApiResponse::ok_empty("Movie added successfully"))
}

#[utoipa::path(
    put,
    path = "/{movie_id}",
    tag = "Movies",
    operation_id = "updateMovie",
    summary = "Replace a movie's fields",
    description = "Overwrites `title`, `releaseYear` and `genre`. The cover is replaced only \
        when a new `coverImage` file is sent; the previous object is left in storage.",
    params(("movie_id" = String, Path, description = "Movie ID")),
    request_body(content_type = "multipart/form-data", description = "Movie fields with optional cover image"),
    responses(
        (status = 200, description = "Movie updated", body = ApiResponse<Empty>),
        (status = 400, description = "Validation error, unknown id, duplicate title, or upload failure", body = ApiResponse<Empty>),
    ),
)]
#[instrument(skip(state, form))]
pub async fn update_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    form: AppMultipart<MovieForm>,
) -> Result<impl IntoResponse, AppError> {
    state.movies.update_movie(&movie_id, form.data.into()).await?;
    Ok(ApiResponse::ok_empty("Movie updated successfully"))
}

#[utoipa::path(
    delete,
    path = "/{movie_id}",
    tag = "Movies",
    operation_id = "deleteMovie",
    summary = "Delete a movie",
    description = "Deletes the row, then makes a best-effort attempt to delete its cover \
        image. A failed cover deletion is logged and does not fail the request.",
    params(("movie_id" = String, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie deleted", body = ApiResponse<Empty>),
        (status = 400, description = "No movie with this id, or store error", body = ApiResponse<Empty>),
    ),
)]
#[instrument(skip(state))]
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.movies.delete_movie(&movie_id).await?;
    Ok(ApiResponse::ok_empty("Movie deleted successfully"))
}
