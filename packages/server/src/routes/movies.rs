use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::movie;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(movie::list_movies, movie::create_movie))
        .routes(routes!(
            movie::get_movie,
            movie::update_movie,
            movie::delete_movie
        ))
        .routes(routes!(movie::get_movie_summary))
}
