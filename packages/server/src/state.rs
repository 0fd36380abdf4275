use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::MovieService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub movies: Arc<MovieService>,
}
