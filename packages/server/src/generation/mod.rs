//! Movie summary generation through a hosted language model.

pub mod bedrock;

use async_trait::async_trait;
use thiserror::Error;

pub use bedrock::BedrockSummaryGenerator;

/// System instruction sent with every generation request.
pub const SYSTEM_PROMPT: &str = "You are a helpful AI assistant that specializes in movie summaries in 100 words. Just return the summary.";

/// Default cap on generated tokens.
pub const DEFAULT_MAX_TOKENS: i32 = 500;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("summary generation request failed: {0}")]
    Upstream(String),

    #[error("no summary returned")]
    EmptyResponse,
}

/// Produces a short synopsis for a movie.
///
/// Implementations make a single attempt; failures are returned as-is.
#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn generate(
        &self,
        title: &str,
        release_year: u16,
        genre: &str,
    ) -> Result<String, GenerationError>;
}

/// User prompt for one movie.
pub fn summary_prompt(title: &str, release_year: u16, genre: &str) -> String {
    format!(
        "Provide a short summary of 100 words for the movie '{title}', released in {release_year}, which falls under the genre {genre}."
    )
}
