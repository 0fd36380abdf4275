use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ConverseOutput, InferenceConfiguration, Message,
    SystemContentBlock,
};
use tracing::instrument;

use super::{GenerationError, SYSTEM_PROMPT, SummaryGenerator, summary_prompt};

/// [`SummaryGenerator`] backed by the Bedrock Converse API.
pub struct BedrockSummaryGenerator {
    client: Client,
    model_id: String,
    max_tokens: i32,
}

impl BedrockSummaryGenerator {
    pub fn new(sdk_config: &aws_config::SdkConfig, model_id: String, max_tokens: i32) -> Self {
        Self {
            client: Client::new(sdk_config),
            model_id,
            max_tokens,
        }
    }
}

/// First text block of the assistant message, if it is non-empty.
fn first_text(output: Option<&ConverseOutput>) -> Option<String> {
    let ConverseOutput::Message(message) = output? else {
        return None;
    };
    match message.content().first()? {
        ContentBlock::Text(text) if !text.is_empty() => Some(text.clone()),
        _ => None,
    }
}

#[async_trait]
impl SummaryGenerator for BedrockSummaryGenerator {
    #[instrument(skip(self), fields(model_id = %self.model_id))]
    async fn generate(
        &self,
        title: &str,
        release_year: u16,
        genre: &str,
    ) -> Result<String, GenerationError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(summary_prompt(title, release_year, genre)))
            .build()
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(SYSTEM_PROMPT.to_string()))
            .messages(message)
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(self.max_tokens)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;

        first_text(response.output()).ok_or(GenerationError::EmptyResponse)
    }
}
