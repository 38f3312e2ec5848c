use serde::{Deserialize, Serialize};

use studymate_core::types::{GenerateContentRequest, GenerationConfig, Part};

use crate::error::{require_non_empty, FlowError, FlowResult};
use crate::gateway::{parse_json_output, require_text, FlowGateway};
use crate::prompts;

pub const MIN_SUGGESTIONS: usize = 3;
pub const MAX_SUGGESTIONS: usize = 5;

/// Input contract for video suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestVideosInput {
    pub subject: String,
}

impl SuggestVideosInput {
    pub fn validate(&self) -> FlowResult<()> {
        require_non_empty(&self.subject, "subject")
    }
}

/// One suggested video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSuggestion {
    pub title: String,
    pub channel: String,
    pub reason: String,
}

/// Output contract for video suggestions: 3 to 5 items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestVideosOutput {
    pub videos: Vec<VideoSuggestion>,
}

impl SuggestVideosOutput {
    pub fn validate(&self) -> FlowResult<()> {
        let count = self.videos.len();
        if !(MIN_SUGGESTIONS..=MAX_SUGGESTIONS).contains(&count) {
            return Err(FlowError::Generation(format!(
                "Model returned {} suggestions, expected {} to {}",
                count, MIN_SUGGESTIONS, MAX_SUGGESTIONS
            )));
        }
        Ok(())
    }
}

impl FlowGateway {
    /// Suggest YouTube videos for a subject the student is studying.
    pub async fn suggest_videos(
        &self,
        input: &SuggestVideosInput,
    ) -> FlowResult<SuggestVideosOutput> {
        input.validate()?;

        let prompt = prompts::suggest_videos(input.subject.trim());
        let request = GenerateContentRequest::from_parts(vec![Part::text(prompt)])
            .with_generation_config(GenerationConfig::json());
        let response = self.dispatch(&self.models().text_model, &request).await?;

        let output: SuggestVideosOutput = parse_json_output(require_text(&response)?)?;
        output.validate()?;
        Ok(output)
    }
}
