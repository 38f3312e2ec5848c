use serde::{Deserialize, Serialize};

use studymate_core::types::{Blob, GenerateContentRequest, GenerationConfig, Part};

use crate::error::{FlowError, FlowResult};
use crate::gateway::{parse_json_output, require_text, FlowGateway};
use crate::prompts;

pub const DEFAULT_QUESTION_COUNT: u32 = 5;
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Input contract for quiz generation.
///
/// Any non-empty combination of document text, image and topic is accepted;
/// at least one must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateMcqInput {
    pub document_content: Option<String>,
    pub image_data_uri: Option<String>,
    pub topic: Option<String>,
    pub num_questions: Option<u32>,
}

fn trimmed(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl GenerateMcqInput {
    pub fn question_count(&self) -> u32 {
        self.num_questions.unwrap_or(DEFAULT_QUESTION_COUNT)
    }

    pub fn validate(&self) -> FlowResult<()> {
        if trimmed(&self.document_content).is_none()
            && trimmed(&self.image_data_uri).is_none()
            && trimmed(&self.topic).is_none()
        {
            return Err(FlowError::InputInvalid(
                "at least one of documentContent, imageDataUri or topic is required".to_string(),
            ));
        }
        if self.num_questions == Some(0) {
            return Err(FlowError::InputInvalid(
                "numQuestions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
}

/// Output contract for quiz generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMcqOutput {
    pub questions: Vec<McqQuestion>,
}

impl GenerateMcqOutput {
    /// Every question must carry exactly 4 options and an in-range answer
    /// index; a single malformed question fails the whole output.
    pub fn validate(&self) -> FlowResult<()> {
        if self.questions.is_empty() {
            return Err(FlowError::Generation(
                "Model returned an empty question list".to_string(),
            ));
        }
        for (i, question) in self.questions.iter().enumerate() {
            if question.options.len() != OPTIONS_PER_QUESTION {
                return Err(FlowError::Generation(format!(
                    "Question {} has {} options, expected {}",
                    i + 1,
                    question.options.len(),
                    OPTIONS_PER_QUESTION
                )));
            }
            if question.correct_answer_index >= question.options.len() {
                return Err(FlowError::Generation(format!(
                    "Question {} has out-of-range correctAnswerIndex {}",
                    i + 1,
                    question.correct_answer_index
                )));
            }
        }
        Ok(())
    }
}

impl FlowGateway {
    /// Generate a multiple-choice quiz from a document, an image, a topic,
    /// or any combination of them.
    pub async fn generate_mcq(&self, input: &GenerateMcqInput) -> FlowResult<GenerateMcqOutput> {
        input.validate()?;

        let image = match trimmed(&input.image_data_uri) {
            Some(uri) => Some(
                Blob::from_data_uri(uri)
                    .map_err(|e| FlowError::InputInvalid(format!("imageDataUri: {}", e)))?,
            ),
            None => None,
        };

        let prompt = prompts::generate_mcq(
            input.question_count(),
            trimmed(&input.document_content),
            image.is_some(),
            trimmed(&input.topic),
        );

        let mut parts = vec![Part::text(prompt)];
        if let Some(blob) = image {
            parts.push(Part::inline(blob));
        }

        let request = GenerateContentRequest::from_parts(parts)
            .with_generation_config(GenerationConfig::json());
        let response = self.dispatch(&self.models().text_model, &request).await?;

        let output: GenerateMcqOutput = parse_json_output(require_text(&response)?)?;
        output.validate()?;
        Ok(output)
    }
}
