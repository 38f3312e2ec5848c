use serde::{Deserialize, Serialize};

use studymate_core::types::{GenerateContentRequest, Part};

use crate::error::{require_non_empty, FlowResult};
use crate::gateway::{require_text, FlowGateway};
use crate::prompts;

/// Input contract for document summarization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeDocumentInput {
    pub document_content: String,
}

impl SummarizeDocumentInput {
    pub fn validate(&self) -> FlowResult<()> {
        require_non_empty(&self.document_content, "documentContent")
    }
}

/// Output contract for document summarization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizeDocumentOutput {
    pub summary: String,
}

impl FlowGateway {
    /// Summarize a text document. Text in, text out.
    pub async fn summarize_document(
        &self,
        input: &SummarizeDocumentInput,
    ) -> FlowResult<SummarizeDocumentOutput> {
        input.validate()?;

        let prompt = prompts::summarize_document(input.document_content.trim());
        let request = GenerateContentRequest::from_parts(vec![Part::text(prompt)]);
        let response = self.dispatch(&self.models().text_model, &request).await?;

        let summary = require_text(&response)?.to_string();
        Ok(SummarizeDocumentOutput { summary })
    }
}
