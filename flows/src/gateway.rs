use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use studymate_core::client::GeminiClient;
use studymate_core::config::GeminiConfig;
use studymate_core::errors::GeminiResult;
use studymate_core::types::{GenerateContentRequest, GenerateContentResponse};

use crate::error::{FlowError, FlowResult};

/// Seam between the capability handlers and the hosted model.
///
/// `GeminiClient` is the production implementation; tests substitute a
/// counting mock to prove that invalid input never reaches the network.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse>;
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        self.generate_content(model, request).await
    }
}

/// Model identities one gateway instance dispatches to.
#[derive(Debug, Clone)]
pub struct ModelSelection {
    pub text_model: String,
    pub speech_model: String,
    pub speech_voice: String,
}

impl ModelSelection {
    pub fn from_config(config: &GeminiConfig) -> Self {
        Self {
            text_model: config.text_model().to_string(),
            speech_model: config.speech_model().to_string(),
            speech_voice: config.speech_voice().to_string(),
        }
    }
}

/// The flow gateway: turns validated input contracts into model prompts and
/// model responses back into validated output contracts.
///
/// Contracts are per-call values; nothing is cached or mutated after
/// dispatch, and nothing is retried.
#[derive(Clone)]
pub struct FlowGateway {
    generator: Arc<dyn ContentGenerator>,
    models: ModelSelection,
}

impl FlowGateway {
    pub fn new(generator: Arc<dyn ContentGenerator>, models: ModelSelection) -> Self {
        Self { generator, models }
    }

    /// Convenience constructor wiring a configured client.
    pub fn from_client(client: GeminiClient) -> Self {
        let models = ModelSelection::from_config(client.config());
        Self::new(Arc::new(client), models)
    }

    pub(crate) fn models(&self) -> &ModelSelection {
        &self.models
    }

    /// One awaited outbound call; client errors are split into transport
    /// and generation failures here.
    pub(crate) async fn dispatch(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> FlowResult<GenerateContentResponse> {
        debug!(model, "Dispatching flow request");
        self.generator
            .generate(model, request)
            .await
            .map_err(FlowError::from_client)
    }
}

/// Strips a surrounding markdown code fence, if present, so JSON-mode
/// replies wrapped in ```json ... ``` still parse.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Deserializes a structured-JSON model reply into an output contract.
pub(crate) fn parse_json_output<T: DeserializeOwned>(text: &str) -> FlowResult<T> {
    serde_json::from_str(strip_code_fences(text))
        .map_err(|e| FlowError::Generation(format!("Output failed schema validation: {}", e)))
}

/// First non-empty text payload of a response, or a generation failure.
pub(crate) fn require_text(response: &GenerateContentResponse) -> FlowResult<&str> {
    response
        .first_text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FlowError::Generation("Model returned no text payload".to_string()))
}
