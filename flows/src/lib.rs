// AI flow gateway: one handler per user-facing capability.
//
// Every handler follows the same shape: validate the input contract locally
// (fail fast, before any network traffic), render a prompt, dispatch one
// awaited call to the hosted model, and validate the reply against the
// output contract. No retries, no caching, no partial results.

// Export error module - flow failure taxonomy
pub mod error;
pub use error::{FlowError, FlowResult};

// Export gateway module - dispatch seam and shared helpers
pub mod gateway;
pub use gateway::{ContentGenerator, FlowGateway, ModelSelection};

// Export prompt templates
pub mod prompts;

// Export WAV framing for the speech capability
pub mod wav;

// Capability handlers
pub mod feedback;
pub mod quiz;
pub mod speech;
pub mod summarize;
pub mod videos;
pub use feedback::*;
pub use quiz::*;
pub use speech::*;
pub use summarize::*;
pub use videos::*;

// Local quiz scoring
pub mod grading;
pub use grading::*;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use studymate_core::errors::{GeminiError, GeminiResult};
    use studymate_core::types::{GenerateContentRequest, GenerateContentResponse};

    use crate::gateway::{ContentGenerator, FlowGateway, ModelSelection};

    type Responder = Box<dyn Fn() -> GeminiResult<GenerateContentResponse> + Send + Sync>;

    /// Counting stand-in for the hosted model. The call counter is what
    /// lets tests prove invalid input never reaches the network.
    pub struct MockGenerator {
        calls: AtomicUsize,
        last_request: Mutex<Option<GenerateContentRequest>>,
        responder: Responder,
    }

    impl MockGenerator {
        fn with(responder: Responder) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                last_request: Mutex::new(None),
                responder,
            })
        }

        /// Replies with a single text part.
        pub fn text(reply: &str) -> Arc<Self> {
            let value = serde_json::json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": reply }] }
                }]
            });
            Self::with(Box::new(move || {
                Ok(serde_json::from_value(value.clone()).expect("mock response"))
            }))
        }

        /// Replies with the JSON payload rendered as the text part, the way
        /// JSON-mode responses arrive.
        pub fn json(payload: serde_json::Value) -> Arc<Self> {
            Self::text(&payload.to_string())
        }

        /// Replies with raw response parts.
        pub fn parts(parts: serde_json::Value) -> Arc<Self> {
            let value = serde_json::json!({
                "candidates": [{ "content": { "role": "model", "parts": parts } }]
            });
            Self::with(Box::new(move || {
                Ok(serde_json::from_value(value.clone()).expect("mock response"))
            }))
        }

        /// Replies with no candidates at all.
        pub fn empty() -> Arc<Self> {
            Self::with(Box::new(|| {
                Ok(GenerateContentResponse { candidates: vec![] })
            }))
        }

        /// Fails every call at the transport layer.
        pub fn transport_error() -> Arc<Self> {
            Self::with(Box::new(|| {
                Err(GeminiError::Request("connection refused".to_string()))
            }))
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_request(&self) -> Option<GenerateContentRequest> {
            self.last_request.lock().expect("mock lock").clone()
        }
    }

    #[async_trait]
    impl ContentGenerator for MockGenerator {
        async fn generate(
            &self,
            _model: &str,
            request: &GenerateContentRequest,
        ) -> GeminiResult<GenerateContentResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().expect("mock lock") = Some(request.clone());
            (self.responder)()
        }
    }

    pub fn gateway_with(mock: &Arc<MockGenerator>) -> FlowGateway {
        FlowGateway::new(
            mock.clone(),
            ModelSelection {
                text_model: "test-text-model".to_string(),
                speech_model: "test-tts-model".to_string(),
                speech_voice: "TestVoice".to_string(),
            },
        )
    }
}
