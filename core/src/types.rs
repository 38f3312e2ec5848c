use serde::{Deserialize, Serialize};

use crate::errors::{GeminiError, GeminiResult};

/// Request to the Gemini API to generate content
#[derive(Serialize, Debug, Clone)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Single-turn user request from a list of parts.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            contents: vec![Content {
                parts,
                role: Some("user".to_string()),
            }],
            system_instruction: None,
            generation_config: None,
        }
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = Some(config);
        self
    }
}

/// Content structure for requests and responses
#[derive(Serialize, Clone, Debug, Deserialize)]
pub struct Content {
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Part structure for a piece of content: text or an inline media blob
#[derive(Serialize, Clone, Debug, Deserialize)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
}

impl Part {
    pub fn text(text: String) -> Self {
        Self {
            text: Some(text),
            inline_data: None,
        }
    }

    pub fn inline(blob: Blob) -> Self {
        Self {
            text: None,
            inline_data: Some(blob),
        }
    }
}

/// Base64 inline payload used for image and audio attachments
#[derive(Serialize, Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    pub mime_type: String,
    pub data: String,
}

impl Blob {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Parses a `data:<mimetype>;base64,<data>` URI.
    pub fn from_data_uri(uri: &str) -> GeminiResult<Self> {
        let rest = uri.strip_prefix("data:").ok_or_else(|| {
            GeminiError::Parse("data URI must start with 'data:'".to_string())
        })?;

        let (mime_type, data) = rest.split_once(";base64,").ok_or_else(|| {
            GeminiError::Parse("data URI must contain ';base64,'".to_string())
        })?;

        if mime_type.is_empty() {
            return Err(GeminiError::Parse(
                "data URI is missing a MIME type".to_string(),
            ));
        }

        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    /// Renders the blob back into a `data:<mimetype>;base64,<data>` URI.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Decodes the base64 payload into raw bytes.
    pub fn decode(&self) -> GeminiResult<Vec<u8>> {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        STANDARD
            .decode(&self.data)
            .map_err(|e| GeminiError::Parse(format!("Invalid base64 payload: {}", e)))
    }
}

/// Generation configuration options
#[derive(Serialize, Debug, Default, Clone)]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech_config: Option<SpeechConfig>,
}

impl GenerationConfig {
    /// Configuration requesting structured JSON output.
    pub fn json() -> Self {
        Self {
            response_mime_type: Some("application/json".to_string()),
            ..Default::default()
        }
    }

    /// Configuration requesting audio output with the given prebuilt voice.
    pub fn audio(voice_name: &str, with_timepoints: bool) -> Self {
        let modalities = if with_timepoints {
            vec!["AUDIO".to_string(), "TEXT".to_string()]
        } else {
            vec!["AUDIO".to_string()]
        };
        Self {
            response_modalities: Some(modalities),
            speech_config: Some(SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: voice_name.to_string(),
                    },
                },
                enable_timepoints: with_timepoints.then_some(true),
            }),
            ..Default::default()
        }
    }
}

/// Speech synthesis configuration
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_timepoints: Option<bool>,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

/// Word-level timing mark returned when timepoints are requested
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Timepoint {
    pub word: String,
    pub start_time: f64,
    pub end_time: f64,
}

/// Response from the Gemini API
#[derive(Deserialize, Debug, Serialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// Candidate in the response
#[derive(Deserialize, Debug, Serialize)]
pub struct Candidate {
    pub content: Option<ResponseContent>,
}

/// Content of a response candidate
#[derive(Deserialize, Debug, Serialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
    pub role: Option<String>,
}

/// Part of a response candidate
#[derive(Deserialize, Debug, Serialize)]
pub struct ResponsePart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<Blob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timepoints: Option<Vec<Timepoint>>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &ResponsePart> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.iter())
            .into_iter()
            .flatten()
    }

    /// Text of the first candidate, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.parts().find_map(|p| p.text.as_deref())
    }

    /// First inline media blob whose MIME type starts with `mime_prefix`.
    pub fn first_inline_data(&self, mime_prefix: &str) -> Option<&Blob> {
        self.parts().find_map(|p| {
            p.inline_data
                .as_ref()
                .filter(|b| b.mime_type.starts_with(mime_prefix))
        })
    }

    /// Word timepoints of the first candidate, if the model returned any.
    pub fn first_timepoints(&self) -> Option<&[Timepoint]> {
        self.parts()
            .find_map(|p| p.timepoints.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_data_uri_round_trip() {
        let blob = Blob::new("image/png", "aGVsbG8=");
        let uri = blob.to_data_uri();
        assert_eq!(uri, "data:image/png;base64,aGVsbG8=");

        let parsed = Blob::from_data_uri(&uri).unwrap();
        assert_eq!(parsed.mime_type, "image/png");
        assert_eq!(parsed.data, "aGVsbG8=");
        assert_eq!(parsed.decode().unwrap(), b"hello");
    }

    #[test]
    fn blob_rejects_malformed_uris() {
        assert!(Blob::from_data_uri("image/png;base64,abc").is_err());
        assert!(Blob::from_data_uri("data:image/png,abc").is_err());
        assert!(Blob::from_data_uri("data:;base64,abc").is_err());
    }

    #[test]
    fn request_serializes_camel_case_media_fields() {
        let request = GenerateContentRequest::from_parts(vec![
            Part::text("describe this".to_string()),
            Part::inline(Blob::new("image/jpeg", "Zm9v")),
        ])
        .with_generation_config(GenerationConfig::json());

        let json = serde_json::to_value(&request).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "describe this");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(
            json["generation_config"]["response_mime_type"],
            "application/json"
        );
    }

    #[test]
    fn audio_config_carries_voice_and_timepoint_flag() {
        let config = GenerationConfig::audio("Algenib", true);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(
            json["response_modalities"],
            serde_json::json!(["AUDIO", "TEXT"])
        );
        assert_eq!(
            json["speech_config"]["voiceConfig"]["prebuiltVoiceConfig"]["voiceName"],
            "Algenib"
        );
        assert_eq!(json["speech_config"]["enableTimepoints"], true);
    }

    #[test]
    fn response_extraction_helpers() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "inlineData": { "mimeType": "audio/L16;rate=24000", "data": "AAA=" } },
                        { "text": "done" },
                        { "timepoints": [{ "word": "done", "startTime": 0.0, "endTime": 0.4 }] }
                    ]
                }
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(raw).unwrap();

        assert_eq!(response.first_text(), Some("done"));
        assert!(response.first_inline_data("audio/").is_some());
        assert!(response.first_inline_data("image/").is_none());
        assert_eq!(response.first_timepoints().unwrap()[0].word, "done");
    }

    #[test]
    fn empty_response_extracts_nothing() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(response.first_text().is_none());
        assert!(response.first_inline_data("audio/").is_none());
        assert!(response.first_timepoints().is_none());
    }
}
