use serde::{Deserialize, Serialize};

use studymate_core::types::{GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, Timepoint};

use crate::error::{require_non_empty, FlowError, FlowResult};
use crate::gateway::FlowGateway;
use crate::wav;

/// Output contract for plain text-to-speech
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextToSpeechOutput {
    /// The audio as a `data:audio/wav;base64,...` URI.
    pub media: String,
}

/// Output contract for text-to-speech with word-level timing marks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioWithTimingsOutput {
    pub audio_data_uri: String,
    pub timepoints: Vec<Timepoint>,
}

/// Pulls the PCM payload out of a speech response and frames it as a WAV
/// data URI. Empty media is a generation failure.
fn wav_media(response: &GenerateContentResponse) -> FlowResult<String> {
    let blob = response
        .first_inline_data("audio/")
        .ok_or_else(|| FlowError::Generation("No media returned from TTS model".to_string()))?;

    let pcm = blob
        .decode()
        .map_err(|e| FlowError::Generation(format!("Undecodable TTS media: {}", e)))?;
    if pcm.is_empty() {
        return Err(FlowError::Generation(
            "TTS model returned empty media".to_string(),
        ));
    }

    Ok(wav::pcm_to_wav_data_uri(&pcm))
}

impl FlowGateway {
    /// Convert text to speech, returning a playable WAV data URI.
    pub async fn text_to_speech(&self, text: &str) -> FlowResult<TextToSpeechOutput> {
        require_non_empty(text, "text")?;

        let request = GenerateContentRequest::from_parts(vec![Part::text(text.to_string())])
            .with_generation_config(GenerationConfig::audio(&self.models().speech_voice, false));
        let response = self.dispatch(&self.models().speech_model, &request).await?;

        Ok(TextToSpeechOutput {
            media: wav_media(&response)?,
        })
    }

    /// Convert text to speech with word-level timepoints.
    ///
    /// Audio without timing data is not a valid output for this variant;
    /// the whole call fails rather than partially succeeding.
    pub async fn audio_with_timings(&self, text: &str) -> FlowResult<AudioWithTimingsOutput> {
        require_non_empty(text, "text")?;

        let request = GenerateContentRequest::from_parts(vec![Part::text(text.to_string())])
            .with_generation_config(GenerationConfig::audio(&self.models().speech_voice, true));
        let response = self.dispatch(&self.models().speech_model, &request).await?;

        let timepoints = response
            .first_timepoints()
            .ok_or_else(|| {
                FlowError::Generation("TTS model returned no timepoints".to_string())
            })?
            .to_vec();

        Ok(AudioWithTimingsOutput {
            audio_data_uri: wav_media(&response)?,
            timepoints,
        })
    }
}
