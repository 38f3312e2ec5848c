//! Thin forwarding actions for the AI capabilities: decode the input
//! contract, invoke the gateway once, return the typed output. Failures
//! collapse through `ApiError`.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use studymate_flows::{
    grade_quiz, AudioWithTimingsOutput, GenerateMcqInput, GenerateMcqOutput, McqQuestion,
    QuizAnswer, QuizGrade, SuggestVideosInput, SuggestVideosOutput, SummarizeDocumentInput,
    SummarizeDocumentOutput, TextToSpeechOutput, WeeklyFeedbackInput, WeeklyFeedbackOutput,
};

use crate::error::ApiError;
use crate::state::AppState;

pub async fn summarize(
    State(state): State<AppState>,
    Json(input): Json<SummarizeDocumentInput>,
) -> Result<Json<SummarizeDocumentOutput>, ApiError> {
    let output = state.gateway.summarize_document(&input).await?;
    Ok(Json(output))
}

pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(input): Json<GenerateMcqInput>,
) -> Result<Json<GenerateMcqOutput>, ApiError> {
    let output = state.gateway.generate_mcq(&input).await?;
    Ok(Json(output))
}

pub async fn suggest_videos(
    State(state): State<AppState>,
    Json(input): Json<SuggestVideosInput>,
) -> Result<Json<SuggestVideosOutput>, ApiError> {
    let output = state.gateway.suggest_videos(&input).await?;
    Ok(Json(output))
}

/// Request body for the speech actions
#[derive(Debug, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
}

pub async fn text_to_speech(
    State(state): State<AppState>,
    Json(input): Json<SpeechRequest>,
) -> Result<Json<TextToSpeechOutput>, ApiError> {
    let output = state.gateway.text_to_speech(&input.text).await?;
    Ok(Json(output))
}

pub async fn speech_with_timings(
    State(state): State<AppState>,
    Json(input): Json<SpeechRequest>,
) -> Result<Json<AudioWithTimingsOutput>, ApiError> {
    let output = state.gateway.audio_with_timings(&input.text).await?;
    Ok(Json(output))
}

pub async fn weekly_feedback(
    State(state): State<AppState>,
    Json(input): Json<WeeklyFeedbackInput>,
) -> Result<Json<WeeklyFeedbackOutput>, ApiError> {
    let output = state.gateway.weekly_feedback(&input).await?;
    Ok(Json(output))
}

/// Request body for local quiz grading
#[derive(Debug, Deserialize)]
pub struct GradeQuizRequest {
    pub questions: Vec<McqQuestion>,
    pub answers: Vec<QuizAnswer>,
}

/// Local scoring only; nothing here reaches the model.
pub async fn grade(
    Json(request): Json<GradeQuizRequest>,
) -> Result<Json<QuizGrade>, ApiError> {
    let grade = grade_quiz(&request.questions, &request.answers)?;
    Ok(Json(grade))
}
