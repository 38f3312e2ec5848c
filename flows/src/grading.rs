//! Local quiz scoring. Deterministic and stateless; nothing here talks to
//! the model.

use serde::{Deserialize, Serialize};

use crate::error::{FlowError, FlowResult};
use crate::quiz::McqQuestion;

pub const PASS_PERCENTAGE: f64 = 70.0;

/// A learner's selected option for one question
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub question_index: usize,
    pub selected_option: usize,
}

/// Result of grading one completed quiz
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizGrade {
    pub correct: usize,
    pub total: usize,
    pub score: f64,
    pub passed: bool,
}

impl QuizGrade {
    /// Score rounded for display.
    pub fn display_score(&self) -> i64 {
        self.score.round() as i64
    }
}

/// A score of exactly 70 passes.
pub fn is_passing(score: f64) -> bool {
    score >= PASS_PERCENTAGE
}

/// Grade a completed quiz against its questions.
///
/// Every question must be answered exactly once before a score is computed;
/// an incomplete, duplicated or out-of-range answer set is rejected locally
/// and never scored.
pub fn grade_quiz(questions: &[McqQuestion], answers: &[QuizAnswer]) -> FlowResult<QuizGrade> {
    if questions.is_empty() {
        return Err(FlowError::InputInvalid(
            "Cannot grade an empty quiz".to_string(),
        ));
    }

    let mut selected: Vec<Option<usize>> = vec![None; questions.len()];
    for answer in answers {
        let slot = selected.get_mut(answer.question_index).ok_or_else(|| {
            FlowError::InputInvalid(format!(
                "Answer references question {} outside the quiz",
                answer.question_index
            ))
        })?;
        if slot.is_some() {
            return Err(FlowError::InputInvalid(format!(
                "Duplicate answer for question {}",
                answer.question_index
            )));
        }
        if answer.selected_option >= questions[answer.question_index].options.len() {
            return Err(FlowError::InputInvalid(format!(
                "Selected option {} is out of range for question {}",
                answer.selected_option, answer.question_index
            )));
        }
        *slot = Some(answer.selected_option);
    }

    if selected.iter().any(Option::is_none) {
        return Err(FlowError::InputInvalid(
            "Please answer all questions before submitting".to_string(),
        ));
    }

    let total = questions.len();
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(i, question)| selected[*i] == Some(question.correct_answer_index))
        .count();
    let score = correct as f64 / total as f64 * 100.0;

    Ok(QuizGrade {
        correct,
        total,
        score,
        passed: is_passing(score),
    })
}
