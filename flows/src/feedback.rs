use serde::{Deserialize, Serialize};

use studymate_core::types::{GenerateContentRequest, Part};

use crate::error::{require_non_empty, FlowResult};
use crate::gateway::{require_text, FlowGateway};
use crate::prompts;

/// Input contract for the weekly feedback report.
///
/// Every field is required, including `missed_tasks` — a week with nothing
/// missed is expressed as a literal "None" by the aggregation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyFeedbackInput {
    pub completed_tasks: String,
    pub missed_tasks: String,
    pub study_time: String,
    pub difficulty_levels: String,
}

impl WeeklyFeedbackInput {
    pub fn validate(&self) -> FlowResult<()> {
        require_non_empty(&self.completed_tasks, "completedTasks")?;
        require_non_empty(&self.missed_tasks, "missedTasks")?;
        require_non_empty(&self.study_time, "studyTime")?;
        require_non_empty(&self.difficulty_levels, "difficultyLevels")?;
        Ok(())
    }
}

/// Output contract for the weekly feedback report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyFeedbackOutput {
    pub report: String,
}

impl FlowGateway {
    /// Generate a personalized weekly study report. Text in, text out.
    pub async fn weekly_feedback(
        &self,
        input: &WeeklyFeedbackInput,
    ) -> FlowResult<WeeklyFeedbackOutput> {
        input.validate()?;

        let prompt = prompts::weekly_feedback(
            &input.completed_tasks,
            &input.missed_tasks,
            &input.study_time,
            &input.difficulty_levels,
        );
        let request = GenerateContentRequest::from_parts(vec![Part::text(prompt)]);
        let response = self.dispatch(&self.models().text_model, &request).await?;

        let report = require_text(&response)?.to_string();
        Ok(WeeklyFeedbackOutput { report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FlowError;
    use crate::testing::{gateway_with, MockGenerator};

    fn input() -> WeeklyFeedbackInput {
        WeeklyFeedbackInput {
            completed_tasks: "Math HW".to_string(),
            missed_tasks: "None".to_string(),
            study_time: "5h".to_string(),
            difficulty_levels: "Medium".to_string(),
        }
    }

    #[tokio::test]
    async fn empty_missed_tasks_is_rejected_without_dispatch() {
        let mock = MockGenerator::text("report");
        let gateway = gateway_with(&mock);

        let mut bad = input();
        bad.missed_tasks = "".to_string();
        let err = gateway.weekly_feedback(&bad).await.unwrap_err();

        assert!(err.is_input_invalid());
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn returns_the_generated_report() {
        let mock = MockGenerator::text("You completed 68% of your weekly plan.");
        let gateway = gateway_with(&mock);

        let output = gateway.weekly_feedback(&input()).await.unwrap();

        assert_eq!(output.report, "You completed 68% of your weekly plan.");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn empty_reply_is_a_generation_failure() {
        let mock = MockGenerator::empty();
        let gateway = gateway_with(&mock);

        let err = gateway.weekly_feedback(&input()).await.unwrap_err();
        assert!(matches!(err, FlowError::Generation(_)));
    }
}
