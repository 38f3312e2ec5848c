//! Prompt templates for the capability handlers.
//!
//! Each function renders one natural-language prompt; structured-output
//! capabilities append the JSON shape the model must reply with.

pub fn summarize_document(document_content: &str) -> String {
    format!(
        "You are an expert at summarizing text. Your goal is to provide a clear and concise \
         summary of the following document. The summary should capture the key points and main \
         ideas, making it easier for a student to learn the material quickly.\n\n\
         Document to Summarize:\n{}\n\n\
         Please provide a summary of the document.",
        document_content
    )
}

pub fn generate_mcq(
    num_questions: u32,
    document_content: Option<&str>,
    has_image: bool,
    topic: Option<&str>,
) -> String {
    let mut prompt = format!(
        "You are an expert teacher creating a quiz for a student. Based on the document, image, \
         or topic provided, generate {} multiple-choice questions to test their understanding. \
         Each question should have 4 options.\n",
        num_questions
    );

    if let Some(content) = document_content {
        prompt.push_str(&format!("\nDocument Content:\n{}\n", content));
    }
    if has_image {
        prompt.push_str("\nImage Content: see the attached image.\n");
    }
    if let Some(topic) = topic {
        prompt.push_str(&format!("\nTopic:\n{}\n", topic));
    }

    prompt.push_str(&format!(
        "\nPlease generate {} questions. For each question, provide the question text, 4 \
         options, and the index of the correct answer. Respond with a single JSON object of the \
         form {{\"questions\": [{{\"question\": string, \"options\": [string, string, string, \
         string], \"correctAnswerIndex\": number}}]}}.",
        num_questions
    ));

    prompt
}

pub fn suggest_videos(subject: &str) -> String {
    format!(
        "You are an AI assistant that helps students find relevant YouTube videos for their \
         studies. Based on the subject provided, suggest 3 to 5 helpful YouTube videos. For each \
         video, provide a potential title, a likely YouTube channel, and a brief reason for the \
         recommendation.\n\n\
         Subject: {}\n\n\
         Generate a list of video suggestions. Respond with a single JSON object of the form \
         {{\"videos\": [{{\"title\": string, \"channel\": string, \"reason\": string}}]}}.",
        subject
    )
}

pub fn weekly_feedback(
    completed_tasks: &str,
    missed_tasks: &str,
    study_time: &str,
    difficulty_levels: &str,
) -> String {
    format!(
        "You are an AI study assistant. Analyze the following data about a student's study \
         habits this week and generate a personalized report with suggestions for improvement.\n\n\
         Completed Tasks: {}\n\
         Missed Tasks: {}\n\
         Study Time: {}\n\
         Difficulty Levels: {}\n\n\
         Based on this information, provide a concise report that includes:\n\
         - An overview of the student's performance this week.\n\
         - Specific areas where the student excelled.\n\
         - Areas where the student needs to improve.\n\
         - Actionable suggestions for optimizing their study strategy next week.\n\n\
         Example: 'You completed 68% of your weekly plan. You should focus more on Math next \
         week. Consider breaking down complex tasks into smaller steps.'",
        completed_tasks, missed_tasks, study_time, difficulty_levels
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcq_prompt_includes_only_present_sections() {
        let prompt = generate_mcq(5, Some("the cell"), false, None);
        assert!(prompt.contains("Document Content:\nthe cell"));
        assert!(!prompt.contains("Topic:"));
        assert!(!prompt.contains("Image Content"));
        assert!(prompt.contains("generate 5 multiple-choice questions"));
        assert!(prompt.contains("correctAnswerIndex"));
    }

    #[test]
    fn weekly_feedback_prompt_interpolates_all_fields() {
        let prompt = weekly_feedback("Math HW", "None", "5h", "Medium");
        assert!(prompt.contains("Completed Tasks: Math HW"));
        assert!(prompt.contains("Missed Tasks: None"));
        assert!(prompt.contains("Study Time: 5h"));
        assert!(prompt.contains("Difficulty Levels: Medium"));
    }
}
