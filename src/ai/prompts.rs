//! Prompt templates sent to the completion backend.

/// Section headings every plain report is asked to contain, in order.
pub const REPORT_SECTIONS: [&str; 8] = [
    "Executive Summary",
    "Introduction and Background",
    "Current State Analysis",
    "Key Findings and Insights",
    "Challenges and Opportunities",
    "Future Trends and Predictions",
    "Recommendations",
    "Conclusion",
];

pub const NO_CONTEXT: &str = "No additional context provided";
pub const NO_MEMORY: &str = "No user memory available";
pub const NO_HISTORY: &str = "No conversation history available";

fn numbered_sections() -> String {
    REPORT_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, section)| format!("{}. {}", i + 1, section))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt for a plain report on `topic`.
pub fn basic_report_prompt(topic: &str) -> String {
    format!(
        r#"You are a professional research analyst creating detailed reports.

Create a comprehensive, detailed research report on the topic: "{topic}"

The report should include:
{sections}

Make the report professional, well-structured, and informative.
Use clear headings for each section (end each heading with a colon).
Provide detailed explanations and analysis.
The report should be suitable for business or academic purposes.
Include specific examples and data points where relevant."#,
        topic = topic,
        sections = numbered_sections(),
    )
}

/// Prompt for a report that folds in caller context and the user's
/// previous interests.
pub fn enhanced_report_prompt(topic: &str, context: &str, memory: &str) -> String {
    format!(
        r#"Create a comprehensive, enhanced research report on "{topic}" that incorporates the provided context and user preferences.

Additional Context: {context}
User Memory/Preferences: {memory}

The report should be structured as follows:

# Executive Summary
Provide a concise overview of key findings and recommendations.

# Introduction and Background
- Define the topic and its significance
- Historical context and evolution
- Current market landscape

# Detailed Analysis
- Current state and trends
- Key players and market dynamics
- Technological developments
- Regulatory environment

# Strategic Insights
- Opportunities and challenges
- Risk assessment
- Competitive analysis

# Future Outlook
- Emerging trends and predictions
- Market projections
- Technology roadmap

# Recommendations
- Strategic recommendations
- Implementation roadmap
- Success metrics

# Conclusion
Summarize key takeaways and next steps.

Make the report professional, data-driven, and actionable. Include specific examples and case studies where relevant."#
    )
}

/// Prompt for a report personalised from the shared conversation history.
pub fn history_report_prompt(topic: &str, history: &str, user_id: i64) -> String {
    format!(
        r#"Create a personalized research report on "{topic}" based on the user's conversation history and preferences.

User ID: {user_id}
Recent Conversation History: {history}

The report should be tailored to the user's interests and previous interactions. Include:

# Personalized Executive Summary
Address the user's specific interests and concerns.

# Contextual Introduction
Frame the topic in relation to the user's previous interests.

# Customized Analysis
Focus on aspects that align with the user's preferences.

# Personalized Recommendations
Provide recommendations that consider the user's context and history.

# Actionable Next Steps
Suggest specific actions based on the user's profile.

Make the report feel personalized and relevant to this specific user."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt_requests_all_sections() {
        let prompt = basic_report_prompt("Quantum Computing");

        assert!(prompt.contains("\"Quantum Computing\""));
        for (i, section) in REPORT_SECTIONS.iter().enumerate() {
            assert!(prompt.contains(&format!("{}. {}", i + 1, section)));
        }
    }

    #[test]
    fn test_enhanced_prompt_embeds_context_and_memory() {
        let prompt = enhanced_report_prompt("Solar Power", "focus on Europe", "Interested in: Wind");

        assert!(prompt.contains("\"Solar Power\""));
        assert!(prompt.contains("Additional Context: focus on Europe"));
        assert!(prompt.contains("User Memory/Preferences: Interested in: Wind"));
    }

    #[test]
    fn test_history_prompt_embeds_user_and_history() {
        let prompt = history_report_prompt("Fintech", "human: Generated report on: Banking", 9);

        assert!(prompt.contains("User ID: 9"));
        assert!(prompt.contains("Recent Conversation History: human: Generated report on: Banking"));
    }
}
