//! Prompt templates for the discussion flow

use crate::discussion::verdict::VERDICT_SENTINEL;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Opening prompt sent to every participant and recorded as the system message
    pub fn case_prompt(case: &str) -> String {
        format!(
            r#"Please analyze and discuss the following case:

{}

Consider all relevant aspects and share your perspective.
Do not agree with points that do not make sense.
Engage with other participants' viewpoints respectfully.
Avoid personal or biased opinions.
Focus on the case context and its implications.
Do not make assumptions about the case.
Do not make things up.
Give your analysis in a clear and concise manner.
Keep discussion points short.
Always re-read the question before sharing your thoughts again."#,
            case
        )
    }

    /// Per-round prompt built from the most recent history entries
    pub fn round_prompt(context: &str) -> String {
        format!(
            "Based on the previous discussion:\n{}\nWhat are your thoughts?",
            context
        )
    }

    /// Evaluation framing wrapped around every prompt the judge receives
    pub fn judge_prompt(discussion: &str) -> String {
        format!(
            r#"As a judge, evaluate the following discussion and determine if a verdict can be reached.
Do not agree with things that do not make sense. Your job is to question everyone's opinion and stick to the truth.
Give feedback to course correct if needed. Always keep the case in mind before answering.
Consider:
1. Have all important aspects been discussed?
2. Is there enough information to make a decision?
3. Has the discussion reached a natural conclusion?

Discussion context:
{}

Respond with your analysis and whether you believe it's time for a verdict.
If it's time for a verdict, start your response with '{}'"#,
            discussion, VERDICT_SENTINEL
        )
    }

    /// Forced request once the round budget is spent
    pub fn final_verdict_request(discussion: &str) -> String {
        format!("{}\n\nPlease provide your final verdict now.", discussion)
    }
}
