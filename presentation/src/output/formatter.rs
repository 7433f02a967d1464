//! Final outcome rendering

use colored::Colorize;
use jury_domain::{CaseStudy, Conclusion, DiscussionOutcome};
use serde_json::json;

/// Formats a finished discussion for the terminal or as JSON
pub struct OutcomeFormatter;

impl OutcomeFormatter {
    /// One-line description of how the discussion ended
    pub fn describe_conclusion(outcome: &DiscussionOutcome) -> String {
        match outcome.conclusion {
            Conclusion::Verdict { round } => format!("Verdict reached in round {}", round),
            Conclusion::ForcedVerdict => format!(
                "No verdict after {} round{}; final verdict requested",
                outcome.rounds_completed,
                if outcome.rounds_completed == 1 { "" } else { "s" }
            ),
            Conclusion::Cancelled => format!(
                "Discussion cancelled after {} completed round{}",
                outcome.rounds_completed,
                if outcome.rounds_completed == 1 { "" } else { "s" }
            ),
        }
    }

    /// Summary block printed after the discussion.
    ///
    /// With `include_verdict` the judge's last message is repeated, for
    /// runs where the discussion was not streamed.
    pub fn format_summary(outcome: &DiscussionOutcome, include_verdict: bool) -> String {
        let line = "=".repeat(60);
        let mut output = format!("\n{}\n", line.cyan());

        let conclusion = Self::describe_conclusion(outcome);
        let conclusion = if outcome.conclusion.is_cancelled() {
            conclusion.yellow().bold()
        } else {
            conclusion.green().bold()
        };
        output.push_str(&format!("{}\n", conclusion));
        output.push_str(&format!(
            "{} {}   {} {}\n",
            "Judge:".cyan().bold(),
            outcome.judge,
            "Messages:".cyan().bold(),
            outcome.history.len()
        ));

        if include_verdict {
            match outcome.final_verdict() {
                Some(verdict) => output.push_str(&format!("\n{}\n", verdict.content())),
                None => output.push_str(&format!("\n{}\n", "(the judge did not speak)".dimmed())),
            }
        }

        output.push_str(&format!("{}\n", line.cyan()));
        output
    }

    pub fn to_json(case: &CaseStudy, outcome: &DiscussionOutcome) -> serde_json::Value {
        json!({
            "case": case.content(),
            "conclusion": outcome.conclusion,
            "rounds_completed": outcome.rounds_completed,
            "judge": outcome.judge,
            "final_verdict": outcome.final_verdict().map(|m| m.content()),
            "history": outcome.history,
        })
    }

    pub fn format_json(case: &CaseStudy, outcome: &DiscussionOutcome) -> String {
        serde_json::to_string_pretty(&Self::to_json(case, outcome))
            .unwrap_or_else(|_| "{}".to_string())
    }
}
