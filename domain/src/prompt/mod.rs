//! Prompt domain
//!
//! Templates for the case prompt, round prompts and judge framing.

mod template;

pub use template::PromptTemplate;
