//! Presentation layer for jury-llm
//!
//! This crate contains the CLI definition, panel seat parsing, the live
//! console observer and the final outcome formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, DetectionArg, OutputFormat};
pub use cli::seat::{SeatError, parse_judge, parse_panel, parse_participant};
pub use output::console::ConsoleObserver;
pub use output::formatter::OutcomeFormatter;
