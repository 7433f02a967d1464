//! CLI command definitions

use clap::{Parser, ValueEnum};
use jury_domain::VerdictDetection;
use std::path::PathBuf;

/// Output format for the discussion outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Streamed discussion followed by a verdict summary
    Text,
    /// A single JSON document with the full history
    Json,
}

/// How the judge's reply is scanned for the verdict sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DetectionArg {
    /// Any streamed fragment starting with VERDICT:
    Fragment,
    /// The reply as a whole starting with VERDICT:
    Message,
}

impl From<DetectionArg> for VerdictDetection {
    fn from(arg: DetectionArg) -> Self {
        match arg {
            DetectionArg::Fragment => VerdictDetection::PerFragment,
            DetectionArg::Message => VerdictDetection::MessagePrefix,
        }
    }
}

/// CLI arguments for jury-llm
#[derive(Parser, Debug)]
#[command(name = "jury")]
#[command(author, version, about = "LLM jury - A panel of models discusses a case until a judge reaches a verdict")]
#[command(long_about = r#"
jury runs a panel of LLM participants through a moderated discussion of a case.

The discussion proceeds as:
1. Opening statements: every participant answers the case
2. Rounds: each participant responds to the most recent exchanges,
   then the judge reviews the whole discussion
3. Verdict: the judge opens a reply with VERDICT: and the discussion stops,
   or the round budget runs out and the judge is asked for a final verdict

Configuration files are loaded from (in priority order):
1. JURY_* environment variables (e.g. JURY_DISCUSSION__MAX_ROUNDS=3)
2. --config <path>     Explicit config file
3. ./jury.toml         Project-level config
4. ~/.config/jury-llm/config.toml   Global config

Participant and judge SPECs take the form [name=][provider:]model, where
provider is ollama (default) or openai.

Example:
  jury "Is a hot dog a sandwich?"
  jury --case-file case.txt -r 3 -p llama3.2:3b -p qwen=qwen2.5:3b
  jury -p gpt=openai:gpt-4o-mini --judge "Judge=openai:gpt-4o" "Should we adopt a four-day week?"
"#)]
pub struct Cli {
    /// The case to discuss (or use --case-file)
    pub case: Option<String>,

    /// Read the case from a file
    #[arg(long, value_name = "PATH", conflicts_with = "case")]
    pub case_file: Option<PathBuf>,

    /// Maximum number of discussion rounds
    #[arg(short = 'r', long, value_name = "N")]
    pub max_rounds: Option<u32>,

    /// Panel member (can be specified multiple times; replaces the configured panel)
    #[arg(short, long = "participant", value_name = "SPEC")]
    pub participants: Vec<String>,

    /// The judge
    #[arg(long, value_name = "SPEC")]
    pub judge: Option<String>,

    /// Verdict sentinel detection mode
    #[arg(long, value_enum, value_name = "MODE")]
    pub verdict_detection: Option<DetectionArg>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write a JSONL transcript of the discussion
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress streaming output and progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
