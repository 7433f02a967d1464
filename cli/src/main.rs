//! CLI entrypoint for jury-llm
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use jury_application::{
    DiscussionObserver, NoObserver, NoTranscript, Participant, RunDiscussionInput,
    RunDiscussionUseCase, TranscriptLogger,
};
use jury_domain::{CaseStudy, DiscussionSettings, JudgeSpec, ParticipantSpec, validate_panel};
use jury_infrastructure::{
    BackendFactory, ConfigLoader, FileConfig, FileOutputFormat, JsonlTranscriptLogger,
};
use jury_presentation::{
    Cli, ConsoleObserver, OutcomeFormatter, OutputFormat, parse_judge, parse_panel,
};
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())?
    };

    if cli.show_config {
        for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
            println!("{}", line);
        }
        println!();
        println!("{}", toml::to_string_pretty(&config).context("Failed to render configuration")?);
        return Ok(ExitCode::SUCCESS);
    }

    for issue in ConfigLoader::check(&config)? {
        warn!("{}", issue);
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    let settings = resolve_settings(&cli, &config);
    let panel = resolve_panel(&cli, &config)?;
    let judge_spec = resolve_judge(&cli, &config)?;
    validate_panel(&panel, &judge_spec).context("Invalid panel")?;
    let case = read_case(&cli).await?;

    let format = cli.output.unwrap_or(match config.output.format {
        FileOutputFormat::Text => OutputFormat::Text,
        FileOutputFormat::Json => OutputFormat::Json,
    });

    // === Dependency Injection ===
    let mut factory = BackendFactory::new(config.providers.clone());
    let mut participants = Vec::with_capacity(panel.len());
    for spec in &panel {
        let backend = factory
            .backend_for(spec.provider)
            .with_context(|| format!("Cannot create backend for {}", spec.name))?;
        participants.push(Participant::from_spec(spec, backend));
    }
    let backend = factory
        .backend_for(judge_spec.participant.provider)
        .with_context(|| format!("Cannot create backend for {}", judge_spec.participant.name))?;
    let judge = Participant::from_judge_spec(&judge_spec, backend);

    let show_progress = config.output.show_progress && !cli.quiet;
    let observer: Arc<dyn DiscussionObserver> = match (cli.quiet, format) {
        (true, _) => Arc::new(NoObserver),
        (false, OutputFormat::Text) => Arc::new(ConsoleObserver::stdout(show_progress)),
        // stdout is reserved for the JSON document
        (false, OutputFormat::Json) => {
            Arc::new(ConsoleObserver::new(Box::new(std::io::sink()), show_progress))
        }
    };

    let transcript: Arc<dyn TranscriptLogger> =
        match cli.transcript.as_ref().or(config.output.transcript.as_ref()) {
            Some(path) => Arc::new(JsonlTranscriptLogger::create(path).with_context(|| {
                format!("Cannot create transcript file {}", path.display())
            })?),
            None => Arc::new(NoTranscript),
        };

    // Ctrl-C stops the discussion at the next fragment boundary
    let cancellation = CancellationToken::new();
    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted; stopping discussion");
            signal_token.cancel();
        }
    });

    if format == OutputFormat::Text && !cli.quiet {
        print_header(&case, &panel, &judge_spec);
    }

    info!("Starting jury-llm");
    let use_case = RunDiscussionUseCase::new(participants, judge)?
        .with_observer(observer)
        .with_transcript(transcript)
        .with_cancellation(cancellation);
    let outcome = use_case
        .execute(RunDiscussionInput::new(case.clone(), settings))
        .await?;

    let output = match format {
        OutputFormat::Text => OutcomeFormatter::format_summary(&outcome, cli.quiet),
        OutputFormat::Json => OutcomeFormatter::format_json(&case, &outcome),
    };
    println!("{}", output);

    if outcome.conclusion.is_cancelled() {
        return Ok(ExitCode::from(130));
    }
    Ok(ExitCode::SUCCESS)
}

fn resolve_settings(cli: &Cli, config: &FileConfig) -> DiscussionSettings {
    let (mut settings, _) = config.parse_settings();
    if let Some(max_rounds) = cli.max_rounds {
        settings = settings.with_max_rounds(max_rounds);
    }
    if let Some(mode) = cli.verdict_detection {
        settings = settings.with_verdict_detection(mode.into());
    }
    settings
}

/// Participants given on the command line replace the configured panel
fn resolve_panel(cli: &Cli, config: &FileConfig) -> Result<Vec<ParticipantSpec>> {
    if cli.participants.is_empty() {
        return Ok(config.parse_participants().0);
    }
    Ok(parse_panel(cli.participants.as_slice())?)
}

fn resolve_judge(cli: &Cli, config: &FileConfig) -> Result<JudgeSpec> {
    match &cli.judge {
        Some(spec) => Ok(parse_judge(spec, config.judge.verdict_threshold)?),
        None => config.parse_judge().0.context("No judge configured"),
    }
}

async fn read_case(cli: &Cli) -> Result<CaseStudy> {
    let text = match (&cli.case, &cli.case_file) {
        (Some(case), _) => case.clone(),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read case file {}", path.display()))?,
        (None, None) => bail!("A case is required. Pass it as an argument or use --case-file."),
    };
    Ok(CaseStudy::new(text)?)
}

fn print_header(case: &CaseStudy, panel: &[ParticipantSpec], judge: &JudgeSpec) {
    use colored::Colorize;

    let line = "=".repeat(60);
    println!("{}", line.cyan());
    println!("{:^60}", "LLM Jury".bold());
    println!("{}", line.cyan());
    println!();
    println!("{} {}", "Case:".cyan().bold(), case);
    println!(
        "{} {}",
        "Panel:".cyan().bold(),
        panel
            .iter()
            .map(|p| format!("{} ({}:{})", p.name, p.provider, p.model))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "{} {} ({}:{})",
        "Judge:".cyan().bold(),
        judge.participant.name,
        judge.participant.provider,
        judge.participant.model
    );
}
