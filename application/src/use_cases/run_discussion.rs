//! Run Discussion use case
//!
//! Orchestrates the full jury discussion: opening statements, bounded
//! rounds with a judge poll after each, and the forced final verdict when
//! the judge never signals one.

use crate::participant::Participant;
use crate::ports::backend::BackendError;
use crate::ports::observer::{DiscussionObserver, NoObserver, Speaker};
use crate::ports::transcript::{NoTranscript, TranscriptEvent, TranscriptLogger};
use crate::use_cases::stream_consumer::StreamConsumer;
use jury_domain::{
    CaseStudy, Conclusion, DiscussionHistory, DiscussionOutcome, DiscussionPhase,
    DiscussionSettings, DomainError, Message, PromptTemplate, VerdictDetector,
    ensure_unique_names,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort a discussion
#[derive(Error, Debug)]
pub enum RunDiscussionError {
    #[error("Invalid discussion configuration: {0}")]
    InvalidConfiguration(#[from] DomainError),

    #[error("Backend error from '{participant}': {source}")]
    Backend {
        participant: String,
        #[source]
        source: BackendError,
    },
}

/// Input for the RunDiscussion use case
#[derive(Debug, Clone)]
pub struct RunDiscussionInput {
    pub case: CaseStudy,
    pub settings: DiscussionSettings,
}

impl RunDiscussionInput {
    pub fn new(case: CaseStudy, settings: DiscussionSettings) -> Self {
        Self { case, settings }
    }
}

/// Use case for running one discussion.
///
/// `execute` consumes the use case: participants carry the private
/// context of this discussion and cannot be reused for another.
pub struct RunDiscussionUseCase {
    participants: Vec<Participant>,
    judge: Participant,
    observer: Arc<dyn DiscussionObserver>,
    transcript: Arc<dyn TranscriptLogger>,
    cancellation: Option<CancellationToken>,
}

impl RunDiscussionUseCase {
    /// Build the use case, rejecting panels whose speaker names collide.
    pub fn new(participants: Vec<Participant>, judge: Participant) -> Result<Self, RunDiscussionError> {
        if !judge.is_judge() {
            return Err(DomainError::InvalidParticipant(format!(
                "'{}' was not created as a judge",
                judge.name()
            ))
            .into());
        }
        if let Some(p) = participants.iter().find(|p| p.is_judge()) {
            return Err(DomainError::InvalidParticipant(format!(
                "'{}' is a judge and cannot sit on the panel",
                p.name()
            ))
            .into());
        }
        ensure_unique_names(
            participants
                .iter()
                .map(Participant::name)
                .chain(std::iter::once(judge.name())),
        )?;

        Ok(Self {
            participants,
            judge,
            observer: Arc::new(NoObserver),
            transcript: Arc::new(NoTranscript),
            cancellation: None,
        })
    }

    pub fn with_observer(mut self, observer: Arc<dyn DiscussionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_transcript(mut self, transcript: Arc<dyn TranscriptLogger>) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Run the discussion to its conclusion.
    ///
    /// Cancellation is not an error: the outcome reports
    /// [`Conclusion::Cancelled`] with whatever history was gathered.
    pub async fn execute(
        self,
        input: RunDiscussionInput,
    ) -> Result<DiscussionOutcome, RunDiscussionError> {
        let RunDiscussionUseCase {
            mut participants,
            mut judge,
            observer,
            transcript,
            cancellation,
        } = self;

        info!(
            participants = participants.len(),
            judge = %judge.name(),
            max_rounds = input.settings.max_rounds,
            verdict_detection = %input.settings.verdict_detection,
            "Starting discussion"
        );
        if participants.is_empty() {
            warn!("No participants configured; only the judge will speak");
        }
        if let Some(threshold) = judge.verdict_threshold() {
            debug!(threshold, "Verdict threshold is advisory");
        }

        let mut run = DiscussionRun::new(observer.as_ref(), transcript.as_ref(), cancellation.as_ref());
        let result = run
            .drive(&mut participants, &mut judge, &input.case, &input.settings)
            .await;

        match result {
            Ok(conclusion) => Ok(run.finish(conclusion, judge.name())),
            Err(e) => {
                warn!(
                    messages = run.history.len(),
                    rounds_completed = run.rounds_completed,
                    "Discussion aborted: {}",
                    e
                );
                Err(e)
            }
        }
    }
}

/// Outcome of a single turn
enum Turn {
    Spoke { verdict: bool },
    /// Stopped by cancellation; `verdict` is set when the reply read so far
    /// already carried the sentinel
    Cancelled { verdict: bool },
}

/// Mutable state of one discussion run
struct DiscussionRun<'a> {
    history: DiscussionHistory,
    phase: DiscussionPhase,
    rounds_completed: u32,
    observer: &'a dyn DiscussionObserver,
    transcript: &'a dyn TranscriptLogger,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a> DiscussionRun<'a> {
    fn new(
        observer: &'a dyn DiscussionObserver,
        transcript: &'a dyn TranscriptLogger,
        cancellation: Option<&'a CancellationToken>,
    ) -> Self {
        Self {
            history: DiscussionHistory::new(),
            phase: DiscussionPhase::Initializing,
            rounds_completed: 0,
            observer,
            transcript,
            cancellation,
        }
    }

    async fn drive(
        &mut self,
        participants: &mut [Participant],
        judge: &mut Participant,
        case: &CaseStudy,
        settings: &DiscussionSettings,
    ) -> Result<Conclusion, RunDiscussionError> {
        self.enter(DiscussionPhase::Initializing);
        let case_prompt = PromptTemplate::case_prompt(case.content());
        self.record(Message::system(case_prompt.as_str()));

        self.enter(DiscussionPhase::BroadcastingInitial);
        for participant in participants.iter_mut() {
            if let Turn::Cancelled { .. } = self.take_turn(participant, &case_prompt, None).await? {
                return Ok(Conclusion::Cancelled);
            }
        }

        for round in 1..=settings.max_rounds {
            self.enter(DiscussionPhase::InRound(round));
            for participant in participants.iter_mut() {
                let context = self.history.render_recent(settings.round_context_window);
                let prompt = PromptTemplate::round_prompt(&context);
                if let Turn::Cancelled { .. } = self.take_turn(participant, &prompt, None).await? {
                    return Ok(Conclusion::Cancelled);
                }
            }

            self.enter(DiscussionPhase::PollingJudge(round));
            let discussion = self.history.render_all();
            let mut detector = VerdictDetector::new(settings.verdict_detection);
            let (verdict, cancelled) =
                match self.take_turn(judge, &discussion, Some(&mut detector)).await? {
                    Turn::Spoke { verdict } => (verdict, false),
                    Turn::Cancelled { verdict } => (verdict, true),
                };
            if cancelled && !verdict {
                return Ok(Conclusion::Cancelled);
            }
            self.rounds_completed = round;

            if verdict {
                info!(round, judge = %judge.name(), "Judge reached a verdict");
                self.observer.on_verdict(judge.name(), round);
                return Ok(Conclusion::Verdict { round });
            }
        }

        self.enter(DiscussionPhase::Concluding);
        let request = PromptTemplate::final_verdict_request(&self.history.render_all());
        if let Turn::Cancelled { .. } = self.take_turn(judge, &request, None).await? {
            return Ok(Conclusion::Cancelled);
        }
        Ok(Conclusion::ForcedVerdict)
    }

    /// Prompt one speaker, stream the reply, and record it.
    async fn take_turn(
        &mut self,
        participant: &mut Participant,
        prompt: &str,
        detector: Option<&mut VerdictDetector>,
    ) -> Result<Turn, RunDiscussionError> {
        if self.is_cancelled() {
            debug!(participant = %participant.name(), "Skipping turn after cancellation");
            return Ok(Turn::Cancelled { verdict: false });
        }

        let name = participant.name().to_string();
        let speaker = if participant.is_judge() {
            Speaker::Judge
        } else {
            Speaker::Participant
        };
        info!(participant = %name, phase = %self.phase, "Turn started");
        debug!(participant = %name, prompt_chars = prompt.len(), "Prompt built");
        self.observer.on_turn_start(&name, speaker);

        let opened = match self.cancellation {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => None,
                result = participant.produce(prompt) => Some(result),
            },
            None => Some(participant.produce(prompt).await),
        };
        let handle = match opened {
            Some(Ok(handle)) => handle,
            Some(Err(source)) => {
                self.observer.on_turn_end(&name);
                return Err(RunDiscussionError::Backend {
                    participant: name,
                    source,
                });
            }
            None => {
                self.observer.on_turn_end(&name);
                return Ok(Turn::Cancelled { verdict: false });
            }
        };

        let consumer = StreamConsumer::new(self.observer, self.cancellation);
        let result = consumer.consume(&name, handle, detector).await;
        self.observer.on_turn_end(&name);
        let output = result.map_err(|source| RunDiscussionError::Backend {
            participant: name.clone(),
            source,
        })?;

        if output.cancelled {
            info!(participant = %name, chars = output.text.len(), "Turn cancelled");
            if !output.text.is_empty() {
                participant.record_reply(output.text.as_str());
                self.record(Message::assistant_from(name, output.text));
            }
            return Ok(Turn::Cancelled {
                verdict: output.verdict,
            });
        }

        participant.record_reply(output.text.as_str());
        self.record(Message::assistant_from(name, output.text));
        Ok(Turn::Spoke {
            verdict: output.verdict,
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.is_some_and(CancellationToken::is_cancelled)
    }

    fn enter(&mut self, phase: DiscussionPhase) {
        self.phase = phase;
        debug!(phase = %phase, "Entering phase");
        self.observer.on_phase(&phase);
        self.transcript.log(TranscriptEvent::new(
            "phase",
            json!({
                "phase": phase.as_str(),
                "round": phase.round(),
            }),
        ));
    }

    fn record(&mut self, message: Message) {
        self.transcript.log(TranscriptEvent::new(
            "message",
            json!({
                "index": self.history.len(),
                "phase": self.phase.as_str(),
                "role": message.role().as_str(),
                "author": message.author(),
                "content": message.content(),
            }),
        ));
        self.history.append(message);
    }

    fn finish(mut self, conclusion: Conclusion, judge: &str) -> DiscussionOutcome {
        self.enter(DiscussionPhase::Done);
        info!(
            ?conclusion,
            rounds_completed = self.rounds_completed,
            messages = self.history.len(),
            "Discussion finished"
        );
        self.transcript.log(TranscriptEvent::new(
            "conclusion",
            json!({
                "conclusion": conclusion,
                "rounds_completed": self.rounds_completed,
                "messages": self.history.len(),
            }),
        ));
        DiscussionOutcome::new(conclusion, self.rounds_completed, judge, self.history)
    }
}
