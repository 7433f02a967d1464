//! Live console output for a running discussion

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use jury_application::{DiscussionObserver, Speaker};
use jury_domain::DiscussionPhase;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

struct ConsoleState {
    out: Box<dyn Write + Send>,
    spinner: Option<ProgressBar>,
    speaker: Speaker,
    /// Whether the current turn has printed its header yet
    header_written: bool,
}

/// Streams every fragment to the terminal as it arrives.
///
/// A spinner on stderr covers the wait before a speaker's first fragment;
/// the header line is printed lazily so it never interleaves with it.
pub struct ConsoleObserver {
    state: Mutex<ConsoleState>,
    show_progress: bool,
}

impl ConsoleObserver {
    pub fn new(out: Box<dyn Write + Send>, show_progress: bool) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                out,
                spinner: None,
                speaker: Speaker::Participant,
                header_written: false,
            }),
            show_progress,
        }
    }

    pub fn stdout(show_progress: bool) -> Self {
        Self::new(Box::new(std::io::stdout()), show_progress)
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn speaker_header(name: &str, speaker: Speaker) -> String {
        match speaker {
            Speaker::Participant => format!("\n{}\n", format!("── {} ──", name).blue().bold()),
            Speaker::Judge => format!("\n{}\n", format!("── {} ──", name).magenta().bold()),
        }
    }

    fn phase_header(phase: &DiscussionPhase) -> Option<String> {
        match phase {
            DiscussionPhase::BroadcastingInitial | DiscussionPhase::Concluding => {
                Some(format!("\n{}\n{}\n", phase.to_string().cyan().bold(), "-".repeat(40)))
            }
            DiscussionPhase::InRound(_) => {
                Some(format!("\n{}\n{}\n", phase.to_string().yellow().bold(), "-".repeat(40)))
            }
            _ => None,
        }
    }

    fn clear_spinner(state: &mut ConsoleState) {
        if let Some(spinner) = state.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn with_state(&self, f: impl FnOnce(&mut ConsoleState)) {
        if let Ok(mut state) = self.state.lock() {
            f(&mut state);
        }
    }
}

impl DiscussionObserver for ConsoleObserver {
    fn on_fragment(&self, participant: &str, fragment: &str) {
        self.with_state(|state| {
            if !state.header_written {
                Self::clear_spinner(state);
                let header = Self::speaker_header(participant, state.speaker);
                let _ = state.out.write_all(header.as_bytes());
                state.header_written = true;
            }
            let _ = state.out.write_all(fragment.as_bytes());
            let _ = state.out.flush();
        });
    }

    fn on_phase(&self, phase: &DiscussionPhase) {
        if let Some(header) = Self::phase_header(phase) {
            self.with_state(|state| {
                let _ = state.out.write_all(header.as_bytes());
                let _ = state.out.flush();
            });
        }
    }

    fn on_turn_start(&self, participant: &str, speaker: Speaker) {
        let show_progress = self.show_progress;
        self.with_state(|state| {
            state.speaker = speaker;
            state.header_written = false;
            Self::clear_spinner(state);
            if show_progress {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(Self::spinner_style());
                spinner.set_message(format!("{} is thinking...", participant));
                spinner.enable_steady_tick(Duration::from_millis(100));
                state.spinner = Some(spinner);
            }
        });
    }

    fn on_turn_end(&self, participant: &str) {
        self.with_state(|state| {
            Self::clear_spinner(state);
            if !state.header_written {
                let header = Self::speaker_header(participant, state.speaker);
                let _ = state.out.write_all(header.as_bytes());
                let _ = write!(state.out, "{}", "(no response)".dimmed());
            }
            let _ = writeln!(state.out);
            let _ = state.out.flush();
            state.header_written = false;
        });
    }

    fn on_verdict(&self, judge: &str, round: u32) {
        self.with_state(|state| {
            let line = format!("{} reached a verdict in round {}", judge, round);
            let _ = writeln!(state.out, "\n{} {}", "v".green().bold(), line.green());
            let _ = state.out.flush();
        });
    }
}
