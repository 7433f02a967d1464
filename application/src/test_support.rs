//! Scripted backends and observers shared by the application tests

use crate::ports::backend::{BackendError, ChatBackend, StreamHandle};
use crate::ports::observer::{DiscussionObserver, Speaker};
use async_trait::async_trait;
use jury_domain::{DiscussionPhase, Message, StreamEvent};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// One scripted reaction to a `stream_chat` call
#[derive(Debug, Clone)]
pub enum Script {
    /// Stream these fragments, then complete
    Reply(Vec<String>),
    /// Refuse to open the stream
    Fail(BackendError),
    /// Stream these fragments, then report a stream error
    FailMidStream(Vec<String>, String),
    /// Stream these fragments and never complete
    Hang(Vec<String>),
}

impl Script {
    pub fn reply<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Script::Reply(fragments.into_iter().map(Into::into).collect())
    }

    pub fn fail(error: BackendError) -> Self {
        Script::Fail(error)
    }

    pub fn fail_mid_stream<I, S>(fragments: I, error: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Script::FailMidStream(fragments.into_iter().map(Into::into).collect(), error.to_string())
    }

    pub fn hang<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Script::Hang(fragments.into_iter().map(Into::into).collect())
    }
}

/// A recorded `stream_chat` call
#[derive(Debug, Clone)]
pub struct Call {
    pub model: String,
    pub messages: Vec<Message>,
}

/// Backend replaying a fixed script, one entry per call
pub struct ScriptedBackend {
    scripts: Mutex<VecDeque<Script>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn next_script(&self) -> Script {
        self.scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::reply(["(default response)"]))
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn stream_chat(
        &self,
        model: &str,
        messages: &[Message],
    ) -> Result<StreamHandle, BackendError> {
        self.calls.lock().unwrap().push(Call {
            model: model.to_string(),
            messages: messages.to_vec(),
        });

        let (fragments, ending) = match self.next_script() {
            Script::Fail(error) => return Err(error),
            Script::Reply(fragments) => (fragments, Ending::Complete),
            Script::FailMidStream(fragments, error) => (fragments, Ending::Error(error)),
            Script::Hang(fragments) => (fragments, Ending::Hang),
        };

        let (tx, handle) = StreamHandle::channel();
        tokio::spawn(async move {
            let mut full = String::new();
            for fragment in fragments {
                full.push_str(&fragment);
                if tx.send(StreamEvent::Delta(fragment)).await.is_err() {
                    return;
                }
            }
            match ending {
                Ending::Complete => {
                    let _ = tx.send(StreamEvent::Completed(full)).await;
                }
                Ending::Error(error) => {
                    let _ = tx.send(StreamEvent::Error(error)).await;
                }
                Ending::Hang => tx.closed().await,
            }
        });
        Ok(handle)
    }
}

enum Ending {
    Complete,
    Error(String),
    Hang,
}

/// Observer recording every callback as a line of text
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn fragments_of(&self, participant: &str) -> Vec<String> {
        let prefix = format!("fragment {}: ", participant);
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl DiscussionObserver for RecordingObserver {
    fn on_fragment(&self, participant: &str, fragment: &str) {
        self.push(format!("fragment {}: {}", participant, fragment));
    }

    fn on_phase(&self, phase: &DiscussionPhase) {
        self.push(format!("phase {}", phase.as_str()));
    }

    fn on_turn_start(&self, participant: &str, speaker: Speaker) {
        self.push(format!("start {} {:?}", participant, speaker));
    }

    fn on_turn_end(&self, participant: &str) {
        self.push(format!("end {}", participant));
    }

    fn on_verdict(&self, judge: &str, round: u32) {
        self.push(format!("verdict {} {}", judge, round));
    }
}

/// Observer that cancels a token when it sees a given fragment.
///
/// Every callback is also recorded in `recorded`.
pub struct CancelOnFragment {
    pub token: CancellationToken,
    pub trigger: String,
    pub recorded: RecordingObserver,
}

impl CancelOnFragment {
    pub fn new(token: CancellationToken, trigger: impl Into<String>) -> Self {
        Self {
            token,
            trigger: trigger.into(),
            recorded: RecordingObserver::default(),
        }
    }
}

impl DiscussionObserver for CancelOnFragment {
    fn on_fragment(&self, participant: &str, fragment: &str) {
        self.recorded.on_fragment(participant, fragment);
        if fragment == self.trigger {
            self.token.cancel();
        }
    }

    fn on_phase(&self, phase: &DiscussionPhase) {
        self.recorded.on_phase(phase);
    }

    fn on_turn_start(&self, participant: &str, speaker: Speaker) {
        self.recorded.on_turn_start(participant, speaker);
    }

    fn on_turn_end(&self, participant: &str) {
        self.recorded.on_turn_end(participant);
    }

    fn on_verdict(&self, judge: &str, round: u32) {
        self.recorded.on_verdict(judge, round);
    }
}
