//! Streaming consumer
//!
//! Drains one participant's fragment stream, forwarding each fragment to
//! the observer as it arrives and feeding the verdict detector when the
//! speaker is the judge.

use crate::ports::backend::{BackendError, StreamHandle};
use crate::ports::observer::DiscussionObserver;
use jury_domain::{StreamEvent, VerdictDetector};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What one turn produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutput {
    /// Concatenated reply text (partial if cancelled)
    pub text: String,
    /// Number of fragments forwarded to the observer
    pub fragments: usize,
    /// The detector fired on one of the fragments
    pub verdict: bool,
    /// The cancellation token fired before the stream finished
    pub cancelled: bool,
}

pub struct StreamConsumer<'a> {
    observer: &'a dyn DiscussionObserver,
    cancellation: Option<&'a CancellationToken>,
}

impl<'a> StreamConsumer<'a> {
    pub fn new(
        observer: &'a dyn DiscussionObserver,
        cancellation: Option<&'a CancellationToken>,
    ) -> Self {
        Self {
            observer,
            cancellation,
        }
    }

    /// Consume `handle` to the end.
    ///
    /// A detected verdict does not stop consumption: the judge's reply is
    /// always read in full. A failure event discards the partial text:
    /// [`StreamEvent::Error`] is returned as [`BackendError::Stream`] and
    /// [`StreamEvent::Malformed`] as [`BackendError::MalformedReply`]. A
    /// channel that closes without a terminal event is an error too.
    pub async fn consume(
        &self,
        participant: &str,
        handle: StreamHandle,
        mut detector: Option<&mut VerdictDetector>,
    ) -> Result<TurnOutput, BackendError> {
        let mut receiver = handle.receiver;
        let mut output = TurnOutput::default();

        loop {
            let event = if let Some(token) = self.cancellation {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        output.cancelled = true;
                        break;
                    }
                    event = receiver.recv() => event,
                }
            } else {
                receiver.recv().await
            };

            match event {
                Some(StreamEvent::Delta(fragment)) => {
                    self.forward(participant, &fragment, &mut output, detector.as_deref_mut());
                }
                Some(StreamEvent::Completed(text)) => {
                    if output.text.is_empty() && !text.is_empty() {
                        self.forward(participant, &text, &mut output, detector.as_deref_mut());
                    }
                    break;
                }
                Some(StreamEvent::Error(e)) => {
                    debug!(participant, fragments = output.fragments, "Stream failed: {}", e);
                    return Err(BackendError::Stream(e));
                }
                Some(StreamEvent::Malformed(e)) => {
                    debug!(participant, fragments = output.fragments, "Malformed reply: {}", e);
                    return Err(BackendError::MalformedReply(e));
                }
                None => {
                    warn!(
                        participant,
                        fragments = output.fragments,
                        "Stream closed before completion"
                    );
                    return Err(BackendError::closed_early());
                }
            }
        }

        debug!(
            participant,
            fragments = output.fragments,
            chars = output.text.len(),
            cancelled = output.cancelled,
            "Turn stream consumed"
        );
        Ok(output)
    }

    fn forward(
        &self,
        participant: &str,
        fragment: &str,
        output: &mut TurnOutput,
        detector: Option<&mut VerdictDetector>,
    ) {
        self.observer.on_fragment(participant, fragment);
        output.text.push_str(fragment);
        output.fragments += 1;
        if let Some(detector) = detector {
            if detector.observe(fragment) {
                output.verdict = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::observer::NoObserver;
    use crate::test_support::{CancelOnFragment, RecordingObserver};
    use jury_domain::VerdictDetection;

    async fn handle_from(events: Vec<StreamEvent>) -> StreamHandle {
        let (tx, handle) = StreamHandle::channel();
        for event in events {
            tx.send(event).await.unwrap();
        }
        handle
    }

    fn deltas(fragments: &[&str]) -> Vec<StreamEvent> {
        let mut events: Vec<_> = fragments
            .iter()
            .map(|f| StreamEvent::Delta(f.to_string()))
            .collect();
        events.push(StreamEvent::Completed(fragments.concat()));
        events
    }

    #[tokio::test]
    async fn test_fragments_forwarded_in_order() {
        let observer = RecordingObserver::default();
        let consumer = StreamConsumer::new(&observer, None);
        let handle = handle_from(deltas(&["Hel", "lo", "!"])).await;

        let output = consumer.consume("a", handle, None).await.unwrap();

        assert_eq!(output.text, "Hello!");
        assert_eq!(output.fragments, 3);
        assert_eq!(observer.fragments_of("a"), vec!["Hel", "lo", "!"]);
        assert!(!output.verdict);
    }

    #[tokio::test]
    async fn test_completed_without_deltas_counts_as_fragment() {
        let observer = RecordingObserver::default();
        let consumer = StreamConsumer::new(&observer, None);
        let handle = handle_from(vec![StreamEvent::Completed("VERDICT: done".into())]).await;
        let mut detector = VerdictDetector::new(VerdictDetection::PerFragment);

        let output = consumer.consume("judge", handle, Some(&mut detector)).await.unwrap();

        assert_eq!(output.text, "VERDICT: done");
        assert_eq!(output.fragments, 1);
        assert!(output.verdict);
        assert_eq!(observer.fragments_of("judge"), vec!["VERDICT: done"]);
    }

    #[tokio::test]
    async fn test_verdict_stream_read_to_end() {
        let handle = handle_from(deltas(&["VERDICT:", " the defendant", " is cleared"])).await;
        let mut detector = VerdictDetector::new(VerdictDetection::PerFragment);

        let output = StreamConsumer::new(&NoObserver, None)
            .consume("judge", handle, Some(&mut detector))
            .await
            .unwrap();

        assert!(output.verdict);
        assert_eq!(output.text, "VERDICT: the defendant is cleared");
    }

    #[tokio::test]
    async fn test_stream_error_discards_text() {
        let mut events = vec![StreamEvent::Delta("partial".into())];
        events.push(StreamEvent::Error("connection reset".into()));
        let handle = handle_from(events).await;

        let result = StreamConsumer::new(&NoObserver, None)
            .consume("a", handle, None)
            .await;

        assert_eq!(result, Err(BackendError::Stream("connection reset".into())));
    }

    #[tokio::test]
    async fn test_closed_channel_without_completion_fails() {
        let (tx, handle) = StreamHandle::channel();
        tx.send(StreamEvent::Delta("cut".into())).await.unwrap();
        drop(tx);

        let result = StreamConsumer::new(&NoObserver, None)
            .consume("a", handle, None)
            .await;
        assert_eq!(result, Err(BackendError::closed_early()));
    }

    #[tokio::test]
    async fn test_malformed_event_keeps_category() {
        let handle = handle_from(vec![
            StreamEvent::Delta("ok".into()),
            StreamEvent::Malformed("expected value: {oops".into()),
        ])
        .await;

        let result = StreamConsumer::new(&NoObserver, None)
            .consume("a", handle, None)
            .await;
        assert_eq!(
            result,
            Err(BackendError::MalformedReply("expected value: {oops".into()))
        );
    }

    #[tokio::test]
    async fn test_cancellation_keeps_partial_text() {
        let token = CancellationToken::new();
        let observer = CancelOnFragment::new(token.clone(), "two");
        let consumer = StreamConsumer::new(&observer, Some(&token));

        // Sender kept alive: the stream never completes on its own
        let (tx, handle) = StreamHandle::channel();
        for fragment in ["one ", "two", " three"] {
            tx.send(StreamEvent::Delta(fragment.into())).await.unwrap();
        }

        let output = consumer.consume("a", handle, None).await.unwrap();

        assert!(output.cancelled);
        assert_eq!(output.text, "one two");
        assert_eq!(output.fragments, 2);
        drop(tx);
    }

    #[tokio::test]
    async fn test_already_cancelled_reads_nothing() {
        let token = CancellationToken::new();
        token.cancel();
        let handle = handle_from(deltas(&["ignored"])).await;

        let output = StreamConsumer::new(&NoObserver, Some(&token))
            .consume("a", handle, None)
            .await
            .unwrap();

        assert!(output.cancelled);
        assert!(output.text.is_empty());
    }
}
