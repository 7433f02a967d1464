//! Background task that turns an HTTP body into a [`StreamHandle`]

use super::decode::{LineBuffer, LineDecoder};
use futures::StreamExt;
use jury_application::StreamHandle;
use jury_domain::StreamEvent;
use tokio::sync::mpsc;
use tracing::{debug, trace};

enum Flow {
    Continue,
    Finished,
}

/// Spawn a task forwarding decoded fragments from `response` into a new handle.
///
/// The task ends when the server signals completion, the body ends, an
/// error is reported, or the handle is dropped.
pub(crate) fn spawn_reader(
    backend: &'static str,
    response: reqwest::Response,
    decode: LineDecoder,
) -> StreamHandle {
    let (tx, handle) = StreamHandle::channel();

    tokio::spawn(async move {
        let mut body = response.bytes_stream();
        let mut lines = LineBuffer::new();
        let mut full = String::new();

        loop {
            let chunk = tokio::select! {
                _ = tx.closed() => {
                    debug!(backend, "Stream receiver dropped, abandoning reply");
                    return;
                }
                chunk = body.next() => chunk,
            };

            match chunk {
                Some(Ok(bytes)) => {
                    for line in lines.push(&bytes) {
                        match forward_line(&tx, decode, &line, &mut full).await {
                            Some(Flow::Continue) => {}
                            Some(Flow::Finished) => {
                                let _ = tx.send(StreamEvent::Completed(full)).await;
                                return;
                            }
                            None => return,
                        }
                    }
                }
                Some(Err(e)) => {
                    let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                    return;
                }
                None => break,
            }
        }

        if let Some(line) = lines.finish()
            && forward_line(&tx, decode, &line, &mut full).await.is_none()
        {
            return;
        }
        trace!(backend, chars = full.len(), "Body ended");
        let _ = tx.send(StreamEvent::Completed(full)).await;
    });

    handle
}

/// Decode and forward one line. `None` means the task should stop.
async fn forward_line(
    tx: &mpsc::Sender<StreamEvent>,
    decode: LineDecoder,
    line: &str,
    full: &mut String,
) -> Option<Flow> {
    match decode(line) {
        Ok(decoded) => {
            if let Some(fragment) = decoded.fragment {
                full.push_str(&fragment);
                tx.send(StreamEvent::Delta(fragment)).await.ok()?;
            }
            Some(if decoded.done {
                Flow::Finished
            } else {
                Flow::Continue
            })
        }
        Err(e) => {
            let _ = tx.send(e.into_event()).await;
            None
        }
    }
}
