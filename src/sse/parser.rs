//! Line-oriented SSE event parser.

use super::event::Event;
use super::field::{Field, split};
use super::lines::{BodyStream, LineStream};
use crate::error::Result;
use bytes::Bytes;
use futures::Stream;
use tokio_util::sync::CancellationToken;

/// Pull-based parser turning a line stream into [`Event`]s.
///
/// An event is emitted on each blank line that follows at least one
/// recognized field with a usable value. Comments, unknown fields and lines
/// without a `:` are ignored. A pending event that is not terminated by a blank
/// line before the input ends is dropped.
pub struct EventStream<S = BodyStream> {
    lines: Option<LineStream<S>>,
    pending: Option<Event>,
    cancel: Option<CancellationToken>,
}

impl EventStream<BodyStream> {
    /// A stream that yields nothing (response without a body).
    #[must_use]
    pub fn empty() -> Self {
        Self {
            lines: None,
            pending: None,
            cancel: None,
        }
    }
}

impl<S> EventStream<S>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    pub fn new(body: S) -> Self {
        Self::from_lines(LineStream::new(body))
    }

    pub fn from_lines(lines: LineStream<S>) -> Self {
        Self {
            lines: Some(lines),
            pending: None,
            cancel: None,
        }
    }

    /// Stop producing events once `token` is cancelled.
    ///
    /// The token is checked before each line is read.
    #[must_use]
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Read the next complete event, or `None` at end of stream.
    ///
    /// Errors from the underlying stream end iteration; later calls return
    /// `None`.
    pub async fn next_event(&mut self) -> Result<Option<Event>> {
        loop {
            if self.is_cancelled() {
                self.close();
                return Ok(None);
            }

            let Some(lines) = self.lines.as_mut() else {
                return Ok(None);
            };

            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    if self.pending.is_some() {
                        tracing::trace!("Dropping unterminated event at end of stream");
                    }
                    self.lines = None;
                    self.pending = None;
                    return Ok(None);
                }
                Err(e) => {
                    self.lines = None;
                    self.pending = None;
                    return Err(e);
                }
            };

            if line.is_empty() {
                if let Some(event) = self.pending.take()
                    && !event.is_empty()
                {
                    tracing::trace!(event = ?event.event, id = ?event.id, "SSE event");
                    return Ok(Some(event));
                }
                continue;
            }

            self.process_line(&line);
        }
    }

    /// Adapt into a `futures::Stream` of events.
    pub fn into_stream(self) -> impl Stream<Item = Result<Event>> {
        futures::stream::unfold(self, |mut events| async move {
            match events.next_event().await {
                Ok(Some(event)) => Some((Ok(event), events)),
                Ok(None) => None,
                Err(e) => Some((Err(e), events)),
            }
        })
    }

    /// Whether a partially accumulated event is waiting for its blank line.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Stop iteration and release the underlying stream.
    pub fn close(&mut self) {
        if let Some(mut lines) = self.lines.take() {
            lines.cancel();
        }
        self.pending = None;
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn process_line(&mut self, line: &str) {
        let Some((name, value)) = split(line) else {
            // comment or no delimiter
            return;
        };

        let Some(field) = Field::from_name(name) else {
            tracing::trace!(field = name, "Ignoring unknown SSE field");
            return;
        };

        field.apply(self.pending.get_or_insert_with(Event::default), value);
    }
}
