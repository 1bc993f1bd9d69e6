//! Byte stream to text line adapter.

use crate::error::Result;
use bytes::{Buf, Bytes, BytesMut};
use futures::{Stream, StreamExt};
use std::pin::Pin;

/// Boxed byte stream, as produced by an HTTP response body.
pub type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

/// Splits a byte stream into UTF-8 text lines.
///
/// Recognizes `\n`, `\r\n` and a lone `\r` as terminators, which are stripped.
/// A non-empty remainder at end of input is yielded as the last line.
pub struct LineStream<S = BodyStream> {
    inner: Option<S>,
    buffer: BytesMut,
    /// Previous line ended in `\r`; a leading `\n` belongs to it.
    skip_lf: bool,
}

impl<S> LineStream<S>
where
    S: Stream<Item = Result<Bytes>> + Unpin,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner: Some(inner),
            buffer: BytesMut::new(),
            skip_lf: false,
        }
    }

    /// Read the next line, or `None` once the input is exhausted.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(line) = self.take_line()? {
                return Ok(Some(line));
            }

            let Some(inner) = self.inner.as_mut() else {
                return self.finish();
            };

            match inner.next().await {
                Some(Ok(chunk)) => self.buffer.extend_from_slice(&chunk),
                Some(Err(e)) => {
                    self.inner = None;
                    self.buffer.clear();
                    return Err(e);
                }
                None => {
                    self.inner = None;
                    return self.finish();
                }
            }
        }
    }

    /// Drop the underlying stream, releasing whatever resource backs it.
    pub fn cancel(&mut self) {
        if self.inner.take().is_some() {
            tracing::trace!(buffered = self.buffer.len(), "Line stream cancelled");
        }
        self.buffer.clear();
    }

    /// Whether the underlying stream is still attached.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }

    /// Pop one complete line from the buffer.
    fn take_line(&mut self) -> Result<Option<String>> {
        if self.skip_lf && !self.buffer.is_empty() {
            if self.buffer[0] == b'\n' {
                self.buffer.advance(1);
            }
            self.skip_lf = false;
        }

        let Some(idx) = self.buffer.iter().position(|b| matches!(b, b'\n' | b'\r')) else {
            return Ok(None);
        };

        self.skip_lf = self.buffer[idx] == b'\r';
        let line = self.buffer.split_to(idx + 1);
        decode(&line[..idx]).map(Some)
    }

    /// Flush an unterminated trailing line.
    fn finish(&mut self) -> Result<Option<String>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }
        let rest = self.buffer.split();
        decode(&rest).map(Some)
    }
}

fn decode(bytes: &[u8]) -> Result<String> {
    Ok(std::str::from_utf8(bytes)?.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use futures::stream;

    fn chunks(parts: &[&'static [u8]]) -> LineStream<BodyStream> {
        let items: Vec<Result<Bytes>> = parts.iter().map(|p| Ok(Bytes::from_static(p))).collect();
        LineStream::new(Box::pin(stream::iter(items)))
    }

    async fn collect(mut lines: LineStream<BodyStream>) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            out.push(line);
        }
        out
    }

    #[tokio::test]
    async fn test_lf_and_trailing_line() {
        let lines = collect(chunks(&[b"Hello\nWorld"])).await;
        assert_eq!(lines, vec!["Hello", "World"]);
    }

    #[tokio::test]
    async fn test_crlf_and_lone_cr() {
        let lines = collect(chunks(&[b"a\r\nb\rc\n\n"])).await;
        assert_eq!(lines, vec!["a", "b", "c", ""]);
    }

    #[tokio::test]
    async fn test_crlf_split_across_chunks() {
        let lines = collect(chunks(&[b"a\r", b"\nb\r", b"\r\n"])).await;
        assert_eq!(lines, vec!["a", "b", ""]);
    }

    #[tokio::test]
    async fn test_partial_lines_across_chunks() {
        let lines = collect(chunks(&[b"da", b"ta: par", b"tial\n"])).await;
        assert_eq!(lines, vec!["data: partial"]);
    }

    #[tokio::test]
    async fn test_multibyte_split_across_chunks() {
        let emoji = "data: 🎉\n".as_bytes();
        let (head, tail) = emoji.split_at(8);
        let head: &'static [u8] = Box::leak(head.to_vec().into_boxed_slice());
        let tail: &'static [u8] = Box::leak(tail.to_vec().into_boxed_slice());
        let lines = collect(chunks(&[head, tail])).await;
        assert_eq!(lines, vec!["data: 🎉"]);
    }

    #[tokio::test]
    async fn test_empty_input() {
        assert!(collect(chunks(&[])).await.is_empty());
        assert!(collect(chunks(&[b""])).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let mut lines = chunks(&[b"ok\n\xff\xfe\nnext\n"]);
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("ok"));
        assert!(matches!(lines.next_line().await, Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn test_error_ends_stream() {
        let items: Vec<Result<Bytes>> = vec![
            Ok(Bytes::from_static(b"one\ntw")),
            Err(Error::InvalidRequest("boom".into())),
        ];
        let mut lines = LineStream::new(stream::iter(items));
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("one"));
        assert!(lines.next_line().await.is_err());
        assert!(lines.next_line().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancel_drops_inner() {
        let mut lines = chunks(&[b"one\ntwo\n"]);
        assert_eq!(lines.next_line().await.unwrap().as_deref(), Some("one"));
        lines.cancel();
        assert!(!lines.is_open());
        assert!(lines.next_line().await.unwrap().is_none());
    }
}
