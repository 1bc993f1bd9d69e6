//! Transport-agnostic HTTP response.

use crate::error::{Error, Result};
use crate::sse::BodyStream;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Response status, headers and an optional streaming body.
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    /// Locked so that `Response`, and `Error` with it, stay `Sync`.
    body: Mutex<Option<BodyStream>>,
}

impl Response {
    /// Create a response without a body.
    #[must_use]
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_body(self, body: BodyStream) -> Self {
        Self {
            body: Mutex::new(Some(body)),
            ..self
        }
    }

    /// Attach a body delivered as a single chunk.
    #[must_use]
    pub fn with_bytes(self, bytes: impl Into<Bytes>) -> Self {
        let chunk: Result<Bytes> = Ok(bytes.into());
        self.with_body(Box::pin(futures::stream::once(async move { chunk })))
    }

    /// Wrap a `reqwest` response, streaming its body.
    #[must_use]
    pub fn from_reqwest(response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes_stream().map(|chunk| chunk.map_err(Error::from));
        Self::new(status).with_headers(headers).with_body(Box::pin(body))
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Check if the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Detach the body stream, leaving the response without one.
    pub fn take_body(&mut self) -> Option<BodyStream> {
        self.body_slot().take()
    }

    /// Read the whole body into memory.
    pub async fn bytes(mut self) -> Result<Bytes> {
        let mut out = BytesMut::new();
        if let Some(mut body) = self.take_body() {
            while let Some(chunk) = body.next().await {
                out.extend_from_slice(&chunk?);
            }
        }
        Ok(out.freeze())
    }

    /// Read the whole body as UTF-8 text.
    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(std::str::from_utf8(&bytes)?.to_owned())
    }

    fn body_slot(&mut self) -> &mut Option<BodyStream> {
        self.body.get_mut().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
