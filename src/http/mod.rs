//! Request/stream entry point.
//!
//! # Example
//!
//! ```ignore
//! use ssefetch::http::{RequestOptions, connect};
//!
//! let options = RequestOptions::new()
//!     .method(reqwest::Method::POST)
//!     .json(&serde_json::json!({ "stream": true }))?;
//!
//! // Fails with `Error::Status` carrying the response if not 2xx
//! let mut events = connect("https://api.example.com/v1/stream", options).await?;
//! while let Some(event) = events.next_event().await? {
//!     println!("<< {:?}", event.data);
//! }
//! ```

pub mod headers;
mod request;
mod response;
mod transport;

pub use request::{Request, RequestOptions};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport};

use crate::error::{Error, Result};
use crate::sse::EventStream;
use reqwest::IntoUrl;

/// Issue `request` through `transport` and parse the response as SSE.
///
/// Missing `Accept` and `Content-Type` headers are defaulted first. A
/// non-success status fails with [`Error::Status`] carrying the raw response.
/// The returned stream stops when the request's cancellation token fires.
pub async fn stream<T>(transport: &T, mut request: Request) -> Result<EventStream>
where
    T: Transport + ?Sized,
{
    headers::apply_defaults(request.headers_mut());

    tracing::debug!(method = %request.method(), url = %request.url(), "Opening event stream");

    let mut response = transport.fetch(&request).await?;
    if !response.is_success() {
        tracing::warn!(status = %response.status(), url = %request.url(), "Event stream request failed");
        return Err(Error::Status(Box::new(response)));
    }

    let token = request.cancel_token().clone();
    match response.take_body() {
        Some(body) => Ok(EventStream::new(body).with_cancel(token)),
        None => Ok(EventStream::empty()),
    }
}

/// [`stream`] over a default [`ReqwestTransport`].
pub async fn connect(url: impl IntoUrl, options: RequestOptions) -> Result<EventStream> {
    let request = Request::new(url, options)?;
    stream(&ReqwestTransport::default(), request).await
}
