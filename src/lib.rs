//! Server-Sent Events over HTTP.
//!
//! [`sse`] turns a byte stream into [`Event`]s; [`http`] issues the request
//! and hands back the parsed stream.

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod sse;

pub use config::Config;
pub use error::{Error, Result};
pub use http::{ReqwestTransport, Request, RequestOptions, Response, Transport, connect, stream};
pub use sse::{Event, EventId, EventStream, Field, LineStream, split};
