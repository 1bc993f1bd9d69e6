//! Server-Sent Events parsing.
//!
//! Bytes are split into lines by [`LineStream`], lines into fields by
//! [`split`], and fields are accumulated into [`Event`]s by [`EventStream`].
//!
//! # Example
//!
//! ```ignore
//! use ssefetch::sse::EventStream;
//!
//! let mut events = EventStream::new(body).with_cancel(token);
//! while let Some(event) = events.next_event().await? {
//!     println!("{:?}", event.data);
//! }
//! ```

mod event;
mod field;
mod lines;
mod parser;


pub use event::{Event, EventId};
pub use field::{Field, split};
pub use lines::{BodyStream, LineStream};
pub use parser::EventStream;
