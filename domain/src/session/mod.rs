//! Conversation primitives.
//!
//! - [`entities::Message`]: a single utterance with role and optional author
//! - [`stream::StreamEvent`]: one event of a streamed model response

pub mod entities;
pub mod stream;
