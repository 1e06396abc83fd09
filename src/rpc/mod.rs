//! Remote call layer: envelopes, transport, bounded retry.

pub mod client;
pub mod envelope;
pub mod transport;

pub use client::{RetryPolicy, RetryState, SerpstatClient};
pub use envelope::{RemoteError, RequestEnvelope, ResponseEnvelope};
pub use transport::{HttpTransport, Transport};
