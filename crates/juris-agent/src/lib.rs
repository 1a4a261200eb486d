//! Streaming client for web-search augmented legal questions.
//!
//! `XaiClient::stream` returns a lazy sequence of [`stream::StreamEvent`]s:
//! zero or more text deltas, then exactly one terminal `Final` or `Error`.

pub mod aggregator;
pub mod client;
pub mod credentials;
pub mod error;
pub mod request;
pub mod stream;

pub use aggregator::{aggregate, Aggregator};
pub use client::{EventStream, XaiClient};
pub use credentials::{CredentialProvider, StaticCredentials};
pub use error::ProviderError;
pub use request::CompletionRequest;
pub use stream::{FinalResult, StreamEvent, TokenUsage};
