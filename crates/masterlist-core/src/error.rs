//! Error types shared by the engine and its hosts

use thiserror::Error;

/// A fetch cycle that did not produce a snapshot.
///
/// Never fatal: the controller keeps the last good snapshot and the next
/// cycle is scheduled as usual.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error: {0}")]
    Status(u16),
    #[error("malformed list body: {0}")]
    Body(String),
}

/// A single feed element that could not be turned into a [`crate::ServerEntry`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid entry: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("port {0} out of range")]
    PortOutOfRange(u64),
}

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("failed to access preference storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("refresh interval must be greater than zero")]
    ZeroInterval,
    #[error("row height must be greater than zero")]
    ZeroRowHeight,
    #[error("connect scheme must not be empty")]
    EmptyScheme,
}
