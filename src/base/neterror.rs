use std::{io, sync::Arc};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum NetError {
    // URI Errors
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid scheme")]
    InvalidScheme,
    #[error("Invalid host")]
    InvalidHost,
    #[error("Username missing")]
    MissingUser,
    #[error("Password missing")]
    MissingPassword,
    #[error("Port missing")]
    MissingPort,
    #[error("Invalid port")]
    InvalidPort,
    #[error("No hostname found")]
    MissingHost,

    // Resolution Errors
    #[error("Resolution of {domain} failed: {source}")]
    ResolutionFailed {
        domain: String,
        #[source]
        source: Arc<io::Error>,
    },
}

impl NetError {
    /// Builds a [`NetError::ResolutionFailed`] for `domain`.
    pub fn resolution_failed(domain: impl Into<String>, source: io::Error) -> Self {
        NetError::ResolutionFailed {
            domain: domain.into(),
            source: Arc::new(source),
        }
    }

    /// Returns true for errors produced while decomposing a URI.
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, NetError::ResolutionFailed { .. })
    }
}
