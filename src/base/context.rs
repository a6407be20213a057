//! Ergonomic error context helpers.
//!
//! Provides an extension trait for adding context to `Result` types,
//! converting IO errors into context-rich `NetError` variants.

use crate::base::neterror::NetError;
use std::io;

/// Extension trait for adding context to IO Results.
pub trait IoResultExt<T> {
    /// Add name resolution context to an IO error.
    ///
    /// # Example
    /// ```ignore
    /// use hostresolve::base::context::IoResultExt;
    ///
    /// let addrs = ("example.com", 0).to_socket_addrs()
    ///     .resolution_context("example.com")?;
    /// // Error: "Resolution of example.com failed: failed to lookup address information"
    /// ```
    fn resolution_context(self, domain: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn resolution_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::resolution_failed(domain, e))
    }
}
