//! Base types and error handling.
//!
//! Provides the foundational pieces shared by the parser and the resolver:
//! - [`NetError`](neterror::NetError): every failure either component can report
//! - [`IoResultExt`](context::IoResultExt): IO error context helpers
//! - [`LogSink`](log::LogSink): the injected diagnostics channel

pub mod context;
pub mod log;
pub mod neterror;
