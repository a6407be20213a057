//! Name Resolution Module
//!
//! Turns a hostname into an ordered list of textual IP addresses:
//! - System lookup (getaddrinfo, both address families)
//! - Hostname-to-IP override mechanism
//! - IPv4-mapped IPv6 collapsing (`::ffff:192.0.2.1` becomes `192.0.2.1`)
//!
//! # Architecture
//!
//! [`AddressResolver`] owns the policy (ordering, cap, normalization,
//! error mapping). The [`Lookup`] trait is the seam to whatever actually
//! answers the query, so tests and callers can substitute their own.
//!
//! # Example
//!
//! ```rust,ignore
//! use hostresolve::dns::AddressResolver;
//!
//! let resolver = AddressResolver::new();
//! for addr in resolver.resolve("example.com")? {
//!     println!("Resolved: {}", addr);
//! }
//! ```

mod gai;
mod resolve;
mod resolver;

pub use gai::SystemLookup;
pub use resolve::{AddressList, Addrs, Lookup, LookupWithOverrides, Name};
pub use resolver::{
    normalize_ip, AddressResolver, AddressResolverBuilder, ResolverConfig, MAX_ADDRS,
    MAX_ADDRS_ENV,
};
