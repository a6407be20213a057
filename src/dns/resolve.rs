//! Core name lookup types and traits.
//!
//! This module defines the `Lookup` trait and supporting types that sit
//! between [`AddressResolver`](super::AddressResolver) and the platform's
//! name resolution facility.

use serde::Serialize;
use std::{
    borrow::Cow, collections::HashMap, fmt, io, net::SocketAddr, slice, sync::Arc, vec,
};

/// A domain name to resolve into IP addresses.
///
/// This is a lightweight wrapper around a hostname string that provides
/// a type-safe way to pass domain names to lookups.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct Name {
    host: Box<str>,
}

impl Name {
    /// Creates a new [`Name`] from any string-like type.
    #[inline]
    pub fn new(host: impl Into<Box<str>>) -> Self {
        Self { host: host.into() }
    }

    /// View the hostname as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.host
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name::new(value)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.host, f)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.host, f)
    }
}

/// Alias for an `Iterator` trait object over `SocketAddr`.
pub type Addrs = Box<dyn Iterator<Item = SocketAddr> + Send>;

/// Blocking name lookup.
///
/// This is the seam to the platform resolver. Implementations must be
/// thread-safe and must yield addresses in the order the facility returned
/// them. The returned addresses carry port 0.
pub trait Lookup: Send + Sync {
    /// Looks up `name`. An `Err` means the lookup itself failed.
    fn lookup(&self, name: &Name) -> io::Result<Addrs>;
}

/// Blanket implementation for Arc-wrapped lookups.
impl<L: Lookup + ?Sized> Lookup for Arc<L> {
    fn lookup(&self, name: &Name) -> io::Result<Addrs> {
        (**self).lookup(name)
    }
}

/// Lookup wrapper that supports hostname overrides.
///
/// A fixed map of hostname-to-address overrides is checked before falling
/// back to the underlying lookup. The map never changes after construction.
/// Useful for:
/// - Testing without real DNS
/// - Forcing specific IPs for certain domains
/// - Local development with custom hostnames
///
/// # Example
///
/// ```rust
/// use hostresolve::dns::{LookupWithOverrides, SystemLookup};
/// use std::borrow::Cow;
/// use std::collections::HashMap;
/// use std::net::SocketAddr;
/// use std::sync::Arc;
///
/// let mut overrides = HashMap::new();
/// overrides.insert(
///     Cow::Borrowed("api.local"),
///     vec!["127.0.0.1:0".parse::<SocketAddr>().unwrap()],
/// );
///
/// let lookup = LookupWithOverrides::new(Arc::new(SystemLookup::new()), overrides);
/// assert_eq!(lookup.override_count(), 1);
/// ```
pub struct LookupWithOverrides {
    inner: Arc<dyn Lookup>,
    overrides: Arc<HashMap<Cow<'static, str>, Vec<SocketAddr>>>,
}

impl LookupWithOverrides {
    /// Creates a new lookup with the given overrides.
    ///
    /// # Arguments
    ///
    /// * `inner` - The fallback lookup for non-overridden hostnames.
    /// * `overrides` - Map of hostnames to their addresses.
    pub fn new(
        inner: Arc<dyn Lookup>,
        overrides: HashMap<Cow<'static, str>, Vec<SocketAddr>>,
    ) -> Self {
        Self {
            inner,
            overrides: Arc::new(overrides),
        }
    }

    /// Returns the number of configured overrides.
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Lookup for LookupWithOverrides {
    fn lookup(&self, name: &Name) -> io::Result<Addrs> {
        if let Some(addrs) = self.overrides.get(name.as_str()) {
            return Ok(Box::new(addrs.clone().into_iter()));
        }
        self.inner.lookup(name)
    }
}

impl fmt::Debug for LookupWithOverrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupWithOverrides")
            .field("override_count", &self.overrides.len())
            .finish_non_exhaustive()
    }
}

/// Ordered textual addresses produced by one resolve call.
///
/// Order is the order the lookup returned. IPv4-mapped IPv6 addresses are
/// already collapsed to dotted-quad form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AddressList {
    addrs: Vec<String>,
}

impl AddressList {
    pub(crate) fn new(addrs: Vec<String>) -> Self {
        Self { addrs }
    }

    pub fn len(&self) -> usize {
        self.addrs.len()
    }

    /// True when the lookup succeeded but produced no usable address.
    pub fn is_empty(&self) -> bool {
        self.addrs.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.addrs.first().map(String::as_str)
    }

    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.addrs.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.addrs
    }
}

impl IntoIterator for AddressList {
    type Item = String;
    type IntoIter = vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.addrs.into_iter()
    }
}

impl<'a> IntoIterator for &'a AddressList {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.addrs.iter()
    }
}
