//! System name lookup using getaddrinfo.
//!
//! This lookup uses the operating system's native resolution via
//! `getaddrinfo` (through `std::net::ToSocketAddrs`), so it respects
//! /etc/hosts, /etc/resolv.conf, nsswitch and friends.
//!
//! Both address families are requested with stream-socket hints. IP
//! literals are parsed directly without touching the resolver. The call
//! blocks the current thread; there is no timeout here.

use super::{Addrs, Lookup, Name};
use std::{io, net::ToSocketAddrs};

/// Blocking lookup through the platform's `getaddrinfo`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemLookup;

impl SystemLookup {
    /// Creates a new `SystemLookup`.
    pub fn new() -> Self {
        Self
    }
}

impl Lookup for SystemLookup {
    fn lookup(&self, name: &Name) -> io::Result<Addrs> {
        // Entries of an unknown address family are dropped by std
        let addrs = (name.as_str(), 0u16).to_socket_addrs()?;
        Ok(Box::new(addrs))
    }
}
