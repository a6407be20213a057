//! Hostname to address-string resolution.

use super::{AddressList, Lookup, Name, SystemLookup};
use crate::base::context::IoResultExt;
use crate::base::log::{LogLevel, LogSink, TracingSink};
use crate::base::neterror::NetError;
use serde::{Deserialize, Serialize};
use std::{fmt, net::IpAddr, sync::Arc};

/// Default cap on the number of addresses returned per call.
pub const MAX_ADDRS: usize = 10;

/// Environment variable read by [`ResolverConfig::from_env`].
pub const MAX_ADDRS_ENV: &str = "HOSTRESOLVE_MAX_ADDRS";

/// Tunables for [`AddressResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Upper bound on entries in one [`AddressList`]. Zero means the default.
    #[serde(deserialize_with = "deserialize_max_addrs")]
    pub max_addrs: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_addrs: MAX_ADDRS,
        }
    }
}

impl ResolverConfig {
    /// Create config from environment variables.
    ///
    /// Checks `HOSTRESOLVE_MAX_ADDRS`. Unset, unparseable or zero values
    /// keep the default.
    pub fn from_env() -> Self {
        let max_addrs = std::env::var(MAX_ADDRS_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(MAX_ADDRS);
        Self {
            max_addrs: cap_or_default(max_addrs),
        }
    }

    /// Replaces a zero cap with [`MAX_ADDRS`].
    pub fn normalized(self) -> Self {
        Self {
            max_addrs: cap_or_default(self.max_addrs),
        }
    }
}

// A zero cap would turn every answer into an empty success
fn cap_or_default(max_addrs: usize) -> usize {
    if max_addrs == 0 {
        MAX_ADDRS
    } else {
        max_addrs
    }
}

fn deserialize_max_addrs<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    usize::deserialize(deserializer).map(cap_or_default)
}

/// Collapses IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) to IPv4.
///
/// Every other address is returned unchanged.
pub fn normalize_ip(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => IpAddr::V4(v4),
            None => IpAddr::V6(v6),
        },
        v4 => v4,
    }
}

/// Turns hostnames into ordered lists of textual IP addresses.
///
/// Stateless: nothing is cached between calls and each call blocks for the
/// duration of the underlying lookup.
///
/// # Example
///
/// ```rust
/// use hostresolve::dns::AddressResolver;
///
/// let addrs = AddressResolver::new().resolve("::ffff:192.0.2.1").unwrap();
/// assert_eq!(addrs.first(), Some("192.0.2.1"));
/// ```
#[derive(Clone)]
pub struct AddressResolver {
    config: ResolverConfig,
    lookup: Arc<dyn Lookup>,
    sink: Arc<dyn LogSink>,
}

impl AddressResolver {
    /// Creates a resolver backed by [`SystemLookup`] with default config.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> AddressResolverBuilder {
        AddressResolverBuilder::new()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves `hostname` to at most `max_addrs` address strings.
    ///
    /// A failed lookup is an error. A lookup that succeeds without any
    /// address yields an empty list.
    pub fn resolve(&self, hostname: &str) -> Result<AddressList, NetError> {
        let name = Name::new(hostname);
        self.sink
            .log(LogLevel::Debug, format_args!("resolving {}", name));

        let addrs = self.lookup.lookup(&name).resolution_context(hostname);
        let addrs = match addrs {
            Ok(addrs) => addrs,
            Err(e) => {
                self.sink.log(LogLevel::Error, format_args!("{}", e));
                return Err(e);
            }
        };

        let list: Vec<String> = addrs
            .take(self.config.max_addrs)
            .map(|addr| normalize_ip(addr.ip()).to_string())
            .collect();

        if list.is_empty() {
            self.sink.log(
                LogLevel::Warning,
                format_args!("{} resolved without any address", name),
            );
        } else {
            self.sink.log(
                LogLevel::Debug,
                format_args!("{} resolved to {} address(es)", name, list.len()),
            );
        }

        Ok(AddressList::new(list))
    }
}

impl Default for AddressResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AddressResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AddressResolver`].
#[derive(Default)]
pub struct AddressResolverBuilder {
    config: ResolverConfig,
    lookup: Option<Arc<dyn Lookup>>,
    sink: Option<Arc<dyn LogSink>>,
}

impl AddressResolverBuilder {
    /// Create new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole config.
    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the cap on returned addresses. Zero keeps [`MAX_ADDRS`].
    pub fn max_addrs(mut self, max_addrs: usize) -> Self {
        self.config.max_addrs = max_addrs;
        self
    }

    /// Set the lookup backend. Defaults to [`SystemLookup`].
    pub fn lookup(mut self, lookup: Arc<dyn Lookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Set the diagnostics sink. Defaults to [`TracingSink`].
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the resolver.
    pub fn build(self) -> AddressResolver {
        AddressResolver {
            config: self.config.normalized(),
            lookup: self.lookup.unwrap_or_else(|| Arc::new(SystemLookup::new())),
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::log::NullSink;
    use crate::dns::Addrs;
    use std::io;
    use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

    enum MockLookup {
        Answer(Vec<IpAddr>),
        Fail,
    }

    impl Lookup for MockLookup {
        fn lookup(&self, _name: &Name) -> io::Result<Addrs> {
            match self {
                MockLookup::Answer(ips) => {
                    let addrs: Vec<SocketAddr> =
                        ips.iter().map(|ip| SocketAddr::new(*ip, 0)).collect();
                    Ok(Box::new(addrs.into_iter()))
                }
                MockLookup::Fail => Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    "Name or service not known",
                )),
            }
        }
    }

    fn resolver(mock: MockLookup) -> AddressResolver {
        AddressResolver::builder()
            .lookup(Arc::new(mock))
            .sink(Arc::new(NullSink))
            .build()
    }

    #[test]
    fn test_normalize_ip() {
        let mapped: IpAddr = "::ffff:192.0.2.1".parse().unwrap();
        assert_eq!(normalize_ip(mapped), IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)));

        let v6: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(normalize_ip(v6), v6);

        // IPv4-compatible (deprecated) addresses are not mapped ones
        let compat: IpAddr = "::192.0.2.1".parse().unwrap();
        assert_eq!(normalize_ip(compat), compat);

        let v4 = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(normalize_ip(v4), v4);
    }

    #[test]
    fn test_resolve_preserves_order_and_collapses_mapped() {
        let resolver = resolver(MockLookup::Answer(vec![
            "2001:db8::1".parse().unwrap(),
            "::ffff:192.0.2.1".parse().unwrap(),
            IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7)),
            IpAddr::V6(Ipv6Addr::LOCALHOST),
        ]));

        let list = resolver.resolve("example.test").unwrap();
        assert_eq!(
            list.as_slice(),
            ["2001:db8::1", "192.0.2.1", "198.51.100.7", "::1"]
        );
    }

    #[test]
    fn test_resolve_caps_at_max_addrs() {
        let ips: Vec<IpAddr> = (1..=15)
            .map(|i| IpAddr::V4(Ipv4Addr::new(10, 0, 0, i)))
            .collect();

        let list = resolver(MockLookup::Answer(ips.clone()))
            .resolve("many.test")
            .unwrap();
        assert_eq!(list.len(), MAX_ADDRS);
        assert_eq!(list.first(), Some("10.0.0.1"));
        assert_eq!(list.as_slice()[9], "10.0.0.10");

        let small = AddressResolver::builder()
            .lookup(Arc::new(MockLookup::Answer(ips)))
            .sink(Arc::new(NullSink))
            .max_addrs(3)
            .build();
        assert_eq!(small.resolve("many.test").unwrap().len(), 3);
    }

    #[test]
    fn test_lookup_failure_is_error_not_empty() {
        let err = resolver(MockLookup::Fail)
            .resolve("nope.invalid")
            .unwrap_err();
        match err {
            NetError::ResolutionFailed { domain, .. } => assert_eq!(domain, "nope.invalid"),
            other => panic!("Expected ResolutionFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_answer_is_empty_success() {
        let list = resolver(MockLookup::Answer(Vec::new()))
            .resolve("empty.test")
            .unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let resolver = resolver(MockLookup::Answer(vec!["::ffff:10.1.2.3".parse().unwrap()]));
        let first = resolver.resolve("a.test").unwrap();
        let second = resolver.resolve("a.test").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_cap_falls_back_to_default() {
        let ips: Vec<IpAddr> = (1..=12)
            .map(|i| IpAddr::V4(Ipv4Addr::new(10, 0, 0, i)))
            .collect();

        // builder
        let from_builder = AddressResolver::builder()
            .lookup(Arc::new(MockLookup::Answer(ips.clone())))
            .sink(Arc::new(NullSink))
            .max_addrs(0)
            .build();
        assert_eq!(from_builder.config().max_addrs, MAX_ADDRS);
        assert_eq!(from_builder.resolve("zero.test").unwrap().len(), MAX_ADDRS);

        // serde
        let config: ResolverConfig = serde_json::from_str(r#"{"max_addrs": 0}"#).unwrap();
        assert_eq!(config.max_addrs, MAX_ADDRS);

        // struct literal handed to the builder
        let from_config = AddressResolver::builder()
            .lookup(Arc::new(MockLookup::Answer(ips)))
            .sink(Arc::new(NullSink))
            .config(ResolverConfig { max_addrs: 0 })
            .build();
        assert_eq!(from_config.resolve("zero.test").unwrap().len(), MAX_ADDRS);

        assert_eq!(ResolverConfig { max_addrs: 0 }.normalized().max_addrs, MAX_ADDRS);
        assert_eq!(ResolverConfig { max_addrs: 2 }.normalized().max_addrs, 2);
    }

    #[test]
    fn test_config_defaults_and_serde() {
        assert_eq!(ResolverConfig::default().max_addrs, 10);

        let config: ResolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());

        let config: ResolverConfig = serde_json::from_str(r#"{"max_addrs": 4}"#).unwrap();
        assert_eq!(config.max_addrs, 4);

        let resolver = AddressResolver::builder().config(config).build();
        assert_eq!(resolver.config().max_addrs, 4);
        assert!(format!("{:?}", resolver).contains("max_addrs: 4"));
    }

    #[test]
    fn test_system_lookup_mapped_literal() {
        // IP literals never reach DNS
        let list = AddressResolver::builder()
            .sink(Arc::new(NullSink))
            .build()
            .resolve("::ffff:192.0.2.1")
            .unwrap();
        assert_eq!(list.as_slice(), ["192.0.2.1"]);
    }
}
