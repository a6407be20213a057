//! Connection string decomposition.
//!
//! The grammar is consumed left to right as a series of splits over an
//! immutable `&str`:
//!
//! ```text
//! [schema://][user[:password]@]host[:port][/path][?query]
//! ```
//!
//! Delimiters are searched in the fixed order `://`, `@`, `?`, `/`, `:`.
//! Each split only looks at what the previous one left over, so a `/` inside
//! the query never starts a path and a `:` inside the path never starts a
//! port. Only the final fields are copied into owned strings.

use super::record::Uri;
use crate::base::log::{LogLevel, LogSink, TracingSink};
use crate::base::neterror::NetError;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use zeroize::Zeroizing;

/// How the text after the port `:` is turned into a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortPolicy {
    /// Only ASCII digits that fit in a `u16`. Anything else is
    /// [`NetError::InvalidPort`].
    #[default]
    Strict,
    /// `atoi` semantics: leading whitespace and sign, then as many digits as
    /// are present. Text that yields no usable port becomes `0` (no port).
    Lenient,
}

/// Parser for connection strings.
///
/// Stateless apart from its configuration; one instance can be shared
/// across threads.
#[derive(Clone)]
pub struct UriParser {
    port_policy: PortPolicy,
    sink: Arc<dyn LogSink>,
}

impl UriParser {
    /// Creates a parser with [`PortPolicy::Strict`] logging to `tracing`.
    pub fn new() -> Self {
        Self {
            port_policy: PortPolicy::default(),
            sink: Arc::new(TracingSink),
        }
    }

    pub fn builder() -> UriParserBuilder {
        UriParserBuilder::new()
    }

    pub fn port_policy(&self) -> PortPolicy {
        self.port_policy
    }

    /// Parses `input` into a [`Uri`].
    pub fn parse(&self, input: &str) -> Result<Uri, NetError> {
        self.parse_opt(Some(input))
    }

    /// Parses a possibly absent input. `None` fails like an empty string.
    pub fn parse_opt(&self, input: Option<&str>) -> Result<Uri, NetError> {
        let mut rest = match input {
            Some(s) if !s.is_empty() => s,
            _ => return Err(self.fail(NetError::EmptyInput, "empty input")),
        };

        // schema://
        let mut schema = None;
        if let Some((scheme, tail)) = rest.split_once("://") {
            if scheme.is_empty() {
                return Err(self.fail(NetError::InvalidScheme, "unexpected schema"));
            }
            schema = Some(scheme);
            rest = tail;
        }

        // host must start with number or letter
        if !rest.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(self.fail(NetError::InvalidHost, "unexpected hostname"));
        }

        // user[:password]@
        let mut user = None;
        let mut password = None;
        if let Some((userinfo, tail)) = rest.split_once('@') {
            let name = match userinfo.split_once(':') {
                Some((name, pass)) => {
                    if pass.is_empty() {
                        return Err(self.fail(NetError::MissingPassword, "password missing"));
                    }
                    password = Some(pass);
                    name
                }
                None => userinfo,
            };
            // unreachable while the host-start check runs first, kept so
            // the check does not depend on that ordering
            if name.is_empty() {
                return Err(self.fail(NetError::MissingUser, "username missing"));
            }
            user = Some(name);
            rest = tail;
        }

        // host[:port][/path]?query
        let mut query = None;
        if let Some((head, tail)) = rest.split_once('?') {
            query = Some(tail);
            rest = head;
        }

        // host[:port]/path
        let mut path = None;
        if let Some((head, tail)) = rest.split_once('/') {
            path = Some(tail);
            rest = head;
        }

        // host:port
        let mut port = None;
        if let Some((head, tail)) = rest.split_once(':') {
            if tail.is_empty() {
                return Err(self.fail(NetError::MissingPort, "unexpected port"));
            }
            port = self.parse_port(tail)?;
            rest = head;
        }

        if rest.is_empty() {
            return Err(self.fail(NetError::MissingHost, "no hostname found"));
        }

        self.sink.log(
            LogLevel::Debug,
            format_args!("parsed uri for host {} (port {:?})", rest, port),
        );

        Ok(Uri {
            schema: schema.map(str::to_owned),
            user: user.map(str::to_owned),
            password: password.map(|p| Zeroizing::new(p.to_owned())),
            host: rest.to_owned(),
            port,
            path: path.map(str::to_owned),
            query: query.map(str::to_owned),
        })
    }

    fn parse_port(&self, text: &str) -> Result<Option<u16>, NetError> {
        let port = match self.port_policy {
            PortPolicy::Strict => {
                if !text.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(self.fail(NetError::InvalidPort, "port is not a number"));
                }
                text.parse::<u16>()
                    .map_err(|_| self.fail(NetError::InvalidPort, "port out of range"))?
            }
            PortPolicy::Lenient => atoi_port(text),
        };

        // 0 is the "no port" marker
        Ok((port != 0).then_some(port))
    }

    fn fail(&self, err: NetError, reason: &str) -> NetError {
        self.sink.log(LogLevel::Error, format_args!("{}", reason));
        err
    }
}

impl Default for UriParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UriParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UriParser")
            .field("port_policy", &self.port_policy)
            .finish_non_exhaustive()
    }
}

/// Parses `input` with a default [`UriParser`].
pub fn parse_uri(input: &str) -> Result<Uri, NetError> {
    UriParser::new().parse(input)
}

/// `atoi`-style port conversion. Negative, overflowing or digit-less input
/// yields 0.
fn atoi_port(text: &str) -> u16 {
    // C isspace also covers vertical tab
    let text = text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: u32 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = value * 10 + u32::from(b - b'0');
        if value > u32::from(u16::MAX) {
            return 0;
        }
    }

    if negative {
        return 0;
    }
    u16::try_from(value).unwrap_or(0)
}

/// Builder for [`UriParser`].
#[derive(Default)]
pub struct UriParserBuilder {
    port_policy: PortPolicy,
    sink: Option<Arc<dyn LogSink>>,
}

impl UriParserBuilder {
    /// Create new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how port text is converted.
    pub fn port_policy(mut self, policy: PortPolicy) -> Self {
        self.port_policy = policy;
        self
    }

    /// Set the diagnostics sink. Defaults to [`TracingSink`].
    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the parser.
    pub fn build(self) -> UriParser {
        UriParser {
            port_policy: self.port_policy,
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
        }
    }
}
