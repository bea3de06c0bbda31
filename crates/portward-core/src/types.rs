//! Shared types used across portward crates.

use std::fmt;

/// The address under supervision.
///
/// Resolved once from configuration and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// `host:port`, suitable for `TcpStream::connect`.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Full URL for a path on this endpoint, e.g. `http://localhost:5555/health`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}:{}{}", self.host, self.port, path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_authority_and_url() {
        let ep = Endpoint::new("localhost", 5555);
        assert_eq!(ep.authority(), "localhost:5555");
        assert_eq!(ep.url("/health"), "http://localhost:5555/health");
        assert_eq!(ep.to_string(), "localhost:5555");
    }
}
