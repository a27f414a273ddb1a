//! Database reachability probe.
//!
//! The bootstrapper only needs to know whether something is listening at the
//! configured address, so the probe is a single TCP connect with a timeout.
//! It does not speak the MongoDB wire protocol and does not authenticate.

use std::time::Duration;

use tokio::net::TcpStream;
use tracing::debug;
use url::Url;

use crate::error::ProbeError;

/// Port assumed when the connection URL names none.
pub const DEFAULT_MONGO_PORT: u16 = 27017;

/// How long a connection attempt may take before it is reported as a timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Reachability check for a database URL. A seam so flows can be exercised
/// without a live server.
#[allow(async_fn_in_trait)]
pub trait DatabaseProbe {
    async fn probe(&self, url: &str) -> Result<(), ProbeError>;
}

/// Probe that opens a TCP connection to the URL's host and port.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    timeout: Duration,
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TcpProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl DatabaseProbe for TcpProbe {
    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        let address = resolve_address(url)?;
        debug!(%address, "probing database");

        match tokio::time::timeout(self.timeout, TcpStream::connect(&address))
            .await
        {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(source)) => Err(ProbeError::Unreachable { address, source }),
            Err(_elapsed) => Err(ProbeError::TimedOut {
                address,
                timeout: self.timeout,
            }),
        }
    }
}

/// Extract `host:port` from a connection URL, defaulting the port to
/// [`DEFAULT_MONGO_PORT`].
fn resolve_address(url: &str) -> Result<String, ProbeError> {
    let parsed = Url::parse(url).map_err(|err| ProbeError::InvalidUrl {
        url: url.to_string(),
        reason: err.to_string(),
    })?;
    let host = parsed.host_str().ok_or_else(|| ProbeError::InvalidUrl {
        url: url.to_string(),
        reason: "no host in URL".to_string(),
    })?;
    let port = parsed.port().unwrap_or(DEFAULT_MONGO_PORT);
    Ok(format!("{host}:{port}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[test]
    fn address_defaults_to_mongo_port() {
        let address =
            resolve_address("mongodb://db.example.com/talawa").expect("resolve");
        assert_eq!(address, "db.example.com:27017");
    }

    #[test]
    fn explicit_port_is_kept() {
        let address =
            resolve_address("mongodb://127.0.0.1:40123/talawa").expect("resolve");
        assert_eq!(address, "127.0.0.1:40123");
    }

    #[test]
    fn malformed_url_is_rejected() {
        assert!(matches!(
            resolve_address("not a url"),
            Err(ProbeError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn probe_succeeds_against_a_listener() {
        let listener =
            TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let port = listener.local_addr().expect("local addr").port();

        let probe = TcpProbe::default();
        let url = format!("mongodb://127.0.0.1:{port}/talawa");
        probe.probe(&url).await.expect("probe should connect");
    }

    #[tokio::test]
    async fn probe_reports_refused_connection() {
        // Bind then drop so the port is very likely closed.
        let listener =
            TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);

        let probe = TcpProbe::new(Duration::from_secs(2));
        let url = format!("mongodb://127.0.0.1:{port}/talawa");
        let err = probe.probe(&url).await.expect_err("probe should fail");
        assert!(matches!(err, ProbeError::Unreachable { .. }));
    }
}
