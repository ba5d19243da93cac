//! Authenticated sessions against the scan service

use crate::gate::{check_min_version, GateDecision};
use tokio::sync::OnceCell;
use tracing::{debug, info};
use xscan_config::Config;
use xscan_errors::{ConfigError, Error};
use xscan_net::NetClient;
use xscan_types::{ServiceConnection, ServiceVersion};

/// Build connection details from loosely supplied parameters
///
/// # Errors
///
/// Returns a `ConfigError` if the URL is missing or invalid, or if neither a
/// token nor a complete user/password pair is supplied.
pub fn build_connection(
    endpoint_base: &str,
    token: Option<&str>,
    user: Option<&str>,
    password: Option<&str>,
) -> Result<ServiceConnection, ConfigError> {
    ServiceConnection::build(endpoint_base, token, user, password)
}

/// Build connection details from the `[server]` configuration section
///
/// # Errors
///
/// See [`build_connection`].
pub fn connection_from_config(config: &Config) -> Result<ServiceConnection, ConfigError> {
    let server = &config.server;
    build_connection(
        server.url.as_deref().unwrap_or_default(),
        server.access_token.as_deref(),
        server.user.as_deref(),
        server.password.as_deref(),
    )
}

/// An authenticated connection plus the lazily fetched service version
///
/// Read-only once established; the version is fetched at most once and
/// shared by every caller.
pub struct SessionContext {
    net: NetClient,
    connection: ServiceConnection,
    version: OnceCell<ServiceVersion>,
}

impl SessionContext {
    /// Authenticate and open a session
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` if the service is unreachable or rejects the
    /// credentials.
    pub async fn establish(net: NetClient, connection: ServiceConnection) -> Result<Self, Error> {
        let connection = xscan_net::authenticate(&net, &connection).await?;
        debug!(url = %connection.base_url(), "session established");
        Ok(Self {
            net,
            connection,
            version: OnceCell::new(),
        })
    }

    /// The authenticated connection, with the service's canonical URL
    #[must_use]
    pub fn connection(&self) -> &ServiceConnection {
        &self.connection
    }

    #[must_use]
    pub fn net(&self) -> &NetClient {
        &self.net
    }

    /// Service version, fetched on first use
    ///
    /// # Errors
    ///
    /// Returns a `VersionError` if the version cannot be fetched or parsed.
    pub async fn version(&self) -> Result<&ServiceVersion, Error> {
        self.version
            .get_or_try_init(|| xscan_net::fetch_version(&self.net, &self.connection))
            .await
    }

    /// Gate on a minimum service version
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be fetched or `required` is
    /// not a valid version.
    pub async fn check_min_version(&self, required: Option<&str>) -> Result<GateDecision, Error> {
        let actual = self.version().await?;
        Ok(check_min_version(actual, required)?)
    }
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("connection", &self.connection)
            .field("version", &self.version.get())
            .finish_non_exhaustive()
    }
}

/// Outcome of preparing a verification run
#[derive(Debug)]
pub enum Readiness {
    Ready(SessionContext),
    Skipped { reason: String },
}

/// Prepare a session for verification runs
///
/// Disabled harnesses are skipped before any network traffic. Otherwise the
/// session is authenticated and gated on `required`.
///
/// # Errors
///
/// Returns a `ConfigError` for incomplete connection settings, an
/// `AuthError` for a failed handshake and a `VersionError` if the service
/// version cannot be determined.
pub async fn init_test(
    config: &Config,
    net: NetClient,
    required: Option<&str>,
) -> Result<Readiness, Error> {
    if !config.harness.enabled {
        return Ok(Readiness::Skipped {
            reason: format!(
                "scan service tests are disabled; enable with {}=true",
                xscan_config::constants::ENV_TESTS
            ),
        });
    }

    let connection = connection_from_config(config)?;
    let session = SessionContext::establish(net, connection).await?;

    match session.check_min_version(required).await? {
        GateDecision::Proceed => Ok(Readiness::Ready(session)),
        GateDecision::Skip { reason } => {
            info!(%reason, "skipping verification");
            Ok(Readiness::Skipped { reason })
        }
    }
}
