//! Operations context for dependency injection

use xscan_config::Config;
use xscan_errors::{Error, OpsError};
use xscan_net::NetClient;
use xscan_types::ServiceConnection;

/// Operations context providing access to the scan service
pub struct OpsCtx {
    /// Network client
    pub net: NetClient,
    /// Authenticated service connection
    pub connection: ServiceConnection,
    /// Effective configuration
    pub config: Config,
}

impl OpsCtx {
    // No public constructor - use OpsContextBuilder instead

    /// Base URL operations are sent to
    #[must_use]
    pub fn service_url(&self) -> &str {
        self.connection.base_url().as_str()
    }
}

/// Builder for operations context
pub struct OpsContextBuilder {
    net: Option<NetClient>,
    connection: Option<ServiceConnection>,
    config: Option<Config>,
}

impl OpsContextBuilder {
    /// Create new context builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            net: None,
            connection: None,
            config: None,
        }
    }

    /// Set network client
    #[must_use]
    pub fn with_net(mut self, net: NetClient) -> Self {
        self.net = Some(net);
        self
    }

    /// Set service connection
    #[must_use]
    pub fn with_connection(mut self, connection: ServiceConnection) -> Self {
        self.connection = Some(connection);
        self
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the context
    ///
    /// # Errors
    ///
    /// Returns an error if the network client or connection is missing.
    pub fn build(self) -> Result<OpsCtx, Error> {
        let net = self.net.ok_or_else(|| OpsError::ContextCreationFailed {
            message: "missing network client".to_string(),
        })?;

        let connection = self
            .connection
            .ok_or_else(|| OpsError::ContextCreationFailed {
                message: "missing service connection".to_string(),
            })?;

        Ok(OpsCtx {
            net,
            connection,
            config: self.config.unwrap_or_default(),
        })
    }
}

impl Default for OpsContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
