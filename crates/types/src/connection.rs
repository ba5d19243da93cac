//! Connection details for the remote scan service

use std::fmt;
use url::Url;
use xscan_errors::ConfigError;

/// Credentials presented to the scan service
///
/// Exactly one form is ever populated.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Token { token: String },
    Basic { user: String, password: String },
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token { .. } => f.debug_struct("Token").field("token", &"***").finish(),
            Self::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// Base URL plus credentials for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConnection {
    base_url: Url,
    credential: Credential,
}

impl ServiceConnection {
    /// Build a connection from loosely supplied parameters
    ///
    /// A non-empty `token` takes precedence; otherwise both `user` and
    /// `password` must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` for an empty URL,
    /// `ConfigError::InvalidValue` for a URL that is not http(s), and
    /// `ConfigError::MissingCredentials` when no complete credential is given.
    pub fn build(
        endpoint_base: &str,
        token: Option<&str>,
        user: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let endpoint_base = endpoint_base.trim();
        if endpoint_base.is_empty() {
            return Err(ConfigError::MissingField {
                field: "url".to_string(),
            });
        }
        let base_url = parse_base_url(endpoint_base)?;

        let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);
        let credential = match (non_empty(token), non_empty(user), non_empty(password)) {
            (Some(token), _, _) => Credential::Token { token },
            (None, Some(user), Some(password)) => Credential::Basic { user, password },
            _ => return Err(ConfigError::MissingCredentials),
        };

        Ok(Self {
            base_url,
            credential,
        })
    }

    /// Replace the base URL, keeping the credential
    ///
    /// # Errors
    ///
    /// Returns an error if `url` is not a valid http(s) base URL.
    pub fn with_base_url(self, url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(url)?,
            credential: self.credential,
        })
    }

    /// Service base URL, always ending with a single `/`
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Resolve an API path relative to the base URL
    ///
    /// # Errors
    ///
    /// Returns an error if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }

    /// Render the connection as CLI flags
    #[must_use]
    pub fn credential_args(&self) -> Vec<String> {
        let mut args = vec![format!("--url={}", self.base_url)];
        match &self.credential {
            Credential::Token { token } => args.push(format!("--access-token={token}")),
            Credential::Basic { user, password } => {
                args.push(format!("--user={user}"));
                args.push(format!("--password={password}"));
            }
        }
        args
    }
}

/// Ensure `url` ends with exactly one `/`
#[must_use]
pub fn add_trailing_slash(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidValue {
        field: "url".to_string(),
        value: raw.to_string(),
    };
    let url = Url::parse(&add_trailing_slash(raw)).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(url)
}
