//! Scan service endpoints

use crate::client::NetClient;
use reqwest::StatusCode;
use tracing::{debug, info};
use xscan_errors::{AuthError, Error, NetworkError, VersionError};
use xscan_types::{GraphScanRequest, ScanResponse, ServiceConnection, ServiceVersion, VersionInfo};

/// Handshake endpoint used to validate credentials
pub const PING_PATH: &str = "api/v1/system/ping";
/// Endpoint reporting the service version
pub const VERSION_PATH: &str = "api/v1/system/version";
/// Endpoint accepting graph scan requests
pub const GRAPH_SCAN_PATH: &str = "api/v1/scan/graph";

/// Perform the authentication handshake
///
/// On success the returned connection carries the canonical base URL the
/// service answered from, which differs from the input when the ping was
/// redirected.
///
/// # Errors
///
/// The ping is sent once, without retries. Returns `AuthError::Unreachable`
/// when no response arrives,
/// `AuthError::Rejected` for 401/403 and `AuthError::HandshakeFailed` for
/// any other unsuccessful answer.
pub async fn authenticate(
    client: &NetClient,
    conn: &ServiceConnection,
) -> Result<ServiceConnection, Error> {
    let url_label = conn.base_url().to_string();
    let ping = conn.endpoint(PING_PATH).map_err(|e| AuthError::HandshakeFailed {
        url: url_label.clone(),
        cause: e.to_string(),
    })?;

    let response = match client.get_once(&ping, Some(conn.credential())).await {
        Ok(response) => response,
        Err(Error::Network(e)) => {
            return Err(AuthError::Unreachable {
                url: url_label,
                cause: e.to_string(),
            }
            .into())
        }
        Err(e) => return Err(e),
    };

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(AuthError::Rejected {
            url: url_label,
            status: status.as_u16(),
        }
        .into());
    }
    if !status.is_success() {
        return Err(AuthError::HandshakeFailed {
            url: url_label,
            cause: format!("unexpected HTTP status {status}"),
        }
        .into());
    }

    let canonical = response
        .url()
        .as_str()
        .strip_suffix(PING_PATH)
        .map(str::to_string);

    match canonical {
        Some(base) if base != url_label => {
            info!(from = %url_label, to = %base, "scan service redirected to canonical URL");
            conn.clone()
                .with_base_url(&base)
                .map_err(|e| {
                    AuthError::HandshakeFailed {
                        url: url_label,
                        cause: e.to_string(),
                    }
                    .into()
                })
        }
        _ => {
            debug!(url = %url_label, "authenticated with scan service");
            Ok(conn.clone())
        }
    }
}

/// Ask the service for its version
///
/// # Errors
///
/// Returns `VersionError::FetchFailed` when the service cannot be queried or
/// its answer is not a version payload, and `VersionError::InvalidVersion`
/// when the reported version string is malformed.
pub async fn fetch_version(
    client: &NetClient,
    conn: &ServiceConnection,
) -> Result<ServiceVersion, Error> {
    let fetch_failed = |message: String| VersionError::FetchFailed { message };

    let url = conn
        .endpoint(VERSION_PATH)
        .map_err(|e| fetch_failed(e.to_string()))?;

    let response = client
        .get(&url, Some(conn.credential()))
        .await
        .map_err(|e| fetch_failed(e.to_string()))?;

    if !response.status().is_success() {
        return Err(fetch_failed(format!("{url} answered HTTP {}", response.status())).into());
    }

    let info: VersionInfo = response
        .json()
        .await
        .map_err(|e| fetch_failed(format!("unreadable version payload: {e}")))?;

    let version = ServiceVersion::parse(&info.version)?;
    debug!(version = %version, revision = ?info.revision, "scan service version");
    Ok(version)
}

/// Submit one graph scan and decode its result
///
/// # Errors
///
/// Returns a network error if the request fails, the service answers with an
/// unsuccessful status or the response body is not a scan result.
pub async fn scan_graph(
    client: &NetClient,
    conn: &ServiceConnection,
    request: &GraphScanRequest,
) -> Result<ScanResponse, Error> {
    let url = conn
        .endpoint(GRAPH_SCAN_PATH)
        .map_err(|e| NetworkError::InvalidUrl(e.to_string()))?;

    debug!(component = %request.component_id, "submitting graph scan");
    let response = client
        .post_json(&url, Some(conn.credential()), request)
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .ok()
            .filter(|body| !body.trim().is_empty())
            .unwrap_or_else(|| status.to_string());
        return Err(NetworkError::HttpError {
            status: status.as_u16(),
            message,
        }
        .into());
    }

    response.json().await.map_err(|e| {
        NetworkError::InvalidResponse {
            url: url.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}
