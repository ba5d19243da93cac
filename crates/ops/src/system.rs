//! Scan service information

use crate::{OpsCtx, ServerInfo};
use xscan_errors::Error;

/// Report the version of the connected scan service
///
/// # Errors
///
/// Returns an error if the version cannot be fetched or is malformed.
pub async fn server_version(ctx: &OpsCtx) -> Result<ServerInfo, Error> {
    let version = xscan_net::fetch_version(&ctx.net, &ctx.connection).await?;
    Ok(ServerInfo {
        url: ctx.service_url().to_string(),
        version: version.to_string(),
    })
}
