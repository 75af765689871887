use crate::{error::Result, reader::L1Reader, types::ProtocolVersion};
use alloy_primitives::Address;
use tracing::debug;

/// Read the protocol version governing a portal.
pub async fn resolve_version<R: L1Reader>(reader: &R, portal: Address) -> Result<ProtocolVersion> {
    let raw = reader.contract_version(portal).await?;
    let version = ProtocolVersion::parse(&raw)?;

    debug!(%portal, %version, path = ?version.path(), "Resolved portal version");
    Ok(version)
}

/// Use the caller's version when given, otherwise read it from the portal.
pub async fn version_or_resolve<R: L1Reader>(
    reader: &R,
    portal: Address,
    version: Option<ProtocolVersion>,
) -> Result<ProtocolVersion> {
    match version {
        Some(version) => Ok(version),
        None => resolve_version(reader, portal).await,
    }
}
