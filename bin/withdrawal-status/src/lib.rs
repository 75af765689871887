use alloy_primitives::{Address, TxHash};
use alloy_provider::Provider;
use config::Config;
use eyre::eyre;
use tokio_util::sync::CancellationToken;
use tracing::info;
use withdrawal::{
    ContractReader, OutputProposal, OutputWaiter, ProtocolVersion, StatusResolver,
    WithdrawalStatus,
};

/// Portal version override from the config, if any.
pub fn portal_version(config: &Config) -> eyre::Result<Option<ProtocolVersion>> {
    let version = config
        .portal_version
        .as_deref()
        .map(ProtocolVersion::parse)
        .transpose()?;
    Ok(version)
}

/// Resolve the status of the first withdrawal initiated by `tx_hash` on L2.
pub async fn withdrawal_status<L1, L2>(
    l1_provider: L1,
    l2_provider: &L2,
    config: &Config,
    tx_hash: TxHash,
    proof_submitter: Option<Address>,
) -> eyre::Result<WithdrawalStatus>
where
    L1: Provider + Clone,
    L2: Provider,
{
    let receipt = l2_provider
        .get_transaction_receipt(tx_hash)
        .await?
        .ok_or_else(|| eyre!("Transaction {tx_hash} not found on L2"))?;

    let contracts = config.chain_contracts()?;
    info!(%tx_hash, portal = %contracts.portal, "Resolving withdrawal status");

    let mut resolver = StatusResolver::new(ContractReader::new(l1_provider), contracts);
    if let Some(proof_submitter) = proof_submitter {
        resolver = resolver.with_proof_submitter(proof_submitter);
    }

    let status = resolver
        .receipt_status(&receipt, portal_version(config)?)
        .await?;
    Ok(status)
}

/// Wait until an output proposal covers `l2_block`, or until `cancel` fires.
pub async fn wait_for_output<P>(
    l1_provider: P,
    config: &Config,
    l2_block: u64,
    cancel: CancellationToken,
) -> eyre::Result<OutputProposal>
where
    P: Provider + Clone,
{
    let waiter = OutputWaiter::new(
        ContractReader::new(l1_provider),
        config.chain_contracts()?,
        config.poll_interval(),
    )
    .with_cancellation(cancel);

    let output = waiter
        .wait_for_next_output(l2_block, portal_version(config)?)
        .await?;
    Ok(output)
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
