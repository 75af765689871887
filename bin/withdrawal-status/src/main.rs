//! CLI for OP Stack withdrawal status.
//!
//! - `status`: resolve the status of the withdrawal initiated by an L2 transaction
//! - `wait-output`: block until an output proposal covers an L2 block

use alloy_primitives::{Address, TxHash};
use clap::{Parser, Subcommand};
use config::Config;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use withdrawal_status::{install_prometheus_exporter, wait_for_output, withdrawal_status};

#[derive(Parser)]
#[command(name = "withdrawal-status")]
#[command(about = "Resolve OP Stack withdrawal status and wait for output proposals")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Serve Prometheus metrics on this port
    #[arg(long, env = "METRICS_PORT")]
    metrics_port: Option<u16>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the status of the withdrawal initiated by an L2 transaction
    Status {
        /// L2 transaction that initiated the withdrawal
        #[arg(long)]
        tx_hash: TxHash,

        /// Address whose proof is checked. Defaults to the withdrawal sender, so a
        /// withdrawal proven by a relayer reads as ready-to-prove unless this is set
        #[arg(long)]
        proof_submitter: Option<Address>,
    },

    /// Wait for an output proposal covering an L2 block
    WaitOutput {
        #[arg(long)]
        l2_block: u64,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_file(&cli.config)?;

    info!(
        l2_chain_id = config.l2_chain_id,
        l1_rpc_url = %config.l1_rpc_url,
        portal_version = ?config.portal_version,
        "Loaded config"
    );

    if let Some(port) = cli.metrics_port {
        install_prometheus_exporter(port)?;
        info!(port, "Serving metrics");
    }

    let l1_provider = client::create_provider(&config.l1_rpc_url)?;

    match cli.command {
        Command::Status {
            tx_hash,
            proof_submitter,
        } => {
            let l2_provider = client::create_provider(&config.l2_rpc_url)?;
            let status =
                withdrawal_status(l1_provider, &l2_provider, &config, tx_hash, proof_submitter)
                    .await?;

            if cli.json {
                let body = serde_json::json!({ "transactionHash": tx_hash, "status": status });
                println!("{body}");
            } else {
                println!("{status}");
            }
        }
        Command::WaitOutput { l2_block } => {
            let cancel = CancellationToken::new();
            let interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, cancelling wait");
                    interrupt.cancel();
                }
            });

            let output = wait_for_output(l1_provider, &config, l2_block, cancel).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "L2 block {} committed by output root {} at {}",
                    output.l2_block_number, output.output_root, output.timestamp
                );
            }
        }
    }

    Ok(())
}
