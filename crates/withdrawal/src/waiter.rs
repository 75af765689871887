//! Waiting for an output proposal that covers a target L2 block.

use crate::{
    error::{Error, Result},
    metrics::Metrics,
    output::find_output,
    reader::L1Reader,
    types::{OutputProposal, ProtocolPath, ProtocolVersion},
    version::version_or_resolve,
};
use config::{ChainContracts, ContractName};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shortest delay between two output lookups.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls L1 until an output covering a target block is proposed.
///
/// The waiter owns a [`CancellationToken`]. Each wait runs under a child of that
/// token, so cancelling the parent stops every in-flight wait while a finished
/// wait only stops itself.
pub struct OutputWaiter<R> {
    reader: R,
    contracts: ChainContracts,
    poll_interval: Duration,
    cancel: CancellationToken,
    metrics: Metrics,
}

impl<R: L1Reader> OutputWaiter<R> {
    /// Intervals below [`MIN_POLL_INTERVAL`] are raised to it.
    pub fn new(reader: R, contracts: ChainContracts, poll_interval: Duration) -> Self {
        Self {
            reader,
            contracts,
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            cancel: CancellationToken::new(),
            metrics: Metrics::new(),
        }
    }

    /// Use a caller-owned token as the stop point.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that stops every wait in progress when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Wait until an output proposal covers `l2_block` and return it.
    ///
    /// Returns [`Error::Cancelled`] if the waiter's token is cancelled first. Any
    /// read failure other than "not proposed yet" ends the wait with that error.
    pub async fn wait_for_next_output(
        &self,
        l2_block: u64,
        version: Option<ProtocolVersion>,
    ) -> Result<OutputProposal> {
        if self.cancel.is_cancelled() {
            debug!(l2_block, "Output wait cancelled before start");
            return Err(Error::Cancelled);
        }

        let version = version_or_resolve(&self.reader, self.contracts.portal, version).await?;
        let path = version.path();

        let initial_delay = match path {
            ProtocolPath::Legacy => self.legacy_initial_delay(l2_block).await?,
            ProtocolPath::FaultProof => Duration::ZERO,
        };

        info!(
            l2_block,
            %version,
            initial_delay_secs = initial_delay.as_secs(),
            poll_interval_secs = self.poll_interval.as_secs(),
            "Waiting for output proposal"
        );

        let stop = self.cancel.child_token();
        let mut delay = initial_delay;

        loop {
            tokio::select! {
                biased;
                _ = stop.cancelled() => {
                    debug!(l2_block, "Output wait cancelled");
                    return Err(Error::Cancelled);
                }
                _ = sleep(delay) => {}
            }

            self.metrics.record_poll_tick(path);

            let lookup = tokio::select! {
                biased;
                _ = stop.cancelled() => {
                    debug!(l2_block, "Output wait cancelled during lookup");
                    return Err(Error::Cancelled);
                }
                lookup = find_output(&self.reader, &self.contracts, path, l2_block) => lookup,
            };

            match lookup {
                Ok(Some(output)) => {
                    stop.cancel();
                    self.metrics.record_output_found();
                    info!(
                        l2_block,
                        output_l2_block = output.l2_block_number,
                        output_root = %output.output_root,
                        "Output proposal available"
                    );
                    return Ok(output);
                }
                Ok(None) => {
                    debug!(
                        l2_block,
                        next_poll_secs = self.poll_interval.as_secs(),
                        "Output not proposed yet"
                    );
                    delay = self.poll_interval;
                }
                Err(e) => {
                    stop.cancel();
                    warn!(l2_block, error = %e, "Output lookup failed, stopping");
                    return Err(e);
                }
            }
        }
    }

    /// Delay before the first legacy lookup, from the oracle's submission cadence.
    async fn legacy_initial_delay(&self, l2_block: u64) -> Result<Duration> {
        let oracle = self.contracts.address(ContractName::L2OutputOracle)?;

        let (latest_index, submission_interval, l2_block_time, now) = tokio::join!(
            self.reader.latest_output_index(oracle),
            self.reader.submission_interval(oracle),
            self.reader.l2_block_time(oracle),
            self.reader.latest_l1_timestamp(),
        );
        let latest = self.reader.l2_output(oracle, latest_index?).await?;

        let seconds = estimate_seconds_to_next_output(
            l2_block,
            latest.l2_block_number,
            latest.timestamp,
            now?,
            submission_interval?,
            l2_block_time?,
        );

        debug!(
            l2_block,
            latest_output_l2_block = latest.l2_block_number,
            seconds,
            "Estimated time to next output"
        );
        Ok(Duration::from_secs(seconds))
    }
}

/// Seconds until the oracle is expected to publish an output covering `l2_block`.
///
/// Each submission is assumed to take 10% longer than its nominal interval.
/// Returns zero when the latest output already covers the block or when the
/// inputs give no usable cadence.
pub fn estimate_seconds_to_next_output(
    l2_block: u64,
    latest_output_l2_block: u64,
    latest_output_timestamp: u64,
    now: u64,
    submission_interval: u64,
    l2_block_time: u64,
) -> u64 {
    let interval = submission_interval.saturating_mul(l2_block_time);
    let interval_with_buffer = interval.saturating_mul(11).div_ceil(10);

    if interval_with_buffer == 0
        || latest_output_l2_block >= l2_block
        || now < latest_output_timestamp
    {
        return 0;
    }

    let elapsed_blocks = l2_block - latest_output_l2_block;
    let elapsed_seconds = now - latest_output_timestamp;
    let to_next_output = interval_with_buffer - elapsed_seconds % interval_with_buffer;

    if elapsed_blocks < submission_interval {
        to_next_output
    } else {
        (elapsed_blocks / submission_interval)
            .saturating_mul(interval_with_buffer)
            .saturating_add(to_next_output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // OP Mainnet cadence: 1800 blocks of 2 seconds, 3960 seconds with buffer
    const INTERVAL: u64 = 1800;
    const BLOCK_TIME: u64 = 2;

    fn estimate(l2_block: u64, now: u64) -> u64 {
        estimate_seconds_to_next_output(l2_block, 1_000, 10_000, now, INTERVAL, BLOCK_TIME)
    }

    #[test]
    fn test_estimate_within_next_submission() {
        assert_eq!(estimate(1_500, 10_100), 3_860);
    }

    #[test]
    fn test_estimate_several_submissions_ahead() {
        let target = 1_000 + 2 * INTERVAL + 5;
        assert_eq!(estimate(target, 10_100), 2 * 3_960 + 3_860);
    }

    #[test]
    fn test_estimate_wraps_elapsed_time() {
        // a late proposer does not produce a negative estimate
        assert_eq!(estimate(1_500, 10_000 + 3_960 + 60), 3_900);
    }

    #[test]
    fn test_estimate_zero_when_already_covered() {
        assert_eq!(estimate(900, 10_100), 0);
        assert_eq!(estimate(1_000, 10_100), 0);
    }

    #[test]
    fn test_estimate_zero_without_cadence() {
        let no_interval = estimate_seconds_to_next_output(1_500, 1_000, 10_000, 10_100, 0, 2);
        let no_block_time = estimate_seconds_to_next_output(1_500, 1_000, 10_000, 10_100, 1_800, 0);
        assert_eq!(no_interval, 0);
        assert_eq!(no_block_time, 0);
        // L1 head behind the latest output
        assert_eq!(estimate(1_500, 9_000), 0);
    }

    #[test]
    fn test_buffer_rounds_up() {
        // 3 * 1 * 1.1 = 3.3 -> 4
        assert_eq!(estimate_seconds_to_next_output(2, 1, 0, 0, 3, 1), 4);
    }
}
