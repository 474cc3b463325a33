//! Relay job channel factory and handles.

use super::types::RelayJob;
use tokio::sync::mpsc;

/// Default buffer size for the relay job channel.
///
/// Large enough to absorb a burst of deliveries while keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for relay jobs.
pub type RelayJobSender = mpsc::Sender<RelayJob>;
/// Receiver handle for relay jobs.
pub type RelayJobReceiver = mpsc::Receiver<RelayJob>;

/// Create a new relay job channel.
///
/// The processor stops once every sender has been dropped and the
/// buffer is drained.
pub fn relay_job_channel() -> (RelayJobSender, RelayJobReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
