//! Relay job queue.
//!
//! The webhook endpoint acknowledges a delivery and hands the parsed event
//! to the background [`RelayProcessor`](crate::processors::RelayProcessor)
//! as a [`RelayJob`]. Jobs are ephemeral: a job that is still queued when
//! the process exits is lost.

pub mod channels;
pub mod types;

pub use channels::{DEFAULT_CHANNEL_BUFFER, RelayJobReceiver, RelayJobSender, relay_job_channel};
pub use types::RelayJob;
