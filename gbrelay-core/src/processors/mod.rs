//! Background processing of acknowledged deliveries.
//!
//! - `OrderRelay`: dedupes an order event and sends the notification
//! - `RelayProcessor`: receives `RelayJob`s and runs each through `OrderRelay`

pub mod order_relay;

pub use order_relay::{OrderRelay, RelayOutcome, RelayProcessor};
