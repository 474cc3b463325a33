//! Event types passed between the endpoint and the relay processor.

use gbrelay_sdk::objects::OrderEvent;
use time::OffsetDateTime;

/// An authenticated delivery waiting for deferred processing.
#[derive(Debug, Clone)]
pub struct RelayJob {
    pub event: OrderEvent,
    /// When the endpoint acknowledged the delivery.
    pub received_at: OffsetDateTime,
}

impl RelayJob {
    pub fn new(event: OrderEvent) -> Self {
        Self {
            event,
            received_at: OffsetDateTime::now_utc(),
        }
    }
}
