//! Order relay processor.
//!
//! The relay is responsible for:
//! - Deduplicating deliveries by [`WebhookId`]
//! - Ignoring events other than `item.order.purchased`
//! - Sending the Discord notification through a [`Notifier`]
//!
//! An id is marked processed only after the notification was accepted.
//! When delivery fails the claim is released, so a retry from GameBoost
//! gets another chance instead of being swallowed as a duplicate.

use crate::config::DiscordConfig;
use crate::dedup::{Claim, DedupTracker};
use crate::events::{RelayJob, RelayJobReceiver};
use crate::notifier::{DeliveryError, Notifier};
use gbrelay_sdk::objects::{Order, OrderEvent, WebhookId};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Terminal state of one relayed event.
#[derive(Debug)]
pub enum RelayOutcome {
    /// The notification was sent.
    Processed,
    /// The id was already processed or is being processed.
    Deduped,
    /// The event type is not relayed.
    Ignored,
    /// Sending the notification failed.
    Failed(DeliveryError),
}

/// Dedupes and forwards order events. Cheap to clone.
#[derive(Clone)]
pub struct OrderRelay {
    dedup: DedupTracker,
    notifier: Arc<dyn Notifier>,
    discord: Arc<RwLock<DiscordConfig>>,
}

impl OrderRelay {
    pub fn new(
        dedup: DedupTracker,
        notifier: Arc<dyn Notifier>,
        discord: Arc<RwLock<DiscordConfig>>,
    ) -> Self {
        Self {
            dedup,
            notifier,
            discord,
        }
    }

    pub fn dedup(&self) -> &DedupTracker {
        &self.dedup
    }

    /// Relay an acknowledged delivery, at most once per [`WebhookId`].
    pub async fn relay(&self, event: &OrderEvent) -> RelayOutcome {
        let webhook_id = event.webhook_id();

        if !event.is_purchase() {
            info!(event = %event.event, %webhook_id, "Ignored event type");
            return RelayOutcome::Ignored;
        }

        let guard = match self.dedup.try_claim(&webhook_id) {
            Claim::Acquired(guard) => guard,
            Claim::AlreadyProcessed | Claim::InFlight => {
                info!(%webhook_id, "Webhook already processed");
                return RelayOutcome::Deduped;
            }
        };

        match self.send(&event.payload).await {
            Ok(()) => {
                guard.complete();
                info!(%webhook_id, "Processed webhook");
                RelayOutcome::Processed
            }
            Err(e) => {
                drop(guard);
                error!(%webhook_id, error = %e, "Failed to process webhook");
                RelayOutcome::Failed(e)
            }
        }
    }

    /// Forward a delivery without dedup.
    pub async fn relay_direct(&self, event: &OrderEvent) -> RelayOutcome {
        let webhook_id = event.webhook_id();

        if !event.is_purchase() {
            info!(event = %event.event, %webhook_id, "Ignored event type");
            return RelayOutcome::Ignored;
        }

        match self.send(&event.payload).await {
            Ok(()) => {
                info!(%webhook_id, "Notification sent");
                RelayOutcome::Processed
            }
            Err(e) => {
                error!(%webhook_id, error = %e, "Failed to send notification");
                RelayOutcome::Failed(e)
            }
        }
    }

    async fn send(&self, order: &Order) -> Result<(), DeliveryError> {
        // Clone so the lock is not held across the HTTP call.
        let webhook_url = self.discord.read().await.webhook_url.clone();
        self.notifier.send(order, &webhook_url).await
    }
}

/// Runs each queued [`RelayJob`] on its own task.
pub struct RelayProcessor {
    relay: OrderRelay,
    jobs: RelayJobReceiver,
}

impl RelayProcessor {
    pub fn new(relay: OrderRelay, jobs: RelayJobReceiver) -> Self {
        Self { relay, jobs }
    }

    /// Run until every job sender is dropped, then wait for in-flight jobs.
    pub async fn run(mut self) {
        info!("RelayProcessor started");
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                job = self.jobs.recv() => {
                    let Some(job) = job else {
                        info!("Relay job channel closed");
                        break;
                    };
                    let relay = self.relay.clone();
                    tasks.spawn(async move { handle_job(relay, job).await });
                }

                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    log_join(joined);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            log_join(joined);
        }

        info!("RelayProcessor shutdown complete");
    }
}

async fn handle_job(relay: OrderRelay, job: RelayJob) -> (WebhookId, RelayOutcome) {
    let queued = OffsetDateTime::now_utc() - job.received_at;
    debug!(
        event = %job.event.event,
        queued_ms = whole_millis(queued),
        "Processing relay job"
    );
    let outcome = relay.relay(&job.event).await;
    (job.event.webhook_id(), outcome)
}

/// Milliseconds in `duration`, saturating at the `i64` range.
fn whole_millis(duration: time::Duration) -> i64 {
    let millis = duration.whole_milliseconds();
    i64::try_from(millis).unwrap_or(if millis < 0 { i64::MIN } else { i64::MAX })
}

fn log_join(joined: Result<(WebhookId, RelayOutcome), tokio::task::JoinError>) {
    match joined {
        Ok((webhook_id, outcome)) => {
            debug!(%webhook_id, outcome = ?outcome, "Relay job finished");
        }
        Err(e) => {
            error!(error = %e, "Relay task aborted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::relay_job_channel;
    use gbrelay_sdk::objects::ORDER_PURCHASED;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use url::Url;

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Mutex<Vec<(String, Url)>>,
        fail: AtomicBool,
        delay: Option<Duration>,
    }

    impl RecordingNotifier {
        fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, order: &Order, webhook_url: &Url) -> Result<(), DeliveryError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(DeliveryError::Rejected {
                    status: 500,
                    body: "boom".to_owned(),
                });
            }
            self.sent
                .lock()
                .unwrap()
                .push((order.order_id(), webhook_url.clone()));
            Ok(())
        }
    }

    fn relay_with(notifier: Arc<RecordingNotifier>) -> OrderRelay {
        let discord = DiscordConfig::new(Url::parse("https://discord.test/api/webhooks/1/x").unwrap());
        OrderRelay::new(
            DedupTracker::new(),
            notifier,
            Arc::new(RwLock::new(discord)),
        )
    }

    fn event(name: &str, id: i64) -> OrderEvent {
        OrderEvent {
            event: name.to_owned(),
            payload: Order::with_id(id),
        }
    }

    #[tokio::test]
    async fn test_duplicate_delivery_notifies_once() {
        let notifier = Arc::new(RecordingNotifier::default());
        let relay = relay_with(notifier.clone());
        let purchase = event(ORDER_PURCHASED, 42);

        assert!(matches!(relay.relay(&purchase).await, RelayOutcome::Processed));
        assert!(matches!(relay.relay(&purchase).await, RelayOutcome::Deduped));

        assert_eq!(notifier.calls(), 1);
        let sent = notifier.sent.lock().unwrap();
        assert_eq!(sent[0].0, "42");
        assert_eq!(sent[0].1.as_str(), "https://discord.test/api/webhooks/1/x");
        assert!(relay.dedup().has_processed(&purchase.webhook_id()));
    }

    #[tokio::test]
    async fn test_other_events_are_ignored_and_not_marked() {
        let notifier = Arc::new(RecordingNotifier::default());
        let relay = relay_with(notifier.clone());
        let cancelled = event("item.order.cancelled", 42);

        assert!(matches!(relay.relay(&cancelled).await, RelayOutcome::Ignored));
        assert_eq!(notifier.calls(), 0);
        assert!(relay.dedup().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delivery_can_be_retried() {
        let notifier = Arc::new(RecordingNotifier::default());
        notifier.fail.store(true, Ordering::SeqCst);
        let relay = relay_with(notifier.clone());
        let purchase = event(ORDER_PURCHASED, 7);

        assert!(matches!(
            relay.relay(&purchase).await,
            RelayOutcome::Failed(DeliveryError::Rejected { status: 500, .. })
        ));
        assert!(!relay.dedup().has_processed(&purchase.webhook_id()));

        notifier.fail.store(false, Ordering::SeqCst);
        assert!(matches!(relay.relay(&purchase).await, RelayOutcome::Processed));
        assert_eq!(notifier.calls(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicates_notify_once() {
        let notifier = Arc::new(RecordingNotifier {
            delay: Some(Duration::from_millis(50)),
            ..Default::default()
        });
        let relay = relay_with(notifier.clone());
        let purchase = event(ORDER_PURCHASED, 99);

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let relay = relay.clone();
                let purchase = purchase.clone();
                tokio::spawn(async move { relay.relay(&purchase).await })
            })
            .collect();

        let mut processed = 0;
        for handle in handles {
            match handle.await.unwrap() {
                RelayOutcome::Processed => processed += 1,
                RelayOutcome::Deduped => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        assert_eq!(processed, 1);
        assert_eq!(notifier.calls(), 1);
    }

    #[tokio::test]
    async fn test_direct_relay_skips_dedup() {
        let notifier = Arc::new(RecordingNotifier::default());
        let relay = relay_with(notifier.clone());
        let purchase = event(ORDER_PURCHASED, 5);

        assert!(matches!(relay.relay_direct(&purchase).await, RelayOutcome::Processed));
        assert!(matches!(relay.relay_direct(&purchase).await, RelayOutcome::Processed));
        assert!(matches!(
            relay.relay_direct(&event("item.order.refunded", 5)).await,
            RelayOutcome::Ignored
        ));
        assert_eq!(notifier.calls(), 2);
        assert!(relay.dedup().is_empty());
    }

    #[tokio::test]
    async fn test_processor_drains_queue_on_close() {
        let notifier = Arc::new(RecordingNotifier::default());
        let relay = relay_with(notifier.clone());
        let (tx, rx) = relay_job_channel();

        for id in [1, 2, 2, 3] {
            tx.send(RelayJob::new(event(ORDER_PURCHASED, id))).await.unwrap();
        }
        tx.send(RelayJob::new(event("item.order.cancelled", 4)))
            .await
            .unwrap();
        drop(tx);

        tokio::time::timeout(Duration::from_secs(5), RelayProcessor::new(relay.clone(), rx).run())
            .await
            .unwrap();

        assert_eq!(notifier.calls(), 3);
        assert_eq!(relay.dedup().len(), 3);
    }

    #[test]
    fn test_whole_millis_saturates() {
        assert_eq!(whole_millis(time::Duration::milliseconds(1500)), 1500);
        assert_eq!(whole_millis(time::Duration::MAX), i64::MAX);
        assert_eq!(whole_millis(time::Duration::MIN), i64::MIN);
    }
}
