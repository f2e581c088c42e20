//! # Notification Boundary
//!
//! Fire-and-forget outbound events. The engine enqueues an event and
//! moves on: delivery (in-app, email, push) belongs entirely to the
//! external dispatcher, and an enqueue failure is logged by the caller
//! and never propagated as a failure of the triggering operation.
//! Acceptance correctness must not depend on notification delivery.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use aqua_core::{ConsumerId, OfferId, ProviderId, RequestId};

/// Outbound event payloads handed to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    /// A provider submitted a new offer on a registered consumer's request.
    NewOffer {
        /// The request owner to notify.
        recipient: ConsumerId,
        request_id: RequestId,
        offer_id: OfferId,
        provider_id: ProviderId,
        /// Quoted price, for the notification summary.
        price: u64,
    },
    /// The consumer accepted this provider's offer.
    OfferAccepted {
        /// The winning provider to notify.
        recipient: ProviderId,
        request_id: RequestId,
        offer_id: OfferId,
        /// Human-readable delivery window for the summary.
        delivery_window: String,
    },
}

/// Enqueue failure. Callers log this and continue.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The dispatcher side of the channel is gone.
    #[error("notification channel closed")]
    ChannelClosed,
}

/// Sink the engine hands events to. Implementations must not block.
pub trait NotificationSink: Send + Sync {
    /// Enqueue an event for eventual delivery.
    fn enqueue(&self, event: NotificationEvent) -> Result<(), NotifyError>;
}

/// Sink that records events to the tracing log only. Useful as a
/// default when no dispatcher is wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn enqueue(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        match &event {
            NotificationEvent::NewOffer {
                recipient,
                request_id,
                offer_id,
                ..
            } => {
                tracing::info!(%recipient, %request_id, %offer_id, "notify: new offer");
            }
            NotificationEvent::OfferAccepted {
                recipient,
                request_id,
                offer_id,
                ..
            } => {
                tracing::info!(%recipient, %request_id, %offer_id, "notify: offer accepted");
            }
        }
        Ok(())
    }
}

/// Sink backed by an unbounded channel; the dispatcher consumes the
/// receiving half on its own schedule.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<NotificationEvent>,
}

impl ChannelSink {
    /// Create a sink and the receiver the dispatcher will drain.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelSink {
    fn enqueue(&self, event: NotificationEvent) -> Result<(), NotifyError> {
        self.tx.send(event).map_err(|_| NotifyError::ChannelClosed)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Sinks for asserting engine notification behavior.

    use std::sync::Mutex;

    use super::*;

    /// Records every enqueued event.
    #[derive(Debug, Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<NotificationEvent>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<NotificationEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl NotificationSink for RecordingSink {
        fn enqueue(&self, event: NotificationEvent) -> Result<(), NotifyError> {
            self.events.lock().unwrap().push(event);
            Ok(())
        }
    }

    /// Always fails, for proving dispatch failures never surface.
    #[derive(Debug, Default)]
    pub struct FailingSink;

    impl NotificationSink for FailingSink {
        fn enqueue(&self, _event: NotificationEvent) -> Result<(), NotifyError> {
            Err(NotifyError::ChannelClosed)
        }
    }
}
