//! # Application State
//!
//! Shared state for the Axum application: the three engine components
//! over one store, plus the store handle itself for operational seeding.

use std::sync::Arc;

use aqua_match::{
    AcceptanceCoordinator, MemoryStore, NotificationSink, OfferLifecycle, RequestCatalog,
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-side request catalog.
    pub catalog: RequestCatalog<MemoryStore>,
    /// Offer creation and withdrawal.
    pub offers: OfferLifecycle<MemoryStore>,
    /// The acceptance coordinator.
    pub acceptance: AcceptanceCoordinator<MemoryStore>,
    /// The backing store, exposed for seeding by the binary.
    pub store: Arc<MemoryStore>,
}

impl AppState {
    /// Wire the engine components over a store and notification sink.
    pub fn new(store: Arc<MemoryStore>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            catalog: RequestCatalog::new(Arc::clone(&store)),
            offers: OfferLifecycle::new(Arc::clone(&store), Arc::clone(&notifier)),
            acceptance: AcceptanceCoordinator::new(Arc::clone(&store), notifier),
            store,
        }
    }
}
