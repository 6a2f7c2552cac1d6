//! Shared wiring for coordinator integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;
use ticketing_core::environment::{CodeGenerator, RandomCodeGenerator};
use ticketing_core::providers::CatalogStore;
use ticketing_runtime::{PurchaseCoordinator, PurchaseEnvironment, PurchaseSettings, RetryPolicy};
use ticketing_testing::{
    InMemoryBuyerDirectory, InMemoryCatalogStore, InMemoryTicketStore, MockNotifier,
    NotifierBehavior, test_clock,
};

/// A coordinator over in-memory stores, with handles to inspect them.
pub struct Harness {
    pub coordinator: PurchaseCoordinator,
    pub catalog: InMemoryCatalogStore,
    pub buyers: InMemoryBuyerDirectory,
    pub tickets: InMemoryTicketStore,
    pub notifier: MockNotifier,
}

pub struct HarnessBuilder {
    catalog_override: Option<Arc<dyn CatalogStore>>,
    codes: Arc<dyn CodeGenerator>,
    notifier: NotifierBehavior,
    settings: PurchaseSettings,
    catalog: InMemoryCatalogStore,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            catalog_override: None,
            codes: Arc::new(RandomCodeGenerator::default()),
            notifier: NotifierBehavior::Succeed,
            settings: PurchaseSettings {
                retry: fast_retry(3),
                ..PurchaseSettings::default()
            },
            catalog: InMemoryCatalogStore::new(),
        }
    }

    /// Route catalog calls through a wrapper around the in-memory catalog
    pub fn catalog(mut self, wrap: impl FnOnce(InMemoryCatalogStore) -> Arc<dyn CatalogStore>) -> Self {
        self.catalog_override = Some(wrap(self.catalog.clone()));
        self
    }

    pub fn codes(mut self, codes: Arc<dyn CodeGenerator>) -> Self {
        self.codes = codes;
        self
    }

    pub fn notifier(mut self, behavior: NotifierBehavior) -> Self {
        self.notifier = behavior;
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.settings.retry = policy;
        self
    }

    pub fn notification_timeout(mut self, timeout: Duration) -> Self {
        self.settings.notification_timeout = timeout;
        self
    }

    pub fn build(self) -> Harness {
        init_tracing();

        let buyers = InMemoryBuyerDirectory::new();
        let tickets = InMemoryTicketStore::new();
        let notifier = MockNotifier::new(self.notifier);
        let catalog: Arc<dyn CatalogStore> = self
            .catalog_override
            .unwrap_or_else(|| Arc::new(self.catalog.clone()));

        let coordinator = PurchaseCoordinator::new(
            PurchaseEnvironment {
                catalog,
                buyers: Arc::new(buyers.clone()),
                tickets: Arc::new(tickets.clone()),
                notifier: Arc::new(notifier.clone()),
                codes: self.codes,
                clock: Arc::new(test_clock()),
            },
            self.settings,
        );

        Harness {
            coordinator,
            catalog: self.catalog,
            buyers,
            tickets,
            notifier,
        }
    }
}

/// Route coordinator logs to the test output (shown for failing tests).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn harness() -> Harness {
    HarnessBuilder::new().build()
}

pub fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy::builder()
        .max_retries(max_retries)
        .initial_delay(Duration::from_millis(1))
        .max_delay(Duration::from_millis(5))
        .build()
}
