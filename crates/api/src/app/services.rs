use std::sync::Arc;
use std::thread::JoinHandle;

use ajaxgate_auth::Hs256NonceService;
use ajaxgate_events::{DispatchRecord, EventBus, InMemoryEventBus};
use ajaxgate_hub::TemplateLibrary;

use crate::config::GateConfig;
use crate::source::InMemoryEntityStore;

/// Bus the dispatcher publishes one record per request cycle to.
pub type RecordBus = Arc<InMemoryEventBus<DispatchRecord>>;

/// Infrastructure behind the dispatcher.
#[derive(Debug, Clone)]
pub struct Services {
    pub nonces: Arc<Hs256NonceService>,
    pub entities: Arc<InMemoryEntityStore>,
    pub templates: Arc<TemplateLibrary>,
    pub records: RecordBus,
}

pub fn build_services(config: &GateConfig) -> Services {
    Services {
        nonces: Arc::new(Hs256NonceService::new(
            config.nonce_secret.as_bytes(),
            config.nonce_ttl,
        )),
        entities: Arc::new(InMemoryEntityStore::new()),
        templates: Arc::new(TemplateLibrary::new()),
        records: Arc::new(InMemoryEventBus::new()),
    }
}

/// Log every dispatch record on a background thread (operator audit trail).
///
/// The thread ends once the bus is dropped and returns how many records it saw.
pub fn spawn_dispatch_log(records: &RecordBus) -> std::io::Result<JoinHandle<usize>> {
    let subscription = records.subscribe();
    std::thread::Builder::new()
        .name("dispatch-log".to_string())
        .spawn(move || {
            let mut seen = 0;
            while let Ok(record) = subscription.recv() {
                seen += 1;
                tracing::info!(
                    action = record.action.as_ref().map(|a| a.as_str()),
                    tier = %record.tier,
                    bad = record.bad,
                    at = %record.occurred_at,
                    "ajax dispatch"
                );
            }
            seen
        })
}
