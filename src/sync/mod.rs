//! Cloud Sync Layer
//!
//! Best-effort mirror of per-range active products into a per-user metadata
//! blob. Pushes are debounced and fire-and-forget; pulls are gated so a cloud
//! snapshot is applied at most once per range — after that, local edits win
//! and are what gets pushed, never the reverse.

mod client;

pub use client::HttpMetadataClient;

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::domain::{ActiveProduct, DomainResult};

/// Field of the per-user metadata object holding the per-range product lists.
const METADATA_FIELD: &str = "activeProducts";

/// Remote per-user metadata blob. Read-modify-write of the whole object; no
/// partial patches.
#[async_trait]
pub trait ProfileMetadataClient: Send + Sync {
    /// Fetch the whole metadata object. Absent users yield an empty object.
    async fn fetch(&self, user_id: &str) -> DomainResult<Value>;

    /// Store the whole metadata object.
    async fn store(&self, user_id: &str, metadata: Value) -> DomainResult<()>;
}

struct PushRequest {
    range_key: String,
    products: Vec<ActiveProduct>,
}

pub struct CloudSync {
    tx: mpsc::UnboundedSender<PushRequest>,
    client: Arc<dyn ProfileMetadataClient>,
    user_id: String,
    hydrated: Mutex<HashSet<String>>,
}

impl CloudSync {
    /// Start the push worker. Must be called inside a tokio runtime.
    pub fn spawn(
        client: Arc<dyn ProfileMetadataClient>,
        user_id: impl Into<String>,
        debounce: Duration,
    ) -> Arc<Self> {
        let user_id = user_id.into();
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_worker(rx, client.clone(), user_id.clone(), debounce));
        Arc::new(Self {
            tx,
            client,
            user_id,
            hydrated: Mutex::new(HashSet::new()),
        })
    }

    /// Queue a push of the range's product list. Coalesced with other pushes
    /// landing within the debounce window; latest list per range wins. Never
    /// blocks and never reports back.
    pub fn schedule_push(&self, range_key: &str, products: Vec<ActiveProduct>) {
        log::debug!("Scheduling cloud push for {}", range_key);
        let request = PushRequest {
            range_key: range_key.to_string(),
            products,
        };
        if self.tx.send(request).is_err() {
            log::error!("Cloud sync worker is gone, push dropped");
        }
    }

    /// Fetch the cloud snapshot for a range, at most once per range per
    /// session. Later calls return `None` so local edits are never
    /// overwritten after hydration; a failed fetch also consumes the
    /// attempt.
    pub async fn hydrate(&self, range_key: &str) -> Option<Vec<ActiveProduct>> {
        {
            let mut gate = self.hydrated.lock().ok()?;
            if !gate.insert(range_key.to_string()) {
                return None;
            }
        }
        let metadata = match self.client.fetch(&self.user_id).await {
            Ok(metadata) => metadata,
            Err(e) => {
                log::error!("Cloud hydrate failed for {}: {}", range_key, e);
                return None;
            }
        };
        let entries = metadata.get(METADATA_FIELD)?.get(range_key)?.as_array()?;
        Some(
            entries
                .iter()
                .filter_map(|e| serde_json::from_value(e.clone()).ok())
                .collect(),
        )
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<PushRequest>,
    client: Arc<dyn ProfileMetadataClient>,
    user_id: String,
    debounce: Duration,
) {
    while let Some(first) = rx.recv().await {
        let mut latest: HashMap<String, Vec<ActiveProduct>> = HashMap::new();
        latest.insert(first.range_key, first.products);

        // Coalesce everything arriving within the window; the channel closing
        // flushes what we have and ends the worker.
        let mut closed = false;
        loop {
            match timeout(debounce, rx.recv()).await {
                Ok(Some(request)) => {
                    latest.insert(request.range_key, request.products);
                }
                Ok(None) => {
                    closed = true;
                    break;
                }
                Err(_) => break,
            }
        }

        for (range_key, products) in latest {
            push_range(client.as_ref(), &user_id, &range_key, products).await;
        }
        if closed {
            return;
        }
    }
}

/// Read-modify-write of the whole metadata object for one range. Failures are
/// logged and dropped; there is no retry queue.
async fn push_range(
    client: &dyn ProfileMetadataClient,
    user_id: &str,
    range_key: &str,
    products: Vec<ActiveProduct>,
) {
    let mut metadata = match client.fetch(user_id).await {
        Ok(Value::Object(map)) => Value::Object(map),
        Ok(_) => json!({}),
        Err(e) => {
            log::error!("Cloud fetch before push failed for {}: {}", range_key, e);
            return;
        }
    };

    let entry = match serde_json::to_value(&products) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Active products refused to serialize for push: {}", e);
            return;
        }
    };
    if !metadata[METADATA_FIELD].is_object() {
        metadata[METADATA_FIELD] = json!({});
    }
    metadata[METADATA_FIELD][range_key] = entry;

    if let Err(e) = client.store(user_id, metadata).await {
        log::error!("Cloud push failed for {}: {}", range_key, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, ProductScope};

    struct FakeClient {
        metadata: tokio::sync::Mutex<Value>,
        store_calls: tokio::sync::Mutex<u32>,
        fail: bool,
    }

    impl FakeClient {
        fn new(initial: Value) -> Arc<Self> {
            Arc::new(Self {
                metadata: tokio::sync::Mutex::new(initial),
                store_calls: tokio::sync::Mutex::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                metadata: tokio::sync::Mutex::new(json!({})),
                store_calls: tokio::sync::Mutex::new(0),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl ProfileMetadataClient for FakeClient {
        async fn fetch(&self, _user_id: &str) -> DomainResult<Value> {
            if self.fail {
                return Err(DomainError::Internal("offline".into()));
            }
            Ok(self.metadata.lock().await.clone())
        }

        async fn store(&self, _user_id: &str, metadata: Value) -> DomainResult<()> {
            if self.fail {
                return Err(DomainError::Internal("offline".into()));
            }
            *self.metadata.lock().await = metadata;
            *self.store_calls.lock().await += 1;
            Ok(())
        }
    }

    fn product(id: &str, name: &str) -> ActiveProduct {
        ActiveProduct {
            id: id.into(),
            name: name.into(),
            scope: ProductScope::InPeriod,
            until_date: None,
            prefer: false,
            note: None,
            hidden: false,
        }
    }

    #[tokio::test]
    async fn test_pushes_are_coalesced() {
        let client = FakeClient::new(json!({}));
        let sync = CloudSync::spawn(client.clone(), "user-1", Duration::from_millis(20));
        let range = "2024-01-01__2024-01-07";

        sync.schedule_push(range, vec![product("prod-1", "Кабачки")]);
        sync.schedule_push(range, vec![product("prod-1", "Кабачки"), product("prod-2", "Творог")]);
        sync.schedule_push(range, vec![product("prod-2", "Творог")]);

        tokio::time::sleep(Duration::from_millis(200)).await;

        // one store call, carrying only the latest list
        assert_eq!(*client.store_calls.lock().await, 1);
        let metadata = client.metadata.lock().await.clone();
        let entries = metadata["activeProducts"][range].as_array().unwrap().clone();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["name"], "Творог");
    }

    #[tokio::test]
    async fn test_ranges_push_independently() {
        let client = FakeClient::new(json!({}));
        let sync = CloudSync::spawn(client.clone(), "user-1", Duration::from_millis(20));

        sync.schedule_push("2024-01-01__2024-01-07", vec![product("prod-1", "Кабачки")]);
        sync.schedule_push("2024-01-08__2024-01-14", vec![product("prod-2", "Творог")]);

        tokio::time::sleep(Duration::from_millis(200)).await;

        let metadata = client.metadata.lock().await.clone();
        assert!(metadata["activeProducts"]["2024-01-01__2024-01-07"].is_array());
        assert!(metadata["activeProducts"]["2024-01-08__2024-01-14"].is_array());
    }

    #[tokio::test]
    async fn test_hydrate_applies_once() {
        let range = "2024-01-01__2024-01-07";
        let client = FakeClient::new(json!({
            "activeProducts": {
                range: [
                    {"id": "prod-1", "name": "Кабачки"},
                    {"bogus": true}
                ]
            }
        }));
        let sync = CloudSync::spawn(client, "user-1", Duration::from_millis(20));

        let first = sync.hydrate(range).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].name, "Кабачки");

        // second call is gated off: local edits win from here on
        assert!(sync.hydrate(range).await.is_none());
        // an unrelated range still hydrates
        assert!(sync.hydrate("2024-02-01__2024-02-07").await.is_none());
    }

    #[tokio::test]
    async fn test_failures_never_propagate() {
        let client = FakeClient::failing();
        let sync = CloudSync::spawn(client.clone(), "user-1", Duration::from_millis(10));

        assert!(sync.hydrate("2024-01-01__2024-01-07").await.is_none());
        sync.schedule_push("2024-01-01__2024-01-07", vec![product("prod-1", "Кабачки")]);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*client.store_calls.lock().await, 0);
    }
}
