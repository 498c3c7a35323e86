//! Remote blob-store boundary.
//!
//! The cloud transport is an external collaborator: an opaque store keyed by
//! a user-chosen sync identifier (a shared secret between devices). The core
//! only defines the blob shape, the error classification the UI branches its
//! messaging on, and a client-side timeout wrapper. No retries here; retry
//! policy belongs to the transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::types::{Employee, ShiftCatalog, StoreSchedule};

/// Client-side deadline for a single save/load round-trip
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(15);

/// Classified sync failures, surfaced verbatim to the caller
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("請輸入同步代碼")]
    EmptySyncId,

    #[error("找不到這個同步代碼的資料")]
    NotFound,

    #[error("權限不足：{0}")]
    PermissionDenied(String),

    #[error("連線異常：{0}")]
    Unavailable(String),

    #[error("連線逾時")]
    Timeout,
}

/// The aggregate blob exchanged with the remote store.
///
/// This is the project's employee/schedule/shift-definition data keyed per
/// store, not the Excel interchange format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudBackup {
    /// Store name → roster
    pub employees_map: HashMap<String, Vec<Employee>>,
    /// Shared shift-definition catalog
    pub shift_defs: ShiftCatalog,
    /// Store name → schedule map
    pub data: HashMap<String, StoreSchedule>,
    /// ISO timestamp of the writing device
    pub last_updated: String,
    pub version: u32,
}

/// Remote persistence boundary, implemented by the surrounding application
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Overwrite the blob stored under `sync_id`
    async fn save(&self, sync_id: &str, backup: &CloudBackup) -> Result<(), SyncError>;

    /// Fetch the blob stored under `sync_id`; `Ok(None)` means no record
    /// exists (distinct from transport failure)
    async fn load(&self, sync_id: &str) -> Result<Option<CloudBackup>, SyncError>;
}

/// Save through `store` with the standard client-side timeout
pub async fn save_with_timeout(
    store: &dyn RemoteStore,
    sync_id: &str,
    backup: &CloudBackup,
) -> Result<(), SyncError> {
    save_with_deadline(store, sync_id, backup, SYNC_TIMEOUT).await
}

/// Load through `store` with the standard client-side timeout
pub async fn load_with_timeout(
    store: &dyn RemoteStore,
    sync_id: &str,
) -> Result<Option<CloudBackup>, SyncError> {
    load_with_deadline(store, sync_id, SYNC_TIMEOUT).await
}

pub async fn save_with_deadline(
    store: &dyn RemoteStore,
    sync_id: &str,
    backup: &CloudBackup,
    deadline: Duration,
) -> Result<(), SyncError> {
    if sync_id.trim().is_empty() {
        return Err(SyncError::EmptySyncId);
    }
    tokio::time::timeout(deadline, store.save(sync_id, backup))
        .await
        .map_err(|_| SyncError::Timeout)?
}

pub async fn load_with_deadline(
    store: &dyn RemoteStore,
    sync_id: &str,
    deadline: Duration,
) -> Result<Option<CloudBackup>, SyncError> {
    if sync_id.trim().is_empty() {
        return Err(SyncError::EmptySyncId);
    }
    tokio::time::timeout(deadline, store.load(sync_id))
        .await
        .map_err(|_| SyncError::Timeout)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shift::default_catalog;
    use tokio::sync::Mutex;

    /// In-memory stand-in for the remote transport
    #[derive(Default)]
    struct MemoryStore {
        blobs: Mutex<HashMap<String, CloudBackup>>,
    }

    #[async_trait]
    impl RemoteStore for MemoryStore {
        async fn save(&self, sync_id: &str, backup: &CloudBackup) -> Result<(), SyncError> {
            self.blobs
                .lock()
                .await
                .insert(sync_id.to_string(), backup.clone());
            Ok(())
        }

        async fn load(&self, sync_id: &str) -> Result<Option<CloudBackup>, SyncError> {
            Ok(self.blobs.lock().await.get(sync_id).cloned())
        }
    }

    /// Transport that never answers, for timeout coverage
    struct StalledStore;

    #[async_trait]
    impl RemoteStore for StalledStore {
        async fn save(&self, _sync_id: &str, _backup: &CloudBackup) -> Result<(), SyncError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        }

        async fn load(&self, _sync_id: &str) -> Result<Option<CloudBackup>, SyncError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }
    }

    fn backup() -> CloudBackup {
        CloudBackup {
            employees_map: HashMap::new(),
            shift_defs: default_catalog(),
            data: HashMap::new(),
            last_updated: "2025-01-06T09:00:00Z".to_string(),
            version: 1,
        }
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let store = MemoryStore::default();
        save_with_timeout(&store, "my-pharmacy", &backup())
            .await
            .unwrap();

        let loaded = load_with_timeout(&store, "my-pharmacy").await.unwrap();
        assert_eq!(loaded, Some(backup()));
    }

    #[tokio::test]
    async fn test_load_missing_record_is_none() {
        let store = MemoryStore::default();
        let loaded = load_with_timeout(&store, "nobody").await.unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn test_blank_sync_id_rejected_before_transport() {
        let store = MemoryStore::default();
        assert!(matches!(
            save_with_timeout(&store, "  ", &backup()).await,
            Err(SyncError::EmptySyncId)
        ));
        assert!(matches!(
            load_with_timeout(&store, "").await,
            Err(SyncError::EmptySyncId)
        ));
    }

    #[tokio::test]
    async fn test_stalled_transport_times_out() {
        let store = StalledStore;
        let result =
            save_with_deadline(&store, "id", &backup(), Duration::from_millis(20)).await;
        assert!(matches!(result, Err(SyncError::Timeout)));

        let result = load_with_deadline(&store, "id", Duration::from_millis(20)).await;
        assert!(matches!(result, Err(SyncError::Timeout)));
    }

    #[test]
    fn test_backup_json_shape() {
        let json = serde_json::to_string(&backup()).unwrap();
        assert!(json.contains("\"employeesMap\""));
        assert!(json.contains("\"shiftDefs\""));
        assert!(json.contains("\"lastUpdated\""));

        let back: CloudBackup = serde_json::from_str(&json).unwrap();
        assert_eq!(back, backup());
    }
}
