use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};
use wizard_flow::KeyValueStore;

use crate::models::ApplicationData;

/// Fixed key the submitted application is stored under.
pub const STORAGE_KEY: &str = "benefitsApplication";

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ID_LENGTH: usize = 9;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to save application data")]
    SaveFailed { reason: String },
}

/// A submitted application as written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredApplication {
    #[serde(flatten)]
    pub data: ApplicationData,
    pub application_id: String,
    pub submitted_at: DateTime<Utc>,
}

/// `APP-` followed by nine uppercase letters or digits.
pub fn generate_application_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_LENGTH)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("APP-{suffix}")
}

/// Reads and writes the submitted application through a [`KeyValueStore`].
#[derive(Clone)]
pub struct ApplicationStorage {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ApplicationStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Persist `data` under a fresh application id and return the id.
    pub async fn save(&self, data: &ApplicationData) -> Result<String, StorageError> {
        let record = StoredApplication {
            data: data.clone(),
            application_id: generate_application_id(),
            submitted_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).map_err(|e| StorageError::SaveFailed {
            reason: e.to_string(),
        })?;

        if let Err(e) = self.store.write(&self.key, json).await {
            error!(key = %self.key, error = %e, "Failed to write application");
            return Err(StorageError::SaveFailed {
                reason: e.to_string(),
            });
        }

        info!(application_id = %record.application_id, "Application saved");
        Ok(record.application_id)
    }

    /// The stored application, or `None` when absent or unreadable.
    pub async fn load(&self) -> Option<StoredApplication> {
        let raw = match self.store.read(&self.key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read application");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Stored application is not valid JSON");
                None
            }
        }
    }

    pub async fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key).await {
            warn!(key = %self.key, error = %e, "Failed to clear application");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FamilyFinancialInfo, PersonalInformation, SituationDescriptions};
    use async_trait::async_trait;
    use regex::Regex;
    use wizard_flow::{InMemoryStore, WizardError};

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn write(&self, _key: &str, _value: String) -> wizard_flow::Result<()> {
            Err(WizardError::StorageError("quota exceeded".into()))
        }

        async fn read(&self, _key: &str) -> wizard_flow::Result<Option<String>> {
            Err(WizardError::StorageError("unavailable".into()))
        }

        async fn remove(&self, _key: &str) -> wizard_flow::Result<()> {
            Err(WizardError::StorageError("unavailable".into()))
        }
    }

    fn sample() -> ApplicationData {
        ApplicationData {
            personal_information: PersonalInformation {
                name: "Fatima Al Mansoori".into(),
                email: "fatima@example.com".into(),
                ..Default::default()
            },
            family_financial_info: FamilyFinancialInfo {
                dependents: "2".into(),
                employment_status: "unemployed".into(),
                ..Default::default()
            },
            situation_descriptions: SituationDescriptions {
                reason_for_applying: "Support for my children".into(),
                ..Default::default()
            },
        }
    }

    #[tokio::test]
    async fn save_load_clear_round_trip() {
        let storage = ApplicationStorage::new(Arc::new(InMemoryStore::new()));
        let data = sample();

        let id = storage.save(&data).await.unwrap();
        assert!(Regex::new(r"^APP-[A-Z0-9]{9}$").unwrap().is_match(&id));

        let loaded = storage.load().await.unwrap();
        assert_eq!(loaded.data, data);
        assert_eq!(loaded.application_id, id);
        assert!(loaded.submitted_at <= Utc::now());

        storage.clear().await;
        assert!(storage.load().await.is_none());
    }

    #[tokio::test]
    async fn stored_json_is_flat_with_iso_timestamp() {
        let store = Arc::new(InMemoryStore::new());
        let storage = ApplicationStorage::new(store.clone());
        storage.save(&sample()).await.unwrap();

        let raw = store.read(STORAGE_KEY).await.unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(json.get("personalInformation").is_some());
        assert!(json.get("applicationId").is_some());
        let submitted_at = json["submittedAt"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(submitted_at).is_ok());
    }

    #[tokio::test]
    async fn unparseable_value_loads_as_none() {
        let store = Arc::new(InMemoryStore::new());
        store
            .write(STORAGE_KEY, "{not json".to_string())
            .await
            .unwrap();
        let storage = ApplicationStorage::new(store);
        assert!(storage.load().await.is_none());
    }

    #[tokio::test]
    async fn backend_failures() {
        let storage = ApplicationStorage::new(Arc::new(BrokenStore));
        let err = storage.save(&sample()).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to save application data");
        assert!(storage.load().await.is_none());
        storage.clear().await;
    }

    #[test]
    fn ids_are_well_formed() {
        let pattern = Regex::new(r"^APP-[A-Z0-9]{9}$").unwrap();
        for _ in 0..50 {
            assert!(pattern.is_match(&generate_application_id()));
        }
    }
}
