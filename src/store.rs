//! Persistence of the last-known location selection.
//!
//! One record lives here: the string key `lastLocation` mapped to a JSON
//! `{uf, city}` body. Writes are last-write-wins; there is no versioning.

use crate::models::LocationSelection;
use crate::{Result, TempoError};
use fjall::Keyspace;
use std::path::Path;
use tokio::task;

const LAST_LOCATION_KEY: &str = "lastLocation";

/// Key-value store holding the persisted `LocationSelection`.
pub struct LocationStore {
    store: Keyspace,
}

fn get_from_store(store: Keyspace, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
    let value = store
        .get(key)
        .map_err(|e| TempoError::store(e.to_string()))?;
    Ok(value.map(|v| v.to_vec()))
}

impl LocationStore {
    /// Open (or create) the store at the given directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(&path)
            .open()
            .map_err(|e| TempoError::store(e.to_string()))?;
        let items = db
            .keyspace("state", fjall::KeyspaceCreateOptions::default)
            .map_err(|e| TempoError::store(e.to_string()))?;
        Ok(LocationStore { store: items })
    }

    /// Persist the selection, replacing any prior record.
    #[tracing::instrument(name = "save_location", level = "debug", skip(self))]
    pub async fn save(&self, selection: &LocationSelection) -> Result<()> {
        let store = self.store.clone();
        let key = LAST_LOCATION_KEY.as_bytes().to_vec();
        let bytes = serde_json::to_vec(selection).map_err(|e| TempoError::store(e.to_string()))?;

        task::spawn_blocking(move || store.insert(key, bytes))
            .await
            .map_err(|e| TempoError::store(e.to_string()))?
            .map_err(|e| TempoError::store(e.to_string()))?;
        Ok(())
    }

    /// Read back the persisted selection, if any.
    #[tracing::instrument(name = "load_location", level = "debug", skip(self))]
    pub async fn load(&self) -> Result<Option<LocationSelection>> {
        let store = self.store.clone();
        let key = LAST_LOCATION_KEY.as_bytes().to_vec();

        let maybe_bytes =
            task::spawn_blocking(move || get_from_store(store, key))
                .await
                .map_err(|e| TempoError::store(e.to_string()))??;

        match maybe_bytes {
            Some(bytes) => {
                let selection: LocationSelection = serde_json::from_slice(&bytes)
                    .map_err(|e| TempoError::store(e.to_string()))?;
                tracing::debug!(uf = %selection.uf, city = %selection.city, "loaded last location");
                Ok(Some(selection))
            }
            None => {
                tracing::debug!("no last location recorded");
                Ok(None)
            }
        }
    }

    /// Remove the persisted selection.
    pub async fn clear(&self) -> Result<()> {
        let store = self.store.clone();
        let key = LAST_LOCATION_KEY.as_bytes().to_vec();
        task::spawn_blocking(move || store.remove(key))
            .await
            .map_err(|e| TempoError::store(e.to_string()))?
            .map_err(|e| TempoError::store(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_selection_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocationStore::open(dir.path()).unwrap();

        let selection = LocationSelection::new("SP", "São Paulo");
        store.save(&selection).await.unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, Some(selection));
    }

    #[tokio::test]
    async fn test_empty_store_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocationStore::open(dir.path()).unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_overwrites_prior_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocationStore::open(dir.path()).unwrap();

        store
            .save(&LocationSelection::new("SP", "São Paulo"))
            .await
            .unwrap();
        store
            .save(&LocationSelection::new("RJ", "Niterói"))
            .await
            .unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.uf, "RJ");
        assert_eq!(loaded.city, "Niterói");
    }

    #[tokio::test]
    async fn test_clear_removes_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocationStore::open(dir.path()).unwrap();

        store
            .save(&LocationSelection::new("CE", "Fortaleza"))
            .await
            .unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.load().await.unwrap(), None);
    }

    #[test]
    fn test_record_layout_is_stable_json() {
        let selection = LocationSelection::new("SP", "São Paulo");
        let json = serde_json::to_string(&selection).unwrap();
        assert_eq!(json, r#"{"uf":"SP","city":"São Paulo"}"#);
    }
}
