/// Bundled sample catalog, served without a backend
use crate::clients::{CatalogSource, Collection};
use crate::domain::RecordId;
use crate::errors::{ApiError, ApiResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

const BUNDLED_CATALOG: &str = include_str!("../../data/sample_catalog.json");

/// In-memory, read-only record store
#[derive(Clone, Debug, Default)]
pub struct SampleCatalog {
    records: Arc<HashMap<Collection, Vec<Value>>>,
}

impl SampleCatalog {
    /// Catalog shipped with the binary
    pub fn bundled() -> ApiResult<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Parse a catalog document keyed by collection name
    pub fn from_json(text: &str) -> ApiResult<Self> {
        let mut doc: HashMap<String, Vec<Value>> = serde_json::from_str(text)?;

        let mut records = HashMap::new();
        for collection in Collection::ALL {
            let items = doc.remove(Self::key(collection)).unwrap_or_default();
            records.insert(collection, items);
        }
        if let Some(unknown) = doc.keys().next() {
            return Err(ApiError::Config(format!(
                "sample catalog has unknown collection '{unknown}'"
            )));
        }

        Ok(Self {
            records: Arc::new(records),
        })
    }

    #[cfg(test)]
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (Collection, Vec<Value>)>,
    {
        Self {
            records: Arc::new(records.into_iter().collect()),
        }
    }

    const fn key(collection: Collection) -> &'static str {
        match collection {
            Collection::Rockets => "rockets",
            Collection::Launches => "launches",
            Collection::LaunchBases => "launch_bases",
            Collection::Companies => "companies",
            Collection::News => "news",
        }
    }

    pub fn len(&self, collection: Collection) -> usize {
        self.records.get(&collection).map_or(0, Vec::len)
    }

    fn find(&self, collection: Collection, id: &str) -> Option<&Value> {
        self.records.get(&collection)?.iter().find(|record| {
            record
                .get("id")
                .and_then(|v| serde_json::from_value::<RecordId>(v.clone()).ok())
                .is_some_and(|rid| rid.matches(id))
        })
    }
}

#[async_trait]
impl CatalogSource for SampleCatalog {
    fn name(&self) -> &'static str {
        "sample"
    }

    async fn fetch_all(&self, collection: Collection) -> ApiResult<Vec<Value>> {
        Ok(self.records.get(&collection).cloned().unwrap_or_default())
    }

    async fn fetch_one(&self, collection: Collection, id: &str) -> ApiResult<Option<Value>> {
        Ok(self.find(collection, id).cloned())
    }
}
