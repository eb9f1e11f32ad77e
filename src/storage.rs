use crate::errors::StoreError;
use crate::models::HabitRecord;
use async_trait::async_trait;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};
use tracing::error;

pub type HabitMap = BTreeMap<String, HabitRecord>;

/// Asynchronous key-value store of habit records, keyed by record id.
///
/// There are no transactions: concurrent writes to the same key are
/// last-write-wins and any ordering of the records is derived by the caller.
#[async_trait]
pub trait HabitStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<HabitRecord>, StoreError>;

    async fn set(&self, id: &str, record: HabitRecord) -> Result<(), StoreError>;

    /// Removing an id that is not stored is a no-op.
    async fn remove(&self, id: &str) -> Result<(), StoreError>;

    /// Visits every entry as `(value, key)`, in no particular order.
    async fn iterate(
        &self,
        visit: &mut (dyn for<'r> FnMut(&'r HabitRecord, &'r str) + Send),
    ) -> Result<(), StoreError>;

    async fn len(&self) -> Result<usize, StoreError> {
        let mut count = 0;
        self.iterate(&mut |_, _| count += 1).await?;
        Ok(count)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HabitMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HabitStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<HabitRecord>, StoreError> {
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn set(&self, id: &str, record: HabitRecord) -> Result<(), StoreError> {
        self.records.lock().await.insert(id.to_string(), record);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.records.lock().await.remove(id);
        Ok(())
    }

    async fn iterate(
        &self,
        visit: &mut (dyn for<'r> FnMut(&'r HabitRecord, &'r str) + Send),
    ) -> Result<(), StoreError> {
        let records = self.records.lock().await;
        for (key, value) in records.iter() {
            visit(value, key);
        }
        Ok(())
    }
}

/// Store backed by a JSON file; the whole map is rewritten after each mutation.
///
/// A mutation only becomes visible once the file write succeeded.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<HabitMap>,
}

impl JsonFileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let records = load_data(&path).await;
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HabitStore for JsonFileStore {
    async fn get(&self, id: &str) -> Result<Option<HabitRecord>, StoreError> {
        Ok(self.records.lock().await.get(id).cloned())
    }

    async fn set(&self, id: &str, record: HabitRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        let mut next = records.clone();
        next.insert(id.to_string(), record);
        persist_data(&self.path, &next).await?;
        *records = next;
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        if !records.contains_key(id) {
            return Ok(());
        }
        let mut next = records.clone();
        next.remove(id);
        persist_data(&self.path, &next).await?;
        *records = next;
        Ok(())
    }

    async fn iterate(
        &self,
        visit: &mut (dyn for<'r> FnMut(&'r HabitRecord, &'r str) + Send),
    ) -> Result<(), StoreError> {
        let records = self.records.lock().await;
        for (key, value) in records.iter() {
            visit(value, key);
        }
        Ok(())
    }
}

pub async fn load_data(path: &Path) -> HabitMap {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse data file: {err}");
                HabitMap::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => HabitMap::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            HabitMap::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &HabitMap) -> Result<(), StoreError> {
    let payload = serde_json::to_vec_pretty(data)?;
    fs::write(path, payload).await?;
    Ok(())
}
