use crate::clipboard::SharedClipboard;
use crate::notifications::NotificationCenter;
use crate::offline::{CacheWorker, MemoryCacheStorage, StaticOrigin};
use crate::presets::PresetHabits;
use crate::storage::HabitStore;
use std::sync::Arc;

pub type AssetWorker = CacheWorker<StaticOrigin, MemoryCacheStorage>;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HabitStore>,
    pub presets: Arc<PresetHabits>,
    pub clipboard: Arc<SharedClipboard>,
    pub notifications: Arc<NotificationCenter>,
    pub assets: Arc<AssetWorker>,
}

impl AppState {
    pub fn new(store: Arc<dyn HabitStore>, presets: PresetHabits, assets: AssetWorker) -> Self {
        Self {
            store,
            presets: Arc::new(presets),
            clipboard: Arc::new(SharedClipboard::new()),
            notifications: Arc::new(NotificationCenter::new()),
            assets: Arc::new(assets),
        }
    }
}
