pub mod actions;
pub mod app;
pub mod clipboard;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod navigation;
pub mod notifications;
pub mod offline;
pub mod presets;
pub mod repository;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::{HabitStore, JsonFileStore, MemoryStore};
