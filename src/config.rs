use crate::notifications::{Permission, DEFAULT_INTERVAL};
use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub static_dir: PathBuf,
    pub notification_permission: Permission,
    pub reminder_interval: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            data_path: PathBuf::from("data/habits.json"),
            static_dir: PathBuf::from("static"),
            notification_permission: Permission::Granted,
            reminder_interval: DEFAULT_INTERVAL,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source; bad values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(value) = lookup("PORT") {
            match value.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => warn!("ignoring invalid PORT '{value}'"),
            }
        }
        if let Some(path) = lookup("APP_DATA_PATH") {
            config.data_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("APP_STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup("APP_NOTIFICATION_PERMISSION") {
            match Permission::parse(&value) {
                Some(permission) => config.notification_permission = permission,
                None => warn!("ignoring invalid APP_NOTIFICATION_PERMISSION '{value}'"),
            }
        }
        if let Some(value) = lookup("APP_REMINDER_INTERVAL_SECS") {
            match value.parse::<u64>() {
                Ok(secs) if secs > 0 => config.reminder_interval = Duration::from_secs(secs),
                _ => warn!("ignoring invalid APP_REMINDER_INTERVAL_SECS '{value}'"),
            }
        }

        config
    }
}
