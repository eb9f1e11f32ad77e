use async_trait::async_trait;
use chrono::{Local, NaiveTime, Timelike};
use serde::Serialize;
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tokio::{
    sync::Mutex,
    time::{interval_at, Instant},
};
use tracing::{debug, error, info};

pub const NOTIFICATION_TITLE: &str = "Habit Tracker";
pub const NOTIFICATION_BODY: &str = "What have you done today?";
/// Re-showing with the same tag replaces the earlier notification.
pub const NOTIFICATION_TAG: &str = "local-notification";
pub const VIBRATE_PATTERN: [u32; 3] = [200, 100, 200];
/// Where a notification click sends the user.
pub const APP_URL: &str = "/";

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    Default,
}

impl Permission {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "granted" => Some(Permission::Granted),
            "denied" => Some(Permission::Denied),
            "default" => Some(Permission::Default),
            _ => None,
        }
    }
}

#[async_trait]
pub trait PermissionPrompt: Send + Sync {
    async fn request_permission(&self) -> Permission;
}

/// Answers permission requests from configuration.
///
/// `Default` stays `Default`: nobody is around to answer the prompt.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredPermission {
    permission: Permission,
}

impl ConfiguredPermission {
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }
}

#[async_trait]
impl PermissionPrompt for ConfiguredPermission {
    async fn request_permission(&self) -> Permission {
        self.permission
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationOptions {
    pub body: String,
    pub tag: String,
    pub vibrate: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub vibrate: Vec<u32>,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn show_notification(&self, title: &str, options: NotificationOptions);
}

/// Notifications currently on display, one per tag.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    shown: Mutex<BTreeMap<String, Notification>>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn active(&self) -> Vec<Notification> {
        self.shown.lock().await.values().cloned().collect()
    }

    /// Closes the notification and returns the page to focus or open.
    pub async fn click(&self, tag: &str) -> &'static str {
        if self.shown.lock().await.remove(tag).is_some() {
            debug!(tag, "notification clicked");
        }
        APP_URL
    }
}

#[async_trait]
impl Notifier for NotificationCenter {
    async fn show_notification(&self, title: &str, options: NotificationOptions) {
        info!(title, tag = %options.tag, "showing notification");
        let notification = Notification {
            title: title.to_string(),
            body: options.body,
            tag: options.tag.clone(),
            vibrate: options.vibrate,
        };
        self.shown.lock().await.insert(options.tag, notification);
    }
}

/// Hours of the day that get a reminder, and how long after the hour one may fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderSchedule {
    pub target_hours: Vec<u32>,
    pub window_minutes: u32,
}

impl Default for ReminderSchedule {
    fn default() -> Self {
        Self {
            target_hours: vec![8, 12, 16, 20],
            window_minutes: 12,
        }
    }
}

impl ReminderSchedule {
    pub fn is_due(&self, time: NaiveTime) -> bool {
        self.target_hours.contains(&time.hour()) && time.minute() < self.window_minutes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Checking,
}

pub struct NotificationScheduler {
    schedule: ReminderSchedule,
    interval: Duration,
    permission: Arc<dyn PermissionPrompt>,
    notifier: Arc<dyn Notifier>,
    state: SchedulerState,
}

impl NotificationScheduler {
    pub fn new(
        schedule: ReminderSchedule,
        interval: Duration,
        permission: Arc<dyn PermissionPrompt>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            schedule,
            interval,
            permission,
            notifier,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// One timer firing. Returns whether a notification was shown.
    pub async fn check_at(&mut self, now: NaiveTime) -> bool {
        self.state = SchedulerState::Checking;
        let fired = if self.schedule.is_due(now) {
            self.notify().await
        } else {
            false
        };
        self.state = SchedulerState::Idle;
        fired
    }

    async fn notify(&self) -> bool {
        match self.permission.request_permission().await {
            Permission::Granted => {
                let options = NotificationOptions {
                    body: NOTIFICATION_BODY.to_string(),
                    tag: NOTIFICATION_TAG.to_string(),
                    vibrate: VIBRATE_PATTERN.to_vec(),
                };
                self.notifier.show_notification(NOTIFICATION_TITLE, options).await;
                true
            }
            Permission::Denied | Permission::Default => {
                error!("notification permission denied");
                false
            }
        }
    }

    /// Checks the local wall clock every interval, forever. The first check
    /// happens one interval after start.
    pub async fn run(mut self) {
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        loop {
            ticker.tick().await;
            let now = Local::now().time();
            self.check_at(now).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn scheduler(
        permission: Permission,
        center: Arc<NotificationCenter>,
    ) -> NotificationScheduler {
        NotificationScheduler::new(
            ReminderSchedule::default(),
            DEFAULT_INTERVAL,
            Arc::new(ConfiguredPermission::new(permission)),
            center,
        )
    }

    #[test]
    fn due_only_early_in_target_hours() {
        let schedule = ReminderSchedule::default();
        for hour in [8, 12, 16, 20] {
            assert!(schedule.is_due(at(hour, 0)));
            assert!(schedule.is_due(at(hour, 11)));
            assert!(!schedule.is_due(at(hour, 12)));
        }
        assert!(!schedule.is_due(at(8, 15)));
        assert!(!schedule.is_due(at(9, 5)));
        assert!(!schedule.is_due(at(0, 0)));
    }

    #[tokio::test]
    async fn fires_when_due_and_granted() {
        let center = Arc::new(NotificationCenter::new());
        let mut scheduler = scheduler(Permission::Granted, center.clone());

        assert!(scheduler.check_at(at(12, 3)).await);
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        let active = center.active().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, NOTIFICATION_TITLE);
        assert_eq!(active[0].body, NOTIFICATION_BODY);
        assert_eq!(active[0].vibrate, vec![200, 100, 200]);
    }

    #[tokio::test]
    async fn silent_outside_window() {
        let center = Arc::new(NotificationCenter::new());
        let mut scheduler = scheduler(Permission::Granted, center.clone());

        assert!(!scheduler.check_at(at(8, 15)).await);
        assert!(!scheduler.check_at(at(9, 5)).await);
        assert!(center.active().await.is_empty());
    }

    #[tokio::test]
    async fn denied_or_unanswered_permission_shows_nothing() {
        for permission in [Permission::Denied, Permission::Default] {
            let center = Arc::new(NotificationCenter::new());
            let mut scheduler = scheduler(permission, center.clone());
            assert!(!scheduler.check_at(at(20, 0)).await);
            assert!(center.active().await.is_empty());
        }
    }

    #[tokio::test]
    async fn same_tag_is_not_duplicated() {
        let center = Arc::new(NotificationCenter::new());
        let mut scheduler = scheduler(Permission::Granted, center.clone());

        // The 10 minute timer can land twice inside one 12 minute window.
        assert!(scheduler.check_at(at(16, 1)).await);
        assert!(scheduler.check_at(at(16, 11)).await);
        assert_eq!(center.active().await.len(), 1);
    }

    #[tokio::test]
    async fn click_closes_and_points_at_app() {
        let center = NotificationCenter::new();
        center
            .show_notification(
                NOTIFICATION_TITLE,
                NotificationOptions {
                    body: NOTIFICATION_BODY.into(),
                    tag: NOTIFICATION_TAG.into(),
                    vibrate: vec![],
                },
            )
            .await;

        assert_eq!(center.click(NOTIFICATION_TAG).await, "/");
        assert!(center.active().await.is_empty());
    }

    #[test]
    fn permission_parsing() {
        assert_eq!(Permission::parse("Granted"), Some(Permission::Granted));
        assert_eq!(Permission::parse("denied"), Some(Permission::Denied));
        assert_eq!(Permission::parse("default"), Some(Permission::Default));
        assert_eq!(Permission::parse("maybe"), None);
    }
}
