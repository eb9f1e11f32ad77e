use habit_tracker::{
    notifications::{ConfiguredPermission, NotificationScheduler, ReminderSchedule},
    offline::{CacheWorker, MemoryCacheStorage, StaticOrigin, CACHE_NAME, PRECACHE_ASSETS},
    presets::PresetHabits,
    router, AppConfig, AppState, JsonFileStore,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env();

    let store = JsonFileStore::open(config.data_path.clone()).await?;
    info!("habit store at {}", store.path().display());

    let assets = CacheWorker::new(
        CACHE_NAME,
        PRECACHE_ASSETS,
        StaticOrigin::new(config.static_dir.clone()),
        MemoryCacheStorage::new(),
    );
    match assets.install().await {
        Ok(()) => assets.activate().await,
        Err(err) => warn!("offline cache not installed: {err}"),
    }

    let state = AppState::new(Arc::new(store), PresetHabits::default(), assets);

    let scheduler = NotificationScheduler::new(
        ReminderSchedule::default(),
        config.reminder_interval,
        Arc::new(ConfiguredPermission::new(config.notification_permission)),
        state.notifications.clone(),
    );
    tokio::spawn(scheduler.run());

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
