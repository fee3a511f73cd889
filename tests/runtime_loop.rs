// tests/runtime_loop.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::time::Duration;

use logwatch::engine::{Runtime, ShutdownFlag};
use logwatch::watch::WatchEventKind;
use logwatch_test_utils::builders::{Scenario, ScenarioBuilder, LOG_FILE};

async fn settle() {
    tokio::time::sleep(Duration::from_millis(40)).await;
}

#[tokio::test]
async fn runtime_matches_reaps_and_shuts_down() {
    init_tracing();

    let Scenario {
        fs,
        notifications,
        processes,
        core,
    } = ScenarioBuilder::new("ERROR").existing_log(b"").build();

    let shutdown = ShutdownFlag::new();
    let runtime = Runtime::new(core, shutdown.clone(), Duration::from_millis(10));

    let driver = {
        let notifications = notifications.clone();
        let processes = processes.clone();
        async move {
            settle().await;
            fs.append(LOG_FILE, b"ERROR first\n");
            notifications.emit(LOG_FILE, WatchEventKind::Modified);
            settle().await;

            // Action still running.
            fs.append(LOG_FILE, b"ERROR second\n");
            notifications.emit(LOG_FILE, WatchEventKind::Modified);
            settle().await;

            processes.finish_all();
            settle().await;

            fs.append(LOG_FILE, b"ERROR third\n");
            notifications.emit(LOG_FILE, WatchEventKind::ClosedAfterWrite);
            settle().await;

            shutdown.request();
        }
    };

    let (summary, ()) = with_timeout(async move { tokio::join!(runtime.run(), driver) }).await;
    let summary = summary.unwrap();

    assert_eq!(summary.matches, 3);
    assert_eq!(summary.actions.spawned, 2);
    assert_eq!(summary.actions.suppressed, 1);
    assert_eq!(processes.spawn_count(), 2);
    assert_eq!(notifications.subscription_count(), 0);
}

#[tokio::test]
async fn shutdown_before_start_exits_immediately() {
    let scenario = ScenarioBuilder::new("ERROR").existing_log(b"").build();
    let notifications = scenario.notifications.clone();

    let shutdown = ShutdownFlag::new();
    shutdown.request();
    let runtime = Runtime::new(scenario.core, shutdown, Duration::from_secs(60));

    let summary = with_timeout(runtime.run()).await.unwrap();
    assert_eq!(summary.matches, 0);
    assert_eq!(notifications.subscription_count(), 0);
}

#[tokio::test]
async fn rotation_through_the_runtime() {
    init_tracing();

    let scenario = ScenarioBuilder::new("ERROR").existing_log(b"ERROR old\n").build();
    let Scenario {
        fs,
        notifications,
        processes,
        core,
    } = scenario;

    let shutdown = ShutdownFlag::new();
    let runtime = Runtime::new(core, shutdown.clone(), Duration::from_millis(10));

    let driver = {
        let notifications = notifications.clone();
        async move {
            settle().await;
            fs.remove_file(LOG_FILE);
            notifications.emit(LOG_FILE, WatchEventKind::Deleted);
            fs.create_file(LOG_FILE, b"boot ok\nERROR new\n");
            notifications.emit(LOG_FILE, WatchEventKind::Created);
            settle().await;
            shutdown.request();
        }
    };

    let (summary, ()) = with_timeout(async move { tokio::join!(runtime.run(), driver) }).await;
    let summary = summary.unwrap();

    assert_eq!(summary.matches, 1);
    assert_eq!(processes.spawn_count(), 1);
}

#[tokio::test]
async fn degraded_file_watch_is_polled_on_tick() {
    let scenario = ScenarioBuilder::new("ERROR")
        .existing_log(b"")
        .fail_file_watch()
        .build();
    let Scenario { fs, core, .. } = scenario;

    let shutdown = ShutdownFlag::new();
    let runtime = Runtime::new(core, shutdown.clone(), Duration::from_millis(10));

    let driver = async move {
        settle().await;
        // No notification at all: only the periodic poll can see this.
        fs.append(LOG_FILE, b"ERROR quiet\n");
        settle().await;
        shutdown.request();
    };

    let (summary, ()) = with_timeout(async move { tokio::join!(runtime.run(), driver) }).await;
    assert_eq!(summary.unwrap().matches, 1);
}
