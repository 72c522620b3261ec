//! End-to-end liveness scenarios driven through a push subscription.

use std::time::Duration;

use pulsewatch::{App, ChannelSource, MemoryDocumentStore, Monitor, Transition};
use pulsewatch_types::{ServerCount, Timestamp, Verdict};
use serde_json::json;

fn at(millis: u64) -> Timestamp {
    Timestamp::from_millis(millis)
}

fn heartbeat(uptime: u64) -> serde_json::Value {
    json!({"online": true, "uptimeSeconds": uptime})
}

#[test]
fn outage_and_recovery_with_one_second_ticks() {
    let (tx, source) = ChannelSource::create("botStatus");
    let mut app = App::new(Box::new(source), Monitor::new());

    tx.send(heartbeat(100)).unwrap();
    app.refresh(at(0));
    assert!(app.monitor.is_online());

    let mut went_offline_at = None;
    for second in 1..=130u64 {
        let now = at(second * 1_000);
        let refresh = app.refresh(now);
        if refresh.transitions.contains(&Transition::WentOffline { since: at(0) }) {
            went_offline_at = Some(now);
        }
        assert_eq!(app.monitor.is_online(), second * 1_000 <= 120_000, "t={}s", second);
    }
    assert_eq!(went_offline_at, Some(at(121_000)));
    assert_eq!(app.monitor.offline_duration(at(130_000)), Some(Duration::from_secs(130)));

    tx.send(heartbeat(101)).unwrap();
    app.refresh(at(130_500));
    assert!(app.monitor.is_online());
    assert_eq!(app.monitor.offline_since(), None);
}

#[test]
fn reconnect_replaying_the_same_record_does_not_keep_source_alive() {
    let (tx, source) = ChannelSource::create("botStatus");
    let mut app = App::new(Box::new(source), Monitor::new());

    tx.send(heartbeat(500)).unwrap();
    app.refresh(at(0));

    // Store client reconnects and re-delivers the unchanged value
    tx.send(heartbeat(500)).unwrap();
    let refresh = app.refresh(at(119_000));
    assert_eq!(refresh.received, 1);
    assert_eq!(refresh.fresh, 0);

    app.refresh(at(120_001));
    assert!(!app.monitor.is_online());
    assert_eq!(app.monitor.offline_since(), Some(at(0)));
}

#[test]
fn restart_recovers_and_reports_new_uptime() {
    let (tx, source) = ChannelSource::create("botStatus");
    let mut app = App::new(Box::new(source), Monitor::new());

    tx.send(heartbeat(86_400)).unwrap();
    app.refresh(at(0));
    app.refresh(at(200_000));
    assert!(!app.monitor.is_online());

    tx.send(heartbeat(0)).unwrap();
    let refresh = app.refresh(at(201_000));
    assert_eq!(refresh.transitions, vec![Transition::CameOnline]);

    let report = app.report(at(201_000));
    assert_eq!(report.verdict, Verdict::Online);
    assert_eq!(report.uptime_seconds, Some(0));
    assert_eq!(report.uptime.as_deref(), Some("0m 0s"));
}

#[test]
fn stale_self_reported_flag_is_overridden() {
    let (tx, source) = ChannelSource::create("botStatus");
    let mut app = App::new(Box::new(source), Monitor::new());

    tx.send(heartbeat(42)).unwrap();
    app.refresh(at(0));
    app.refresh(at(300_000));

    let report = app.report(at(300_000));
    assert_eq!(report.reported_online, Some(true));
    assert!(!report.online);
    assert_eq!(report.badge, "Down");
    assert_eq!(report.offline_for.as_deref(), Some("5m 0s"));
}

#[test]
fn status_report_with_unknown_and_known_server_count() {
    let (_tx, source) = ChannelSource::create("botStatus");
    let mut app = App::new(Box::new(source), Monitor::new());

    let mut store = MemoryDocumentStore::new();
    store.insert("botStats/serverCount", json!({"count": "lots"}));
    app.load_server_count(&store, "botStats/serverCount");
    assert_eq!(app.report(at(0)).server_count, ServerCount::Unknown);

    store.insert("botStats/serverCount", json!({"count": 2048}));
    app.load_server_count(&store, "botStats/serverCount");
    assert_eq!(app.report(at(0)).server_count, ServerCount::Known(2048));
}

#[test]
fn never_heard_from_source() {
    let (_tx, source) = ChannelSource::create("botStatus");
    let mut app = App::new(Box::new(source), Monitor::new());

    for second in 0..300u64 {
        let refresh = app.refresh(at(second * 1_000));
        assert!(refresh.transitions.is_empty());
    }

    let report = app.report(at(300_000));
    assert!(!report.online);
    assert_eq!(report.offline_since, None);
    assert_eq!(report.offline_for, None);
}
