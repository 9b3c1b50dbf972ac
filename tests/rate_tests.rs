// Transactions-per-second tests: start time parsing, elapsed sign, per-instance summing

mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::{application, running, silent, stopped};
use fleetstats::models::InstanceState;
use fleetstats::stats::{ElapsedConvention, actual_transactions_per_second, transactions_per_second};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Collects formatted log output for assertions.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
}

#[test]
fn legacy_sign_gives_zero_for_instances_started_in_the_past() {
    let app = application(vec![running(&[
        ("transactions", "3600"),
        ("startedAt", "2024:01:01:00:00:00 GMT"),
    ])]);
    let rate = transactions_per_second(&app, at(1, 0, 0), ElapsedConvention::StartMinusNow);
    assert_eq!(rate, 0.0);
}

#[test]
fn legacy_sign_counts_start_times_in_the_future() {
    let app = application(vec![running(&[
        ("transactions", "7200"),
        ("startedAt", "2024:01:01:02:00:00 GMT"),
    ])]);
    let rate = transactions_per_second(&app, at(1, 0, 0), ElapsedConvention::StartMinusNow);
    assert_eq!(rate, 2.0);
}

#[test]
fn corrected_sign_uses_uptime() {
    let app = application(vec![
        running(&[
            ("transactions", "3600"),
            ("startedAt", "2024:01:01:00:00:00 GMT"),
        ]),
        stopped(&[
            ("transactions", "900"),
            ("startedAt", "2024:01:01:00:45:00 PST"),
        ]),
    ]);
    let rate = transactions_per_second(&app, at(1, 0, 0), ElapsedConvention::NowMinusStart);
    assert_eq!(rate, 1.0 + 1.0);
}

#[test]
fn elapsed_time_truncates_to_whole_seconds() {
    let started = at(0, 0, 0);
    let now = started + chrono::Duration::milliseconds(2_999);
    assert_eq!(
        ElapsedConvention::NowMinusStart.elapsed_secs(started, now),
        2
    );
    assert_eq!(
        ElapsedConvention::StartMinusNow.elapsed_secs(started, now),
        -2
    );
}

#[test]
fn sub_second_uptime_contributes_nothing() {
    let app = application(vec![running(&[
        ("transactions", "50"),
        ("startedAt", "2024:01:01:01:00:00 GMT"),
    ])]);
    let now = at(1, 0, 0) + chrono::Duration::milliseconds(400);
    assert_eq!(
        transactions_per_second(&app, now, ElapsedConvention::NowMinusStart),
        0.0
    );
}

#[test]
fn bad_start_time_only_drops_that_instance() {
    let app = application(vec![
        running(&[("transactions", "100"), ("startedAt", "01/01/2024 00:00")]),
        running(&[("transactions", "100")]),
        running(&[
            ("transactions", "600"),
            ("startedAt", "2024:01:01:00:50:00 GMT"),
        ]),
    ]);
    let rate = transactions_per_second(&app, at(1, 0, 0), ElapsedConvention::NowMinusStart);
    assert_eq!(rate, 1.0);
}

#[test]
fn bad_start_time_is_logged_with_instance_and_value() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let app = application(vec![
        running(&[
            ("transactions", "600"),
            ("startedAt", "2024:01:01:00:50:00 GMT"),
        ]),
        running(&[("transactions", "100"), ("startedAt", "01/01/2024 00:00")]),
    ]);
    let rate = tracing::subscriber::with_default(subscriber, || {
        transactions_per_second(&app, at(1, 0, 0), ElapsedConvention::NowMinusStart)
    });
    assert_eq!(rate, 1.0);

    let output = logs.contents();
    let line = output
        .lines()
        .find(|l| l.contains("unreadable start time"))
        .expect("warning emitted");
    assert!(line.contains("WARN"), "{line}");
    assert!(line.contains("instance=1"), "{line}");
    assert!(line.contains("01/01/2024 00:00"), "{line}");
}

#[test]
fn zero_or_unreadable_transactions_skip_the_instance() {
    let app = application(vec![
        running(&[("transactions", "0"), ("startedAt", "2024:01:01:00:00:00 GMT")]),
        running(&[("transactions", "?"), ("startedAt", "2024:01:01:00:00:00 GMT")]),
        silent(InstanceState::Running),
    ]);
    let rate = transactions_per_second(&app, at(1, 0, 0), ElapsedConvention::NowMinusStart);
    assert_eq!(rate, 0.0);
}

#[test]
fn actual_rate_uses_legacy_sign() {
    let app = application(vec![running(&[
        ("transactions", "1000"),
        ("startedAt", "2001:01:01:00:00:00 GMT"),
    ])]);
    assert_eq!(actual_transactions_per_second(&app), 0.0);
}
