// Cluster-wide aggregates over instance snapshots.
// Every operation is a read-only reduction: a missing snapshot, a missing key or a value that
// does not parse makes that instance contribute nothing, and the remaining instances still count.

pub mod parse;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{instrument, trace, warn};

use crate::models::{
    ACTIVE_SESSION_COUNT_KEY, AVERAGE_IDLE_TIME_KEY, AVERAGE_TRANSACTION_TIME_KEY,
    ApplicationSummary, ApplicationView, InstanceHandle, InstanceSnapshot, RunningSummary,
    TRANSACTION_COUNT_KEY,
};

/// Which instances of an application a reduction looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceFilter {
    All,
    Running,
}

impl InstanceFilter {
    fn admits<H: InstanceHandle>(self, instance: &H) -> bool {
        match self {
            InstanceFilter::All => true,
            InstanceFilter::Running => instance.is_running(),
        }
    }
}

/// Sign used when turning `startedAt` into a running time for the transaction rate.
///
/// `StartMinusNow` reproduces the legacy monitor: the difference is negative for any
/// instance started in the past, so those instances contribute no rate.
/// `NowMinusStart` yields the real uptime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElapsedConvention {
    #[default]
    StartMinusNow,
    NowMinusStart,
}

impl ElapsedConvention {
    /// Whole seconds between the two instants, truncated toward zero.
    pub fn elapsed_secs(self, started_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        let (from, to) = match self {
            ElapsedConvention::StartMinusNow => (now, started_at),
            ElapsedConvention::NowMinusStart => (started_at, now),
        };
        (to.timestamp_millis() - from.timestamp_millis()) / 1000
    }
}

/// Snapshots of the admitted instances, paired with the instance index for diagnostics.
fn snapshots<A: ApplicationView + ?Sized>(
    app: &A,
    filter: InstanceFilter,
) -> impl Iterator<Item = (usize, &InstanceSnapshot)> {
    app.instances()
        .iter()
        .enumerate()
        .filter(move |(_, instance)| filter.admits(*instance))
        .filter_map(|(index, instance)| instance.statistics().map(|s| (index, s)))
}

/// Sum of an integer counter over the admitted instances.
pub fn sum_counter<A: ApplicationView + ?Sized>(
    app: &A,
    filter: InstanceFilter,
    key: &'static str,
) -> u64 {
    snapshots(app, filter)
        .filter_map(|(index, snapshot)| match parse::count(snapshot, key) {
            Ok(value) => Some(value),
            Err(e) => {
                trace!(instance = index, error = %e, "counter skipped");
                None
            }
        })
        .fold(0, u64::saturating_add)
}

/// Transaction-weighted mean of a time field over the admitted instances.
/// Instances without a positive transaction count or a readable time are left out of
/// both numerator and denominator. Returns 0 when nothing is left.
pub fn weighted_time<A: ApplicationView + ?Sized>(
    app: &A,
    filter: InstanceFilter,
    key: &'static str,
) -> f64 {
    let (mean, weight) = snapshots(app, filter)
        .filter_map(|(index, snapshot)| {
            let transactions = parse::count(snapshot, TRANSACTION_COUNT_KEY).ok()?;
            if transactions == 0 {
                return None;
            }
            match parse::time(snapshot, key) {
                Ok(time) => Some((transactions, time)),
                Err(e) => {
                    trace!(instance = index, error = %e, "time skipped");
                    None
                }
            }
        })
        .fold((0.0_f64, 0.0_f64), |(mean, weight), (transactions, time)| {
            // Incremental update keeps the mean finite whenever every input time is finite.
            let weight = weight + transactions as f64;
            (mean + (transactions as f64 / weight) * (time - mean), weight)
        });

    if weight == 0.0 {
        return 0.0;
    }
    mean
}

pub fn total_transactions<A: ApplicationView + ?Sized>(app: &A) -> u64 {
    sum_counter(app, InstanceFilter::All, TRANSACTION_COUNT_KEY)
}

pub fn total_active_sessions<A: ApplicationView + ?Sized>(app: &A) -> u64 {
    sum_counter(app, InstanceFilter::All, ACTIVE_SESSION_COUNT_KEY)
}

/// Transactions of running instances only; 0 when nothing is running.
pub fn total_transactions_of_running<A: ApplicationView + ?Sized>(app: &A) -> u64 {
    sum_counter(app, InstanceFilter::Running, TRANSACTION_COUNT_KEY)
}

pub fn total_active_sessions_of_running<A: ApplicationView + ?Sized>(app: &A) -> u64 {
    sum_counter(app, InstanceFilter::Running, ACTIVE_SESSION_COUNT_KEY)
}

pub fn average_transaction_time_of_running<A: ApplicationView + ?Sized>(app: &A) -> f64 {
    weighted_time(app, InstanceFilter::Running, AVERAGE_TRANSACTION_TIME_KEY)
}

pub fn average_idle_time_of_running<A: ApplicationView + ?Sized>(app: &A) -> f64 {
    weighted_time(app, InstanceFilter::Running, AVERAGE_IDLE_TIME_KEY)
}

pub fn total_average_transaction_time<A: ApplicationView + ?Sized>(app: &A) -> f64 {
    weighted_time(app, InstanceFilter::All, AVERAGE_TRANSACTION_TIME_KEY)
}

pub fn total_average_idle_time<A: ApplicationView + ?Sized>(app: &A) -> f64 {
    weighted_time(app, InstanceFilter::All, AVERAGE_IDLE_TIME_KEY)
}

/// Rate of one instance; 0 unless it has transactions, a readable start and a positive running time.
fn instance_rate(
    index: usize,
    snapshot: &InstanceSnapshot,
    now: DateTime<Utc>,
    convention: ElapsedConvention,
) -> f64 {
    let transactions = match parse::count(snapshot, TRANSACTION_COUNT_KEY) {
        Ok(t) if t > 0 => t,
        _ => return 0.0,
    };
    let started_at = match parse::started_at(snapshot) {
        Ok(t) => t,
        Err(e) => {
            warn!(
                instance = index,
                error = %e,
                "unreadable start time; transactions per second is inaccurate"
            );
            return 0.0;
        }
    };
    let elapsed = convention.elapsed_secs(started_at, now);
    if elapsed > 0 {
        transactions as f64 / elapsed as f64
    } else {
        0.0
    }
}

/// Sum of per-instance transaction rates over all instances, measured at `now`.
pub fn transactions_per_second<A: ApplicationView + ?Sized>(
    app: &A,
    now: DateTime<Utc>,
    convention: ElapsedConvention,
) -> f64 {
    snapshots(app, InstanceFilter::All)
        .map(|(index, snapshot)| instance_rate(index, snapshot, now, convention))
        .sum()
}

/// Legacy rate: all instances, current UTC time, start-minus-now running time.
pub fn actual_transactions_per_second<A: ApplicationView + ?Sized>(app: &A) -> f64 {
    transactions_per_second(app, Utc::now(), ElapsedConvention::StartMinusNow)
}

/// All aggregates for one application at `now`.
#[instrument(skip(app), fields(instances = app.instances().len()))]
pub fn summarize<A: ApplicationView + ?Sized>(
    app: &A,
    now: DateTime<Utc>,
    convention: ElapsedConvention,
) -> ApplicationSummary {
    let instances = app.instances();
    ApplicationSummary {
        instance_count: instances.len(),
        running_instance_count: instances.iter().filter(|i| i.is_running()).count(),
        total_transactions: total_transactions(app),
        total_active_sessions: total_active_sessions(app),
        total_average_transaction_time: total_average_transaction_time(app),
        total_average_idle_time: total_average_idle_time(app),
        actual_transactions_per_second: transactions_per_second(app, now, convention),
        running: summarize_running(app),
    }
}

/// Aggregates restricted to running instances.
pub fn summarize_running<A: ApplicationView + ?Sized>(app: &A) -> RunningSummary {
    RunningSummary {
        total_transactions: total_transactions_of_running(app),
        total_active_sessions: total_active_sessions_of_running(app),
        average_transaction_time: average_transaction_time_of_running(app),
        average_idle_time: average_idle_time_of_running(app),
    }
}
