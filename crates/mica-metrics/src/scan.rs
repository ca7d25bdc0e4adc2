use std::time::Duration;

use crate::names;
use crate::registry::{Counter, Distribution, Gauge, MeterRegistry, Timer};

/// Scan-path instrumentation.
///
/// The adder-backed gauges (lookups, query results, query bytes, scanned
/// entries, open files) live in this object and accumulate whether or not a
/// registry has been attached; [`register`](ScanMetrics::register) exposes
/// them to the sink and swaps the counter/timer/distribution handles for
/// registry-backed ones. Unregistered handles still count, they just aren't
/// exported.
pub struct ScanMetrics {
    open_files: Gauge,
    lookup_count: Gauge,
    query_result_count: Gauge,
    query_result_bytes: Gauge,
    scanned_count: Gauge,

    scans: Timer,
    results_per_scan: Distribution,
    yields: Distribution,
    start_scan_calls: Counter,
    continue_scan_calls: Counter,
    close_scan_calls: Counter,
    busy_timeout_count: Counter,
    paused_for_memory: Counter,
    early_return_for_memory: Counter,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self {
            open_files: Gauge::default(),
            lookup_count: Gauge::default(),
            query_result_count: Gauge::default(),
            query_result_bytes: Gauge::default(),
            scanned_count: Gauge::default(),
            scans: Timer::default(),
            results_per_scan: Distribution::default(),
            yields: Distribution::default(),
            start_scan_calls: Counter::default(),
            continue_scan_calls: Counter::default(),
            close_scan_calls: Counter::default(),
            busy_timeout_count: Counter::default(),
            paused_for_memory: Counter::default(),
            early_return_for_memory: Counter::default(),
        }
    }

    /// Attach every meter to the sink. Called once at startup; the returned
    /// handles are kept for the life of the process.
    pub fn register(&mut self, registry: &dyn MeterRegistry) {
        registry.gauge(
            names::SCAN_OPEN_FILES,
            "Number of files open for scans",
            &self.open_files,
        );
        registry.gauge(names::SCAN_QUERIES, "Number of queries", &self.lookup_count);
        registry.gauge(
            names::SCAN_QUERY_RESULTS,
            "Query rate (entries/sec)",
            &self.query_result_count,
        );
        registry.gauge(
            names::SCAN_QUERY_RESULT_BYTES,
            "Query rate (bytes/sec)",
            &self.query_result_bytes,
        );
        registry.gauge(names::SCAN_SCANNED_ENTRIES, "Scanned rate", &self.scanned_count);

        self.scans = registry.timer(names::SCAN_TIMES, "Scans");
        self.results_per_scan = registry.distribution(names::SCAN_RESULTS, "Results per scan");
        self.yields = registry.distribution(names::SCAN_YIELDS, "Count of scan yields");
        self.start_scan_calls =
            registry.counter(names::SCAN_START, "Calls to start a scan or multiscan");
        self.continue_scan_calls =
            registry.counter(names::SCAN_CONTINUE, "Calls to continue a scan or multiscan");
        self.close_scan_calls =
            registry.counter(names::SCAN_CLOSE, "Calls to close a scan or multiscan");
        self.busy_timeout_count = registry.counter(
            names::SCAN_BUSY_TIMEOUT,
            "Number of scans where a busy timeout happened",
        );
        self.paused_for_memory = registry.counter(
            names::SCAN_PAUSED_FOR_MEMORY,
            "Scan paused due to server being low on memory",
        );
        self.early_return_for_memory = registry.counter(
            names::SCAN_RETURN_EARLY_FOR_MEMORY,
            "Scan returned results early due to server being low on memory",
        );
    }

    pub fn increment_lookup_count(&self, amount: u64) {
        self.lookup_count.add(amount as i64);
    }

    pub fn lookup_count(&self) -> u64 {
        self.lookup_count.value() as u64
    }

    pub fn increment_query_result_count(&self, amount: u64) {
        self.query_result_count.add(amount as i64);
    }

    pub fn query_result_count(&self) -> u64 {
        self.query_result_count.value() as u64
    }

    pub fn increment_query_result_bytes(&self, amount: u64) {
        self.query_result_bytes.add(amount as i64);
    }

    pub fn query_result_bytes(&self) -> u64 {
        self.query_result_bytes.value() as u64
    }

    /// Handle for scan threads that bump the scanned-entries count directly.
    pub fn scanned_counter(&self) -> Gauge {
        self.scanned_count.clone()
    }

    pub fn scanned_count(&self) -> u64 {
        self.scanned_count.value() as u64
    }

    pub fn add_scan(&self, elapsed: Duration) {
        self.scans.record(elapsed);
    }

    pub fn add_result(&self, entries: u64) {
        self.results_per_scan.record(entries);
    }

    pub fn add_yield(&self, count: u64) {
        self.yields.record(count);
    }

    pub fn increment_open_files(&self, delta: i64) {
        self.open_files.add(delta.max(0));
    }

    pub fn decrement_open_files(&self, delta: i64) {
        self.open_files.add(-delta.abs());
    }

    pub fn open_files(&self) -> i64 {
        self.open_files.value()
    }

    pub fn increment_start_scan(&self, amount: u64) {
        self.start_scan_calls.increment(amount);
    }

    pub fn increment_continue_scan(&self, amount: u64) {
        self.continue_scan_calls.increment(amount);
    }

    pub fn increment_close_scan(&self, amount: u64) {
        self.close_scan_calls.increment(amount);
    }

    pub fn increment_busy(&self, amount: u64) {
        self.busy_timeout_count.increment(amount);
    }

    pub fn increment_scan_paused_for_low_memory(&self) {
        self.paused_for_memory.increment(1);
    }

    pub fn increment_early_return_for_low_memory(&self) {
        self.early_return_for_memory.increment(1);
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{AtomicRegistry, MeterValue};

    #[test]
    fn adders_accumulate_before_registration() {
        let metrics = ScanMetrics::new();
        metrics.increment_lookup_count(5);
        metrics.increment_query_result_bytes(1024);
        assert_eq!(metrics.lookup_count(), 5);
        assert_eq!(metrics.query_result_bytes(), 1024);
    }

    #[test]
    fn registration_exposes_adders_with_prior_counts() {
        let mut metrics = ScanMetrics::new();
        metrics.increment_lookup_count(5);

        let registry = AtomicRegistry::new();
        metrics.register(&registry);
        metrics.increment_lookup_count(2);

        assert_eq!(
            registry.snapshot().get(names::SCAN_QUERIES),
            Some(&MeterValue::Value(7))
        );
    }

    #[test]
    fn registered_counters_feed_snapshot() {
        let mut metrics = ScanMetrics::new();
        let registry = AtomicRegistry::new();
        metrics.register(&registry);

        metrics.increment_start_scan(1);
        metrics.increment_start_scan(1);
        metrics.increment_busy(1);
        metrics.add_scan(Duration::from_millis(40));
        metrics.add_result(12);

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.get(names::SCAN_START), Some(&MeterValue::Count(2)));
        assert_eq!(
            snapshot.get(names::SCAN_BUSY_TIMEOUT),
            Some(&MeterValue::Count(1))
        );
        assert_eq!(
            snapshot.get(names::SCAN_TIMES),
            Some(&MeterValue::Timer {
                count: 1,
                total: Duration::from_millis(40)
            })
        );
        assert_eq!(
            snapshot.get(names::SCAN_RESULTS),
            Some(&MeterValue::Distribution {
                count: 1,
                sum: 12,
                max: 12
            })
        );
    }

    #[test]
    fn open_files_moves_both_ways() {
        let metrics = ScanMetrics::new();
        metrics.increment_open_files(3);
        metrics.increment_open_files(-2); // negative increments are ignored
        metrics.decrement_open_files(1);
        assert_eq!(metrics.open_files(), 2);
    }

    #[test]
    fn scanned_counter_handle_is_shared() {
        let metrics = ScanMetrics::new();
        let handle = metrics.scanned_counter();
        handle.add(10);
        metrics.scanned_counter().add(5);
        assert_eq!(metrics.scanned_count(), 15);
    }
}
