use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// Handles are cheap Arc-backed clones. Callers obtain them once at
// registration and keep them; nothing is looked up by name on a hot path.

#[derive(Clone, Default)]
pub struct Counter(Arc<AtomicU64>);

impl Counter {
    pub fn increment(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn value(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Gauge over state owned by the instrumented component; the registry reads
/// through the handle rather than polling a callback.
#[derive(Clone, Default)]
pub struct Gauge(Arc<AtomicI64>);

impl Gauge {
    pub fn add(&self, delta: i64) {
        self.0.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn set(&self, value: i64) {
        self.0.store(value, Ordering::Relaxed);
    }

    pub fn value(&self) -> i64 {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Default)]
struct TimerState {
    count: AtomicU64,
    total_micros: AtomicU64,
}

#[derive(Clone, Default)]
pub struct Timer(Arc<TimerState>);

impl Timer {
    pub fn record(&self, elapsed: Duration) {
        let micros = elapsed.as_micros().min(u64::MAX as u128) as u64;
        self.0.count.fetch_add(1, Ordering::Relaxed);
        self.0.total_micros.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.0.count.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> Duration {
        Duration::from_micros(self.0.total_micros.load(Ordering::Relaxed))
    }
}

#[derive(Default)]
struct DistributionState {
    count: AtomicU64,
    sum: AtomicU64,
    max: AtomicU64,
}

#[derive(Clone, Default)]
pub struct Distribution(Arc<DistributionState>);

impl Distribution {
    pub fn record(&self, value: u64) {
        self.0.count.fetch_add(1, Ordering::Relaxed);
        self.0.sum.fetch_add(value, Ordering::Relaxed);
        self.0.max.fetch_max(value, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.0.count.load(Ordering::Relaxed)
    }

    pub fn sum(&self) -> u64 {
        self.0.sum.load(Ordering::Relaxed)
    }

    pub fn max(&self) -> u64 {
        self.0.max.load(Ordering::Relaxed)
    }
}

/// Sink for named meters. Constructed explicitly at startup and passed to
/// each component's `register` call; no process-global registry exists.
pub trait MeterRegistry: Send + Sync {
    fn counter(&self, name: &'static str, description: &'static str) -> Counter;
    fn timer(&self, name: &'static str, description: &'static str) -> Timer;
    fn distribution(&self, name: &'static str, description: &'static str) -> Distribution;
    /// Attach a gauge over existing component state.
    fn gauge(&self, name: &'static str, description: &'static str, gauge: &Gauge);
}

enum Meter {
    Counter(Counter),
    Gauge(Gauge),
    Timer(Timer),
    Distribution(Distribution),
}

/// Exported view of one meter at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterValue {
    Count(u64),
    Value(i64),
    Timer { count: u64, total: Duration },
    Distribution { count: u64, sum: u64, max: u64 },
}

/// In-process registry backing every meter with atomics.
///
/// Registering the same name twice returns the existing handle, so a meter
/// has exactly one backing cell no matter how many components hold it.
#[derive(Default)]
pub struct AtomicRegistry {
    meters: Mutex<BTreeMap<&'static str, Meter>>,
}

impl AtomicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time values of every registered meter, for exporters and
    /// tests.
    pub fn snapshot(&self) -> BTreeMap<&'static str, MeterValue> {
        let meters = self.meters.lock().unwrap();
        meters
            .iter()
            .map(|(name, meter)| {
                let value = match meter {
                    Meter::Counter(c) => MeterValue::Count(c.value()),
                    Meter::Gauge(g) => MeterValue::Value(g.value()),
                    Meter::Timer(t) => MeterValue::Timer {
                        count: t.count(),
                        total: t.total(),
                    },
                    Meter::Distribution(d) => MeterValue::Distribution {
                        count: d.count(),
                        sum: d.sum(),
                        max: d.max(),
                    },
                };
                (*name, value)
            })
            .collect()
    }
}

impl MeterRegistry for AtomicRegistry {
    fn counter(&self, name: &'static str, _description: &'static str) -> Counter {
        let mut meters = self.meters.lock().unwrap();
        match meters
            .entry(name)
            .or_insert_with(|| Meter::Counter(Counter::default()))
        {
            Meter::Counter(c) => c.clone(),
            // name already registered under another kind: detached cell
            _ => Counter::default(),
        }
    }

    fn timer(&self, name: &'static str, _description: &'static str) -> Timer {
        let mut meters = self.meters.lock().unwrap();
        match meters
            .entry(name)
            .or_insert_with(|| Meter::Timer(Timer::default()))
        {
            Meter::Timer(t) => t.clone(),
            _ => Timer::default(),
        }
    }

    fn distribution(&self, name: &'static str, _description: &'static str) -> Distribution {
        let mut meters = self.meters.lock().unwrap();
        match meters
            .entry(name)
            .or_insert_with(|| Meter::Distribution(Distribution::default()))
        {
            Meter::Distribution(d) => d.clone(),
            _ => Distribution::default(),
        }
    }

    fn gauge(&self, name: &'static str, _description: &'static str, gauge: &Gauge) {
        let mut meters = self.meters.lock().unwrap();
        meters.insert(name, Meter::Gauge(gauge.clone()));
    }
}
