pub mod names;
mod registry;
mod scan;

pub use registry::{
    AtomicRegistry, Counter, Distribution, Gauge, MeterRegistry, MeterValue, Timer,
};
pub use scan::ScanMetrics;
