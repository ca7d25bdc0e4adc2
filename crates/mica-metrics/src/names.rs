//! The fixed namespace of scan metric names.
//!
//! Names are stable identifiers for dashboards; the table in
//! [`metric_fields`] is the documentation-facing mapping and is written out
//! explicitly rather than derived from the constants at runtime.

pub const SCAN_TIMES: &str = "mica.scan.times";
pub const SCAN_OPEN_FILES: &str = "mica.scan.files.open";
pub const SCAN_RESULTS: &str = "mica.scan.result";
pub const SCAN_YIELDS: &str = "mica.scan.yields";
pub const SCAN_START: &str = "mica.scan.start";
pub const SCAN_CONTINUE: &str = "mica.scan.continue";
pub const SCAN_CLOSE: &str = "mica.scan.close";
pub const SCAN_BUSY_TIMEOUT: &str = "mica.scan.busy.timeout.count";
pub const SCAN_QUERIES: &str = "mica.scan.queries";
pub const SCAN_QUERY_RESULTS: &str = "mica.scan.query.results";
pub const SCAN_QUERY_RESULT_BYTES: &str = "mica.scan.query.results.bytes";
pub const SCAN_SCANNED_ENTRIES: &str = "mica.scan.query.scanned.entries";
pub const SCAN_PAUSED_FOR_MEMORY: &str = "mica.scan.paused.for.memory";
pub const SCAN_RETURN_EARLY_FOR_MEMORY: &str = "mica.scan.return.early.for.memory";

/// (name, description) of every scan metric, for validation tooling and
/// generated docs.
pub fn metric_fields() -> &'static [(&'static str, &'static str)] {
    &[
        (SCAN_TIMES, "Scans"),
        (SCAN_OPEN_FILES, "Number of files open for scans"),
        (SCAN_RESULTS, "Results per scan"),
        (SCAN_YIELDS, "Count of scan yields"),
        (SCAN_START, "Calls to start a scan or multiscan"),
        (SCAN_CONTINUE, "Calls to continue a scan or multiscan"),
        (SCAN_CLOSE, "Calls to close a scan or multiscan"),
        (SCAN_BUSY_TIMEOUT, "Number of scans where a busy timeout happened"),
        (SCAN_QUERIES, "Number of queries"),
        (SCAN_QUERY_RESULTS, "Query rate (entries/sec)"),
        (SCAN_QUERY_RESULT_BYTES, "Query rate (bytes/sec)"),
        (SCAN_SCANNED_ENTRIES, "Scanned rate"),
        (SCAN_PAUSED_FOR_MEMORY, "Scan paused due to server being low on memory"),
        (
            SCAN_RETURN_EARLY_FOR_MEMORY,
            "Scan returned results early due to server being low on memory",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_no_duplicate_names() {
        let fields = metric_fields();
        for (i, (a, _)) in fields.iter().enumerate() {
            for (b, _) in fields.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn names_share_the_scan_prefix() {
        for (name, _) in metric_fields() {
            assert!(name.starts_with("mica.scan."), "{name}");
        }
    }
}
