use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MetaError;
use crate::schema;

// ── Previous end row ──────────────────────────────────────────

/// Encode a tablet's lower boundary. `0x00` marks an unbounded (first)
/// tablet; otherwise `0x01` followed by the raw row bytes.
pub fn encode_prev_end_row(prev: Option<&[u8]>) -> Vec<u8> {
    match prev {
        None => vec![0x00],
        Some(row) => {
            let mut buf = Vec::with_capacity(1 + row.len());
            buf.push(0x01);
            buf.extend_from_slice(row);
            buf
        }
    }
}

pub fn decode_prev_end_row(value: &[u8]) -> Result<Option<Vec<u8>>, MetaError> {
    match value.split_first() {
        Some((0x00, [])) => Ok(None),
        Some((0x01, rest)) => Ok(Some(rest.to_vec())),
        _ => Err(MetaError::Encoding(
            "malformed previous end row marker".to_string(),
        )),
    }
}

// ── DataFileValue ─────────────────────────────────────────────

/// Size and entry count of one data file, stored as `{size},{entries}` in
/// decimal ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFileValue {
    pub size: u64,
    pub entries: u64,
}

impl DataFileValue {
    pub fn new(size: u64, entries: u64) -> Self {
        Self { size, entries }
    }

    pub fn encode(&self) -> Vec<u8> {
        format!("{},{}", self.size, self.entries).into_bytes()
    }

    pub fn decode(value: &[u8]) -> Result<Self, MetaError> {
        let text = std::str::from_utf8(value)
            .map_err(|_| MetaError::Encoding("data file value is not UTF-8".to_string()))?;
        let (size, entries) = text
            .split_once(',')
            .ok_or_else(|| MetaError::Encoding(format!("malformed data file value: {text}")))?;
        let parse = |s: &str| {
            s.parse::<u64>()
                .map_err(|_| MetaError::Encoding(format!("malformed data file value: {text}")))
        };
        Ok(Self {
            size: parse(size)?,
            entries: parse(entries)?,
        })
    }
}

// ── MetadataTime ──────────────────────────────────────────────

/// A tablet's logical or wall-clock timestamp. Encoded as a type character
/// (`L` logical, `M` millis) followed by the decimal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataTime {
    Logical(u64),
    Millis(u64),
}

impl MetadataTime {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            MetadataTime::Logical(t) => format!("L{t}"),
            MetadataTime::Millis(t) => format!("M{t}"),
        }
        .into_bytes()
    }

    pub fn decode(value: &[u8]) -> Result<Self, MetaError> {
        let text = std::str::from_utf8(value)
            .map_err(|_| MetaError::Encoding("time value is not UTF-8".to_string()))?;
        let malformed = || MetaError::Encoding(format!("malformed time value: {text}"));
        let (kind, rest) = text.split_at_checked(1).ok_or_else(malformed)?;
        let t = rest.parse::<u64>().map_err(|_| malformed())?;
        match kind {
            "L" => Ok(MetadataTime::Logical(t)),
            "M" => Ok(MetadataTime::Millis(t)),
            _ => Err(malformed()),
        }
    }
}

// ── Location ──────────────────────────────────────────────────

/// The three location families are mutually independent: a tablet can carry
/// a current, a future, and a last location at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationType {
    Current,
    Future,
    Last,
}

impl LocationType {
    pub fn family(&self) -> &'static str {
        match self {
            LocationType::Current => schema::CURRENT_LOCATION_FAMILY,
            LocationType::Future => schema::FUTURE_LOCATION_FAMILY,
            LocationType::Last => schema::LAST_LOCATION_FAMILY,
        }
    }
}

/// A session-identified server address: the session token is the qualifier,
/// the `host:port` the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub kind: LocationType,
    pub session: String,
    pub host_port: String,
}

impl Location {
    pub fn new(
        kind: LocationType,
        session: impl Into<String>,
        host_port: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            session: session.into(),
            host_port: host_port.into(),
        }
    }
}

// ── LockId ────────────────────────────────────────────────────

/// Identity of the service lock claiming ownership of a tablet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockId {
    pub path: String,
    pub session: u64,
}

impl LockId {
    pub fn new(path: impl Into<String>, session: u64) -> Self {
        Self {
            path: path.into(),
            session,
        }
    }

    /// Serialized relative to the coordination root, `{root}/{path}${session:x}`.
    pub fn serialize(&self, root: &str) -> String {
        format!("{root}/{}${:x}", self.path, self.session)
    }
}

// ── LogEntry ──────────────────────────────────────────────────

/// One write-ahead-log reference. The qualifier is `{server}/{filename}`;
/// the stored value is the filename alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub server: String,
    pub filename: String,
}

impl LogEntry {
    pub fn new(server: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            filename: filename.into(),
        }
    }

    pub fn qualifier(&self) -> String {
        format!("{}/{}", self.server, self.filename)
    }

    pub fn value(&self) -> Vec<u8> {
        self.filename.clone().into_bytes()
    }

    /// Parse a qualifier back into an entry. The server address never
    /// contains `/`, so the first separator splits the two parts.
    pub fn parse(qualifier: &str) -> Result<Self, MetaError> {
        let (server, filename) = qualifier
            .split_once('/')
            .filter(|(s, f)| !s.is_empty() && !f.is_empty())
            .ok_or_else(|| MetaError::Encoding(format!("malformed log entry: {qualifier}")))?;
        Ok(Self::new(server, filename))
    }
}

// ── SuspendingServer ──────────────────────────────────────────

/// Last server a tablet was assigned to before suspension, with the
/// suspension timestamp. Stored as `{host:port}|{millis}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspendingServer {
    pub host_port: String,
    pub suspension_time: u64,
}

impl SuspendingServer {
    pub fn new(host_port: impl Into<String>, suspension_time: u64) -> Self {
        Self {
            host_port: host_port.into(),
            suspension_time,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        format!("{}|{}", self.host_port, self.suspension_time).into_bytes()
    }

    pub fn decode(value: &[u8]) -> Result<Self, MetaError> {
        let text = std::str::from_utf8(value)
            .map_err(|_| MetaError::Encoding("suspension value is not UTF-8".to_string()))?;
        let (host_port, millis) = text
            .rsplit_once('|')
            .ok_or_else(|| MetaError::Encoding(format!("malformed suspension value: {text}")))?;
        let suspension_time = millis
            .parse::<u64>()
            .map_err(|_| MetaError::Encoding(format!("malformed suspension value: {text}")))?;
        Ok(Self::new(host_port, suspension_time))
    }
}

// ── Bulk import transaction ids ───────────────────────────────

/// Format the transaction id a bulk-imported file originated from.
pub fn format_tx_id(tid: u64) -> String {
    format!("tx-{tid:016x}")
}

pub fn parse_tx_id(value: &str) -> Result<u64, MetaError> {
    value
        .strip_prefix("tx-")
        .and_then(|hex| u64::from_str_radix(hex, 16).ok())
        .ok_or_else(|| MetaError::Encoding(format!("malformed transaction id: {value}")))
}

// ── External compactions ──────────────────────────────────────

/// Canonical id of an external compaction job, `ECID:{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalCompactionId(String);

impl ExternalCompactionId {
    pub fn new(id: impl AsRef<str>) -> Self {
        let id = id.as_ref();
        match id.strip_prefix("ECID:") {
            Some(_) => Self(id.to_string()),
            None => Self(format!("ECID:{id}")),
        }
    }

    pub fn canonical(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalCompactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Completion metadata of an external compaction, stored as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalCompactionMeta {
    pub job_files: Vec<String>,
    pub compact_tmp_name: String,
    pub compactor: String,
    pub priority: i16,
    pub propagate_deletes: bool,
}

impl ExternalCompactionMeta {
    pub fn to_json(&self) -> Result<String, MetaError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, MetaError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prev_end_row_roundtrip() {
        assert_eq!(decode_prev_end_row(&encode_prev_end_row(None)).unwrap(), None);
        let row = b"m\x00n".to_vec();
        assert_eq!(
            decode_prev_end_row(&encode_prev_end_row(Some(&row))).unwrap(),
            Some(row)
        );
    }

    #[test]
    fn prev_end_row_rejects_garbage() {
        assert!(decode_prev_end_row(&[]).is_err());
        assert!(decode_prev_end_row(&[0x02, b'x']).is_err());
        assert!(decode_prev_end_row(&[0x00, b'x']).is_err());
    }

    #[test]
    fn data_file_value_roundtrip() {
        let dfv = DataFileValue::new(123_456, 789);
        assert_eq!(dfv.encode(), b"123456,789");
        assert_eq!(DataFileValue::decode(&dfv.encode()).unwrap(), dfv);
    }

    #[test]
    fn data_file_value_rejects_garbage() {
        assert!(DataFileValue::decode(b"123456").is_err());
        assert!(DataFileValue::decode(b"a,b").is_err());
        assert!(DataFileValue::decode(&[0xff, b',', b'1']).is_err());
    }

    #[test]
    fn time_roundtrip() {
        for time in [MetadataTime::Logical(42), MetadataTime::Millis(1_699_000_000_000)] {
            assert_eq!(MetadataTime::decode(&time.encode()).unwrap(), time);
        }
    }

    #[test]
    fn time_rejects_garbage() {
        assert!(MetadataTime::decode(b"").is_err());
        assert!(MetadataTime::decode(b"X42").is_err());
        assert!(MetadataTime::decode(b"L").is_err());
        assert!(MetadataTime::decode(b"Lfoo").is_err());
    }

    #[test]
    fn location_families_are_distinct() {
        assert_ne!(LocationType::Current.family(), LocationType::Future.family());
        assert_ne!(LocationType::Future.family(), LocationType::Last.family());
    }

    #[test]
    fn lock_id_serializes_relative_to_root() {
        let lock = LockId::new("tservers/host:9997", 0xdeadbeef);
        assert_eq!(
            lock.serialize("/mica/v1/locks"),
            "/mica/v1/locks/tservers/host:9997$deadbeef"
        );
    }

    #[test]
    fn log_entry_roundtrip() {
        let entry = LogEntry::new("host:9997", "wal/3f1c-8a");
        let parsed = LogEntry::parse(&entry.qualifier()).unwrap();
        assert_eq!(parsed.server, "host:9997");
        assert_eq!(parsed.filename, "wal/3f1c-8a");
        assert_eq!(entry.value(), b"wal/3f1c-8a");
    }

    #[test]
    fn log_entry_rejects_garbage() {
        assert!(LogEntry::parse("no-separator").is_err());
        assert!(LogEntry::parse("/leading").is_err());
    }

    #[test]
    fn suspension_roundtrip() {
        let s = SuspendingServer::new("host:9997", 1_699_000_000_000);
        assert_eq!(s.encode(), b"host:9997|1699000000000");
        assert_eq!(SuspendingServer::decode(&s.encode()).unwrap(), s);
    }

    #[test]
    fn tx_id_roundtrip() {
        assert_eq!(format_tx_id(0x2a), "tx-000000000000002a");
        assert_eq!(parse_tx_id("tx-000000000000002a").unwrap(), 0x2a);
        assert!(parse_tx_id("42").is_err());
    }

    #[test]
    fn compaction_id_canonicalizes() {
        let a = ExternalCompactionId::new("3f1c");
        let b = ExternalCompactionId::new("ECID:3f1c");
        assert_eq!(a, b);
        assert_eq!(a.canonical(), "ECID:3f1c");
    }

    #[test]
    fn compaction_meta_json_roundtrip() {
        let meta = ExternalCompactionMeta {
            job_files: vec!["f1.rf".into(), "f2.rf".into()],
            compact_tmp_name: "tmp_A00001.rf".into(),
            compactor: "compactor-host:9133".into(),
            priority: 7,
            propagate_deletes: true,
        };
        let json = meta.to_json().unwrap();
        assert_eq!(ExternalCompactionMeta::from_json(&json).unwrap(), meta);
    }
}
