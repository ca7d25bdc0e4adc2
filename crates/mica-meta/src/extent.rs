use std::fmt;

const BOUNDED_SEP: u8 = b';';
const LAST_TABLET_MARKER: u8 = b'<';

/// Identity of one tablet: a table id plus the tablet's key-range boundaries.
///
/// `end_row` is the inclusive upper boundary; `None` marks the last tablet of
/// the table. `prev_end_row` is the exclusive lower boundary; `None` marks
/// the first tablet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyExtent {
    table: String,
    end_row: Option<Vec<u8>>,
    prev_end_row: Option<Vec<u8>>,
}

impl KeyExtent {
    pub fn new(
        table: impl Into<String>,
        end_row: Option<Vec<u8>>,
        prev_end_row: Option<Vec<u8>>,
    ) -> Self {
        Self {
            table: table.into(),
            end_row,
            prev_end_row,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn end_row(&self) -> Option<&[u8]> {
        self.end_row.as_deref()
    }

    pub fn prev_end_row(&self) -> Option<&[u8]> {
        self.prev_end_row.as_deref()
    }

    /// Row key of this tablet's metadata record.
    ///
    /// `{table};{end_row}` for a bounded tablet, `{table}<` for the last
    /// tablet of a table. Derived solely from table id and end row, so two
    /// builders over the same extent always target the same record.
    pub fn meta_row(&self) -> Vec<u8> {
        match &self.end_row {
            Some(end) => {
                let mut row = Vec::with_capacity(self.table.len() + 1 + end.len());
                row.extend_from_slice(self.table.as_bytes());
                row.push(BOUNDED_SEP);
                row.extend_from_slice(end);
                row
            }
            None => {
                let mut row = Vec::with_capacity(self.table.len() + 1);
                row.extend_from_slice(self.table.as_bytes());
                row.push(LAST_TABLET_MARKER);
                row
            }
        }
    }
}

impl fmt::Display for KeyExtent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.end_row {
            Some(end) => write!(f, "{};{}", self.table, String::from_utf8_lossy(end)),
            None => write!(f, "{}<", self.table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_meta_row() {
        let extent = KeyExtent::new("2a", Some(b"m".to_vec()), None);
        assert_eq!(extent.meta_row(), b"2a;m");
    }

    #[test]
    fn last_tablet_meta_row() {
        let extent = KeyExtent::new("2a", None, Some(b"m".to_vec()));
        assert_eq!(extent.meta_row(), b"2a<");
    }

    #[test]
    fn meta_row_is_deterministic() {
        let a = KeyExtent::new("2a", Some(b"m".to_vec()), None);
        let b = KeyExtent::new("2a", Some(b"m".to_vec()), Some(b"f".to_vec()));
        // prev_end_row does not participate in the row identity
        assert_eq!(a.meta_row(), b.meta_row());
    }

    #[test]
    fn distinct_extents_have_distinct_rows() {
        let rows = [
            KeyExtent::new("1", Some(b"m".to_vec()), None).meta_row(),
            KeyExtent::new("1", Some(b"n".to_vec()), None).meta_row(),
            KeyExtent::new("1", None, None).meta_row(),
            KeyExtent::new("2", Some(b"m".to_vec()), None).meta_row(),
        ];
        for (i, a) in rows.iter().enumerate() {
            for b in rows.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
