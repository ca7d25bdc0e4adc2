/// A single column-level edit within a [`Mutation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnOp {
    /// Insert or overwrite the column with the given value.
    Put(Vec<u8>),
    /// Mark the column as deleted.
    Delete,
}

/// A (family, qualifier) edit. Qualifiers are raw bytes; families are the
/// fixed schema names known at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnUpdate {
    pub family: &'static str,
    pub qualifier: Vec<u8>,
    pub op: ColumnOp,
}

/// An atomic set of column edits against one row.
///
/// Updates are kept in call order; no de-duplication happens here. When two
/// updates target the same (family, qualifier), the store applies them in
/// order and the last one wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    row: Vec<u8>,
    updates: Vec<ColumnUpdate>,
}

impl Mutation {
    pub fn new(row: Vec<u8>) -> Self {
        Self {
            row,
            updates: Vec::new(),
        }
    }

    pub fn row(&self) -> &[u8] {
        &self.row
    }

    pub fn updates(&self) -> &[ColumnUpdate] {
        &self.updates
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn put(
        &mut self,
        family: &'static str,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) {
        self.updates.push(ColumnUpdate {
            family,
            qualifier: qualifier.into(),
            op: ColumnOp::Put(value.into()),
        });
    }

    pub fn put_delete(&mut self, family: &'static str, qualifier: impl Into<Vec<u8>>) {
        self.updates.push(ColumnUpdate {
            family,
            qualifier: qualifier.into(),
            op: ColumnOp::Delete,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_keep_call_order() {
        let mut m = Mutation::new(b"row".to_vec());
        m.put("file", "f1", "v1");
        m.put_delete("file", "f1");
        m.put("scan", "f2", "");

        assert_eq!(m.len(), 3);
        assert_eq!(m.updates()[0].op, ColumnOp::Put(b"v1".to_vec()));
        assert_eq!(m.updates()[1].op, ColumnOp::Delete);
        assert_eq!(m.updates()[2].family, "scan");
    }

    #[test]
    fn empty_mutation() {
        let m = Mutation::new(b"row".to_vec());
        assert!(m.is_empty());
        assert_eq!(m.row(), b"row");
    }
}
