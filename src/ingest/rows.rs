//! # **Rows Module** - *Row-Oriented Ingestion Source*
//!
//! The thin row-store adapter the reduction pipeline consumes: a `Row`
//! is a mapping from field identifier to the values the record carries,
//! and a `RowStore` pairs declared field descriptors with collected
//! rows. Row ids are assigned by arrival order at build time.

#[cfg(feature = "fast_hash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "fast_hash"))]
use std::collections::HashMap;

use crate::aliases::RowId;
use crate::enums::error::MinfacetError;
use crate::enums::value::Value;
use crate::structs::field::FieldDescriptor;

const NO_VALUES: &[Value] = &[];

/// # Row
///
/// One record: field identifier → values. Most fields are unary; a
/// multi-valued field simply pushes more than one value.
#[derive(Debug, Clone, Default)]
pub struct Row {
    cells: HashMap<String, Vec<Value>>,
}

impl Row {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the single value of a field, replacing anything held.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.cells.insert(field.into(), vec![value.into()]);
    }

    /// Appends a value to a field, keeping the ones already held.
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.cells
            .entry(field.into())
            .or_default()
            .push(value.into());
    }

    /// The values held for a field; empty for fields the record skips.
    pub fn values(&self, field: &str) -> &[Value] {
        self.cells.get(field).map(Vec::as_slice).unwrap_or(NO_VALUES)
    }

    /// True when the record holds no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// # RowStore
///
/// Declared descriptors plus collected rows, ready for one-pass
/// reduction into a column store.
#[derive(Debug, Clone)]
pub struct RowStore {
    descriptors: Vec<FieldDescriptor>,
    rows: Vec<Row>,
}

impl RowStore {
    /// Constructs an empty row store over the declared fields.
    pub fn new(descriptors: Vec<FieldDescriptor>) -> Result<Self, MinfacetError> {
        for (i, fd) in descriptors.iter().enumerate() {
            if descriptors[..i].iter().any(|d| d.identifier == fd.identifier) {
                return Err(MinfacetError::DuplicateField {
                    identifier: fd.identifier.clone(),
                });
            }
        }
        Ok(Self {
            descriptors,
            rows: Vec::new(),
        })
    }

    /// Appends a record; its row id is its arrival position.
    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of records held.
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// The declared field descriptors.
    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    /// The collected records, in row-id order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The values `row` holds for a field.
    pub fn values(&self, row: RowId, field: &str) -> &[Value] {
        self.rows
            .get(row)
            .map(|r| r.values(field))
            .unwrap_or(NO_VALUES)
    }

    /// Invokes `action` for every record in row-id order.
    pub fn each_row<F: FnMut(RowId, &Row)>(&self, mut action: F) {
        for (row_id, row) in self.rows.iter().enumerate() {
            action(row_id, row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::value::ValueType;

    #[test]
    fn test_row_cells() {
        let mut row = Row::new();
        row.set("color", "red");
        row.push("tags", "a");
        row.push("tags", "b");
        assert_eq!(row.values("color"), &[Value::from("red")]);
        assert_eq!(row.values("tags").len(), 2);
        assert!(row.values("missing").is_empty());
        row.set("tags", "only");
        assert_eq!(row.values("tags"), &[Value::from("only")]);
    }

    #[test]
    fn test_row_store_accumulates() {
        let mut rs = RowStore::new(vec![FieldDescriptor::new("x", ValueType::Str)]).unwrap();
        let mut row = Row::new();
        row.set("x", "1");
        rs.push_row(row);
        assert_eq!(rs.size(), 1);
        assert_eq!(rs.values(0, "x"), &[Value::from("1")]);
        assert!(rs.values(5, "x").is_empty());
    }

    #[test]
    fn test_duplicate_descriptor_rejected() {
        let dup = RowStore::new(vec![
            FieldDescriptor::new("x", ValueType::Str),
            FieldDescriptor::new("x", ValueType::Num),
        ]);
        assert!(matches!(dup, Err(MinfacetError::DuplicateField { .. })));
    }
}
