//! # **Build Module** - *One-Pass Row → Column Reduction*
//!
//! Consumes a row-oriented source exactly once and seals a
//! [`ColumnStore`]. Each declared field gets a storage builder chosen
//! up front - value-indexed unless the field is known wide - plus a
//! range calculator when the field is numeric.
//!
//! ## Cell policy
//! - Number-typed fields coerce numeric-looking strings; a cell that
//!   refuses to parse is logged and stored as given, and the range
//!   calculator simply skips it.
//! - A multi-valued cell landing in a dense (unary) column keeps its
//!   first value; the rest are logged and dropped.
//! - Nothing a single cell does aborts the ingestion.
//!
//! An `Auto` indexed column whose observed distinct count crosses
//! [`DISTINCT_LIMIT`] is rebuilt as a dense column before sealing.

#[cfg(feature = "fast_hash")]
use ahash::AHashMap as HashMap;
#[cfg(not(feature = "fast_hash"))]
use std::collections::HashMap;

use tracing::warn;

use crate::enums::column::Column;
use crate::enums::error::MinfacetError;
use crate::enums::value::{Value, ValueType};
use crate::ingest::calc::RangeCalculator;
use crate::ingest::rows::{Row, RowStore};
use crate::structs::dense::DenseFieldBuilder;
use crate::structs::field::{DISTINCT_LIMIT, DistinctEstimate, FieldDescriptor};
use crate::structs::indexed::{IndexedField, IndexedFieldBuilder};
use crate::structs::store::ColumnStore;
use crate::traits::reducer::Reducer;

/// Storage shape choice for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnKind {
    /// Indexed unless the estimate says wide; may fall back to dense.
    #[default]
    Auto,
    /// Always value-indexed.
    Indexed,
    /// Always a dense per-row array.
    Dense,
}

/// Ingestion configuration.
///
/// `kinds` and `values` key on declared field identifiers; an override
/// naming a field absent from `fields` fails the build with
/// [`MinfacetError::UnknownField`].
#[derive(Debug, Clone, Default)]
pub struct IngestParams {
    /// Declared fields; rows mentioning undeclared fields have those
    /// cells ignored.
    pub fields: Vec<FieldDescriptor>,
    /// Per-field storage overrides, keyed by identifier.
    pub kinds: HashMap<String, ColumnKind>,
    /// Cell values coerced to null on the way in.
    pub null_values: Vec<Value>,
    /// Per-field explicit value lists: the indexed column keeps exactly
    /// this value order, ignores values outside the list, and keeps
    /// empty sets for listed values that never occur.
    pub values: HashMap<String, Vec<Value>>,
}

enum FieldStorage {
    Indexed(IndexedFieldBuilder),
    Dense(DenseFieldBuilder),
}

struct FieldIngest {
    identifier: String,
    value_type: ValueType,
    kind: ColumnKind,
    multi_valued: bool,
    storage: FieldStorage,
    range: Option<RangeCalculator>,
    has_precomputed_range: bool,
}

/// Reduces `rows` into a sealed store. Row ids are assigned by
/// position, so `rows.len()` becomes the store size.
pub fn build_from_rows(rows: &[Row], params: &IngestParams) -> Result<ColumnStore, MinfacetError> {
    if let Some(identifier) = params
        .kinds
        .keys()
        .chain(params.values.keys())
        .find(|id| !params.fields.iter().any(|fd| &fd.identifier == *id))
    {
        return Err(MinfacetError::UnknownField {
            identifier: identifier.clone(),
        });
    }

    let mut ingests = Vec::with_capacity(params.fields.len());
    for fd in &params.fields {
        ingests.push(field_ingest(fd, params));
    }

    for (row_id, row) in rows.iter().enumerate() {
        for ingest in ingests.iter_mut() {
            let cells = row.values(&ingest.identifier);
            if cells.is_empty() {
                continue;
            }
            ingest.consume(row_id, cells, &params.null_values);
        }
    }

    let size = rows.len();
    let cols = ingests
        .into_iter()
        .map(|ingest| ingest.seal(size))
        .collect();
    ColumnStore::new(size, cols)
}

/// Reduces a collected [`RowStore`], with `params.fields` taking
/// precedence over same-named source descriptors.
pub fn build_from_store(
    source: &RowStore,
    params: &IngestParams,
) -> Result<ColumnStore, MinfacetError> {
    let mut merged = params.clone();
    let mut fields: Vec<FieldDescriptor> = source.descriptors().to_vec();
    for fd in &params.fields {
        match fields.iter_mut().find(|d| d.identifier == fd.identifier) {
            Some(slot) => *slot = fd.clone(),
            None => fields.push(fd.clone()),
        }
    }
    merged.fields = fields;
    build_from_rows(source.rows(), &merged)
}

fn field_ingest(fd: &FieldDescriptor, params: &IngestParams) -> FieldIngest {
    let kind = params
        .kinds
        .get(&fd.identifier)
        .copied()
        .unwrap_or_default();
    let wide = fd.distinct_estimate == Some(DistinctEstimate::Unlimited);
    let dense = matches!(kind, ColumnKind::Dense) || (matches!(kind, ColumnKind::Auto) && wide);
    let storage = if dense {
        FieldStorage::Dense(DenseFieldBuilder::with_null_values(
            fd.clone(),
            params.null_values.clone(),
        ))
    } else {
        match params.values.get(&fd.identifier) {
            Some(values) => FieldStorage::Indexed(IndexedFieldBuilder::with_values(
                fd.clone(),
                values.clone(),
            )),
            None => FieldStorage::Indexed(IndexedFieldBuilder::new(fd.clone())),
        }
    };
    FieldIngest {
        identifier: fd.identifier.clone(),
        value_type: fd.value_type,
        kind,
        multi_valued: fd.multi_valued,
        storage,
        range: (fd.value_type == ValueType::Num).then(RangeCalculator::new),
        has_precomputed_range: fd.range.is_some(),
    }
}

impl FieldIngest {
    fn consume(&mut self, row_id: usize, cells: &[Value], null_values: &[Value]) {
        match &mut self.storage {
            FieldStorage::Indexed(builder) => {
                for cell in cells {
                    let value = coerce_cell(&self.identifier, self.value_type, row_id, cell);
                    if value.is_null() || null_values.contains(&value) {
                        continue;
                    }
                    if let Some(range) = &mut self.range {
                        range.observe(&value);
                    }
                    builder.insert(row_id, value);
                }
            }
            FieldStorage::Dense(builder) => {
                if cells.len() > 1 {
                    warn!(
                        field = self.identifier.as_str(),
                        row = row_id,
                        dropped = cells.len() - 1,
                        "unary column got a multi-valued cell; keeping the first value"
                    );
                }
                let value = coerce_cell(&self.identifier, self.value_type, row_id, &cells[0]);
                if let Some(range) = &mut self.range {
                    range.observe(&value);
                }
                builder.push((row_id, value));
            }
        }
    }

    fn seal(self, size: usize) -> Column {
        let range = match (self.has_precomputed_range, self.range) {
            (false, Some(calc)) => calc.finish(),
            _ => None,
        };
        let mut col = match self.storage {
            FieldStorage::Indexed(builder) => {
                let field = builder.finish();
                if matches!(self.kind, ColumnKind::Auto)
                    && !self.multi_valued
                    && field.all_values().len() > DISTINCT_LIMIT
                {
                    Column::Dense(densify(field, size))
                } else {
                    Column::Indexed(field)
                }
            }
            FieldStorage::Dense(builder) => Column::Dense(builder.finish()),
        };
        if let Some(range) = range {
            match &mut col {
                Column::Indexed(f) => f.descriptor.range = Some(range),
                Column::Dense(f) => f.descriptor.range = Some(range),
            }
        }
        col
    }
}

/// Rebuilds an over-wide indexed column as a dense array.
fn densify(field: IndexedField, size: usize) -> crate::structs::dense::DenseField {
    let mut cells: Vec<Value> = vec![Value::Null; size];
    for (value, set) in field.entries() {
        set.each(|row| cells[row] = value.clone());
    }
    let mut descriptor = field.descriptor.clone();
    descriptor.distinct_estimate = Some(DistinctEstimate::Unlimited);
    let mut builder = DenseFieldBuilder::new(descriptor);
    for (row, value) in cells.into_iter().enumerate() {
        if !value.is_null() {
            builder.push((row, value));
        }
    }
    builder.finish()
}

/// Applies the descriptor's conversion rule to one cell. Cells that
/// refuse to convert are logged and stored as given.
fn coerce_cell(identifier: &str, value_type: ValueType, row_id: usize, cell: &Value) -> Value {
    match (value_type, cell) {
        (ValueType::Num, Value::Str(s)) => match s.parse::<f64>() {
            Ok(n) => Value::Num(n),
            Err(_) => {
                warn!(
                    field = identifier,
                    row = row_id,
                    cell = s.as_str(),
                    "non-numeric cell in a number-typed field; storing as given"
                );
                cell.clone()
            }
        },
        (ValueType::Bool, Value::Str(s)) => match s.as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => {
                warn!(
                    field = identifier,
                    row = row_id,
                    cell = s.as_str(),
                    "non-boolean cell in a boolean-typed field; storing as given"
                );
                cell.clone()
            }
        },
        _ => cell.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::value::ValueType;
    use crate::structs::field::NumericRange;
    use crate::traits::filterable::Filterable;

    fn row(pairs: &[(&str, &str)]) -> Row {
        let mut r = Row::new();
        for &(field, value) in pairs {
            r.set(field, value);
        }
        r
    }

    #[test]
    fn test_basic_ingestion() {
        let rows = vec![
            row(&[("color", "red"), ("size", "1")]),
            row(&[("color", "blue"), ("size", "2")]),
            row(&[("color", "red"), ("size", "3")]),
        ];
        let params = IngestParams {
            fields: vec![
                FieldDescriptor::new("color", ValueType::Str),
                FieldDescriptor::new("size", ValueType::Num),
            ],
            ..Default::default()
        };
        let store = build_from_rows(&rows, &params).unwrap();
        assert_eq!(store.size(), 3);
        assert_eq!(store.filter_by_value("color", "red").size(), 2);
        // numeric coercion happened
        assert_eq!(store.filter_by_value("size", 2).size(), 1);
        // range was computed over coerced cells
        let size_field = store.field("size").unwrap();
        assert_eq!(
            size_field.descriptor().range,
            Some(NumericRange::new(1.0, 3.0, true))
        );
    }

    #[test]
    fn test_bad_numeric_cell_degrades() {
        let rows = vec![
            row(&[("qty", "4")]),
            row(&[("qty", "many")]),
            row(&[("qty", "6")]),
        ];
        let params = IngestParams {
            fields: vec![FieldDescriptor::new("qty", ValueType::Num)],
            ..Default::default()
        };
        let store = build_from_rows(&rows, &params).unwrap();
        // stored as given: still findable by its string form
        assert_eq!(store.filter_by_value("qty", "many").size(), 1);
        // range skipped the bad cell
        let range = store.field("qty").unwrap().descriptor().range.unwrap();
        assert_eq!((range.min, range.max), (4.0, 6.0));
    }

    #[test]
    fn test_null_values_coerced() {
        let rows = vec![row(&[("x", "a")]), row(&[("x", "NA")]), row(&[("x", "b")])];
        let params = IngestParams {
            fields: vec![FieldDescriptor::new("x", ValueType::Str)],
            null_values: vec![Value::from("NA")],
            ..Default::default()
        };
        let store = build_from_rows(&rows, &params).unwrap();
        let field = store.field("x").unwrap().as_indexed().unwrap();
        assert_eq!(field.all_values().len(), 2);
        assert_eq!(store.filter_by_value("x", "NA").size(), 0);
    }

    #[test]
    fn test_explicit_value_list() {
        let rows = vec![row(&[("month", "Jan")]), row(&[("month", "Mar")])];
        let mut params = IngestParams {
            fields: vec![FieldDescriptor::new("month", ValueType::Str)],
            ..Default::default()
        };
        params.values.insert(
            "month".to_string(),
            vec![Value::from("Jan"), Value::from("Feb"), Value::from("Mar")],
        );
        let store = build_from_rows(&rows, &params).unwrap();
        let field = store.field("month").unwrap().as_indexed().unwrap();
        let names: Vec<String> = field.all_values().iter().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["Jan", "Feb", "Mar"]);
        assert!(field.int_set_for_value(&Value::from("Feb")).is_empty());
    }

    #[test]
    fn test_dense_override() {
        let rows = vec![row(&[("note", "x")]), row(&[("note", "y")])];
        let mut params = IngestParams {
            fields: vec![FieldDescriptor::new("note", ValueType::Str)],
            ..Default::default()
        };
        params.kinds.insert("note".to_string(), ColumnKind::Dense);
        let store = build_from_rows(&rows, &params).unwrap();
        assert!(store.field("note").unwrap().as_dense().is_some());
        assert_eq!(store.filter_by_value("note", "y").size(), 1);
    }

    #[test]
    fn test_unlimited_estimate_goes_dense() {
        let rows = vec![row(&[("id", "a1")]), row(&[("id", "a2")])];
        let params = IngestParams {
            fields: vec![
                FieldDescriptor::builder("id", ValueType::Str)
                    .unlimited_values()
                    .build(),
            ],
            ..Default::default()
        };
        let store = build_from_rows(&rows, &params).unwrap();
        assert!(store.field("id").unwrap().as_dense().is_some());
    }

    #[test]
    fn test_auto_fallback_past_distinct_limit() {
        let rows: Vec<Row> = (0..(DISTINCT_LIMIT + 10))
            .map(|i| {
                let v = format!("v{}", i);
                row(&[("id", v.as_str())])
            })
            .collect();
        let params = IngestParams {
            fields: vec![FieldDescriptor::new("id", ValueType::Str)],
            ..Default::default()
        };
        let store = build_from_rows(&rows, &params).unwrap();
        let col = store.field("id").unwrap();
        assert!(col.as_dense().is_some());
        assert_eq!(col.distinct_estimate(), DistinctEstimate::Unlimited);
        // values still reachable through the dense path
        assert_eq!(store.filter_by_value("id", "v7").size(), 1);
    }

    #[test]
    fn test_multi_valued_field() {
        let mut r0 = Row::new();
        r0.push("tags", "a");
        r0.push("tags", "b");
        let mut r1 = Row::new();
        r1.push("tags", "a");
        let params = IngestParams {
            fields: vec![
                FieldDescriptor::builder("tags", ValueType::Str)
                    .multi_valued(true)
                    .build(),
            ],
            ..Default::default()
        };
        let store = build_from_rows(&[r0, r1], &params).unwrap();
        assert_eq!(store.filter_by_value("tags", "a").size(), 2);
        assert_eq!(store.filter_by_value("tags", "b").size(), 1);
    }

    #[test]
    fn test_build_from_store_merges_descriptors() {
        let mut rs = RowStore::new(vec![FieldDescriptor::new("size", ValueType::Str)]).unwrap();
        let mut r = Row::new();
        r.set("size", "5");
        rs.push_row(r);
        // override the source's string descriptor with a numeric one
        let params = IngestParams {
            fields: vec![FieldDescriptor::new("size", ValueType::Num)],
            ..Default::default()
        };
        let store = build_from_store(&rs, &params).unwrap();
        assert_eq!(store.filter_by_value("size", 5).size(), 1);
    }

    #[test]
    fn test_override_naming_unknown_field_rejected() {
        let rows = vec![row(&[("color", "red")])];
        let mut params = IngestParams {
            fields: vec![FieldDescriptor::new("color", ValueType::Str)],
            ..Default::default()
        };
        params.kinds.insert("colour".to_string(), ColumnKind::Dense);
        let err = build_from_rows(&rows, &params).unwrap_err();
        assert!(matches!(
            err,
            MinfacetError::UnknownField { identifier } if identifier == "colour"
        ));

        // value whitelists are validated the same way
        let mut params = IngestParams {
            fields: vec![FieldDescriptor::new("color", ValueType::Str)],
            ..Default::default()
        };
        params
            .values
            .insert("shade".to_string(), vec![Value::from("red")]);
        assert!(matches!(
            build_from_rows(&rows, &params),
            Err(MinfacetError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_rows_missing_fields() {
        let rows = vec![row(&[("a", "1")]), row(&[("b", "2")])];
        let params = IngestParams {
            fields: vec![
                FieldDescriptor::new("a", ValueType::Str),
                FieldDescriptor::new("b", ValueType::Str),
            ],
            ..Default::default()
        };
        let store = build_from_rows(&rows, &params).unwrap();
        assert_eq!(store.size(), 2);
        assert_eq!(
            store
                .filter_by_value("a", "1")
                .int_set()
                .iter()
                .collect::<Vec<_>>(),
            vec![0]
        );
    }
}
