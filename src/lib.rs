//! # **Minfacet** – Faceted In-Memory Column Store
//!
//! Read-mostly columnar store for OLAP-style interactive filtering:
//! ingest rows once, get per-column value indexes backed by compact
//! integer sets, then slice the data with composable equality filters
//! and partitions at memory speed.
//!
//! ## Key Features
//! - **Compact set algebra** – range, sorted-array and bitmap row-id
//!   sets under one [`IntSet`] type, with cross-representation
//!   union/intersection and automatic representation selection.
//! - **Two column shapes** – value-indexed columns for faceting,
//!   dense arrays for wide-cardinality fields; the ingester picks
//!   per column.
//! - **Cheap views** – a filter never copies column data; it narrows a
//!   shared store to an intersected row-id set.
//! - **Lossless JSON persistence** – language-neutral wire shape with a
//!   behavioural round-trip guarantee.
//! - **Embeddable** – a plain library: no I/O of its own, no threads,
//!   immutable after build, minimal dependencies, fast compile times.
//!
//! ## Example
//! ```rust
//! use minfacet::{Filterable, IngestParams, read_csv};
//!
//! let store = read_csv(
//!     "color,size\nred,1\nblue,2\nred,3\n",
//!     IngestParams::default(),
//! )
//! .unwrap();
//!
//! let red = store.filter_by_value("color", "red");
//! assert_eq!(red.size(), 2);
//!
//! let by_color = store.partition("color");
//! assert_eq!(by_color["blue"].size(), 1);
//! ```

/// **IntSet**, **Column**, **Value**... - *the enum dispatch types are here.*
pub mod enums {
    pub mod column;
    pub mod error;
    pub mod set;
    pub mod value;
}

/// **Word and merge kernels** - *the bit-level machinery under the sets.*
pub mod kernels {
    pub mod bits;
    pub mod merge;
}

/// **ColumnStore**, **FilteredView**, **set representations** - *all the concrete storage.*
pub mod structs {
    pub mod sets {
        pub mod bitmap;
        pub mod range;
        pub mod sorted;
    }
    pub mod dense;
    pub mod field;
    pub mod filter;
    pub mod indexed;
    pub mod store;
    pub mod view;
}

/// **Type standardisation** - `RowSet`, `OrderedIter`, `Reducer`, `Filterable`.
pub mod traits {
    pub mod filterable;
    pub mod reducer;
    pub mod row_set;
}

/// **Row → column reduction** - *CSV front end, calculators, the build pipeline.*
pub mod ingest {
    pub mod build;
    pub mod calc;
    pub mod csv;
    pub mod rows;
}

/// **JSON persistence** - *wire DTOs, writer, validated reader.*
pub mod persist {
    pub mod meta;
    pub mod read;
    pub mod write;
}

pub mod aliases;

pub use aliases::{Length, RowId};

pub use enums::column::Column;
pub use enums::error::MinfacetError;
pub use enums::set::{IntSet, IntSetBuilder, SetIter};
pub use enums::value::{Value, ValueType};

pub use structs::dense::{DenseField, DenseFieldBuilder};
pub use structs::field::{
    DISTINCT_LIMIT, DistinctEstimate, FieldDescriptor, FieldDescriptorBuilder, NumericRange,
};
pub use structs::filter::ValueFilter;
pub use structs::indexed::{IndexedField, IndexedFieldBuilder};
pub use structs::sets::bitmap::{BitmapSet, BitmapSetBuilder};
pub use structs::sets::range::{RangeIter, RangeSet};
pub use structs::sets::sorted::{SortedSet, SortedSetBuilder};
pub use structs::store::ColumnStore;
pub use structs::view::FilteredView;

pub use traits::filterable::Filterable;
pub use traits::reducer::Reducer;
pub use traits::row_set::{OrderedIter, RowSet};

pub use ingest::build::{ColumnKind, IngestParams, build_from_rows, build_from_store};
pub use ingest::calc::{RangeCalculator, ValueFrequencyCalculator};
pub use ingest::csv::{CsvParams, CsvReader, CsvRowReader, read_csv, read_csv_nullable, read_csv_with};
pub use ingest::rows::{Row, RowStore};

pub use persist::meta::{
    FieldMetaData, IntSetMetaData, MAX_SAFE_ESTIMATE, RangeData, StoreData, TypeTag, ValueSetData,
};
pub use persist::read::{from_json, read_store};
pub use persist::write::{to_json, write_store};
