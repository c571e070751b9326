//! # **Aliases Module** - *Semantic `usize` Aliases*
//!
//! Type aliases that keep signatures self-documenting without
//! introducing wrapper types on hot paths.

/// Identifies a record within a single store.
///
/// Row ids are dense in `[0, size)` for a freshly built store, and are
/// *not* stable across stores - re-ingesting the same data may renumber.
/// Treat them as opaque tokens.
pub type RowId = usize;

/// Logical element count.
pub type Length = usize;
