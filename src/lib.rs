//! Record sorting for torrent remote-control lists
//!
//! The core is [`RecordComparator`], which orders loosely typed field-bag
//! records by an ordered list of field keys, each with its own direction,
//! coercing text, numbers and other comparable values and never failing on
//! malformed data. [`file_tree`] builds the collapsible file view of a
//! torrent on top of it, and [`table_sort`] exposes it over delimited text
//! for the `recsort` command.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

pub mod error;
pub mod config;

pub mod value;
pub mod sort_spec;
pub mod comparator;
pub mod stable_sort;
pub mod file_tree;
pub mod table_sort;

// Re-export commonly used types
pub use comparator::{ErrorPolicy, FieldTransform, LogOnce, RecordComparator, RecordSource, Records};
pub use config::SortConfig;
pub use error::{CompareError, SortError, SortResult};
pub use sort_spec::{SortKey, SortOrder, SortSpec};
pub use value::{FieldValue, OpaqueValue, Record};

/// Exit codes matching GNU sort
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const SORT_FAILURE: i32 = 2;

/// Sort (or check) the configured inputs
pub fn sort(config: &SortConfig) -> SortResult<i32> {
    config.validate()?;
    table_sort::TableSort::new(config.clone()).run()?;
    Ok(EXIT_SUCCESS)
}
