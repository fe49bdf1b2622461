//! Row-change detection between two snapshot sheets.
//!
//! Columns are matched by header text, columns that churn on most rows are
//! dropped, and each row is reduced to a signature of its remaining values. Rows
//! of the current snapshot whose signature never occurs in the previous one are
//! reported as changed.

pub mod types;
pub mod normalize;
pub mod selector;
pub mod reconcile;
pub mod noise;
pub mod signature;
pub mod detector;

pub use types::{ColumnMatch, ColumnMatches, Side};
pub use normalize::normalize;
pub use selector::{is_snapshot_sheet, select_sheets, SheetSelection};
pub use reconcile::{build_header_map, reconcile_columns, DEFAULT_IGNORED_HEADERS};
pub use noise::{filter_noisy_columns, DEFAULT_NOISE_THRESHOLD};
pub use signature::{generate_signatures, SIGNATURE_SEPARATOR};
pub use detector::{detect_changes, physical_row, DetectError, DetectOptions};
