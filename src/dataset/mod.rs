//! Dataset module
//!
//! CSV ingestion with per-cell type inference, dataset statistics, column
//! profiles, previews, and CSV export.

pub mod export;
pub mod processor;
pub mod types;

pub use types::{
    CellValue, ColumnKind, ColumnProfile, DatasetError, DatasetStats, PreviewPage, Row,
    SortDirection, Table,
};
