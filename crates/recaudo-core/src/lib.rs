//! Core domain model for the collector reconciliation back office.

pub mod dates;
pub mod discrepancy;
pub mod model;
pub mod page;

pub const CRATE_NAME: &str = "recaudo-core";

pub use discrepancy::{resolve_associations, ReportKind};
pub use page::{Page, PageParams, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
