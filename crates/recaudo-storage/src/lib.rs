//! Postgres persistence gateway for the collector reconciliation back
//! office: connection pool, per-entity repositories, and the report
//! query builder over the database-side aggregate functions.

pub mod calimaco_records;
pub mod collector_records;
pub mod collectors;
pub mod conciliations;
pub mod discrepancies;
pub mod error;
pub mod liquidations;
pub mod pool;
pub mod reports;
pub mod roles;
pub mod users;

pub const CRATE_NAME: &str = "recaudo-storage";

pub use error::StorageError;
pub use pool::{connect, connect_lazy, run_migrations};
pub use reports::ReportPlan;

/// Optional filters shared by the raw-record listing endpoints. Date
/// bounds arrive already widened by the caller.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub collector_id: Option<i32>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub statuses: Option<Vec<String>>,
}
