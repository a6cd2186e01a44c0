//! Persisted entity shapes shared between the storage and web layers.
//!
//! Column names follow the deployed schema (snake_case); wire names are
//! camelCase. Money columns are `numeric` and map to [`Decimal`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Collector {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<i32>,
}

/// Provider-side ledger entry. Unique on (collector_id, calimaco_id, status).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CalimacoRecord {
    pub id: i32,
    pub collector_id: i32,
    pub calimaco_id: String,
    pub calimaco_id_normalized: Option<String>,
    pub record_date: NaiveDateTime,
    pub modification_date: Option<NaiveDateTime>,
    pub status: String,
    pub user_id: Option<String>,
    pub amount: Decimal,
    pub external_id: Option<String>,
    pub comments: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCalimacoRecord {
    pub collector_id: i32,
    pub calimaco_id: String,
    #[serde(default)]
    pub calimaco_id_normalized: Option<String>,
    pub record_date: NaiveDateTime,
    #[serde(default)]
    pub modification_date: Option<NaiveDateTime>,
    pub status: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCalimacoRecord {
    pub collector_id: Option<i32>,
    pub calimaco_id: Option<String>,
    pub calimaco_id_normalized: Option<String>,
    pub record_date: Option<NaiveDateTime>,
    pub modification_date: Option<NaiveDateTime>,
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub amount: Option<Decimal>,
    pub external_id: Option<String>,
    pub comments: Option<String>,
}

/// Collector-side mirror entry. Unique on (collector_id, calimaco_id, provider_status).
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CollectorRecord {
    pub id: i32,
    pub collector_id: i32,
    pub record_date: NaiveDateTime,
    pub calimaco_id: String,
    pub calimaco_id_normalized: Option<String>,
    pub provider_id: Option<String>,
    pub client_name: Option<String>,
    pub amount: Decimal,
    pub provider_status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollectorRecord {
    pub collector_id: i32,
    pub record_date: NaiveDateTime,
    pub calimaco_id: String,
    #[serde(default)]
    pub calimaco_id_normalized: Option<String>,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    pub amount: Decimal,
    pub provider_status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCollectorRecord {
    pub collector_id: Option<i32>,
    pub record_date: Option<NaiveDateTime>,
    pub calimaco_id: Option<String>,
    pub calimaco_id_normalized: Option<String>,
    pub provider_id: Option<String>,
    pub client_name: Option<String>,
    pub amount: Option<Decimal>,
    pub provider_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Conciliation {
    pub id: i32,
    pub collector_id: i32,
    pub conciliations_type: i32,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub amount: Decimal,
    pub amount_collector: Decimal,
    pub difference_amounts: Decimal,
    pub records_calimaco: i32,
    pub records_collector: i32,
    pub unreconciled_records_calimaco: i32,
    pub unreconciled_records_collector: i32,
    pub unreconciled_amount_calimaco: Decimal,
    pub unreconciled_amount_collector: Decimal,
    pub conciliations_state: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConciliationFile {
    pub id: i32,
    pub conciliation_id: i32,
    pub conciliation_files_type: i32,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
}

/// Conciliation with its eagerly loaded relations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConciliationView {
    #[serde(flatten)]
    pub conciliation: Conciliation,
    pub collector: Option<Collector>,
    pub files: Vec<ConciliationFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Liquidation {
    pub id: i32,
    pub collector_id: i32,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub amount_collector: Decimal,
    pub amount_liquidation: Decimal,
    pub difference_amounts: Decimal,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LiquidationFile {
    pub id: i32,
    pub liquidation_id: i32,
    pub liquidation_files_type: i32,
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidationView {
    #[serde(flatten)]
    pub liquidation: Liquidation,
    pub collector: Option<Collector>,
    pub files: Vec<LiquidationFile>,
}

/// Flagged mismatch pointing at exactly one report row via `id_report`
/// plus the `method_process` discriminator.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub id: i32,
    pub id_report: i32,
    pub status: String,
    pub difference: Decimal,
    pub method_process: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact report row attached to a discrepancy. Only one of the two
/// slots on [`DiscrepancyView`] survives resolution.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ConciliationRef {
    pub id: i32,
    pub collector_id: i32,
    pub collector_name: Option<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub amount: Decimal,
    pub amount_collector: Decimal,
    pub difference_amounts: Decimal,
    pub conciliations_state: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LiquidationRef {
    pub id: i32,
    pub collector_id: i32,
    pub collector_name: Option<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub amount_collector: Decimal,
    pub amount_liquidation: Decimal,
    pub difference_amounts: Decimal,
}

/// Discrepancy as fetched with both candidate associations joined.
/// Always pass through [`crate::resolve_associations`] before returning
/// to a caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyView {
    #[serde(flatten)]
    pub discrepancy: Discrepancy,
    pub conciliation: Option<ConciliationRef>,
    pub liquidation: Option<LiquidationRef>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub profile_image: Option<String>,
    pub username: String,
    pub is_active: bool,
    pub channel_id: Option<i32>,
    pub expiration_password: Option<DateTime<Utc>>,
    pub flag_password: bool,
    pub dark_mode: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// User plus the name of its single active role, as returned by every
/// user read path.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub user: User,
    pub role: Option<String>,
}

/// Outward-facing profile without credential or audit columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Option<String>,
    pub is_active: bool,
}

impl UserView {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.user.id,
            username: self.user.username.clone(),
            first_name: self.user.first_name.clone(),
            last_name: self.user.last_name.clone(),
            email: self.user.email.clone(),
            role: self.role.clone(),
            is_active: self.user.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub username: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub channel_id: Option<i32>,
    #[serde(default)]
    pub role_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Re-hashed only when present.
    pub password: Option<String>,
    pub username: Option<String>,
    pub profile_image: Option<String>,
    pub channel_id: Option<i32>,
    pub is_active: Option<bool>,
    pub dark_mode: Option<bool>,
    pub role_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRole {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRole {
    pub name: Option<String>,
    pub description: Option<String>,
}
