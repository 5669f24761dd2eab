//! Store models: row shape, connection parameters, errors.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region Columns

/// Decoded value class of one `clusters` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumStoreColumnKind {
    /// Free text; NULL reads as empty string.
    Text,
    /// Count; NULL stays missing.
    Integer,
    /// Calendar date; NULL stays missing.
    Date,
}

/// Column contract of the `clusters` table, in report order.
///
/// Shared by the SELECT list and the spreadsheet header.
pub const TUP_CLUSTER_COLUMNS: [(&str, EnumStoreColumnKind); 25] = [
    ("id", EnumStoreColumnKind::Text),
    ("hostname", EnumStoreColumnKind::Text),
    ("nombre", EnumStoreColumnKind::Text),
    ("zona_cobertura", EnumStoreColumnKind::Text),
    ("canton", EnumStoreColumnKind::Text),
    ("puertos_habilitados", EnumStoreColumnKind::Integer),
    ("hps_liberadas", EnumStoreColumnKind::Integer),
    ("home_passes", EnumStoreColumnKind::Integer),
    ("business_passes", EnumStoreColumnKind::Integer),
    ("fecha_liberacion", EnumStoreColumnKind::Date),
    ("hp_horizontal_res", EnumStoreColumnKind::Integer),
    ("hp_horizontal_com", EnumStoreColumnKind::Integer),
    ("hp_vertical_res", EnumStoreColumnKind::Integer),
    ("hp_vertical_com", EnumStoreColumnKind::Integer),
    ("edif_res", EnumStoreColumnKind::Integer),
    ("edif_com", EnumStoreColumnKind::Integer),
    ("solares_res", EnumStoreColumnKind::Integer),
    ("tipo_cobertura", EnumStoreColumnKind::Text),
    ("region", EnumStoreColumnKind::Text),
    ("parroquia", EnumStoreColumnKind::Text),
    ("observacion", EnumStoreColumnKind::Text),
    ("tipo_red", EnumStoreColumnKind::Text),
    ("fecha_liberacion_corp", EnumStoreColumnKind::Date),
    ("tipo", EnumStoreColumnKind::Text),
    ("tipo_zona", EnumStoreColumnKind::Text),
];

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Record

/// One row of the `clusters` table, or a synthesized equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Default, sqlx::FromRow)]
pub struct SpecClusterRecord {
    pub id: String,
    pub hostname: String,
    #[sqlx(rename = "nombre")]
    pub name: String,
    #[sqlx(rename = "zona_cobertura")]
    pub coverage_zone: String,
    pub canton: String,
    #[sqlx(rename = "puertos_habilitados")]
    pub ports_enabled: Option<i64>,
    #[sqlx(rename = "hps_liberadas")]
    pub hp_released: Option<i64>,
    pub home_passes: Option<i64>,
    pub business_passes: Option<i64>,
    #[sqlx(rename = "fecha_liberacion")]
    pub date_release: Option<NaiveDate>,
    pub hp_horizontal_res: Option<i64>,
    pub hp_horizontal_com: Option<i64>,
    pub hp_vertical_res: Option<i64>,
    pub hp_vertical_com: Option<i64>,
    #[sqlx(rename = "edif_res")]
    pub buildings_res: Option<i64>,
    #[sqlx(rename = "edif_com")]
    pub buildings_com: Option<i64>,
    #[sqlx(rename = "solares_res")]
    pub lots_res: Option<i64>,
    #[sqlx(rename = "tipo_cobertura")]
    pub coverage_type: String,
    pub region: String,
    #[sqlx(rename = "parroquia")]
    pub parish: String,
    #[sqlx(rename = "observacion")]
    pub observation: String,
    #[sqlx(rename = "tipo_red")]
    pub network_type: String,
    #[sqlx(rename = "fecha_liberacion_corp")]
    pub date_release_corp: Option<NaiveDate>,
    #[sqlx(rename = "tipo")]
    pub kind: String,
    #[sqlx(rename = "tipo_zona")]
    pub zone_type: String,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ConnectionParameters

/// Connection parameters for one PostgreSQL store.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SpecConnectionParams {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    #[serde(deserialize_with = "deserialize_port")]
    pub port: u16,
}

impl fmt::Debug for SpecConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecConnectionParams")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"***")
            .field("port", &self.port)
            .finish()
    }
}

/// Connection file layout: parameters live under the `PostgresSQL` key.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecConnectionFile {
    #[serde(rename = "PostgresSQL")]
    pub postgres: SpecConnectionParams,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EnumPortValue {
    Number(u16),
    Text(String),
}

fn deserialize_port<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    match EnumPortValue::deserialize(deserializer)? {
        EnumPortValue::Number(n) => Ok(n),
        EnumPortValue::Text(s) => s
            .trim()
            .parse::<u16>()
            .map_err(|err| serde::de::Error::custom(format!("invalid port {s:?}: {err}"))),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Failures of the store connector and queries.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection configuration file does not exist.
    #[error("connection configuration not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },
    /// Connection configuration exists but cannot be read.
    #[error("failed to read connection configuration {}: {message}", path.display())]
    ConfigUnreadable { path: PathBuf, message: String },
    /// Connection configuration is malformed or misses keys.
    #[error("invalid connection configuration {}: {message}", path.display())]
    ConfigInvalid { path: PathBuf, message: String },
    /// Opening the connection failed.
    #[error("connection failed: {0}")]
    Connection(#[source] sqlx::Error),
    /// A lookup query failed.
    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
    /// Releasing the connection failed.
    #[error("failed to close connection: {0}")]
    Close(#[source] sqlx::Error),
}

impl StoreError {
    /// Whether the failure stems from the configuration source.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigUnreadable { .. } | Self::ConfigInvalid { .. }
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
