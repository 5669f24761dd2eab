//! Store seams and the PostgreSQL implementation.

use std::path::{Path, PathBuf};

use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::Connection;

use crate::conf::{C_TABLE_CLUSTERS, derive_select_by_name_sql, load_connection_params};
use crate::spec::{SpecClusterRecord, SpecConnectionParams, StoreError};

////////////////////////////////////////////////////////////////////////////////
// #region Traits

/// Read-only view of the `clusters` table over one open connection.
#[allow(async_fn_in_trait)]
pub trait TraitClusterStore {
    /// First record whose name equals `name`, if any.
    async fn fetch_first_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<SpecClusterRecord>, StoreError>;

    /// Every record whose name equals `name`.
    async fn fetch_all_by_name(&mut self, name: &str)
    -> Result<Vec<SpecClusterRecord>, StoreError>;

    /// Release the connection.
    async fn close(self) -> Result<(), StoreError>;
}

/// Opens one store connection per call.
#[allow(async_fn_in_trait)]
pub trait TraitStoreConnector {
    type Store: TraitClusterStore;

    async fn connect(&self) -> Result<Self::Store, StoreError>;
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Postgres

/// One `sqlx` PostgreSQL connection with prepared lookup text.
pub struct PgClusterStore {
    conn: PgConnection,
    sql_select_first: String,
    sql_select_all: String,
}

impl PgClusterStore {
    /// Open a connection with explicit parameters.
    pub async fn connect(params: &SpecConnectionParams) -> Result<Self, StoreError> {
        let opts = PgConnectOptions::new()
            .host(&params.host)
            .port(params.port)
            .username(&params.user)
            .password(&params.password)
            .database(&params.database);
        let conn = PgConnection::connect_with(&opts)
            .await
            .map_err(StoreError::Connection)?;
        log::info!(
            "Connected to {}:{}/{}",
            params.host,
            params.port,
            params.database
        );

        Ok(Self {
            conn,
            sql_select_first: derive_select_by_name_sql(C_TABLE_CLUSTERS, true),
            sql_select_all: derive_select_by_name_sql(C_TABLE_CLUSTERS, false),
        })
    }
}

impl TraitClusterStore for PgClusterStore {
    async fn fetch_first_by_name(
        &mut self,
        name: &str,
    ) -> Result<Option<SpecClusterRecord>, StoreError> {
        sqlx::query_as::<_, SpecClusterRecord>(&self.sql_select_first)
            .bind(name)
            .fetch_optional(&mut self.conn)
            .await
            .map_err(StoreError::Query)
    }

    async fn fetch_all_by_name(
        &mut self,
        name: &str,
    ) -> Result<Vec<SpecClusterRecord>, StoreError> {
        sqlx::query_as::<_, SpecClusterRecord>(&self.sql_select_all)
            .bind(name)
            .fetch_all(&mut self.conn)
            .await
            .map_err(StoreError::Query)
    }

    async fn close(self) -> Result<(), StoreError> {
        self.conn.close().await.map_err(StoreError::Close)
    }
}

/// Connector reading parameters from a JSON file on every `connect`.
#[derive(Debug, Clone)]
pub struct PgStoreConnector {
    path_conf: PathBuf,
}

impl PgStoreConnector {
    pub fn new(path_conf: impl Into<PathBuf>) -> Self {
        Self {
            path_conf: path_conf.into(),
        }
    }

    pub fn path_conf(&self) -> &Path {
        &self.path_conf
    }
}

impl TraitStoreConnector for PgStoreConnector {
    type Store = PgClusterStore;

    async fn connect(&self) -> Result<Self::Store, StoreError> {
        let params = load_connection_params(&self.path_conf)?;
        log::debug!("Connection parameters: {params:?}");
        PgClusterStore::connect(&params).await
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
