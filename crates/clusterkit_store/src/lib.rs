//! `clusterkit_store` v1:
//! Read-only access to the `clusters` table.
//!
//! Modules:
//! - `conf`  : defaults, SQL text, connection-file loading
//! - `spec`  : record/params/error models
//! - `store` : connector/store seams and the PostgreSQL implementation
pub mod conf;
pub mod spec;
pub mod store;

pub use conf::{
    C_TABLE_CLUSTERS, PATH_CONNECTION_CONF_DEFAULT, derive_select_by_name_sql,
    load_connection_params,
};
pub use spec::{
    EnumStoreColumnKind, SpecClusterRecord, SpecConnectionFile, SpecConnectionParams, StoreError,
    TUP_CLUSTER_COLUMNS,
};
pub use store::{PgClusterStore, PgStoreConnector, TraitClusterStore, TraitStoreConnector};
