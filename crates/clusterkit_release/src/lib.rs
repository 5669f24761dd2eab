//! `clusterkit_release` v1:
//! Cluster existence check and release/scope report generation.
//!
//! Modules:
//! - `conf`   : deployment configuration, run options, report constants
//! - `spec`   : run outcome and error models
//! - `ident`  : deterministic cluster identifiers
//! - `table`  : record-to-DataFrame conversion
//! - `report` : totals/release records and report export
//! - `check`  : existence check over one store connection
pub mod check;
pub mod conf;
pub mod ident;
pub mod report;
pub mod spec;
pub mod table;

pub use check::check_cluster_existence;
pub use conf::{
    C_CANTON_RELEASE, C_KIND_PLACEHOLDER, C_PREFIX_FILE_RELEASE, C_PREFIX_FILE_SCOPE,
    C_SHEET_RELEASE, C_SHEET_SCOPE, PATH_DIR_OUT_DEFAULT, SpecDeploymentConfig,
    SpecReleaseRunOptions, load_deployment_config,
};
pub use ident::{derive_cluster_id, derive_day_number};
pub use report::{
    derive_release_record, derive_release_table, derive_report_path, derive_scope_table,
    derive_totals_record, export_existing_cluster, export_new_cluster, report_existing_cluster,
    report_new_cluster,
};
pub use spec::{EnumRunOutcome, ReleaseError};
pub use table::derive_cluster_dataframe;
