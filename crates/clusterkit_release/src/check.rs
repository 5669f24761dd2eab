//! Cluster existence check and report dispatch.

use clusterkit_io_xlsx::TraitSheetExporter;
use clusterkit_store::{SpecClusterRecord, StoreError, TraitClusterStore, TraitStoreConnector};

use crate::conf::{SpecDeploymentConfig, SpecReleaseRunOptions};
use crate::report::{report_existing_cluster, report_new_cluster};
use crate::spec::EnumRunOutcome;

/// Lookup result gathered while the connection is open.
enum EnumLookup {
    Found(Vec<SpecClusterRecord>),
    Absent,
}

async fn lookup_cluster<S: TraitClusterStore>(
    store: &mut S,
    name: &str,
) -> Result<EnumLookup, StoreError> {
    match store.fetch_first_by_name(name).await? {
        Some(record) => {
            log::info!("Cluster {name} exists (first id={}).", record.id);
            let l_records = store.fetch_all_by_name(name).await?;
            log::info!("Fetched {} record(s) for cluster {name}.", l_records.len());
            Ok(EnumLookup::Found(l_records))
        }
        None => {
            log::info!("Cluster {name} not found.");
            Ok(EnumLookup::Absent)
        }
    }
}

/// Decide whether `cfg.cluster_name` is stored and produce the matching report.
///
/// One connection is opened and released before any report is written.
pub async fn check_cluster_existence<C, E>(
    connector: &C,
    cfg: &SpecDeploymentConfig,
    exporter: &E,
    options: &SpecReleaseRunOptions,
) -> EnumRunOutcome
where
    C: TraitStoreConnector,
    E: TraitSheetExporter,
{
    let mut store = match connector.connect().await {
        Ok(store) => store,
        Err(err) => {
            if err.is_config_error() {
                log::error!("Connection configuration unavailable: {err}");
            } else {
                log::error!("Database connection failed: {err}");
            }
            log::error!("Could not establish connection.");
            return EnumRunOutcome::ConnectionFailed;
        }
    };

    let lookup = lookup_cluster(&mut store, &cfg.cluster_name).await;
    if let Err(err) = store.close().await {
        log::warn!("{err}");
    }

    match lookup {
        Err(err) => {
            log::error!("Cluster lookup failed: {err}");
            EnumRunOutcome::QueryFailed
        }
        Ok(EnumLookup::Found(l_records)) if l_records.is_empty() => {
            log::warn!(
                "Cluster {} vanished between lookups; no report written.",
                cfg.cluster_name
            );
            EnumRunOutcome::ExistingCluster {
                n_records: 0,
                path_file_out: None,
            }
        }
        Ok(EnumLookup::Found(l_records)) => EnumRunOutcome::ExistingCluster {
            n_records: l_records.len(),
            path_file_out: report_existing_cluster(&l_records, cfg, exporter, options),
        },
        Ok(EnumLookup::Absent) => EnumRunOutcome::NewCluster {
            path_file_out: report_new_cluster(cfg, exporter, options),
        },
    }
}
