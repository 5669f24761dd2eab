//! Existing-cluster scope report and new-cluster release report.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clusterkit_io_xlsx::{SpecSheetTable, TraitSheetExporter};
use clusterkit_store::SpecClusterRecord;

use crate::conf::{
    C_CANTON_RELEASE, C_KIND_PLACEHOLDER, C_PREFIX_FILE_RELEASE, C_PREFIX_FILE_SCOPE,
    C_SHEET_RELEASE, C_SHEET_SCOPE, SpecDeploymentConfig, SpecReleaseRunOptions,
};
use crate::ident::derive_cluster_id;
use crate::spec::ReleaseError;
use crate::table::derive_cluster_dataframe;

////////////////////////////////////////////////////////////////////////////////
// #region Records

/// Summary record appended after the fetched rows.
///
/// Counts are summed skipping missing values; text fields come from the last
/// record, zone type from the configuration; both dates are `date_today`.
pub fn derive_totals_record(
    l_records: &[SpecClusterRecord],
    cfg: &SpecDeploymentConfig,
    date_today: NaiveDate,
) -> SpecClusterRecord {
    let sum = |f_value: fn(&SpecClusterRecord) -> Option<i64>| {
        Some(l_records.iter().filter_map(f_value).sum::<i64>())
    };
    let record_last = l_records.last().cloned().unwrap_or_default();

    SpecClusterRecord {
        id: derive_cluster_id(&cfg.cluster_name, date_today),
        ports_enabled: sum(|r| r.ports_enabled),
        hp_released: sum(|r| r.hp_released),
        home_passes: sum(|r| r.home_passes),
        business_passes: sum(|r| r.business_passes),
        date_release: Some(date_today),
        hp_horizontal_res: sum(|r| r.hp_horizontal_res),
        hp_horizontal_com: sum(|r| r.hp_horizontal_com),
        hp_vertical_res: sum(|r| r.hp_vertical_res),
        hp_vertical_com: sum(|r| r.hp_vertical_com),
        buildings_res: sum(|r| r.buildings_res),
        buildings_com: sum(|r| r.buildings_com),
        lots_res: sum(|r| r.lots_res),
        date_release_corp: Some(date_today),
        zone_type: cfg.zone_type.clone(),
        ..record_last
    }
}

/// Single synthesized record for a cluster absent from the store.
pub fn derive_release_record(
    cfg: &SpecDeploymentConfig,
    date_today: NaiveDate,
) -> SpecClusterRecord {
    SpecClusterRecord {
        id: derive_cluster_id(&cfg.cluster_name, date_today),
        hostname: cfg.hostname.clone(),
        name: cfg.cluster_name.clone(),
        coverage_zone: cfg.zone.clone(),
        canton: C_CANTON_RELEASE.to_string(),
        ports_enabled: Some(cfg.hp_total),
        hp_released: Some(cfg.hp_total),
        home_passes: Some(cfg.hp_home()),
        business_passes: Some(cfg.hp_commercial()),
        date_release: Some(date_today),
        hp_horizontal_res: Some(cfg.hp_horizontal_res),
        hp_horizontal_com: Some(cfg.hp_horizontal_com),
        hp_vertical_res: Some(cfg.hp_vertical_res),
        hp_vertical_com: Some(cfg.hp_vertical_com),
        buildings_res: Some(cfg.hp_buildings_res_projected),
        buildings_com: Some(cfg.hp_buildings_com_projected),
        lots_res: Some(cfg.n_lots),
        coverage_type: cfg.coverage_type.clone(),
        region: cfg.region.clone(),
        parish: cfg.parish.clone(),
        observation: format!("Feeder: {}, Hub: {}", cfg.feeder, cfg.hub),
        network_type: cfg.network_type.clone(),
        date_release_corp: Some(date_today),
        kind: C_KIND_PLACEHOLDER.to_string(),
        zone_type: cfg.zone_type.clone(),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Tables

/// Scope table: fetched rows plus a bold totals row.
pub fn derive_scope_table(
    l_records: &[SpecClusterRecord],
    cfg: &SpecDeploymentConfig,
    date_today: NaiveDate,
) -> Result<SpecSheetTable, ReleaseError> {
    let mut l_rows = l_records.to_vec();
    l_rows.push(derive_totals_record(l_records, cfg, date_today));
    let df = derive_cluster_dataframe(&l_rows)?;
    Ok(SpecSheetTable::new(C_SHEET_SCOPE, df)
        .with_bold_header()
        .with_bold_last_row())
}

/// Release table: one synthesized row under a bold header.
pub fn derive_release_table(
    cfg: &SpecDeploymentConfig,
    date_today: NaiveDate,
) -> Result<SpecSheetTable, ReleaseError> {
    let df = derive_cluster_dataframe(&[derive_release_record(cfg, date_today)])?;
    Ok(SpecSheetTable::new(C_SHEET_RELEASE, df).with_bold_header())
}

/// Report path `<dir_out>/<prefix>_<cluster>.xlsx` with a file-name-safe cluster.
pub fn derive_report_path(dir_out: &Path, c_prefix: &str, cluster_name: &str) -> PathBuf {
    let c_safe: String = cluster_name
        .trim()
        .chars()
        .map(|chr| match chr {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            chr if chr.is_control() => '_',
            chr => chr,
        })
        .collect();
    dir_out.join(format!("{c_prefix}_{c_safe}.xlsx"))
}

fn export_table<E: TraitSheetExporter>(
    exporter: &E,
    path_file_out: PathBuf,
    table: &SpecSheetTable,
) -> Result<PathBuf, ReleaseError> {
    let report = exporter
        .export_table(&path_file_out, table)
        .map_err(|message| ReleaseError::Export {
            path: path_file_out.clone(),
            message,
        })?;
    for c_warning in &report.warnings {
        log::warn!("{c_warning}");
    }
    Ok(path_file_out)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Reporters

/// Export the scope report for fetched records.
pub fn export_existing_cluster<E: TraitSheetExporter>(
    l_records: &[SpecClusterRecord],
    cfg: &SpecDeploymentConfig,
    exporter: &E,
    options: &SpecReleaseRunOptions,
) -> Result<PathBuf, ReleaseError> {
    let table = derive_scope_table(l_records, cfg, options.date_today)?;
    let path_file_out =
        derive_report_path(&options.dir_out, C_PREFIX_FILE_SCOPE, &cfg.cluster_name);
    export_table(exporter, path_file_out, &table)
}

/// Export the release report built from the configuration.
pub fn export_new_cluster<E: TraitSheetExporter>(
    cfg: &SpecDeploymentConfig,
    exporter: &E,
    options: &SpecReleaseRunOptions,
) -> Result<PathBuf, ReleaseError> {
    let table = derive_release_table(cfg, options.date_today)?;
    let path_file_out =
        derive_report_path(&options.dir_out, C_PREFIX_FILE_RELEASE, &cfg.cluster_name);
    export_table(exporter, path_file_out, &table)
}

/// [`export_existing_cluster`] with failures logged and turned into `None`.
pub fn report_existing_cluster<E: TraitSheetExporter>(
    l_records: &[SpecClusterRecord],
    cfg: &SpecDeploymentConfig,
    exporter: &E,
    options: &SpecReleaseRunOptions,
) -> Option<PathBuf> {
    match export_existing_cluster(l_records, cfg, exporter, options) {
        Ok(path_file_out) => {
            log::info!(
                "Scope report with totals exported to {}",
                path_file_out.display()
            );
            Some(path_file_out)
        }
        Err(err) => {
            log::error!("Scope report export failed: {err}");
            None
        }
    }
}

/// [`export_new_cluster`] with failures logged and turned into `None`.
pub fn report_new_cluster<E: TraitSheetExporter>(
    cfg: &SpecDeploymentConfig,
    exporter: &E,
    options: &SpecReleaseRunOptions,
) -> Option<PathBuf> {
    match export_new_cluster(cfg, exporter, options) {
        Ok(path_file_out) => {
            log::info!("Release report created at {}", path_file_out.display());
            Some(path_file_out)
        }
        Err(err) => {
            log::error!("Release report export failed: {err}");
            None
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use clusterkit_io_xlsx::SpecXlsxReport;
    use polars::prelude::AnyValue;

    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn derive_record(
        c_id: &str,
        n_ports: i64,
        c_kind: &str,
        c_zone_type: &str,
    ) -> SpecClusterRecord {
        SpecClusterRecord {
            id: c_id.to_string(),
            hostname: format!("OLT-{c_id}"),
            name: "Daniel".to_string(),
            coverage_zone: format!("zona {c_id}"),
            canton: "GUAYAQUIL".to_string(),
            ports_enabled: Some(n_ports),
            hp_released: Some(n_ports),
            home_passes: Some(n_ports - 5),
            business_passes: Some(5),
            date_release: Some(ymd(2024, 5, 1)),
            hp_horizontal_res: Some(1),
            hp_horizontal_com: Some(2),
            hp_vertical_res: Some(3),
            hp_vertical_com: Some(4),
            buildings_res: Some(5),
            buildings_com: Some(6),
            lots_res: Some(7),
            coverage_type: "GREENFIELD".to_string(),
            region: "R1".to_string(),
            parish: format!("parroquia {c_id}"),
            observation: format!("obs {c_id}"),
            network_type: "MASIVO".to_string(),
            date_release_corp: None,
            kind: c_kind.to_string(),
            zone_type: c_zone_type.to_string(),
        }
    }

    #[derive(Default)]
    struct RecordingExporter {
        l_calls: RefCell<Vec<(PathBuf, SpecSheetTable)>>,
        c_fail: Option<String>,
    }

    impl TraitSheetExporter for RecordingExporter {
        fn export_table(
            &self,
            path_file_out: &Path,
            table: &SpecSheetTable,
        ) -> Result<SpecXlsxReport, String> {
            if let Some(c_fail) = &self.c_fail {
                return Err(c_fail.clone());
            }
            self.l_calls
                .borrow_mut()
                .push((path_file_out.to_path_buf(), table.clone()));
            Ok(SpecXlsxReport::default())
        }
    }

    #[test]
    fn totals_record_sums_counts_and_copies_last_text() {
        let cfg = SpecDeploymentConfig::default();
        let date_today = ymd(2026, 10, 19);
        let record_last = SpecClusterRecord {
            name: "Daniel Norte".to_string(),
            coverage_type: "BROWNFIELD".to_string(),
            region: "R2".to_string(),
            network_type: "CORPORATIVO".to_string(),
            ..derive_record("c", 195, "GPON", "ABIERTA")
        };
        let l_records = vec![
            derive_record("a", 100, "FTTH", "ABIERTA"),
            derive_record("b", 200, "FTTH", "ABIERTA"),
            record_last,
        ];

        let totals = derive_totals_record(&l_records, &cfg, date_today);
        assert_eq!(totals.ports_enabled, Some(495));
        assert_eq!(totals.hp_released, Some(495));
        assert_eq!(totals.home_passes, Some(480));
        assert_eq!(totals.business_passes, Some(15));
        assert_eq!(totals.hp_horizontal_res, Some(3));
        assert_eq!(totals.hp_horizontal_com, Some(6));
        assert_eq!(totals.hp_vertical_res, Some(9));
        assert_eq!(totals.hp_vertical_com, Some(12));
        assert_eq!(totals.buildings_res, Some(15));
        assert_eq!(totals.buildings_com, Some(18));
        assert_eq!(totals.lots_res, Some(21));

        assert_eq!(totals.hostname, "OLT-c");
        assert_eq!(totals.name, "Daniel Norte");
        assert_eq!(totals.coverage_zone, "zona c");
        assert_eq!(totals.coverage_type, "BROWNFIELD");
        assert_eq!(totals.region, "R2");
        assert_eq!(totals.parish, "parroquia c");
        assert_eq!(totals.observation, "obs c");
        assert_eq!(totals.network_type, "CORPORATIVO");
        assert_eq!(totals.kind, "GPON");
        assert_eq!(totals.canton, "GUAYAQUIL");
        assert_eq!(totals.zone_type, "CERRADA");

        assert_eq!(totals.date_release, Some(date_today));
        assert_eq!(totals.date_release_corp, Some(date_today));
        assert_eq!(totals.id, derive_cluster_id("Daniel", date_today));
    }

    #[test]
    fn totals_record_skips_missing_counts() {
        let cfg = SpecDeploymentConfig::default();
        let l_records = vec![
            derive_record("a", 100, "FTTH", "X"),
            SpecClusterRecord {
                ports_enabled: None,
                lots_res: None,
                ..derive_record("b", 200, "FTTH", "X")
            },
        ];

        let totals = derive_totals_record(&l_records, &cfg, ymd(2026, 10, 19));
        assert_eq!(totals.ports_enabled, Some(100));
        assert_eq!(totals.hp_released, Some(300));
        assert_eq!(totals.lots_res, Some(7));
    }

    #[test]
    fn totals_record_of_empty_set_is_zeroed() {
        let cfg = SpecDeploymentConfig::default();
        let totals = derive_totals_record(&[], &cfg, ymd(2026, 10, 19));
        assert_eq!(totals.ports_enabled, Some(0));
        assert_eq!(totals.hostname, "");
        assert_eq!(totals.zone_type, "CERRADA");
        assert_eq!(totals.id.len(), 32);
    }

    #[test]
    fn release_record_derives_passes_and_placeholders() {
        let cfg = SpecDeploymentConfig {
            hp_total: 300,
            hp_horizontal_com: 20,
            hp_vertical_com: 30,
            ..SpecDeploymentConfig::default()
        };
        let record = derive_release_record(&cfg, ymd(2026, 10, 19));

        assert_eq!(record.home_passes, Some(250));
        assert_eq!(record.business_passes, Some(50));
        assert_eq!(record.ports_enabled, Some(300));
        assert_eq!(record.hp_released, Some(300));
        assert_eq!(record.canton, "SAMBORONDON");
        assert_eq!(record.kind, "N/A");
        assert_eq!(record.observation, "Feeder: T28, Hub: DELICIAS");
        assert_eq!(record.lots_res, Some(83));
        assert_eq!(record.name, "Daniel");
        assert_eq!(record.zone_type, "CERRADA");
    }

    #[test]
    fn scope_export_appends_bold_totals_row() {
        let cfg = SpecDeploymentConfig::default();
        let options = SpecReleaseRunOptions::new("generador", ymd(2026, 10, 19));
        let exporter = RecordingExporter::default();
        let l_records = vec![
            derive_record("a", 100, "FTTH", "X"),
            derive_record("b", 200, "FTTH", "X"),
            derive_record("c", 195, "FTTH", "X"),
        ];

        let path_file_out =
            report_existing_cluster(&l_records, &cfg, &exporter, &options).expect("exported");
        assert_eq!(path_file_out, PathBuf::from("generador/alcance_Daniel.xlsx"));

        let l_calls = exporter.l_calls.borrow();
        assert_eq!(l_calls.len(), 1);
        let table = &l_calls[0].1;
        assert_eq!(table.sheet_name, "Resultados");
        assert_eq!(table.height(), 4);
        assert_eq!(table.width(), 25);
        assert!(table.if_bold_last_row);
        assert!(table.is_body_row_bold(3));
        assert!(!table.is_body_row_bold(2));

        let col_ports = table.df.column("puertos_habilitados").expect("col");
        assert_eq!(col_ports.get(3).expect("cell"), AnyValue::Int64(495));
        let col_zone = table.df.column("tipo_zona").expect("col");
        assert_eq!(col_zone.get(3).expect("cell"), AnyValue::String("CERRADA"));
        assert_eq!(col_zone.get(0).expect("cell"), AnyValue::String("X"));
    }

    #[test]
    fn release_export_writes_one_row_with_bold_header() {
        let cfg = SpecDeploymentConfig::default();
        let options = SpecReleaseRunOptions::new("out", ymd(2026, 10, 19));
        let exporter = RecordingExporter::default();

        let path_file_out = report_new_cluster(&cfg, &exporter, &options).expect("exported");
        assert_eq!(path_file_out, PathBuf::from("out/liberacion_Daniel.xlsx"));

        let l_calls = exporter.l_calls.borrow();
        let table = &l_calls[0].1;
        assert_eq!(table.sheet_name, "Liberación");
        assert_eq!(table.height(), 1);
        assert!(table.if_bold_header);
        assert!(!table.if_bold_last_row);
        assert_eq!(
            table.df.column("canton").expect("col").get(0).expect("cell"),
            AnyValue::String("SAMBORONDON")
        );
    }

    #[test]
    fn export_failure_surfaces_as_none() {
        let cfg = SpecDeploymentConfig::default();
        let options = SpecReleaseRunOptions::new("out", ymd(2026, 10, 19));
        let exporter = RecordingExporter {
            c_fail: Some("disk full".to_string()),
            ..Default::default()
        };
        let l_records = vec![derive_record("a", 1, "t", "z")];

        assert!(report_new_cluster(&cfg, &exporter, &options).is_none());
        assert!(report_existing_cluster(&l_records, &cfg, &exporter, &options).is_none());

        let err = export_new_cluster(&cfg, &exporter, &options).expect_err("must fail");
        assert_eq!(
            err.to_string(),
            "failed to export out/liberacion_Daniel.xlsx: disk full"
        );
    }

    #[test]
    fn report_path_is_file_name_safe() {
        assert_eq!(
            derive_report_path(Path::new("generador"), "alcance", "Norte/Sur"),
            PathBuf::from("generador/alcance_Norte_Sur.xlsx")
        );
    }
}
