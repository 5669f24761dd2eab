//! Conversion of cluster records into the in-memory report table.

use chrono::{Datelike, NaiveDate};
use clusterkit_store::{SpecClusterRecord, TUP_CLUSTER_COLUMNS};
use polars::prelude::{Column, DataFrame, DataType, PolarsResult};

/// Days from 0001-01-01 (CE day 1) to 1970-01-01.
const N_DAYS_CE_TO_UNIX_EPOCH: i32 = 719_163;

fn derive_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - N_DAYS_CE_TO_UNIX_EPOCH
}

fn derive_text_column(
    name: &str,
    l_records: &[SpecClusterRecord],
    f_value: impl Fn(&SpecClusterRecord) -> &str,
) -> Column {
    let l_values: Vec<&str> = l_records.iter().map(f_value).collect();
    Column::new(name.into(), l_values)
}

fn derive_integer_column(
    name: &str,
    l_records: &[SpecClusterRecord],
    f_value: impl Fn(&SpecClusterRecord) -> Option<i64>,
) -> Column {
    let l_values: Vec<Option<i64>> = l_records.iter().map(f_value).collect();
    Column::new(name.into(), l_values)
}

fn derive_date_column(
    name: &str,
    l_records: &[SpecClusterRecord],
    f_value: impl Fn(&SpecClusterRecord) -> Option<NaiveDate>,
) -> PolarsResult<Column> {
    let l_values: Vec<Option<i32>> = l_records
        .iter()
        .map(|record| f_value(record).map(derive_epoch_days))
        .collect();
    Column::new(name.into(), l_values).cast(&DataType::Date)
}

/// Build the 25-column report table, one row per record, in record order.
pub fn derive_cluster_dataframe(l_records: &[SpecClusterRecord]) -> PolarsResult<DataFrame> {
    let c = |n_idx: usize| TUP_CLUSTER_COLUMNS[n_idx].0;
    let l_columns = vec![
        derive_text_column(c(0), l_records, |r| r.id.as_str()),
        derive_text_column(c(1), l_records, |r| r.hostname.as_str()),
        derive_text_column(c(2), l_records, |r| r.name.as_str()),
        derive_text_column(c(3), l_records, |r| r.coverage_zone.as_str()),
        derive_text_column(c(4), l_records, |r| r.canton.as_str()),
        derive_integer_column(c(5), l_records, |r| r.ports_enabled),
        derive_integer_column(c(6), l_records, |r| r.hp_released),
        derive_integer_column(c(7), l_records, |r| r.home_passes),
        derive_integer_column(c(8), l_records, |r| r.business_passes),
        derive_date_column(c(9), l_records, |r| r.date_release)?,
        derive_integer_column(c(10), l_records, |r| r.hp_horizontal_res),
        derive_integer_column(c(11), l_records, |r| r.hp_horizontal_com),
        derive_integer_column(c(12), l_records, |r| r.hp_vertical_res),
        derive_integer_column(c(13), l_records, |r| r.hp_vertical_com),
        derive_integer_column(c(14), l_records, |r| r.buildings_res),
        derive_integer_column(c(15), l_records, |r| r.buildings_com),
        derive_integer_column(c(16), l_records, |r| r.lots_res),
        derive_text_column(c(17), l_records, |r| r.coverage_type.as_str()),
        derive_text_column(c(18), l_records, |r| r.region.as_str()),
        derive_text_column(c(19), l_records, |r| r.parish.as_str()),
        derive_text_column(c(20), l_records, |r| r.observation.as_str()),
        derive_text_column(c(21), l_records, |r| r.network_type.as_str()),
        derive_date_column(c(22), l_records, |r| r.date_release_corp)?,
        derive_text_column(c(23), l_records, |r| r.kind.as_str()),
        derive_text_column(c(24), l_records, |r| r.zone_type.as_str()),
    ];
    DataFrame::new(l_columns)
}
