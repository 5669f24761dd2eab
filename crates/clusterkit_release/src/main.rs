//! `clusterkit` binary: check one cluster against the store and write its report.

use std::path::PathBuf;

use clap::Parser;
use clusterkit_io_xlsx::XlsxSheetExporter;
use clusterkit_release::{
    PATH_DIR_OUT_DEFAULT, SpecDeploymentConfig, SpecReleaseRunOptions, check_cluster_existence,
    load_deployment_config,
};
use clusterkit_store::{PATH_CONNECTION_CONF_DEFAULT, PgStoreConnector};

/// Cluster release report generator.
#[derive(Debug, Parser)]
#[command(version, about = "Check a cluster in the store and export its report", long_about = None)]
struct Cli {
    /// JSON file holding the `PostgresSQL` connection parameters.
    #[arg(long, default_value = PATH_CONNECTION_CONF_DEFAULT)]
    conf_connection: PathBuf,

    /// TOML deployment attributes; built-in defaults when omitted.
    #[arg(long)]
    conf_deployment: Option<PathBuf>,

    /// Directory receiving the report.
    #[arg(long, default_value = PATH_DIR_OUT_DEFAULT)]
    dir_out: PathBuf,

    /// Debug-level logging when `RUST_LOG` is unset.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    clusterkit_log::init_logging(cli.verbose);

    let cfg = match &cli.conf_deployment {
        Some(path) => match load_deployment_config(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::error!("{err}");
                return;
            }
        },
        None => SpecDeploymentConfig::default(),
    };
    for c_warning in cfg.validate() {
        log::warn!("{c_warning}");
    }

    let options = SpecReleaseRunOptions::new(cli.dir_out, chrono::Local::now().date_naive());
    let connector = PgStoreConnector::new(cli.conf_connection);
    let exporter = XlsxSheetExporter::default();

    log::info!(
        "Checking cluster {} on {}",
        cfg.cluster_name,
        options.date_today
    );
    let outcome = check_cluster_existence(&connector, &cfg, &exporter, &options).await;
    log::info!("{outcome}");
}
