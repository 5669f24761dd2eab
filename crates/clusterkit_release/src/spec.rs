//! Release run models and top-level error types.

use std::fmt;
use std::path::PathBuf;

use polars::prelude::PolarsError;
use thiserror::Error;

/// Failures raised while preparing or exporting a report.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Deployment configuration file could not be read or parsed.
    #[error("failed to load deployment configuration {}: {message}", path.display())]
    DeploymentConfig { path: PathBuf, message: String },
    /// In-memory report table could not be assembled.
    #[error("failed to build report table: {0}")]
    Table(#[from] PolarsError),
    /// Writing the spreadsheet failed.
    #[error("failed to export {}: {message}", path.display())]
    Export { path: PathBuf, message: String },
}

/// Terminal state of one existence-check run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumRunOutcome {
    /// No connection could be opened; nothing was queried.
    ConnectionFailed,
    /// A lookup failed after connecting.
    QueryFailed,
    /// Cluster found; scope report path when the export succeeded.
    ExistingCluster {
        n_records: usize,
        path_file_out: Option<PathBuf>,
    },
    /// Cluster absent; release report path when the export succeeded.
    NewCluster { path_file_out: Option<PathBuf> },
}

impl EnumRunOutcome {
    /// Report file produced by the run, if any.
    pub fn path_file_out(&self) -> Option<&PathBuf> {
        match self {
            Self::ExistingCluster { path_file_out, .. } | Self::NewCluster { path_file_out } => {
                path_file_out.as_ref()
            }
            Self::ConnectionFailed | Self::QueryFailed => None,
        }
    }
}

impl fmt::Display for EnumRunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionFailed => write!(f, "[RUN] connection failed; no report"),
            Self::QueryFailed => write!(f, "[RUN] query failed; no report"),
            Self::ExistingCluster {
                n_records,
                path_file_out: Some(path),
            } => write!(
                f,
                "[RUN] existing cluster records={n_records} report={}",
                path.display()
            ),
            Self::ExistingCluster {
                n_records,
                path_file_out: None,
            } => write!(f, "[RUN] existing cluster records={n_records} report=none"),
            Self::NewCluster {
                path_file_out: Some(path),
            } => write!(f, "[RUN] new cluster report={}", path.display()),
            Self::NewCluster {
                path_file_out: None,
            } => write!(f, "[RUN] new cluster report=none"),
        }
    }
}
