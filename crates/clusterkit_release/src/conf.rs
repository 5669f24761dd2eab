//! Deployment configuration and report constants.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::spec::ReleaseError;

/// Default directory receiving generated reports.
pub const PATH_DIR_OUT_DEFAULT: &str = "generador";
/// File prefix of the existing-cluster scope report.
pub const C_PREFIX_FILE_SCOPE: &str = "alcance";
/// File prefix of the new-cluster release report.
pub const C_PREFIX_FILE_RELEASE: &str = "liberacion";
/// Sheet name of the existing-cluster scope report.
pub const C_SHEET_SCOPE: &str = "Resultados";
/// Sheet name of the new-cluster release report.
pub const C_SHEET_RELEASE: &str = "Liberación";
/// Canton written on synthesized release records.
pub const C_CANTON_RELEASE: &str = "SAMBORONDON";
/// Type placeholder written on synthesized release records.
pub const C_KIND_PLACEHOLDER: &str = "N/A";

/// Fixed attributes of one deployment; read-only for the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpecDeploymentConfig {
    pub hub: String,
    pub hostname: String,
    pub vendor: String,
    pub network_type: String,
    pub zone_type: String,
    pub coverage_type: String,
    pub region: String,
    /// Covered urbanizations, free text.
    pub zone: String,
    pub parish: String,
    pub feeder: String,
    pub cluster_name: String,

    pub hp_horizontal_res: i64,
    pub hp_horizontal_com: i64,
    pub hp_vertical_res: i64,
    pub hp_vertical_com: i64,
    pub n_buildings_projected: i64,
    pub hp_buildings_res_projected: i64,
    pub hp_buildings_com_projected: i64,
    pub n_lots: i64,
    pub hp_total: i64,
}

impl Default for SpecDeploymentConfig {
    fn default() -> Self {
        Self {
            hub: "DELICIAS".to_string(),
            hostname: "OLT-ACC-MOCOLI-01".to_string(),
            vendor: "ZTE".to_string(),
            network_type: "MASIVO".to_string(),
            zone_type: "CERRADA".to_string(),
            coverage_type: "BROWNFIELD".to_string(),
            region: "R2".to_string(),
            zone: "URB. ARRECIFE + URB. LA PENINSULA + URB. CANTABRIA + URB. LA ENSENADA"
                .to_string(),
            parish: "LA PUNTILLA".to_string(),
            feeder: "T28".to_string(),
            cluster_name: "Daniel".to_string(),
            hp_horizontal_res: 15,
            hp_horizontal_com: 0,
            hp_vertical_res: 397,
            hp_vertical_com: 0,
            n_buildings_projected: 0,
            hp_buildings_res_projected: 0,
            hp_buildings_com_projected: 0,
            n_lots: 83,
            hp_total: 495,
        }
    }
}

impl SpecDeploymentConfig {
    /// Commercial passes (horizontal + vertical).
    pub fn hp_commercial(&self) -> i64 {
        self.hp_horizontal_com + self.hp_vertical_com
    }

    /// Residential passes derived from the total.
    pub fn hp_home(&self) -> i64 {
        self.hp_total - self.hp_commercial()
    }

    /// Non-fatal consistency warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut l_warnings = Vec::new();
        if self.cluster_name.trim().is_empty() {
            l_warnings.push("cluster_name is empty.".to_string());
        }
        if self.hp_total < self.hp_commercial() {
            l_warnings.push(format!(
                "hp_total={} is smaller than commercial passes={}; home_passes will be negative.",
                self.hp_total,
                self.hp_commercial()
            ));
        }
        let n_hp_parts = self.hp_horizontal_res
            + self.hp_horizontal_com
            + self.hp_vertical_res
            + self.hp_vertical_com
            + self.hp_buildings_res_projected
            + self.hp_buildings_com_projected;
        if n_hp_parts > self.hp_total {
            l_warnings.push(format!(
                "Pass breakdown sums to {n_hp_parts}, above hp_total={}.",
                self.hp_total
            ));
        }
        l_warnings
    }
}

/// Load a deployment configuration from TOML; absent keys keep their defaults.
pub fn load_deployment_config(path: &Path) -> Result<SpecDeploymentConfig, ReleaseError> {
    let c_text = fs::read_to_string(path).map_err(|err| ReleaseError::DeploymentConfig {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    toml::from_str(&c_text).map_err(|err| ReleaseError::DeploymentConfig {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Run-scoped options that are not deployment attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecReleaseRunOptions {
    /// Directory receiving the report file.
    pub dir_out: PathBuf,
    /// Calendar day used for identifiers and release dates.
    pub date_today: chrono::NaiveDate,
}

impl SpecReleaseRunOptions {
    pub fn new(dir_out: impl Into<PathBuf>, date_today: chrono::NaiveDate) -> Self {
        Self {
            dir_out: dir_out.into(),
            date_today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_derives_passes() {
        let cfg = SpecDeploymentConfig::default();
        assert_eq!(cfg.hp_commercial(), 0);
        assert_eq!(cfg.hp_home(), 495);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validate_flags_negative_home_passes() {
        let cfg = SpecDeploymentConfig {
            hp_total: 10,
            hp_horizontal_com: 8,
            hp_vertical_com: 4,
            ..SpecDeploymentConfig::default()
        };
        let l_warnings = cfg.validate();
        assert!(l_warnings.iter().any(|w| w.contains("home_passes will be negative")));
    }

    #[test]
    fn toml_overrides_keep_defaults_for_missing_keys() {
        let cfg: SpecDeploymentConfig = toml::from_str(
            r#"
            cluster_name = "Norte"
            hp_total = 120
            hp_vertical_com = 20
            "#,
        )
        .expect("parse");
        assert_eq!(cfg.cluster_name, "Norte");
        assert_eq!(cfg.hp_total, 120);
        assert_eq!(cfg.hp_home(), 100);
        assert_eq!(cfg.hub, "DELICIAS");
        assert_eq!(cfg.zone_type, "CERRADA");
    }

    #[test]
    fn load_deployment_config_missing_file_fails() {
        let err = load_deployment_config(Path::new("no/such/deployment.toml"))
            .expect_err("must fail");
        assert!(matches!(err, ReleaseError::DeploymentConfig { .. }));
    }
}
