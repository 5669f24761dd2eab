//! Store constants, SQL text and connection-file loading.

use std::fs;
use std::io;
use std::path::Path;

use crate::spec::{
    EnumStoreColumnKind, SpecConnectionFile, SpecConnectionParams, StoreError, TUP_CLUSTER_COLUMNS,
};

/// Default connection file, relative to the working directory.
pub const PATH_CONNECTION_CONF_DEFAULT: &str = "configuracion/conexion.json";
/// Table holding cluster records.
pub const C_TABLE_CLUSTERS: &str = "clusters";
/// Column used for the name lookup.
pub const C_COLUMN_NAME: &str = "nombre";

/// Read connection parameters from a JSON file.
///
/// A missing file maps to [`StoreError::ConfigNotFound`] so callers can report
/// it apart from other failures.
pub fn load_connection_params(path: &Path) -> Result<SpecConnectionParams, StoreError> {
    let c_text = match fs::read_to_string(path) {
        Ok(c_text) => c_text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(StoreError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(err) => {
            return Err(StoreError::ConfigUnreadable {
                path: path.to_path_buf(),
                message: err.to_string(),
            });
        }
    };

    let spec_file: SpecConnectionFile =
        serde_json::from_str(&c_text).map_err(|err| StoreError::ConfigInvalid {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    Ok(spec_file.postgres)
}

/// SELECT-list entry pinning the decoded type; NULL text reads as empty.
fn derive_select_expr(c_column: &str, kind: EnumStoreColumnKind) -> String {
    match kind {
        EnumStoreColumnKind::Text => format!("COALESCE({c_column}::TEXT, '') AS {c_column}"),
        EnumStoreColumnKind::Integer => format!("{c_column}::BIGINT AS {c_column}"),
        EnumStoreColumnKind::Date => format!("{c_column}::DATE AS {c_column}"),
    }
}

/// Build the name lookup; the name is always bound as `$1`.
pub fn derive_select_by_name_sql(c_table: &str, if_first_only: bool) -> String {
    let c_columns = TUP_CLUSTER_COLUMNS
        .iter()
        .map(|(c_column, kind)| derive_select_expr(c_column, *kind))
        .collect::<Vec<_>>()
        .join(", ");
    let c_limit = if if_first_only { " LIMIT 1" } else { "" };
    format!("SELECT {c_columns} FROM {c_table} WHERE {C_COLUMN_NAME} = $1{c_limit}")
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    struct TestDir {
        path: PathBuf,
    }

    impl TestDir {
        fn new() -> Self {
            let n = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos();
            let path = std::env::temp_dir().join(format!("clusterkit_store_test_{n}"));
            std::fs::create_dir_all(&path).expect("create test dir");
            Self { path }
        }

        fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TestDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn load_connection_params_missing_file_is_not_found() {
        let tmp = TestDir::new();
        let err = load_connection_params(&tmp.path().join("conexion.json"))
            .expect_err("missing file must fail");
        assert!(matches!(err, StoreError::ConfigNotFound { .. }));
    }

    #[test]
    fn load_connection_params_reads_postgres_section() {
        let tmp = TestDir::new();
        let path = tmp.path().join("conexion.json");
        std::fs::write(
            &path,
            r#"{"PostgresSQL": {"host": "10.0.0.5", "database": "red", "user": "ops", "password": "x", "port": "5432"}}"#,
        )
        .expect("write conf");

        let params = load_connection_params(&path).expect("load");
        assert_eq!(params.host, "10.0.0.5");
        assert_eq!(params.database, "red");
        assert_eq!(params.user, "ops");
        assert_eq!(params.port, 5432);
    }

    #[test]
    fn load_connection_params_missing_key_is_invalid() {
        let tmp = TestDir::new();
        let path = tmp.path().join("conexion.json");
        std::fs::write(&path, r#"{"MySQL": {}}"#).expect("write conf");

        let err = load_connection_params(&path).expect_err("must fail");
        assert!(matches!(err, StoreError::ConfigInvalid { .. }));
    }

    #[test]
    fn select_sql_binds_name_and_lists_all_columns() {
        let c_sql = derive_select_by_name_sql(C_TABLE_CLUSTERS, true);
        assert!(c_sql.starts_with("SELECT COALESCE(id::TEXT, '') AS id, "));
        assert!(c_sql.contains(", puertos_habilitados::BIGINT AS puertos_habilitados, "));
        assert!(!c_sql.contains("COALESCE(puertos_habilitados"));
        assert!(c_sql.contains("fecha_liberacion_corp::DATE AS fecha_liberacion_corp"));
        assert!(c_sql.ends_with("FROM clusters WHERE nombre = $1 LIMIT 1"));
        assert_eq!(c_sql.matches(" AS ").count(), 25);

        let c_sql_all = derive_select_by_name_sql(C_TABLE_CLUSTERS, false);
        assert!(c_sql_all.ends_with("WHERE nombre = $1"));
    }
}
