//! Stateless helper utilities used by the XLSX writer kernel.

use std::collections::{BTreeMap, BTreeSet};

use crate::conf::{
    N_EXCEL_SERIAL_UNIX_EPOCH, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumCellValue, EnumColumnKind};

////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Normalize cell value according to the column kind.
///
/// Non-finite numbers and missing values become blanks, or the missing-value
/// text when `if_keep_missing_values` is set.
pub fn convert_cell_value(
    value: &EnumCellValue,
    kind: EnumColumnKind,
    if_keep_missing_values: bool,
    missing_value_str: &str,
) -> EnumCellValue {
    let value_missing = || {
        if if_keep_missing_values {
            EnumCellValue::String(missing_value_str.to_string())
        } else {
            EnumCellValue::None
        }
    };

    match (kind, value) {
        (_, EnumCellValue::None) => value_missing(),
        (EnumColumnKind::Text, EnumCellValue::String(s)) => EnumCellValue::String(s.clone()),
        (EnumColumnKind::Text, EnumCellValue::Number(n)) => EnumCellValue::String(n.to_string()),
        (EnumColumnKind::Text, EnumCellValue::Date(d)) => EnumCellValue::Date(*d),
        (EnumColumnKind::Integer | EnumColumnKind::Decimal, EnumCellValue::Number(n)) => {
            if n.is_finite() {
                EnumCellValue::Number(*n)
            } else {
                value_missing()
            }
        }
        (EnumColumnKind::Integer | EnumColumnKind::Decimal, EnumCellValue::String(s)) => {
            match s.parse::<f64>() {
                Ok(v) if v.is_finite() => EnumCellValue::Number(v),
                Ok(_) => value_missing(),
                Err(_) => EnumCellValue::String(s.clone()),
            }
        }
        (EnumColumnKind::Integer | EnumColumnKind::Decimal, EnumCellValue::Date(d)) => {
            EnumCellValue::Number(derive_excel_serial(*d))
        }
        (EnumColumnKind::Date, EnumCellValue::Date(d)) => EnumCellValue::Date(*d),
        (EnumColumnKind::Date, other) => other.clone(),
    }
}

/// Convert days since 1970-01-01 into an Excel (1900 system) date serial.
pub fn derive_excel_serial(n_days_unix: i32) -> f64 {
    (i64::from(n_days_unix) + N_EXCEL_SERIAL_UNIX_EPOCH) as f64
}

/// Estimate displayed width units for one normalized cell value.
pub fn estimate_width_len(value: &EnumCellValue, kind: EnumColumnKind) -> usize {
    match value {
        EnumCellValue::None => 0,
        EnumCellValue::String(s) => estimate_unicode_string_width(s),
        EnumCellValue::Date(_) => "yyyy-mm-dd".len(),
        EnumCellValue::Number(n) => match kind {
            EnumColumnKind::Integer => (*n as i64).to_string().len(),
            EnumColumnKind::Decimal => format!("{n:.2}").len(),
            _ => n.to_string().len(),
        },
    }
}

/// Width of a string where non-ASCII glyphs count as wider than ASCII ones.
pub fn estimate_unicode_string_width(s: &str) -> usize {
    let n_ascii = s.chars().filter(|chr| chr.is_ascii()).count();
    let n_non_ascii = s.chars().count().saturating_sub(n_ascii);
    n_ascii + (n_non_ascii as f64 * 1.6).round() as usize
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Validation

/// Reject duplicated column names, listing every duplicate and its positions.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), String> {
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter(|(_, l_pos)| l_pos.len() > 1)
        .map(|(c_name, l_pos)| format!("{c_name:?} x{} at indices {:?}", l_pos.len(), l_pos))
        .collect::<Vec<_>>()
        .join("; ");
    Err(format!("Duplicate column names: {c_msg}"))
}

/// Check that header + body fit on one worksheet.
pub fn validate_table_shape(height_df: usize, width_df: usize) -> Result<(), String> {
    if width_df == 0 {
        return Err("Table has no columns.".to_string());
    }
    if width_df > N_NCOLS_EXCEL_MAX {
        return Err(format!(
            "Table too wide: width={width_df} exceeds Excel limit {N_NCOLS_EXCEL_MAX}."
        ));
    }
    if height_df + 1 > N_NROWS_EXCEL_MAX {
        return Err(format!(
            "Table too tall: height={height_df} (+1 header) exceeds Excel limit {N_NROWS_EXCEL_MAX}."
        ));
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNames

/// Replace characters Excel rejects in sheet names and clamp the length.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_sheet_name_replaces_illegal_and_clamps() {
        assert_eq!(sanitize_sheet_name("a/b:c", "_"), "a_b_c");
        assert_eq!(sanitize_sheet_name("  ", "_"), "Sheet");
        assert_eq!(sanitize_sheet_name("Liberación", "_"), "Liberación");
        assert_eq!(
            sanitize_sheet_name(&"x".repeat(40), "_").chars().count(),
            N_LEN_EXCEL_SHEET_NAME_MAX
        );
    }

    #[test]
    fn validate_unique_columns_reports_duplicates() {
        let cols = vec!["id".to_string(), "tipo".to_string(), "id".to_string()];
        let err = validate_unique_columns(&cols).expect_err("duplicate must fail");
        assert!(err.contains("\"id\" x2 at indices [0, 2]"));
        assert!(validate_unique_columns(&cols[..2]).is_ok());
    }

    #[test]
    fn validate_table_shape_limits() {
        assert!(validate_table_shape(4, 25).is_ok());
        assert!(validate_table_shape(0, 0).is_err());
        assert!(validate_table_shape(N_NROWS_EXCEL_MAX, 1).is_err());
        assert!(validate_table_shape(1, N_NCOLS_EXCEL_MAX + 1).is_err());
    }

    #[test]
    fn convert_cell_value_by_kind() {
        assert_eq!(
            convert_cell_value(
                &EnumCellValue::Number(f64::NAN),
                EnumColumnKind::Integer,
                false,
                "NA"
            ),
            EnumCellValue::None
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::None, EnumColumnKind::Text, true, "NA"),
            EnumCellValue::String("NA".to_string())
        );
        assert_eq!(
            convert_cell_value(
                &EnumCellValue::String("495".to_string()),
                EnumColumnKind::Integer,
                false,
                "NA"
            ),
            EnumCellValue::Number(495.0)
        );
        assert_eq!(
            convert_cell_value(&EnumCellValue::Number(1.5), EnumColumnKind::Text, false, "NA"),
            EnumCellValue::String("1.5".to_string())
        );
    }

    #[test]
    fn derive_excel_serial_matches_known_dates() {
        // 1970-01-01 and 2025-01-01
        assert_eq!(derive_excel_serial(0), 25_569.0);
        assert_eq!(derive_excel_serial(20_089), 45_658.0);
    }
}
