//! XLSX writer kernel that renders in-memory sheet tables into workbook output.

use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::{AnyValue, DataFrame, DataType};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::spec::{
    EnumCellValue, EnumColumnKind, SpecCellFormat, SpecSheetTable, SpecXlsxFormatSet,
    SpecXlsxReport, SpecXlsxWriteOptions,
};
use crate::util::{
    convert_cell_value, derive_excel_serial, estimate_unicode_string_width, estimate_width_len,
    sanitize_sheet_name, validate_table_shape, validate_unique_columns,
};

////////////////////////////////////////////////////////////////////////////////
// #region Exporter

/// Sink that renders one [`SpecSheetTable`] into a file at `path_file_out`.
pub trait TraitSheetExporter {
    fn export_table(
        &self,
        path_file_out: &Path,
        table: &SpecSheetTable,
    ) -> Result<SpecXlsxReport, String>;
}

/// Exporter writing a single-sheet `.xlsx` workbook per call.
#[derive(Debug, Clone, Default)]
pub struct XlsxSheetExporter {
    pub formats: SpecXlsxFormatSet,
    pub write_options: SpecXlsxWriteOptions,
}

impl TraitSheetExporter for XlsxSheetExporter {
    fn export_table(
        &self,
        path_file_out: &Path,
        table: &SpecSheetTable,
    ) -> Result<SpecXlsxReport, String> {
        if let Some(path_dir) = path_file_out.parent()
            && !path_dir.as_os_str().is_empty()
        {
            fs::create_dir_all(path_dir).map_err(|err| {
                format!("Failed to create directory {}: {err}", path_dir.display())
            })?;
        }

        let mut writer = XlsxWriter::new(
            path_file_out.to_path_buf(),
            self.formats.clone(),
            self.write_options.clone(),
        );
        writer.write_sheet(table)?;
        writer.close()?;
        log::debug!("xlsx written: {}", writer.file_out());

        writer
            .report()
            .pop()
            .ok_or_else(|| "Writer produced no sheet report.".to_string())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Writer

/// Stateful workbook writer.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    formats: SpecXlsxFormatSet,
    write_options: SpecXlsxWriteOptions,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path and format/options presets.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(
        path_file_out: PathBuf,
        formats: SpecXlsxFormatSet,
        write_options: SpecXlsxWriteOptions,
    ) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            formats,
            write_options,
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), String> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(derive_xlsx_error_text)?;
        self.if_closed = true;
        Ok(())
    }

    /// Write one sheet: header row from column names, then body rows.
    pub fn write_sheet(&mut self, table: &SpecSheetTable) -> Result<(), String> {
        if self.if_closed {
            return Err("Cannot write after close().".to_string());
        }
        validate_policy_autofit(&self.write_options)?;

        let df_data = &table.df;
        let l_colnames = table.column_names();
        validate_unique_columns(&l_colnames)?;
        validate_table_shape(df_data.height(), df_data.width())?;

        let l_kinds = if self.write_options.infer_column_kinds {
            derive_column_kinds(df_data)
        } else {
            vec![EnumColumnKind::Text; df_data.width()]
        };

        let mut report = SpecXlsxReport {
            n_rows_data: df_data.height(),
            n_cols: df_data.width(),
            ..Default::default()
        };

        let sheet_name = sanitize_sheet_name(&table.sheet_name, "_");
        if sheet_name != table.sheet_name {
            report.warn(format!(
                "Sheet name {:?} sanitized to {sheet_name:?}.",
                table.sheet_name
            ));
        }
        report.sheet_name = sheet_name.clone();

        let formats = self.formats.clone();
        let write_options = self.write_options.clone();

        let l_fmt_body: Vec<SpecCellFormat> = l_kinds
            .iter()
            .map(|kind| derive_body_format_spec(&formats, *kind))
            .collect();
        let l_fmt_body_plain: Vec<Format> =
            l_fmt_body.iter().map(derive_rust_xlsx_format).collect();
        let l_fmt_body_bold: Vec<Format> = l_fmt_body
            .iter()
            .map(|fmt| derive_rust_xlsx_format(&fmt.merge(&formats.emphasis)))
            .collect();
        let fmt_header = if table.if_bold_header {
            derive_rust_xlsx_format(&formats.header.merge(&formats.emphasis))
        } else {
            derive_rust_xlsx_format(&formats.header)
        };

        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(&sheet_name)
            .map_err(derive_xlsx_error_text)?;

        write_header(worksheet, &l_colnames, &fmt_header)?;
        if table.if_bold_header {
            report.rows_bold.push(0);
        }
        if write_options.if_freeze_header {
            worksheet
                .set_freeze_panes(1, 0)
                .map_err(derive_xlsx_error_text)?;
        }

        let mut l_width_by_col: Vec<usize> = l_colnames
            .iter()
            .map(|c_name| estimate_unicode_string_width(c_name))
            .collect();

        let l_cols = df_data.get_columns();
        for n_idx_row in 0..df_data.height() {
            let if_bold_row = table.is_body_row_bold(n_idx_row);
            for (n_idx_col, col) in l_cols.iter().enumerate() {
                let value_raw = derive_cell_value_from_any_value(
                    col.get(n_idx_row)
                        .map_err(|err| format!("Failed to access cell value: {err}"))?,
                );
                let value = convert_cell_value(
                    &value_raw,
                    l_kinds[n_idx_col],
                    write_options.keep_missing_values,
                    &write_options.missing_value_str,
                );

                l_width_by_col[n_idx_col] = usize::max(
                    l_width_by_col[n_idx_col],
                    estimate_width_len(&value, l_kinds[n_idx_col]),
                );

                let format = if if_bold_row {
                    &l_fmt_body_bold[n_idx_col]
                } else {
                    &l_fmt_body_plain[n_idx_col]
                };
                write_cell_with_format(worksheet, n_idx_row + 1, n_idx_col, &value, format)?;
            }
            if if_bold_row {
                report.rows_bold.push(n_idx_row + 1);
            }
        }

        let policy = &write_options.policy_autofit;
        let n_min = policy.width_cell_min;
        let n_max = usize::min(255, policy.width_cell_max);
        for (n_idx_col, n_width_recorded) in l_width_by_col.into_iter().enumerate() {
            let n_width_final = usize::min(
                n_max,
                usize::max(n_min, n_width_recorded + policy.width_cell_padding),
            );
            worksheet
                .set_column_width(cast_col_num(n_idx_col)?, n_width_final as f64)
                .map_err(derive_xlsx_error_text)?;
            report.widths_col.push(n_width_final);
        }

        self.l_reports.push(report);
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Helpers

fn validate_policy_autofit(write_options: &SpecXlsxWriteOptions) -> Result<(), String> {
    let policy = &write_options.policy_autofit;
    if policy.width_cell_min == 0 {
        return Err("policy_autofit.width_cell_min must be >= 1.".to_string());
    }
    if policy.width_cell_max < policy.width_cell_min {
        return Err(
            "policy_autofit.width_cell_max must be >= policy_autofit.width_cell_min.".to_string(),
        );
    }
    Ok(())
}

/// Classify each column of `df` from its dtype.
pub fn derive_column_kinds(df: &DataFrame) -> Vec<EnumColumnKind> {
    df.get_columns()
        .iter()
        .map(|col| {
            let dtype = col.dtype();
            if matches!(dtype, DataType::Date) {
                EnumColumnKind::Date
            } else if dtype.is_integer() {
                EnumColumnKind::Integer
            } else if dtype.is_float() {
                EnumColumnKind::Decimal
            } else {
                EnumColumnKind::Text
            }
        })
        .collect()
}

fn derive_body_format_spec(formats: &SpecXlsxFormatSet, kind: EnumColumnKind) -> SpecCellFormat {
    match kind {
        EnumColumnKind::Text => formats.text.clone(),
        EnumColumnKind::Integer => formats.integer.clone(),
        EnumColumnKind::Decimal => formats.decimal.clone(),
        EnumColumnKind::Date => formats.date.clone(),
    }
}

fn derive_cell_value_from_any_value(value: AnyValue<'_>) -> EnumCellValue {
    match value {
        AnyValue::Null => EnumCellValue::None,
        AnyValue::String(val) => EnumCellValue::String(val.to_string()),
        AnyValue::StringOwned(val) => EnumCellValue::String(val.to_string()),
        AnyValue::Boolean(val) => {
            EnumCellValue::String(if val { "True" } else { "False" }.to_string())
        }
        AnyValue::Date(val) => EnumCellValue::Date(val),
        AnyValue::UInt8(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt16(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt32(val) => EnumCellValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int8(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int16(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Int64(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float32(val) => EnumCellValue::Number(val as f64),
        AnyValue::Float64(val) => EnumCellValue::Number(val),
        _ => EnumCellValue::String(value.to_string()),
    }
}

fn write_header(
    worksheet: &mut Worksheet,
    l_colnames: &[String],
    fmt_header: &Format,
) -> Result<(), String> {
    for (col_idx, cell_value) in l_colnames.iter().enumerate() {
        if cell_value.is_empty() {
            worksheet
                .write_blank(0, cast_col_num(col_idx)?, fmt_header)
                .map_err(derive_xlsx_error_text)?;
        } else {
            worksheet
                .write_string_with_format(0, cast_col_num(col_idx)?, cell_value, fmt_header)
                .map_err(derive_xlsx_error_text)?;
        }
    }
    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
    format: &Format,
) -> Result<(), String> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumCellValue::None => {
            worksheet
                .write_blank(n_row, n_col, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::String(val) => {
            worksheet
                .write_string_with_format(n_row, n_col, val, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Number(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumCellValue::Date(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, derive_excel_serial(*val), format)
                .map_err(derive_xlsx_error_text)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val as f64);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }
    if spec.border.unwrap_or(false) {
        format = format.set_border(FormatBorder::Thin);
    }

    format
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
