//! Shared XLSX specification models.

use polars::prelude::DataFrame;

////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification; `None` fields leave the workbook default in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Thin border on all sides.
    pub border: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.or(self.border),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
        }
    }
}

/// Named format presets consumed by [`crate::writer::XlsxWriter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxFormatSet {
    /// Text body cells.
    pub text: SpecCellFormat,
    /// Integer body cells.
    pub integer: SpecCellFormat,
    /// Decimal body cells.
    pub decimal: SpecCellFormat,
    /// Date body cells.
    pub date: SpecCellFormat,
    /// Header cells.
    pub header: SpecCellFormat,
    /// Patch overlaid on emphasized rows (bold header / bold last row).
    pub emphasis: SpecCellFormat,
}

impl Default for SpecXlsxFormatSet {
    fn default() -> Self {
        crate::conf::derive_default_xlsx_formats()
    }
}

/// Normalized cell value during conversion/write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
    /// Calendar date as days since 1970-01-01.
    Date(i32),
}

/// Column classification derived from the table dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumColumnKind {
    /// Rendered with the text preset.
    Text,
    /// Rendered with the integer preset.
    Integer,
    /// Rendered with the decimal preset.
    Decimal,
    /// Rendered as an Excel date serial with the date preset.
    Date,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Autofit policy for per-sheet write call.
///
/// Each column is sized to its widest header or body cell, plus padding,
/// clamped to `[width_cell_min, width_cell_max]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecAutofitCellsPolicy {
    /// Minimum final width.
    pub width_cell_min: usize,
    /// Maximum final width.
    pub width_cell_max: usize,
    /// Width padding added after inference.
    pub width_cell_padding: usize,
}

impl Default for SpecAutofitCellsPolicy {
    fn default() -> Self {
        Self {
            width_cell_min: 8,
            width_cell_max: 60,
            width_cell_padding: 2,
        }
    }
}

/// Writer-wide options controlling value conversion and layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Write `missing_value_str` for missing/NaN/Inf instead of a blank cell.
    pub keep_missing_values: bool,
    /// Replacement text for missing values when `keep_missing_values` is set.
    pub missing_value_str: String,
    /// Classify columns from dtypes; when off every column is text.
    pub infer_column_kinds: bool,
    /// Freeze the header row.
    pub if_freeze_header: bool,
    /// Column autofit policy.
    pub policy_autofit: SpecAutofitCellsPolicy,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            keep_missing_values: false,
            missing_value_str: "NA".to_string(),
            infer_column_kinds: true,
            if_freeze_header: true,
            policy_autofit: SpecAutofitCellsPolicy::default(),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetTable

/// One sheet worth of data plus row-emphasis flags.
///
/// The table is a plain in-memory value; styling is applied only when an
/// exporter renders it, so callers can inspect it without touching a file.
#[derive(Debug, Clone)]
pub struct SpecSheetTable {
    /// Requested sheet name (sanitized at write time).
    pub sheet_name: String,
    /// Body rows; column names become the header row.
    pub df: DataFrame,
    /// Render the header row with the emphasis patch.
    pub if_bold_header: bool,
    /// Render the final body row with the emphasis patch.
    pub if_bold_last_row: bool,
}

impl SpecSheetTable {
    pub fn new(sheet_name: impl Into<String>, df: DataFrame) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            df,
            if_bold_header: false,
            if_bold_last_row: false,
        }
    }

    pub fn with_bold_header(mut self) -> Self {
        self.if_bold_header = true;
        self
    }

    pub fn with_bold_last_row(mut self) -> Self {
        self.if_bold_last_row = true;
        self
    }

    /// Number of body rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.df.width()
    }

    /// Header names in column order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names_str()
            .into_iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Whether body row `row_idx` (zero-based, header excluded) is emphasized.
    pub fn is_body_row_bold(&self, row_idx: usize) -> bool {
        self.if_bold_last_row && row_idx + 1 == self.height()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Actual sheet name in the workbook.
    pub sheet_name: String,
    /// Body rows written (header excluded).
    pub n_rows_data: usize,
    /// Columns written.
    pub n_cols: usize,
    /// Worksheet row indices (header = 0) written with the emphasis patch.
    pub rows_bold: Vec<usize>,
    /// Final column widths, in column order.
    pub widths_col: Vec<usize>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
