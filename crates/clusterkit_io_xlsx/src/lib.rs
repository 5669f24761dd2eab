//! `clusterkit_io_xlsx` v1:
//! XLSX rendering kernel for cluster reports.
//!
//! Modules:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options
//! - `util`   : pure helper functions
//! - `writer` : workbook writer and the injectable exporter seam
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    N_EXCEL_SERIAL_UNIX_EPOCH, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX,
    TUP_EXCEL_ILLEGAL, derive_default_xlsx_formats, derive_default_xlsx_write_options,
};
pub use spec::{
    EnumCellValue, EnumColumnKind, SpecAutofitCellsPolicy, SpecCellFormat, SpecSheetTable,
    SpecXlsxFormatSet, SpecXlsxReport, SpecXlsxWriteOptions,
};
pub use util::{derive_excel_serial, sanitize_sheet_name, validate_unique_columns};
pub use writer::{TraitSheetExporter, XlsxSheetExporter, XlsxWriter, derive_column_kinds};
