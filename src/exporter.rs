use std::path::{Path, PathBuf};

use log::{info, warn};
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, XlsxError};

use crate::clients::{
    entities::{ConcertRow, Setlist},
    errors::{Error, Result},
};

const HEADER_FILL: u32 = 0x00CC_CCCC;
const SHADED_ROW_FILL: u32 = 0x00F0_F0F0;
const COLUMN_PADDING: u32 = 2;
const SHEET_NAME_MAX_LEN: usize = 31;
const SHEET_NAME_ILLEGAL: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// What to do with a setlist that lacks one of the exported fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Abort the export, nothing is written.
    #[default]
    Fail,
    /// Leave the setlist out and log it.
    Skip,
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub output: Option<PathBuf>,
    pub missing_fields: MissingFieldPolicy,
}

pub fn default_filename(username: &str) -> PathBuf {
    PathBuf::from(format!("concerts_{username}.xlsx"))
}

// Excel refuses some characters in sheet names, caps them at 31 chars and
// rejects an apostrophe at either end
pub fn sheet_name(username: &str) -> String {
    let mut name: Vec<char> = format!("Concerts {username}")
        .chars()
        .map(|c| if SHEET_NAME_ILLEGAL.contains(&c) { '_' } else { c })
        .take(SHEET_NAME_MAX_LEN)
        .collect();
    let last = name.len().saturating_sub(1);
    for edge in [0, last] {
        if name.get(edge) == Some(&'\'') {
            name[edge] = '_';
        }
    }
    name.into_iter().collect()
}

/// Everything that ends up in the sheet, computed before touching the file.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub sheet_name: String,
    pub rows: Vec<ConcertRow>,
}

impl SheetLayout {
    pub fn build(username: &str, setlists: &[Setlist], policy: MissingFieldPolicy) -> Result<Self> {
        let mut rows = Vec::with_capacity(setlists.len());
        for (index, setlist) in setlists.iter().enumerate() {
            match ConcertRow::try_from_setlist(index, setlist) {
                Ok(row) => rows.push(row),
                Err(e) if policy == MissingFieldPolicy::Skip => {
                    warn!("Skipping setlist: {e}");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(SheetLayout {
            sheet_name: sheet_name(username),
            rows,
        })
    }

    /// `data_row` is 1-based and excludes the header.
    pub fn is_shaded(data_row: usize) -> bool {
        data_row % 2 == 0
    }

    /// Widest cell of each column, header included, plus padding.
    pub fn column_widths(&self) -> [u32; 5] {
        let mut widths = ConcertRow::HEADERS.map(char_width);
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(char_width(cell));
            }
        }
        widths.map(|w| w.saturating_add(COLUMN_PADDING))
    }

    /// Auto-filter bounds as 0-based `(last_row, last_col)`, starting at `A1`.
    pub fn filter_end(&self) -> (usize, usize) {
        (self.rows.len(), ConcertRow::HEADERS.len() - 1)
    }
}

fn char_width(s: &str) -> u32 {
    u32::try_from(s.chars().count()).unwrap_or(u32::MAX)
}

fn row_num(row: usize) -> std::result::Result<u32, XlsxError> {
    u32::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)
}

fn col_num(col: usize) -> std::result::Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}

pub struct Exporter {
    options: ExportOptions,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Exporter { options }
    }

    pub fn output_path(&self, username: &str) -> PathBuf {
        self.options
            .output
            .clone()
            .unwrap_or_else(|| default_filename(username))
    }

    /// Writes the setlists to a workbook and returns where it was saved.
    ///
    /// Returns `None` without creating a file when no setlist survives the
    /// missing-field policy.
    pub fn export(&self, username: &str, setlists: &[Setlist]) -> Result<Option<PathBuf>> {
        let layout = SheetLayout::build(username, setlists, self.options.missing_fields)?;
        if layout.rows.is_empty() {
            warn!(
                "All {} setlists were skipped, nothing written",
                setlists.len()
            );
            return Ok(None);
        }
        let path = self.output_path(username);
        write_workbook(&layout, &path)?;
        info!("Data written to {}", path.display());
        Ok(Some(path))
    }
}

fn write_workbook(layout: &SheetLayout, path: &Path) -> Result<()> {
    let header_format = Format::new()
        .set_bold()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(HEADER_FILL));
    let shaded_format = Format::new()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(Color::RGB(SHADED_ROW_FILL));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&layout.sheet_name)?;

    for (col, header) in ConcertRow::HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col_num(col)?, *header, &header_format)?;
    }

    for (index, row) in layout.rows.iter().enumerate() {
        let data_row = index + 1;
        let sheet_row = row_num(data_row)?;
        for (col, cell) in row.cells().into_iter().enumerate() {
            if SheetLayout::is_shaded(data_row) {
                worksheet.write_string_with_format(sheet_row, col_num(col)?, cell, &shaded_format)?;
            } else {
                worksheet.write_string(sheet_row, col_num(col)?, cell)?;
            }
        }
    }

    let (last_row, last_col) = layout.filter_end();
    worksheet.autofilter(0, 0, row_num(last_row)?, col_num(last_col)?)?;

    for (col, width) in layout.column_widths().into_iter().enumerate() {
        worksheet.set_column_width(col_num(col)?, f64::from(width))?;
    }

    workbook.save(path).map_err(Error::from)
}
