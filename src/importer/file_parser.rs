// ==========================================
// Scorte - file parser
// ==========================================
// Upload boundary checks + payload decoding.
// Supports: Excel (.xlsx/.xls) / CSV (.csv)
// Output: header list + one map per non-blank data row.
// ==========================================

use crate::importer::error::{ImportFailure, ImportResult};
use calamine::{Reader, Xls, Xlsx};
use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use tracing::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// One decoded data row: header -> trimmed cell text.
pub type RawRow = HashMap<String, String>;

// ==========================================
// RawTable - decoded sheet
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Header cells in column order (trimmed, original casing).
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn push_row<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut row = HashMap::new();
        for (col_idx, value) in cells.into_iter().enumerate() {
            if let Some(header) = self.headers.get(col_idx) {
                // duplicated header: first column wins
                row.entry(header.clone())
                    .or_insert_with(|| value.trim().to_string());
            }
        }

        // blank rows are dropped before numbering
        if row.values().all(|v| v.is_empty()) {
            return;
        }
        self.rows.push(row);
    }
}

// ==========================================
// FileKind - accepted upload types
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
    Xls,
}

impl FileKind {
    pub const ACCEPTED_EXTENSIONS: [&'static str; 3] = ["xlsx", "xls", "csv"];

    /// Case-insensitive suffix match on the declared file name.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let lower = file_name.trim().to_lowercase();
        if lower.ends_with(".xlsx") {
            Some(FileKind::Xlsx)
        } else if lower.ends_with(".xls") {
            Some(FileKind::Xls)
        } else if lower.ends_with(".csv") {
            Some(FileKind::Csv)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Xlsx => "xlsx",
            FileKind::Xls => "xls",
        }
    }
}

/// Reject an upload before any parsing: extension first, then size.
///
/// # Errors
/// - `UnsupportedFormat`: suffix not in the accepted set
/// - `FileTooLarge`: payload above `max_bytes`
pub fn check_upload(file_name: &str, size: u64, max_bytes: u64) -> ImportResult<FileKind> {
    let kind = FileKind::from_file_name(file_name)
        .ok_or_else(|| ImportFailure::UnsupportedFormat(file_name.to_string()))?;

    if size > max_bytes {
        return Err(ImportFailure::FileTooLarge {
            size,
            max: max_bytes,
        });
    }

    Ok(kind)
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// Decode a payload; first row is the header row.
    ///
    /// # Errors
    /// `Unreadable` when the bytes are not valid tabular data.
    fn parse_bytes(&self, payload: &[u8]) -> ImportResult<RawTable>;
}

// ==========================================
// CSV Parser
// ==========================================
pub struct CsvParser;

impl CsvParser {
    /// Pick the delimiter that occurs most in the header line.
    /// Ties and no-hit fall back to ','.
    pub fn sniff_delimiter(text: &str) -> u8 {
        let header_line = text.lines().next().unwrap_or("");
        let mut best = (b',', header_line.matches(',').count());
        for candidate in [b';', b'\t'] {
            let count = header_line.matches(candidate as char).count();
            if count > best.1 {
                best = (candidate, count);
            }
        }
        best.0
    }
}

/// UTF-8 first; anything else is read as Windows-1252, the usual encoding of
/// CSV files saved by Excel on Italian Windows installs.
fn decode_text(payload: &[u8]) -> ImportResult<Cow<'_, str>> {
    match std::str::from_utf8(payload) {
        Ok(text) => Ok(Cow::Borrowed(text)),
        Err(utf8_err) => {
            let (decoded, _, had_errors) = WINDOWS_1252.decode(payload);
            if had_errors {
                return Err(ImportFailure::Unreadable(format!(
                    "encoding non supportato: {}",
                    utf8_err
                )));
            }
            debug!(error = %utf8_err, "CSV is not UTF-8, decoded as Windows-1252");
            Ok(decoded)
        }
    }
}

impl FileParser for CsvParser {
    fn parse_bytes(&self, payload: &[u8]) -> ImportResult<RawTable> {
        let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);
        let decoded = decode_text(payload)?;
        let text: &str = &decoded;

        let delimiter = Self::sniff_delimiter(text);
        debug!(delimiter = %(delimiter as char).escape_default(), "CSV delimiter");

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // rows may be shorter/longer than the header
            .delimiter(delimiter)
            .from_reader(text.as_bytes());

        let mut table = RawTable {
            headers: reader
                .headers()?
                .iter()
                .map(|h| h.trim().to_string())
                .collect(),
            rows: Vec::new(),
        };

        for result in reader.records() {
            let record = result?;
            table.push_row(record.iter().map(str::to_string));
        }

        Ok(table)
    }
}

// ==========================================
// Excel Parser
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExcelFormat {
    /// Office Open XML workbook
    Xlsx,
    /// Legacy BIFF workbook
    Xls,
}

pub struct ExcelParser {
    format: ExcelFormat,
}

impl ExcelParser {
    pub fn new(format: ExcelFormat) -> Self {
        Self { format }
    }

    /// Only the first worksheet is read.
    fn read_first_sheet<RS, R>(mut workbook: R) -> ImportResult<RawTable>
    where
        RS: Read + Seek,
        R: Reader<RS>,
        R::Error: std::fmt::Display,
    {
        let sheet_names = workbook.sheet_names();
        let Some(sheet_name) = sheet_names.first().cloned() else {
            return Err(ImportFailure::Unreadable(
                "Excel: nessun foglio di lavoro".to_string(),
            ));
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportFailure::Unreadable(format!("Excel: {}", e)))?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(RawTable::default());
        };

        let mut table = RawTable {
            headers: header_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect(),
            rows: Vec::new(),
        };

        for data_row in rows {
            table.push_row(data_row.iter().map(|cell| cell.to_string()));
        }

        Ok(table)
    }
}

impl FileParser for ExcelParser {
    fn parse_bytes(&self, payload: &[u8]) -> ImportResult<RawTable> {
        let cursor = Cursor::new(payload);
        match self.format {
            ExcelFormat::Xlsx => {
                let workbook: Xlsx<_> = Xlsx::new(cursor)
                    .map_err(|e| ImportFailure::Unreadable(format!("Excel: {}", e)))?;
                Self::read_first_sheet(workbook)
            }
            ExcelFormat::Xls => {
                let workbook: Xls<_> = Xls::new(cursor)
                    .map_err(|e| ImportFailure::Unreadable(format!("Excel: {}", e)))?;
                Self::read_first_sheet(workbook)
            }
        }
    }
}

// ==========================================
// Universal parser (dispatch on file kind)
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parser_for(kind: FileKind) -> Box<dyn FileParser> {
        match kind {
            FileKind::Csv => Box::new(CsvParser),
            FileKind::Xlsx => Box::new(ExcelParser::new(ExcelFormat::Xlsx)),
            FileKind::Xls => Box::new(ExcelParser::new(ExcelFormat::Xls)),
        }
    }

    /// Decode by declared file name.
    ///
    /// # Errors
    /// `UnsupportedFormat` for unknown suffixes, otherwise parser errors.
    pub fn parse(&self, file_name: &str, payload: &[u8]) -> ImportResult<RawTable> {
        let kind = FileKind::from_file_name(file_name)
            .ok_or_else(|| ImportFailure::UnsupportedFormat(file_name.to_string()))?;
        Self::parser_for(kind).parse_bytes(payload)
    }
}
