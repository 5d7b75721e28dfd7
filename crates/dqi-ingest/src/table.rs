//! CSV table loading and cell coercion.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use csv::StringRecord;

use crate::columns::HeaderMap;
use crate::error::{IngestError, Result};

/// One loaded CSV report: canonical header lookup plus raw rows in source
/// order.
#[derive(Debug)]
pub struct CsvTable {
    path: PathBuf,
    headers: HeaderMap,
    rows: Vec<StringRecord>,
}

impl CsvTable {
    /// Reads the whole file into memory. Fields and headers are trimmed;
    /// ragged rows are tolerated (short rows read as absent cells).
    pub fn read(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IngestError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                IngestError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(file);

        let headers = HeaderMap::from_record(reader.headers().map_err(|e| {
            IngestError::CsvParse {
                path: path.to_path_buf(),
                source: e,
            }
        })?);

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record.map_err(|e| IngestError::CsvParse {
                path: path.to_path_buf(),
                source: e,
            })?);
        }

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column this reader cannot work without.
    pub fn require(&self, name: &str) -> Result<usize> {
        self.headers.require(name, &self.path)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |record| Row {
            table: self,
            record,
        })
    }
}

/// A single data row with typed, coercing accessors.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a CsvTable,
    record: &'a StringRecord,
}

impl Row<'_> {
    fn raw(&self, name: &str) -> Option<&str> {
        let idx = self.table.headers.get(name)?;
        self.record.get(idx)
    }

    /// Trimmed cell text; blank cells read as `None`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.raw(name).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Owned variant of [`Self::text`].
    pub fn text_owned(&self, name: &str) -> Option<String> {
        self.text(name).map(str::to_string)
    }

    /// Cell text with blank coerced to the empty string.
    pub fn text_or_empty(&self, name: &str) -> String {
        self.text(name).unwrap_or_default().to_string()
    }

    /// Non-negative count. Blank or absent cells coerce to 0 silently;
    /// non-numeric cells coerce to 0 with a warning. Decimal exports of
    /// integer counts ("12.0") are accepted.
    pub fn count(&self, name: &str) -> u32 {
        let Some(raw) = self.text(name) else { return 0 };
        if let Ok(n) = raw.parse::<u32>() {
            return n;
        }
        match raw.parse::<f64>() {
            Ok(f) if f.is_finite() && f >= 0.0 => f.trunc() as u32,
            _ => {
                tracing::warn!(
                    path = %self.table.path.display(),
                    column = name,
                    value = raw,
                    "non-numeric count cell coerced to 0"
                );
                0
            }
        }
    }

    /// Percentage or ratio cell. Same coercion rules as [`Self::count`].
    pub fn percent(&self, name: &str) -> f64 {
        let Some(raw) = self.text(name) else {
            return 0.0;
        };
        match raw.trim_end_matches('%').trim().parse::<f64>() {
            Ok(f) if f.is_finite() => f,
            _ => {
                tracing::warn!(
                    path = %self.table.path.display(),
                    column = name,
                    value = raw,
                    "non-numeric percentage cell coerced to 0"
                );
                0.0
            }
        }
    }

    /// Signed day count ("# Days Outstanding" style columns).
    pub fn days(&self, name: &str) -> Option<i32> {
        let raw = self.text(name)?;
        match raw.parse::<i32>() {
            Ok(n) => Some(n),
            Err(_) => raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i32),
        }
    }

    /// Date cell in the export format `28-Mar-25`, with an ISO `2025-03-28`
    /// fallback. Unparseable dates read as `None`.
    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        let raw = self.text(name)?;
        parse_report_date(raw)
    }
}

/// Parses the two date renderings seen across the report exports.
pub fn parse_report_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%d-%b-%y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()
}
