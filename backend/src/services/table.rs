//! Life-expectancy table loading
//!
//! Reads a per-country CSV into an immutable [`LifeExpectancyTable`]. Any
//! failure falls back to the built-in dataset; the reason is returned as a
//! [`TableDiagnostic`] so the caller decides how to report it.

use csv::{ReaderBuilder, StringRecord, Trim};
use onelifetime_shared::{
    CountryLifeExpectancy, LifeExpectancyTable, LifeExpectancyYears, TableError, TableSource,
};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Why the table is not exactly what the file contained
#[derive(Debug, Clone, PartialEq)]
pub enum TableDiagnostic {
    /// No path configured; fallback in use
    NotConfigured,
    /// The file could not be opened; fallback in use
    Unreadable { path: String, reason: String },
    /// The file had no usable rows or columns; fallback in use
    Invalid { path: String, reason: String },
    /// Some rows were skipped (blank, unparseable, or duplicate)
    RowsDropped { path: String, dropped: usize },
}

impl TableDiagnostic {
    pub fn uses_fallback(&self) -> bool {
        !matches!(self, TableDiagnostic::RowsDropped { .. })
    }
}

/// Outcome of a load
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: LifeExpectancyTable,
    pub diagnostics: Vec<TableDiagnostic>,
}

/// Parsed CSV content
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub table: LifeExpectancyTable,
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    country: usize,
    male: Option<usize>,
    female: Option<usize>,
    overall: Option<usize>,
}

/// Table loading service
pub struct TableService;

impl TableService {
    /// Load the configured table, falling back to the built-in dataset
    pub fn load(path: Option<&str>) -> LoadedTable {
        let Some(path) = path.filter(|p| !p.trim().is_empty()) else {
            return LoadedTable {
                table: LifeExpectancyTable::fallback(),
                diagnostics: vec![TableDiagnostic::NotConfigured],
            };
        };

        let file = match File::open(Path::new(path)) {
            Ok(file) => file,
            Err(e) => {
                return LoadedTable {
                    table: LifeExpectancyTable::fallback(),
                    diagnostics: vec![TableDiagnostic::Unreadable {
                        path: path.to_string(),
                        reason: e.to_string(),
                    }],
                };
            }
        };

        match Self::parse_csv(file, TableSource::File(path.to_string())) {
            Ok(parsed) => {
                let diagnostics = if parsed.dropped_rows > 0 {
                    vec![TableDiagnostic::RowsDropped {
                        path: path.to_string(),
                        dropped: parsed.dropped_rows,
                    }]
                } else {
                    Vec::new()
                };
                LoadedTable {
                    table: parsed.table,
                    diagnostics,
                }
            }
            Err(e) => LoadedTable {
                table: LifeExpectancyTable::fallback(),
                diagnostics: vec![TableDiagnostic::Invalid {
                    path: path.to_string(),
                    reason: e.to_string(),
                }],
            },
        }
    }

    /// Parse CSV content.
    ///
    /// Rows that cannot be decoded, rows with a blank country or a
    /// missing/unparseable figure are dropped, as are repeated countries
    /// after their first occurrence.
    pub fn parse_csv<R: Read>(reader: R, source: TableSource) -> Result<ParsedTable, TableError> {
        let mut rdr = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| TableError::Parse(e.to_string()))?
            .clone();
        let columns = Self::detect_columns(&headers)?;

        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        let mut dropped_rows = 0;

        for record in rdr.records() {
            let Ok(record) = record else {
                dropped_rows += 1;
                continue;
            };

            let Some(entry) = Self::parse_row(&record, columns) else {
                dropped_rows += 1;
                continue;
            };

            if !seen.insert(entry.country.to_lowercase()) {
                dropped_rows += 1;
                continue;
            }

            entries.push(entry);
        }

        let table = LifeExpectancyTable::new(entries, source)?;
        Ok(ParsedTable {
            table,
            dropped_rows,
        })
    }

    fn detect_columns(headers: &StringRecord) -> Result<Columns, TableError> {
        let mut country = None;
        let mut male = None;
        let mut female = None;
        let mut overall = None;

        for (i, raw) in headers.iter().enumerate() {
            let header = raw.trim().to_lowercase().replace('_', " ");
            if country.is_none()
                && matches!(header.as_str(), "country" | "entity" | "location" | "country name")
            {
                country = Some(i);
            } else if header.contains("female") {
                female.get_or_insert(i);
            } else if header.contains("male") {
                male.get_or_insert(i);
            } else if header.contains("life expectancy")
                || header.contains("both sexes")
                || header == "overall"
            {
                overall.get_or_insert(i);
            }
        }

        let country = country.ok_or_else(|| TableError::MissingColumn("country".to_string()))?;
        if male.is_none() && overall.is_none() {
            return Err(TableError::MissingColumn("male life expectancy".to_string()));
        }
        if female.is_none() && overall.is_none() {
            return Err(TableError::MissingColumn("female life expectancy".to_string()));
        }

        Ok(Columns {
            country,
            male,
            female,
            overall,
        })
    }

    fn parse_row(record: &StringRecord, columns: Columns) -> Option<CountryLifeExpectancy> {
        let country = record.get(columns.country)?.trim();
        if country.is_empty() {
            return None;
        }

        let male = Self::parse_years(record, columns.male.or(columns.overall)?)?;
        let female = Self::parse_years(record, columns.female.or(columns.overall)?)?;

        Some(CountryLifeExpectancy {
            country: country.to_string(),
            male,
            female,
        })
    }

    fn parse_years(record: &StringRecord, column: usize) -> Option<LifeExpectancyYears> {
        let raw = record.get(column)?.trim();
        if raw.is_empty() {
            return None;
        }
        let value: f64 = raw.parse().ok()?;
        LifeExpectancyYears::new(value).ok()
    }
}
