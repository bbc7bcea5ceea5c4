//! CSV data sets: orbital elements (`name, a, e, i, Ω, ϖ, L`) and planet
//! appearances (`name, diameter, texture`).
//!
//! A data set either loads completely or not at all. Reading can be spread
//! over frames with [`BatchedReader`]; [`load_elements`] and
//! [`load_appearances`] read everything and hand back the finalized set.

use std::fs::File;
use std::io;
use std::marker::PhantomData;
use std::path::Path;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::appearance::{AppearanceSet, PlanetAppearance};
use crate::catalog::OrbitCatalog;
use crate::elements::OrbitalElements;
use crate::error::{LoadError, LoadResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Treat the first line as a header.
    pub skip_header: bool,
    /// Records parsed per [`BatchedReader::next_batch`] call.
    pub lines_per_batch: usize,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            skip_header: true,
            lines_per_batch: 100,
        }
    }
}

/// A row type with a fixed column layout.
pub trait CsvRecord: Sized {
    /// Used in error messages.
    const KIND: &'static str;
    const COLUMNS: &'static [&'static str];

    /// `record` is guaranteed to have exactly `COLUMNS.len()` fields.
    fn from_fields(record: &StringRecord, line: u64) -> LoadResult<Self>;
}

fn field<'r>(record: &'r StringRecord, index: usize) -> &'r str {
    record.get(index).unwrap_or_default().trim()
}

fn parse_number(record: &StringRecord, index: usize, column: &'static str, line: u64) -> LoadResult<f64> {
    let raw = field(record, index);
    raw.parse().map_err(|_| LoadError::InvalidNumber {
        line,
        column,
        value: raw.to_owned(),
    })
}

impl CsvRecord for OrbitalElements {
    const KIND: &'static str = "orbital elements";
    const COLUMNS: &'static [&'static str] = &[
        "name",
        "semi-major axis",
        "eccentricity",
        "inclination",
        "ascending longitude",
        "perihelion longitude",
        "mean longitude",
    ];

    fn from_fields(record: &StringRecord, line: u64) -> LoadResult<Self> {
        let number = |index: usize| parse_number(record, index, Self::COLUMNS[index], line);

        OrbitalElements::new(
            field(record, 0),
            number(1)?,
            number(2)?,
            number(3)?,
            number(4)?,
            number(5)?,
            number(6)?,
        )
        .map_err(|source| LoadError::InvalidElements { line, source })
    }
}

impl CsvRecord for PlanetAppearance {
    const KIND: &'static str = "planet appearance";
    const COLUMNS: &'static [&'static str] = &["name", "diameter", "texture"];

    fn from_fields(record: &StringRecord, line: u64) -> LoadResult<Self> {
        Ok(PlanetAppearance {
            name: field(record, 0).to_owned(),
            diameter: parse_number(record, 1, Self::COLUMNS[1], line)?,
            texture_path: field(record, 2).to_owned(),
        })
    }
}

/// Reads a data set a bounded number of records at a time.
pub struct BatchedReader<R, T> {
    reader: csv::Reader<R>,
    record: StringRecord,
    lines_per_batch: usize,
    records_read: usize,
    finished: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<R: io::Read, T: CsvRecord> BatchedReader<R, T> {
    pub fn new(reader: R, options: &LoaderOptions) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(options.skip_header)
            // Column counts are checked per record so the error names the line.
            .flexible(true)
            .from_reader(reader);

        Self {
            reader,
            record: StringRecord::new(),
            lines_per_batch: options.lines_per_batch.max(1),
            records_read: 0,
            finished: false,
            _marker: PhantomData,
        }
    }

    pub fn records_read(&self) -> usize {
        self.records_read
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// The next batch of parsed records, or `None` once the input is
    /// exhausted. After an error the reader is finished.
    pub fn next_batch(&mut self) -> LoadResult<Option<Vec<T>>> {
        if self.finished {
            return Ok(None);
        }

        let batch = self.read_batch();
        match &batch {
            Ok(batch) => {
                self.records_read += batch.len();
                log::debug!(
                    "read {} {} records ({} total)",
                    batch.len(),
                    T::KIND,
                    self.records_read
                );
            }
            Err(_) => self.finished = true,
        }

        batch.map(|batch| (!batch.is_empty()).then_some(batch))
    }

    fn read_batch(&mut self) -> LoadResult<Vec<T>> {
        let mut batch = Vec::with_capacity(self.lines_per_batch);

        while batch.len() < self.lines_per_batch {
            if !self.reader.read_record(&mut self.record)? {
                self.finished = true;
                break;
            }

            let line = self.record.position().map_or(0, csv::Position::line);
            if self.record.len() != T::COLUMNS.len() {
                return Err(LoadError::ColumnCount {
                    kind: T::KIND,
                    line,
                    expected: T::COLUMNS.len(),
                    found: self.record.len(),
                });
            }

            batch.push(T::from_fields(&self.record, line)?);
        }

        Ok(batch)
    }

    pub fn read_all(mut self) -> LoadResult<Vec<T>> {
        let mut records = Vec::new();
        while let Some(batch) = self.next_batch()? {
            records.extend(batch);
        }
        Ok(records)
    }
}

pub fn load_from_reader<T: CsvRecord, R: io::Read>(reader: R, options: &LoaderOptions) -> LoadResult<Vec<T>> {
    BatchedReader::new(reader, options).read_all()
}

fn open(path: &Path) -> LoadResult<File> {
    File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_elements<R: io::Read>(reader: R, options: &LoaderOptions) -> LoadResult<OrbitCatalog> {
    let catalog = OrbitCatalog::new(load_from_reader(reader, options)?);

    let duplicates = catalog.duplicate_names();
    if !duplicates.is_empty() {
        log::warn!("duplicate body names in element data: {}", duplicates.join(", "));
    }

    Ok(catalog)
}

pub fn load_elements(path: impl AsRef<Path>, options: &LoaderOptions) -> LoadResult<OrbitCatalog> {
    let path = path.as_ref();
    let catalog = read_elements(open(path)?, options)?;
    log::info!("loaded {} orbits from {}", catalog.len(), path.display());
    Ok(catalog)
}

pub fn load_appearances(path: impl AsRef<Path>, options: &LoaderOptions) -> LoadResult<AppearanceSet> {
    let path = path.as_ref();
    let appearances = AppearanceSet::new(load_from_reader(open(path)?, options)?);
    log::info!("loaded {} appearances from {}", appearances.len(), path.display());
    Ok(appearances)
}
