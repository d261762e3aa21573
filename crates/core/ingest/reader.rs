//! Streaming CSV reader producing rounded coordinates.

use crate::config::{Config, Coordinate, CsvLayout};
use crate::error::{HeatmapError, ParseErrorKind, Result};
use std::fs::File;
use std::io::Read;
use std::ops::RangeInclusive;
use std::path::Path;

const LATITUDE_RANGE: RangeInclusive<f64> = -90.0..=90.0;
const LONGITUDE_RANGE: RangeInclusive<f64> = -180.0..=180.0;

/// Lazily parses dataset rows into [`Coordinate`]s.
///
/// The header row (if the layout has one) is discarded. Every data row must
/// have exactly `expected_columns` fields; only the latitude and longitude
/// fields are read. Iteration stops after the first error, so the sequence is
/// finite and cannot be restarted.
///
/// ```rust
/// use heatmap::Config;
/// use heatmap::ingest::CsvIngestor;
///
/// let data = "network,a,b,c,d,e,postal,latitude,longitude,radius\n\
///             2c0f:ff90::/32,1,1,,0,0,,1.0000,38.0000,100\n";
/// let coords: Vec<_> = CsvIngestor::new(data.as_bytes(), &Config::default())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(coords.len(), 1);
/// assert_eq!(coords[0].longitude(), 38.0);
/// ```
pub struct CsvIngestor<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    layout: CsvLayout,
    skip_missing: bool,
    rows_read: u64,
    rows_skipped: u64,
    finished: bool,
}

impl<R: Read> CsvIngestor<R> {
    pub fn new(source: R, config: &Config) -> Self {
        let layout = config.csv.clone();
        let records = csv::ReaderBuilder::new()
            .has_headers(layout.has_header)
            .delimiter(layout.delimiter as u8)
            .flexible(true)
            .from_reader(source)
            .into_records();

        Self {
            records,
            layout,
            skip_missing: config.skip_missing_coordinates,
            rows_read: 0,
            rows_skipped: 0,
            finished: false,
        }
    }

    /// Data rows consumed so far, including skipped ones.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Rows skipped for missing coordinates.
    pub fn rows_skipped(&self) -> u64 {
        self.rows_skipped
    }

    /// Extract the coordinate from one record. `Ok(None)` means the row was
    /// skipped.
    fn parse_record(&self, record: &csv::StringRecord, line: u64) -> Result<Option<Coordinate>> {
        if record.len() != self.layout.expected_columns {
            return Err(HeatmapError::Parse {
                line,
                kind: ParseErrorKind::ColumnCount {
                    expected: self.layout.expected_columns,
                    found: record.len(),
                },
            });
        }

        let lat_field = record.get(self.layout.latitude_column).unwrap_or_default().trim();
        let lon_field = record.get(self.layout.longitude_column).unwrap_or_default().trim();

        if self.skip_missing && (lat_field.is_empty() || lon_field.is_empty()) {
            return Ok(None);
        }

        let latitude = parse_coordinate(
            lat_field,
            self.layout.latitude_column,
            "latitude",
            LATITUDE_RANGE,
            line,
        )?;
        let longitude = parse_coordinate(
            lon_field,
            self.layout.longitude_column,
            "longitude",
            LONGITUDE_RANGE,
            line,
        )?;

        Ok(Some(Coordinate::new(latitude, longitude)))
    }
}

impl CsvIngestor<File> {
    /// Open a dataset file.
    pub fn from_path<P: AsRef<Path>>(path: P, config: &Config) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(file, config))
    }
}

impl<R: Read> Iterator for CsvIngestor<R> {
    type Item = Result<Coordinate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let record = match self.records.next() {
                Some(Ok(record)) => record,
                Some(Err(err)) => {
                    self.finished = true;
                    return Some(Err(from_csv_error(err, self.rows_read + 1)));
                }
                None => {
                    self.finished = true;
                    return None;
                }
            };

            self.rows_read += 1;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(self.rows_read);

            match self.parse_record(&record, line) {
                Ok(Some(coord)) => return Some(Ok(coord)),
                Ok(None) => {
                    self.rows_skipped += 1;
                    log::debug!("Skipping line {}: missing coordinate", line);
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

/// Parse one coordinate field. Values outside `range` are rejected, which also
/// keeps them well inside the micro-degree key space.
fn parse_coordinate(
    field: &str,
    column: usize,
    name: &'static str,
    range: RangeInclusive<f64>,
    line: u64,
) -> Result<f64> {
    match field.parse::<f64>() {
        Ok(value) if range.contains(&value) => Ok(value),
        _ => Err(HeatmapError::Parse {
            line,
            kind: ParseErrorKind::InvalidCoordinate {
                column: column + 1,
                name,
                value: field.to_string(),
            },
        }),
    }
}

fn from_csv_error(err: csv::Error, fallback_line: u64) -> HeatmapError {
    let line = err.position().map(|p| p.line()).unwrap_or(fallback_line);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io_err) => HeatmapError::Io(io_err),
        _ => HeatmapError::Parse {
            line,
            kind: ParseErrorKind::Malformed(message),
        },
    }
}
