use crate::models::{StationStat, StationTable};
use crate::utils::constants::{REPORT_HEADER, STATION_COLUMN_WIDTH};
use crate::writers::collation::Collation;
use std::fmt;
use std::io::{self, Write};

/// One rendered station line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub station: String,
    pub min: f32,
    pub average: f64,
    pub max: f32,
    pub count: u64,
}

impl ReportRow {
    fn new(station: &[u8], stat: &StationStat) -> Self {
        Self {
            station: String::from_utf8_lossy(station).into_owned(),
            min: stat.min,
            average: stat.average(),
            max: stat.max,
            count: stat.count,
        }
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<width$} {:5.1}|{:5.1}|{:5.1}|{:6}",
            self.station,
            self.min,
            self.average,
            self.max,
            self.count,
            width = STATION_COLUMN_WIDTH
        )
    }
}

/// Stations in collation order plus the total number of measurements.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    pub total_count: u64,
}

impl Report {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)?;
        out.flush()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", REPORT_HEADER)?;
        for row in &self.rows {
            writeln!(f, "{}", row)?;
        }
        writeln!(f)?;
        writeln!(f, "Counted {} total measures.", self.total_count)
    }
}

pub struct ReportBuilder<'a> {
    collation: &'a dyn Collation,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(collation: &'a dyn Collation) -> Self {
        Self { collation }
    }

    /// Order the table by the configured collation; names the collation
    /// considers equal fall back to byte order so the output is stable.
    pub fn build(&self, table: &StationTable) -> Report {
        let mut entries: Vec<(&[u8], &StationStat)> = table.iter().collect();
        entries.sort_by(|(a, _), (b, _)| {
            self.collation.compare(a, b).then_with(|| a.cmp(b))
        });

        Report {
            rows: entries
                .into_iter()
                .map(|(station, stat)| ReportRow::new(station, stat))
                .collect(),
            total_count: table.total_count(),
        }
    }
}
