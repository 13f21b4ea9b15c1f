//! Loads scraped scholarship listings (CSV) into catalog records.

mod normalizer;
mod parser;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::recommendations::domain::{ScholarshipId, ScholarshipRecord};
use parser::{parse_award, parse_deadline, DeadlineText};

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read scholarship listing: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scholarship CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Why a listing row was left out of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("listing is closed")]
    Closed,
    #[error("deadline '{0}' not understood")]
    UnparseableDeadline(String),
    #[error("listing has no name")]
    MissingName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row, header excluded.
    pub row: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportReport {
    /// Accepted records in file order.
    pub records: Vec<ScholarshipRecord>,
    pub skipped: Vec<SkippedRow>,
}

pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        today: NaiveDate,
    ) -> Result<ImportReport, CatalogImportError> {
        let file = File::open(path)?;
        Self::from_reader(file, today)
    }

    /// Reads `name, award, deadline, eligibility, link` rows with an optional
    /// `id` column. Relative deadlines ("12 days to go") resolve against `today`.
    pub fn from_reader<R: Read>(
        reader: R,
        today: NaiveDate,
    ) -> Result<ImportReport, CatalogImportError> {
        let mut report = ImportReport::default();

        for (index, row) in parser::csv_rows(reader).enumerate() {
            let row = row?;
            let number = index + 1;

            let name = row.name();
            if name.is_empty() {
                report.skip(number, SkipReason::MissingName);
                continue;
            }

            let deadline = match parse_deadline(row.deadline.as_deref(), today) {
                Some(DeadlineText::Dated(date)) => Some(date),
                Some(DeadlineText::Rolling) => None,
                Some(DeadlineText::Closed) => {
                    report.skip(number, SkipReason::Closed);
                    continue;
                }
                None => {
                    let raw = row.deadline.clone().unwrap_or_default();
                    report.skip(number, SkipReason::UnparseableDeadline(raw));
                    continue;
                }
            };

            let id = row
                .id
                .clone()
                .unwrap_or_else(|| format!("sch-{number}"));

            report.records.push(ScholarshipRecord {
                id: ScholarshipId(id),
                name,
                award_amount: parse_award(row.award.as_deref()),
                deadline,
                eligibility_text: row.eligibility(),
                apply_link: row.link.clone().unwrap_or_default(),
            });
        }

        info!(
            imported = report.records.len(),
            skipped = report.skipped.len(),
            "scholarship catalog imported"
        );
        Ok(report)
    }
}

impl ImportReport {
    fn skip(&mut self, row: usize, reason: SkipReason) {
        warn!(row, %reason, "skipping scholarship listing");
        self.skipped.push(SkippedRow { row, reason });
    }
}
