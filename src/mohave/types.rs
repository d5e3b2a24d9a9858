//! Types for the Affidavit of Value search scrape.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Fixed inputs for one scrape attempt. `book_number` varies per iteration;
/// the remaining fields are set once per run.
#[derive(Debug, Clone)]
pub struct SearchParameters {
    pub book_number: u32,
    /// Canonical MM/DD/YYYY.
    pub date_from: String,
    /// Canonical MM/DD/YYYY.
    pub date_to: String,
    /// Human-readable property type category.
    pub property_type: String,
}

/// One result row as extracted from the page markup. Every field may be
/// empty; the portal omits labels freely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRow {
    pub parcel_id: String,
    /// Comma-joined associated parcel identifiers, possibly empty.
    pub associated_parcels: String,
    pub property_type: String,
    pub reception_number: String,
    /// Currency text as displayed, not parsed to a number.
    pub sale_price: String,
    pub sale_date: String,
}

/// A finished record: an extracted row stamped with its book number and
/// retrieval timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRecord {
    pub parcel_id: String,
    pub associated_parcels: String,
    pub property_type: String,
    pub reception_number: String,
    pub sale_price: String,
    pub sale_date: String,
    pub book_number: u32,
    /// RFC 3339 timestamp of the scrape.
    pub retrieved_at: String,
}

impl SaleRecord {
    pub fn from_row(row: SaleRow, book_number: u32, retrieved_at: &str) -> Self {
        Self {
            parcel_id: row.parcel_id,
            associated_parcels: row.associated_parcels,
            property_type: row.property_type,
            reception_number: row.reception_number,
            sale_price: row.sale_price,
            sale_date: row.sale_date,
            book_number,
            retrieved_at: retrieved_at.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookStatus {
    Success,
    NoResults,
    Failure,
}

/// Per-book result of the orchestrator loop. Not retried within a run;
/// re-running the range is the retry mechanism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookOutcome {
    pub book_number: u32,
    pub status: BookStatus,
    pub record_count: usize,
}

/// Tally for a whole run. `success_count + fail_count` equals the size of
/// the book range; NoResults books are counted on the fail side, as the
/// outcomes list preserves the distinction.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub success_count: u32,
    pub fail_count: u32,
    pub outcomes: Vec<BookOutcome>,
    pub combined_path: Option<PathBuf>,
}

impl RunSummary {
    pub fn record(&mut self, outcome: BookOutcome) {
        match outcome.status {
            BookStatus::Success => self.success_count += 1,
            BookStatus::NoResults | BookStatus::Failure => self.fail_count += 1,
        }
        self.outcomes.push(outcome);
    }
}

/// Portal-internal codes for the property type dropdown.
const PROPERTY_TYPE_CODES: &[(&str, &str)] = &[
    ("Vacant Land", "VL"),
    ("Single Family Residential", "SF"),
    ("Commercial/Industrial", "CI"),
    ("Agricultural", "AG"),
    ("Apartment Building", "AP"),
    ("Condo/Townhouse", "CT"),
    ("Mobile Home", "MH"),
    ("2 - 4 Plex", "PX"),
    ("Other", "OT"),
    ("All Types", "0"),
];

/// Map a human-readable property type to the portal's option value. Unknown
/// categories fall through to the name itself.
pub fn property_type_code(name: &str) -> &str {
    PROPERTY_TYPE_CODES
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, code)| *code)
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_type_code_known() {
        assert_eq!(property_type_code("Vacant Land"), "VL");
        assert_eq!(property_type_code("All Types"), "0");
        assert_eq!(property_type_code("2 - 4 Plex"), "PX");
    }

    #[test]
    fn test_property_type_code_unknown_falls_through() {
        assert_eq!(property_type_code("Houseboat"), "Houseboat");
    }

    #[test]
    fn test_run_summary_accounting() {
        let mut summary = RunSummary::default();
        summary.record(BookOutcome {
            book_number: 100,
            status: BookStatus::Success,
            record_count: 3,
        });
        summary.record(BookOutcome {
            book_number: 101,
            status: BookStatus::NoResults,
            record_count: 0,
        });
        summary.record(BookOutcome {
            book_number: 102,
            status: BookStatus::Failure,
            record_count: 0,
        });

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.fail_count, 2);
        assert_eq!(summary.outcomes.len(), 3);
        assert_eq!(
            summary.success_count + summary.fail_count,
            summary.outcomes.len() as u32
        );
    }

    #[test]
    fn test_record_from_row_stamps_metadata() {
        let row = SaleRow {
            parcel_id: "123-45-678".to_string(),
            ..Default::default()
        };
        let record = SaleRecord::from_row(row, 100, "2025-08-25T00:00:00+00:00");
        assert_eq!(record.parcel_id, "123-45-678");
        assert_eq!(record.book_number, 100);
        assert_eq!(record.retrieved_at, "2025-08-25T00:00:00+00:00");
    }
}
