//! Business trip model and the spreadsheet export

use chrono::NaiveDate;
use chrono::naive::NaiveDateTime;
use uuid::Uuid;

/// Column order of the trip export
pub const EXPORT_COLUMNS: [&str; 5] = [
    "Destination",
    "Start Date",
    "End Date",
    "Purpose",
    "Participants",
];

/// A recorded business trip
///
/// Trips carry no user linkage; the ledger is shared by the whole portal.
/// `end_date >= start_date` is expected but not enforced.
#[derive(Clone, Debug)]
pub struct Trip {
    pub id: Uuid,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub purpose: Option<String>,
    pub participants: String,
    pub created_at: NaiveDateTime,
}

/// Render all trips as a CSV document, one data row per trip
///
/// The header row uses [`EXPORT_COLUMNS`]; dates are formatted `YYYY-MM-DD`.
pub fn export_csv(trips: &[Trip]) -> String {
    let mut document = String::new();

    document.push_str(&EXPORT_COLUMNS.join(","));
    document.push_str("\r\n");

    for trip in trips {
        let row = [
            escape_field(&trip.destination),
            trip.start_date.format("%Y-%m-%d").to_string(),
            trip.end_date.format("%Y-%m-%d").to_string(),
            escape_field(trip.purpose.as_deref().unwrap_or("")),
            escape_field(&trip.participants),
        ];

        document.push_str(&row.join(","));
        document.push_str("\r\n");
    }

    document
}

/// Quote a field when it contains a separator, quote or line break
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
