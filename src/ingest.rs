use csv::{ReaderBuilder, StringRecord};
use log::warn;
use serde_json::{Map, Value};
use thiserror::Error;

/// One CSV row keyed by the header row, in header order.
///
/// Schema-less on purpose: the keys are whatever the uploaded file's header says.
pub type AppointmentRecord = Map<String, Value>;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Uploaded file is not valid UTF-8 text: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Parses an uploaded CSV file into header-keyed records.
///
/// Short rows get the missing trailing columns as empty strings, surplus fields past the
/// header are dropped. Either way every record carries exactly the header's keys.
pub fn parse_appointments(bytes: &[u8]) -> Result<Vec<AppointmentRecord>, IngestError> {
    let text = std::str::from_utf8(bytes)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let mut records = Vec::new();

    for result in reader.records() {
        let row = result?;
        if row.len() != headers.len() {
            warn!(
                "CSV line {} has {} fields, header has {}",
                row.position().map(|p| p.line()).unwrap_or_default(),
                row.len(),
                headers.len()
            );
        }
        records.push(zip_row(&headers, &row));
    }

    Ok(records)
}

fn zip_row(headers: &StringRecord, row: &StringRecord) -> AppointmentRecord {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let value = row.get(i).unwrap_or_default();
            (name.to_string(), Value::String(value.to_string()))
        })
        .collect()
}
