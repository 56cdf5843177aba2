use super::{ReportError, Result};
use crate::data::ProductionRecord;

pub const CSV_HEADER: [&str; 5] = ["date", "mineral", "tonnes", "cost", "profit"];

/// Renders records as CSV with a header row and ISO dates.
pub fn to_csv(records: &[ProductionRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for r in records {
        writer.write_record([
            r.date.to_string(),
            r.mineral.clone(),
            r.tonnes.to_string(),
            r.cost.to_string(),
            r.profit.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Export(e.to_string()))
}
