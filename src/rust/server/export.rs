//! CSV export of stored records.

use crate::store::AnalyzedText;

pub const CSV_HEADER: [&str; 2] = ["Input Text", "Output Score"];

/// Serializes records as CSV: a header row, then one row per record.
/// Fields are quoted only when they need it.
pub fn records_to_csv(records: &[AnalyzedText]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for record in records {
        let score = record.sentiment.to_string();
        writer.write_record([record.text.as_str(), score.as_str()])?;
    }
    writer.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}
