use std::io;

use crate::{batch::AnswerRecord, error::ExportError};

pub const DEFAULT_EXPORT_FILE_NAME: &str = "search_intent_analysis.csv";
pub const EXPORT_HEADERS: [&str; 3] = ["Persona", "Question", "Answer"];

/// Write records as CSV with a `Persona,Question,Answer` header.
///
/// The header is written even when there are no records.
pub fn write_csv<W: io::Write>(records: &[AnswerRecord], writer: W) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        csv_writer.write_record([&record.persona, &record.question, &record.answer])?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn to_csv(records: &[AnswerRecord]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(records, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Group records by persona name, keeping first-seen order.
///
/// Personas sharing a name end up in the same group.
pub fn group_by_persona(records: &[AnswerRecord]) -> Vec<(&str, Vec<&AnswerRecord>)> {
    let mut groups: Vec<(&str, Vec<&AnswerRecord>)> = Vec::new();
    for record in records {
        match groups
            .iter_mut()
            .find(|(name, _)| *name == record.persona.as_str())
        {
            Some((_, group)) => group.push(record),
            None => groups.push((record.persona.as_str(), vec![record])),
        }
    }
    groups
}
