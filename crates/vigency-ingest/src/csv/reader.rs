//! Typed readers for the evaluation and visit tables.

use std::io::Read;
use std::path::Path;

use ::csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use vigency_model::{InputKind, RawEvaluation, RawVisit};

use super::header::{ColumnRole, CsvHeaders};
use crate::error::{IngestError, Result};

/// Read the evaluations table from a CSV file.
pub fn read_evaluations(path: &Path) -> Result<Vec<RawEvaluation>> {
    let content = read_file(path, InputKind::Evaluations)?;
    parse_evaluations(&content, &path.display().to_string())
}

/// Read the evaluations table from any reader (`source_name` is used in errors).
pub fn read_evaluations_from_reader<R: Read>(
    mut reader: R,
    source_name: &str,
) -> Result<Vec<RawEvaluation>> {
    let content = read_all(&mut reader, InputKind::Evaluations, source_name)?;
    parse_evaluations(&content, source_name)
}

/// Read the visits table from a CSV file.
pub fn read_visits(path: &Path) -> Result<Vec<RawVisit>> {
    let content = read_file(path, InputKind::Visits)?;
    parse_visits(&content, &path.display().to_string())
}

/// Read the visits table from any reader (`source_name` is used in errors).
pub fn read_visits_from_reader<R: Read>(mut reader: R, source_name: &str) -> Result<Vec<RawVisit>> {
    let content = read_all(&mut reader, InputKind::Visits, source_name)?;
    parse_visits(&content, source_name)
}

/// Pick `;` when the header line has more semicolons than commas.
///
/// Spreadsheet exports in pt-BR locales use `;` as the list separator.
pub fn detect_delimiter(header_line: &str) -> u8 {
    let commas = header_line.matches(',').count();
    let semicolons = header_line.matches(';').count();
    if semicolons > commas { b';' } else { b',' }
}

fn parse_evaluations(content: &str, source_name: &str) -> Result<Vec<RawEvaluation>> {
    let input = InputKind::Evaluations;
    let table = read_table(content, input, source_name)?;
    let patient = required(&table.headers, ColumnRole::Patient, input, source_name)?;
    let date = required(&table.headers, ColumnRole::EvaluationDate, input, source_name)?;
    let diagnosis = required(&table.headers, ColumnRole::Diagnosis, input, source_name)?;
    let evaluation_id = table.headers.position(ColumnRole::EvaluationId);
    let clinician = table.headers.position(ColumnRole::Clinician);

    let rows: Vec<RawEvaluation> = table
        .records
        .iter()
        .enumerate()
        .map(|(idx, record)| RawEvaluation {
            row: idx + 1,
            evaluation_id: cell(record, evaluation_id),
            patient_id: cell(record, Some(patient)),
            eval_date: cell(record, Some(date)),
            diagnosis: cell(record, Some(diagnosis)),
            clinician: cell(record, clinician),
        })
        .collect();
    debug!(
        source = source_name,
        row_count = rows.len(),
        has_id_column = evaluation_id.is_some(),
        "read evaluations"
    );
    Ok(rows)
}

fn parse_visits(content: &str, source_name: &str) -> Result<Vec<RawVisit>> {
    let input = InputKind::Visits;
    let table = read_table(content, input, source_name)?;
    let patient = required(&table.headers, ColumnRole::Patient, input, source_name)?;
    let date = required(&table.headers, ColumnRole::VisitDate, input, source_name)?;
    let visit_id = table.headers.position(ColumnRole::VisitId);
    let clinician = table.headers.position(ColumnRole::Clinician);
    let unit = table.headers.position(ColumnRole::Unit);

    let rows: Vec<RawVisit> = table
        .records
        .iter()
        .enumerate()
        .map(|(idx, record)| RawVisit {
            row: idx + 1,
            visit_id: cell(record, visit_id),
            patient_id: cell(record, Some(patient)),
            visit_date: cell(record, Some(date)),
            clinician: cell(record, clinician),
            unit: cell(record, unit),
        })
        .collect();
    debug!(
        source = source_name,
        row_count = rows.len(),
        has_id_column = visit_id.is_some(),
        "read visits"
    );
    Ok(rows)
}

struct Table {
    headers: CsvHeaders,
    records: Vec<StringRecord>,
}

fn read_table(content: &str, input: InputKind, source_name: &str) -> Result<Table> {
    let first_line = content.lines().next().unwrap_or("");
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::None)
        .delimiter(detect_delimiter(first_line))
        .from_reader(content.as_bytes());

    let parse_error = |source| IngestError::CsvParse {
        input,
        source_name: source_name.to_string(),
        source,
    };

    let headers = CsvHeaders::new(reader.headers().map_err(parse_error)?.iter());
    if headers.is_empty() {
        return Err(IngestError::NoHeader {
            input,
            source_name: source_name.to_string(),
        });
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.map_err(parse_error)?;
        // Blank trailing lines from spreadsheet exports.
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        records.push(record);
    }
    Ok(Table { headers, records })
}

fn required(
    headers: &CsvHeaders,
    role: ColumnRole,
    input: InputKind,
    source_name: &str,
) -> Result<usize> {
    headers
        .position(role)
        .ok_or_else(|| IngestError::MissingColumn {
            input,
            column: role.label(),
            aliases: role.alias_list(),
            source_name: source_name.to_string(),
        })
}

fn cell(record: &StringRecord, index: Option<usize>) -> Option<String> {
    let value = record.get(index?)?;
    if value.trim().is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn read_file(path: &Path, input: InputKind) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IngestError::FileNotFound {
                input,
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                input,
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

fn read_all<R: Read>(reader: &mut R, input: InputKind, source_name: &str) -> Result<String> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| IngestError::FileRead {
            input,
            path: source_name.into(),
            source: e,
        })?;
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_semicolon_exports() {
        assert_eq!(detect_delimiter("Data;Paciente;Unidade"), b';');
        assert_eq!(detect_delimiter("date,patient_id,unit"), b',');
        assert_eq!(detect_delimiter("single"), b',');
    }

    #[test]
    fn empty_cells_become_none() {
        let csv = "Paciente,Data,Diagnóstico,Profissional\nP1,2023-01-10,  ,\n";
        let rows = read_evaluations_from_reader(csv.as_bytes(), "inline").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].patient_id.as_deref(), Some("P1"));
        assert_eq!(rows[0].diagnosis, None);
        assert_eq!(rows[0].clinician, None);
        assert_eq!(rows[0].evaluation_id, None);
    }
}
