use std::collections::BTreeMap;
use std::io::Read;

use super::ImportError;
use crate::workflows::selection::domain::{RawCandidate, RawJobProfile, NAME_FIELD};

pub(crate) fn parse_candidates<R: Read>(reader: R) -> Result<Vec<RawCandidate>, ImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();
    let name_index = headers
        .iter()
        .position(|header| header == NAME_FIELD)
        .ok_or(ImportError::MissingColumn(NAME_FIELD))?;

    let mut candidates = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let name = record.get(name_index).unwrap_or_default();
        if name.is_empty() && record.iter().all(str::is_empty) {
            continue;
        }

        let mut scores = BTreeMap::new();
        for (index, (header, cell)) in headers.iter().zip(record.iter()).enumerate() {
            if index == name_index || cell.is_empty() {
                continue;
            }
            let value = parse_number(cell).ok_or_else(|| ImportError::InvalidNumber {
                line,
                column: header.clone(),
                value: cell.to_string(),
            })?;
            scores.insert(header.clone(), value);
        }

        candidates.push(RawCandidate {
            name: name.to_string(),
            scores,
        });
    }

    Ok(candidates)
}

pub(crate) fn parse_job_profiles<R: Read>(reader: R) -> Result<Vec<RawJobProfile>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.deserialize::<RawJobProfile>().collect()
}

fn normalize_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

/// Accepts decimal commas so spreadsheets exported with an Indonesian locale load.
fn parse_number(cell: &str) -> Option<f64> {
    let value = cell
        .parse::<f64>()
        .ok()
        .or_else(|| cell.replace(',', ".").parse::<f64>().ok())?;
    value.is_finite().then_some(value)
}
