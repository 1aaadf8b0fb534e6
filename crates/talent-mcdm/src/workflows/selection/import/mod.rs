//! CSV ingestion for candidate assessments and job positions.

mod parser;

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::domain::{JobProfile, RawCandidate, SelectionError};

#[derive(Debug)]
pub enum ImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
    InvalidNumber {
        line: u64,
        column: String,
        value: String,
    },
    Selection(SelectionError),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Io(err) => write!(f, "failed to read export: {}", err),
            ImportError::Csv(err) => write!(f, "invalid CSV data: {}", err),
            ImportError::MissingColumn(column) => {
                write!(f, "CSV header is missing required column {}", column)
            }
            ImportError::InvalidNumber {
                line,
                column,
                value,
            } => write!(
                f,
                "line {}: column {} holds '{}', expected a number",
                line, column, value
            ),
            ImportError::Selection(err) => write!(f, "invalid job position row: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Csv(err) => Some(err),
            ImportError::Selection(err) => Some(err),
            ImportError::MissingColumn(_) | ImportError::InvalidNumber { .. } => None,
        }
    }
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<SelectionError> for ImportError {
    fn from(err: SelectionError) -> Self {
        Self::Selection(err)
    }
}

/// Loads candidate rows from the assessment dataset export.
pub struct CandidateImporter;

impl CandidateImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<RawCandidate>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<RawCandidate>, ImportError> {
        let candidates = parser::parse_candidates(reader)?;
        debug!(candidates = candidates.len(), "imported candidate rows");
        Ok(candidates)
    }
}

/// Loads and validates job position rows.
pub struct JobPositionImporter;

impl JobPositionImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<JobProfile>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<JobProfile>, ImportError> {
        let profiles = parser::parse_job_profiles(reader)?
            .into_iter()
            .map(JobProfile::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        ensure_unique_titles(&profiles)?;
        debug!(positions = profiles.len(), "imported job positions");
        Ok(profiles)
    }
}

/// Titles are looked up case-insensitively, so two rows differing only in case collide.
fn ensure_unique_titles(profiles: &[JobProfile]) -> Result<(), SelectionError> {
    let mut seen = HashSet::new();
    for profile in profiles {
        if !seen.insert(profile.title.trim().to_ascii_lowercase()) {
            return Err(SelectionError::invalid(format!(
                "job position '{}' is listed more than once",
                profile.title
            )));
        }
    }
    Ok(())
}
