//! Reduction of raw assessment rows to the five criteria scores.

use serde::Serialize;
use tracing::debug;

use super::criteria::{CriteriaRow, CriteriaTable, DegenerateColumn, DiagnosticStage};
use super::domain::{
    CandidateRecord, JobProfile, RawCandidate, SelectionError, DISC_FIELDS,
};

/// Share of the population whose IST spread is considered consistent.
pub const IST_CONSISTENCY_PERCENTILE: f64 = 0.75;
/// Multiplier applied to IQ when sub-test scores are inconsistent.
pub const IST_INCONSISTENCY_FACTOR: f64 = 0.9;
/// Speed, accuracy, consistency level, consistency variation, endurance.
pub const KRAEPELIN_WEIGHTS: [f64; 5] = [0.25, 0.25, 0.125, 0.125, 0.25];

/// Criteria table together with the non-fatal notices raised while building it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub table: CriteriaTable,
    pub warnings: Vec<DegenerateColumn>,
}

/// Builds the criteria table for `candidates` under `job`.
pub fn aggregate(
    candidates: &[RawCandidate],
    job: &JobProfile,
) -> Result<CriteriaTable, SelectionError> {
    aggregate_with_diagnostics(candidates, job).map(|aggregation| aggregation.table)
}

pub fn aggregate_with_diagnostics(
    candidates: &[RawCandidate],
    job: &JobProfile,
) -> Result<Aggregation, SelectionError> {
    if candidates.is_empty() {
        return Err(SelectionError::invalid(
            "at least one candidate is required for aggregation",
        ));
    }
    job.validate()?;

    let records = candidates
        .iter()
        .map(|raw| CandidateRecord::project(raw, job))
        .collect::<Result<Vec<_>, _>>()?;

    let ist = ist_scores(&records);
    let (disc, warnings) = disc_scores(&records, job);

    let rows = records
        .iter()
        .zip(ist)
        .zip(disc)
        .map(|((record, ist), disc)| {
            CriteriaRow::new(
                record.name.clone(),
                [
                    ist,
                    papi_score(record),
                    mbti_score(record),
                    kraepelin_score(record),
                    disc,
                ],
            )
        })
        .collect();

    let table = CriteriaTable::new(rows)?;
    debug!(
        job = %job.title,
        candidates = table.len(),
        degenerate = warnings.len(),
        "aggregated candidates into criteria table"
    );

    Ok(Aggregation { table, warnings })
}

fn ist_scores(records: &[CandidateRecord]) -> Vec<f64> {
    let spreads: Vec<f64> = records
        .iter()
        .map(|record| population_std_dev(&record.ist.subtests))
        .collect();
    let threshold = percentile(&spreads, IST_CONSISTENCY_PERCENTILE);

    records
        .iter()
        .zip(&spreads)
        .map(|(record, spread)| {
            if *spread > threshold {
                record.ist.iq * IST_INCONSISTENCY_FACTOR
            } else {
                record.ist.iq
            }
        })
        .collect()
}

fn papi_score(record: &CandidateRecord) -> f64 {
    let positive: f64 = record.papi.positive.iter().sum();
    let negative: f64 = record.papi.negative.iter().sum();
    positive + record.papi.context - negative
}

fn mbti_score(record: &CandidateRecord) -> f64 {
    let mbti = &record.mbti;
    mbti.energy + mbti.information + mbti.decision + mbti.lifestyle
}

fn kraepelin_score(record: &CandidateRecord) -> f64 {
    let k = &record.kraepelin;
    [
        k.speed,
        k.accuracy,
        k.consistency_level,
        k.consistency_variation,
        k.endurance,
    ]
    .iter()
    .zip(KRAEPELIN_WEIGHTS)
    .map(|(value, weight)| value * weight)
    .sum()
}

fn disc_scores(
    records: &[CandidateRecord],
    job: &JobProfile,
) -> (Vec<f64>, Vec<DegenerateColumn>) {
    let weights = job.disc.as_array();
    let mut scores = vec![0.0; records.len()];
    let mut warnings = Vec::new();

    for (dimension, field) in DISC_FIELDS.iter().enumerate() {
        let column: Vec<f64> = records
            .iter()
            .map(|record| record.disc.as_array()[dimension])
            .collect();
        let (min, max) = min_max(&column);
        let spread = max - min;

        if spread == 0.0 {
            warnings.push(DegenerateColumn::record(
                DiagnosticStage::DiscNormalization,
                *field,
            ));
            continue;
        }

        for (score, value) in scores.iter_mut().zip(&column) {
            *score += weights[dimension] * (value - min) / spread;
        }
    }

    (scores, warnings)
}

pub(crate) fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
            (min.min(*value), max.max(*value))
        })
}

fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / count;
    variance.sqrt()
}

/// Percentile with linear interpolation between closest ranks.
fn percentile(values: &[f64], quantile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let position = quantile.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
