use std::sync::Arc;

use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::workflows::selection::domain::{
    JobProfile, RawCandidate, DISC_FIELDS, IST_IQ_FIELD, IST_SUBTEST_FIELDS, KRAEPELIN_FIELDS,
    PAPI_NEGATIVE_FIELDS, PAPI_POSITIVE_FIELDS,
};
use crate::workflows::selection::{selection_router, RankingConfig, SelectionService};

const PAPI_CONTEXT_FIELDS: [&str; 5] = ["P_O", "P_B", "P_R", "P_D", "P_Z"];
const MBTI_FIELDS: [&str; 8] = ["M_E", "M_I", "M_S", "M_N", "M_T", "M_F", "M_J", "M_P"];

/// Candidate with every assessment field present, scaled by `level`.
///
/// IST sub-tests are flat (zero spread), PAPI risk scales sit at 1, MBTI poles
/// at `level * 10`, and every other field at `level`.
pub(super) fn candidate(name: &str, level: f64) -> RawCandidate {
    let mut candidate = RawCandidate::new(name).with_score(IST_IQ_FIELD, 100.0 + level);
    for field in IST_SUBTEST_FIELDS {
        candidate = candidate.with_score(field, 10.0);
    }
    for field in PAPI_POSITIVE_FIELDS.iter().chain(PAPI_CONTEXT_FIELDS.iter()) {
        candidate = candidate.with_score(*field, level);
    }
    for field in PAPI_NEGATIVE_FIELDS {
        candidate = candidate.with_score(field, 1.0);
    }
    for field in MBTI_FIELDS {
        candidate = candidate.with_score(field, level * 10.0);
    }
    for field in KRAEPELIN_FIELDS.iter().chain(DISC_FIELDS.iter()) {
        candidate = candidate.with_score(*field, level);
    }
    candidate
}

pub(super) fn with_ist(mut candidate: RawCandidate, subtests: [f64; 9], iq: f64) -> RawCandidate {
    for (field, value) in IST_SUBTEST_FIELDS.iter().zip(subtests) {
        candidate.scores.insert((*field).to_string(), value);
    }
    candidate.scores.insert(IST_IQ_FIELD.to_string(), iq);
    candidate
}

pub(super) fn without(mut candidate: RawCandidate, field: &str) -> RawCandidate {
    candidate.scores.remove(field);
    candidate
}

pub(super) fn preset(title: &str) -> JobProfile {
    JobProfile::find(&JobProfile::presets(), title)
        .cloned()
        .expect("preset exists")
}

pub(super) fn roster() -> Vec<RawCandidate> {
    vec![
        candidate("Ayu", 4.0),
        candidate("Budi", 7.0),
        candidate("Citra", 5.0),
    ]
}

pub(super) fn service() -> SelectionService {
    SelectionService::with_presets(RankingConfig::default())
}

pub(super) fn selection_router_with_service(service: SelectionService) -> Router {
    selection_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&body).expect("valid json")
}
