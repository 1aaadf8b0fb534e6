use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use talent_mcdm::config;
use talent_mcdm::error::AppError;
use talent_mcdm::workflows::selection::{
    CriteriaWeights, DiscordanceRule, JobPositionImporter, JobProfile,
};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Reads the job position export when one is configured, otherwise the built-in positions.
pub(crate) fn load_positions(path: Option<&Path>) -> Result<Vec<JobProfile>, AppError> {
    match path {
        Some(path) => {
            let positions = JobPositionImporter::from_path(path)?;
            info!(path = %path.display(), positions = positions.len(), "loaded job positions");
            Ok(positions)
        }
        None => Ok(JobProfile::presets()),
    }
}

pub(crate) fn parse_weights(raw: &str) -> Result<CriteriaWeights, String> {
    config::parse_weights(raw).map_err(|err| err.to_string())
}

pub(crate) fn parse_strategy_weight(raw: &str) -> Result<f64, String> {
    config::parse_strategy_weight(raw).map_err(|err| err.to_string())
}

pub(crate) fn parse_discordance_rule(raw: &str) -> Result<DiscordanceRule, String> {
    config::parse_discordance_rule(raw).map_err(|err| err.to_string())
}
