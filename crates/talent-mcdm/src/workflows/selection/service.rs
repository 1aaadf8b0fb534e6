use serde::{Deserialize, Serialize};
use tracing::info;

use super::aggregation::aggregate_with_diagnostics;
use super::criteria::{CriteriaTable, DegenerateColumn};
use super::domain::{JobProfile, RawCandidate, RawJobProfile, SelectionError};
use super::ranking::{
    electre, vikor, CriteriaWeights, ElectreParams, ElectreResult, RankingMethod, VikorResult,
    DEFAULT_STRATEGY_WEIGHT,
};

/// Defaults applied when a request leaves ranking parameters unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub weights: CriteriaWeights,
    pub vikor_v: f64,
    pub electre: ElectreParams,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: CriteriaWeights::default(),
            vikor_v: DEFAULT_STRATEGY_WEIGHT,
            electre: ElectreParams::default(),
        }
    }
}

/// Either a catalogued position title or an inline job profile row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobSelector {
    Title(String),
    Profile(RawJobProfile),
}

/// One ranking run: candidates, the position they are measured against, and overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub candidates: Vec<RawCandidate>,
    pub job: JobSelector,
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub v: Option<f64>,
    #[serde(default)]
    pub electre: Option<ElectreParams>,
    /// Engines to run; empty runs all of them.
    #[serde(default)]
    pub methods: Vec<RankingMethod>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    pub job: JobProfile,
    pub criteria: CriteriaTable,
    pub aggregation_warnings: Vec<DegenerateColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vikor: Option<VikorResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electre: Option<ElectreResult>,
}

/// Stateless facade chaining aggregation and the ranking engines.
#[derive(Debug, Clone)]
pub struct SelectionService {
    config: RankingConfig,
    positions: Vec<JobProfile>,
}

impl SelectionService {
    pub fn new(config: RankingConfig, positions: Vec<JobProfile>) -> Self {
        Self { config, positions }
    }

    pub fn with_presets(config: RankingConfig) -> Self {
        Self::new(config, JobProfile::presets())
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn positions(&self) -> &[JobProfile] {
        &self.positions
    }

    pub fn resolve_job(&self, selector: &JobSelector) -> Result<JobProfile, SelectionError> {
        match selector {
            JobSelector::Title(title) => JobProfile::find(&self.positions, title)
                .cloned()
                .ok_or_else(|| {
                    SelectionError::invalid(format!("unknown job position '{}'", title.trim()))
                }),
            JobSelector::Profile(raw) => JobProfile::try_from(raw.clone()),
        }
    }

    pub fn evaluate(&self, request: &SelectionRequest) -> Result<SelectionReport, SelectionError> {
        let job = self.resolve_job(&request.job)?;
        let weights = match &request.weights {
            Some(weights) => CriteriaWeights::try_from(weights.as_slice())?,
            None => self.config.weights,
        };
        let v = request.v.unwrap_or(self.config.vikor_v);
        let electre_params = request.electre.unwrap_or(self.config.electre);

        let aggregation = aggregate_with_diagnostics(&request.candidates, &job)?;
        let runs = |method| request.methods.is_empty() || request.methods.contains(&method);

        let vikor = if runs(RankingMethod::Vikor) {
            Some(vikor(&aggregation.table, &weights, v)?)
        } else {
            None
        };
        let electre = if runs(RankingMethod::Electre) {
            Some(electre(&aggregation.table, &weights, &electre_params)?)
        } else {
            None
        };

        info!(
            job = %job.title,
            candidates = aggregation.table.len(),
            vikor_leader = vikor.as_ref().and_then(|result| result.rows.first()).map(|row| row.name.as_str()),
            electre_leader = electre.as_ref().and_then(|result| result.rows.first()).map(|row| row.name.as_str()),
            "selection ranking evaluated"
        );

        Ok(SelectionReport {
            job,
            criteria: aggregation.table,
            aggregation_warnings: aggregation.warnings,
            vikor,
            electre,
        })
    }
}
