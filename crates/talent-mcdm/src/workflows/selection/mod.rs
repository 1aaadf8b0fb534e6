//! Candidate selection: psychometric aggregation into five criteria and the
//! VIKOR and ELECTRE rankings built on top of them.

pub mod aggregation;
pub mod criteria;
pub mod domain;
pub mod import;
mod presets;
pub mod ranking;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregation::{aggregate, aggregate_with_diagnostics, Aggregation};
pub use criteria::{CriteriaRow, CriteriaTable, Criterion, DegenerateColumn, DiagnosticStage};
pub use domain::{
    CandidateRecord, DecisionPole, DiscWeights, EnergyPole, InformationPole, JobProfile,
    LifestylePole, MbtiPole, MbtiPreference, PapiContext, RawCandidate, RawJobProfile,
    SelectionError,
};
pub use import::{CandidateImporter, ImportError, JobPositionImporter};
pub use ranking::{
    electre, vikor, AcceptableAdvantage, AdvantageVerdict, CriteriaWeights, DiscordanceRule,
    ElectreMatrices, ElectreParams, ElectreResult, ElectreRow, ElectreThresholds, RankingMethod,
    VikorResult, VikorRow, DEFAULT_STRATEGY_WEIGHT,
};
pub use router::selection_router;
pub use service::{JobSelector, RankingConfig, SelectionReport, SelectionRequest, SelectionService};
