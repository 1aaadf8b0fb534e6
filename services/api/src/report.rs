use crate::infra::{load_positions, parse_discordance_rule, parse_strategy_weight, parse_weights};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use talent_mcdm::config::AppConfig;
use talent_mcdm::error::AppError;
use talent_mcdm::telemetry;
use talent_mcdm::workflows::selection::{
    CandidateImporter, CriteriaWeights, DiscordanceRule, ElectreResult, JobProfile, JobSelector,
    RankingMethod, SelectionReport, SelectionRequest, SelectionService, VikorResult,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum MethodArg {
    Vikor,
    Electre,
    #[default]
    All,
}

impl MethodArg {
    fn methods(self) -> Vec<RankingMethod> {
        match self {
            MethodArg::Vikor => vec![RankingMethod::Vikor],
            MethodArg::Electre => vec![RankingMethod::Electre],
            MethodArg::All => Vec::new(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Job position title to rank against (case-insensitive)
    #[arg(long)]
    pub(crate) position: String,
    /// Candidate dataset CSV (defaults to APP_CANDIDATES_CSV or dataset.csv)
    #[arg(long)]
    pub(crate) candidates: Option<PathBuf>,
    /// Job position CSV (defaults to APP_JOB_POSITIONS_CSV, then the built-in positions)
    #[arg(long)]
    pub(crate) jobs: Option<PathBuf>,
    /// Ranking engine to run
    #[arg(long, value_enum, default_value_t = MethodArg::All)]
    pub(crate) method: MethodArg,
    /// Five comma separated weights for IST, PAPI, MBTI, Kraepelin and DISC
    #[arg(long, value_parser = parse_weights)]
    pub(crate) weights: Option<CriteriaWeights>,
    /// VIKOR strategy weight in [0, 1]
    #[arg(long, value_parser = parse_strategy_weight)]
    pub(crate) v: Option<f64>,
    /// ELECTRE discordance dominance rule: at_most or at_least
    #[arg(long, value_parser = parse_discordance_rule)]
    pub(crate) discordance: Option<DiscordanceRule>,
    /// Print the full ELECTRE matrices in the text report
    #[arg(long)]
    pub(crate) show_matrices: bool,
    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PositionsArgs {
    /// Job position CSV (defaults to APP_JOB_POSITIONS_CSV, then the built-in positions)
    #[arg(long)]
    pub(crate) jobs: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct RankingOutput<'a> {
    generated_at: DateTime<Utc>,
    candidates_csv: &'a Path,
    vikor_v: f64,
    #[serde(flatten)]
    report: &'a SelectionReport,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let RankArgs {
        position,
        candidates,
        jobs,
        method,
        weights,
        v,
        discordance,
        show_matrices,
        json,
    } = args;

    let candidates_csv = candidates.unwrap_or_else(|| config.data.candidates_csv.clone());
    let positions = load_positions(jobs.as_deref().or(config.data.job_positions_csv.as_deref()))?;

    let mut ranking = config.ranking.clone();
    if let Some(weights) = weights {
        ranking.weights = weights;
    }
    if let Some(v) = v {
        ranking.vikor_v = v;
    }
    if let Some(rule) = discordance {
        ranking.electre.discordance_rule = rule;
    }
    let vikor_v = ranking.vikor_v;
    let service = SelectionService::new(ranking, positions);

    let request = SelectionRequest {
        candidates: CandidateImporter::from_path(&candidates_csv)?,
        job: JobSelector::Title(position),
        weights: None,
        v: None,
        electre: None,
        methods: method.methods(),
    };
    let report = service.evaluate(&request)?;

    if json {
        let output = RankingOutput {
            generated_at: Utc::now(),
            candidates_csv: &candidates_csv,
            vikor_v,
            report: &report,
        };
        let rendered = serde_json::to_string_pretty(&output).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        let rendered =
            render_report(&report, vikor_v, show_matrices).map_err(std::io::Error::other)?;
        print!("{rendered}");
    }
    Ok(())
}

pub(crate) fn run_positions(args: PositionsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let positions = load_positions(
        args.jobs
            .as_deref()
            .or(config.data.job_positions_csv.as_deref()),
    )?;
    let rendered = render_positions(&positions).map_err(std::io::Error::other)?;
    print!("{rendered}");
    Ok(())
}

fn describe_job(job: &JobProfile) -> String {
    format!(
        "PAPI context {}, MBTI {}, DISC D {:.2} / I {:.2} / S {:.2} / C {:.2}",
        job.papi_context.letter(),
        job.mbti.code(),
        job.disc.dominance,
        job.disc.influence,
        job.disc.steadiness,
        job.disc.conscientiousness
    )
}

pub(crate) fn render_positions(positions: &[JobProfile]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Job positions ({})", positions.len())?;
    for job in positions {
        writeln!(out, "- {}: {}", job.title, describe_job(job))?;
    }
    Ok(out)
}

pub(crate) fn render_report(
    report: &SelectionReport,
    vikor_v: f64,
    show_matrices: bool,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Candidate ranking for {}", report.job.title)?;
    writeln!(out, "Profile: {}", describe_job(&report.job))?;

    writeln!(out, "\nCriteria")?;
    writeln!(
        out,
        "  {:<24} {:>9} {:>9} {:>9} {:>10} {:>7}",
        "Name", "IST", "PAPI", "MBTI", "Kraepelin", "DISC"
    )?;
    for row in report.criteria.rows() {
        writeln!(
            out,
            "  {:<24} {:>9.2} {:>9.2} {:>9.2} {:>10.3} {:>7.3}",
            row.name, row.ist, row.papi, row.mbti, row.kraepelin, row.disc
        )?;
    }

    if let Some(vikor) = &report.vikor {
        render_vikor(&mut out, vikor, vikor_v)?;
    }
    if let Some(electre) = &report.electre {
        render_electre(&mut out, electre, show_matrices)?;
    }

    let warnings: Vec<String> = report
        .aggregation_warnings
        .iter()
        .chain(report.vikor.iter().flat_map(|vikor| vikor.warnings.iter()))
        .chain(report.electre.iter().flat_map(|electre| electre.warnings.iter()))
        .map(|warning| format!("{} has no spread ({})", warning.column, warning.stage.label()))
        .collect();
    if warnings.is_empty() {
        writeln!(out, "\nWarnings: none")?;
    } else {
        writeln!(out, "\nWarnings")?;
        for warning in warnings {
            writeln!(out, "- {warning}")?;
        }
    }
    Ok(out)
}

fn render_vikor(out: &mut String, vikor: &VikorResult, v: f64) -> fmt::Result {
    writeln!(out, "\nVIKOR (v = {v:.2})")?;
    for row in &vikor.rows {
        writeln!(
            out,
            "{:>3}. {:<24} Q {:.4}  S {:.4}  R {:.4}  score {:.4}",
            row.rank, row.name, row.q, row.s, row.r, row.score
        )?;
    }
    match &vikor.advantage {
        Some(advantage) => writeln!(
            out,
            "Acceptable advantage: {} ({} over {}, Q gap {:.4} vs DQ {:.4})",
            vikor.verdict.label(),
            advantage.leader,
            advantage.runner_up,
            advantage.q_gap,
            advantage.threshold
        ),
        None => writeln!(out, "Acceptable advantage: {}", vikor.verdict.label()),
    }
}

fn render_electre(out: &mut String, electre: &ElectreResult, show_matrices: bool) -> fmt::Result {
    let matrices = &electre.matrices;
    writeln!(
        out,
        "\nELECTRE (c̄ = {:.4}, d̄ = {:.4})",
        matrices.concordance_threshold, matrices.discordance_threshold
    )?;
    for row in &electre.rows {
        writeln!(
            out,
            "{:>3}. {:<24} dominates {}",
            row.rank, row.name, row.net_score
        )?;
    }

    if show_matrices {
        let names = &matrices.alternatives;
        render_matrix(out, "Concordance", names, &matrices.concordance)?;
        render_matrix(out, "Discordance", names, &matrices.discordance)?;
        render_matrix(out, "Concordance dominance", names, &matrices.concordance_dominance)?;
        render_matrix(out, "Discordance dominance", names, &matrices.discordance_dominance)?;
        render_matrix(out, "Aggregate dominance", names, &matrices.aggregate_dominance)?;
    }
    Ok(())
}

/// Precision applies to the real-valued matrices; integer cells ignore it.
fn render_matrix<T: fmt::Display>(
    out: &mut String,
    title: &str,
    names: &[String],
    matrix: &[Vec<T>],
) -> fmt::Result {
    writeln!(out, "{title}")?;
    for (name, row) in names.iter().zip(matrix) {
        let cells: Vec<String> = row.iter().map(|value| format!("{value:>5.3}")).collect();
        writeln!(out, "  {:<24} {}", name, cells.join(" "))?;
    }
    Ok(())
}
