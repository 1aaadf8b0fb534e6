use serde::Serialize;
use tracing::debug;

use super::{competition_rank, rank_order, CriteriaWeights, RankDirection};
use crate::workflows::selection::aggregation::min_max;
use crate::workflows::selection::criteria::{
    CriteriaTable, Criterion, DegenerateColumn, DiagnosticStage,
};
use crate::workflows::selection::domain::SelectionError;

/// Weight of the group-utility term against the individual-regret term.
pub const DEFAULT_STRATEGY_WEIGHT: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VikorRow {
    pub name: String,
    /// Aggregate weighted regret.
    pub s: f64,
    /// Worst single weighted regret.
    pub r: f64,
    /// Compromise index; lower is better.
    pub q: f64,
    /// `1 - q`, for displays that expect higher-is-better.
    pub score: f64,
    pub rank: usize,
}

/// Acceptable-advantage check between the two best alternatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptableAdvantage {
    pub leader: String,
    pub runner_up: String,
    pub q_gap: f64,
    pub threshold: f64,
    pub satisfied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvantageVerdict {
    Satisfied,
    NotSatisfied,
    /// Fewer than two alternatives.
    NotApplicable,
}

impl AdvantageVerdict {
    pub const fn label(self) -> &'static str {
        match self {
            AdvantageVerdict::Satisfied => "satisfied",
            AdvantageVerdict::NotSatisfied => "not satisfied",
            AdvantageVerdict::NotApplicable => "not applicable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VikorResult {
    pub rows: Vec<VikorRow>,
    pub advantage: Option<AcceptableAdvantage>,
    pub verdict: AdvantageVerdict,
    pub warnings: Vec<DegenerateColumn>,
}

/// Ranks the table with VIKOR, treating every criterion as a benefit.
pub fn vikor(
    table: &CriteriaTable,
    weights: &CriteriaWeights,
    v: f64,
) -> Result<VikorResult, SelectionError> {
    if table.is_empty() {
        return Err(SelectionError::invalid("VIKOR requires at least one alternative"));
    }
    if !(0.0..=1.0).contains(&v) {
        return Err(SelectionError::invalid(format!(
            "VIKOR strategy weight v must lie in [0, 1] (found {v})"
        )));
    }
    weights.ensure_normalized()?;

    let matrix = table.matrix();
    let alternatives = matrix.len();
    let mut s = vec![0.0; alternatives];
    let mut r = vec![0.0_f64; alternatives];
    let mut warnings = Vec::new();

    for criterion in Criterion::ordered() {
        let j = criterion.index();
        let column = table.column(criterion);
        let (worst, best) = min_max(&column);
        let spread = best - worst;
        if spread == 0.0 {
            warnings.push(DegenerateColumn::record(
                DiagnosticStage::VikorNormalization,
                criterion.label(),
            ));
        }

        for (i, row) in matrix.iter().enumerate() {
            let regret = if spread == 0.0 {
                0.0
            } else {
                (best - row[j]) / spread
            };
            let weighted = weights.get(criterion) * regret;
            s[i] += weighted;
            r[i] = r[i].max(weighted);
        }
    }

    let (s_best, s_worst) = min_max(&s);
    let (r_best, r_worst) = min_max(&r);
    let q: Vec<f64> = s
        .iter()
        .zip(&r)
        .map(|(s_i, r_i)| {
            v * ratio(s_i - s_best, s_worst - s_best)
                + (1.0 - v) * ratio(r_i - r_best, r_worst - r_best)
        })
        .collect();

    let ranks = competition_rank(&q, RankDirection::Ascending);
    let rows: Vec<VikorRow> = rank_order(&ranks)
        .into_iter()
        .map(|i| VikorRow {
            name: table.rows()[i].name.clone(),
            s: s[i],
            r: r[i],
            q: q[i],
            score: 1.0 - q[i],
            rank: ranks[i],
        })
        .collect();

    let advantage = acceptable_advantage(&rows);
    let verdict = match &advantage {
        Some(advantage) if advantage.satisfied => AdvantageVerdict::Satisfied,
        Some(_) => AdvantageVerdict::NotSatisfied,
        None => AdvantageVerdict::NotApplicable,
    };
    debug!(
        alternatives,
        v,
        verdict = verdict.label(),
        "VIKOR ranking complete"
    );

    Ok(VikorResult {
        rows,
        advantage,
        verdict,
        warnings,
    })
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

fn acceptable_advantage(rows: &[VikorRow]) -> Option<AcceptableAdvantage> {
    let [leader, runner_up, ..] = rows else {
        return None;
    };
    let threshold = 1.0 / (rows.len() - 1) as f64;
    let q_gap = runner_up.q - leader.q;

    Some(AcceptableAdvantage {
        leader: leader.name.clone(),
        runner_up: runner_up.name.clone(),
        q_gap,
        threshold,
        satisfied: q_gap >= threshold,
    })
}
