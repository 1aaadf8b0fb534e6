use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{competition_rank, rank_order, CriteriaWeights, RankDirection};
use crate::workflows::selection::criteria::{
    CriteriaTable, Criterion, DegenerateColumn, DiagnosticStage,
};
use crate::workflows::selection::domain::SelectionError;

/// Direction of the discordance dominance test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscordanceRule {
    /// `G[k][l] = 1` iff `d[k][l] <= d̄`: low discordance dominates.
    #[default]
    AtMostThreshold,
    /// `G[k][l] = 1` iff `d[k][l] >= d̄`, kept for parity with legacy result sheets.
    AtLeastThreshold,
}

impl DiscordanceRule {
    fn dominates(self, discordance: f64, threshold: f64) -> bool {
        match self {
            DiscordanceRule::AtMostThreshold => discordance <= threshold,
            DiscordanceRule::AtLeastThreshold => discordance >= threshold,
        }
    }
}

/// Source of the concordance/discordance cut-offs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ElectreThresholds {
    /// Mean of the off-diagonal matrix entries.
    #[default]
    Mean,
    Fixed { concordance: f64, discordance: f64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectreParams {
    #[serde(default)]
    pub discordance_rule: DiscordanceRule,
    #[serde(default)]
    pub thresholds: ElectreThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectreRow {
    pub name: String,
    /// Number of alternatives this one dominates.
    pub net_score: usize,
    pub rank: usize,
}

/// Intermediate pairwise matrices, indexed in criteria table order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectreMatrices {
    pub alternatives: Vec<String>,
    pub concordance: Vec<Vec<f64>>,
    pub discordance: Vec<Vec<f64>>,
    pub concordance_dominance: Vec<Vec<u8>>,
    pub discordance_dominance: Vec<Vec<u8>>,
    pub aggregate_dominance: Vec<Vec<u8>>,
    pub concordance_threshold: f64,
    pub discordance_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElectreResult {
    pub rows: Vec<ElectreRow>,
    pub matrices: ElectreMatrices,
    pub warnings: Vec<DegenerateColumn>,
}

/// Ranks the table with ELECTRE outranking, treating every criterion as a benefit.
pub fn electre(
    table: &CriteriaTable,
    weights: &CriteriaWeights,
    params: &ElectreParams,
) -> Result<ElectreResult, SelectionError> {
    if table.is_empty() {
        return Err(SelectionError::invalid(
            "ELECTRE requires at least one alternative",
        ));
    }
    if let ElectreThresholds::Fixed {
        concordance,
        discordance,
    } = params.thresholds
    {
        if !concordance.is_finite() || !discordance.is_finite() {
            return Err(SelectionError::invalid(
                "ELECTRE fixed thresholds must be finite numbers",
            ));
        }
    }

    let (weighted, warnings) = weighted_normalized(table, weights);
    let n = weighted.len();
    let weight_values = weights.as_array();

    let mut concordance = vec![vec![0.0; n]; n];
    let mut discordance = vec![vec![0.0; n]; n];
    for k in 0..n {
        for l in 0..n {
            if k == l {
                continue;
            }
            let (c, d) = pairwise(&weighted[k], &weighted[l], &weight_values);
            concordance[k][l] = c;
            discordance[k][l] = d;
        }
    }

    let (c_bar, d_bar) = match params.thresholds {
        ElectreThresholds::Mean => (off_diagonal_mean(&concordance), off_diagonal_mean(&discordance)),
        ElectreThresholds::Fixed {
            concordance,
            discordance,
        } => (concordance, discordance),
    };

    let concordance_dominance = dominance(&concordance, |c| c >= c_bar);
    let discordance_dominance =
        dominance(&discordance, |d| params.discordance_rule.dominates(d, d_bar));
    let aggregate_dominance: Vec<Vec<u8>> = concordance_dominance
        .iter()
        .zip(&discordance_dominance)
        .map(|(f_row, g_row)| f_row.iter().zip(g_row).map(|(f, g)| f & g).collect())
        .collect();

    let net_scores: Vec<usize> = aggregate_dominance
        .iter()
        .map(|row| row.iter().map(|cell| usize::from(*cell)).sum())
        .collect();
    let score_values: Vec<f64> = net_scores.iter().map(|score| *score as f64).collect();
    let ranks = competition_rank(&score_values, RankDirection::Descending);

    let rows = rank_order(&ranks)
        .into_iter()
        .map(|i| ElectreRow {
            name: table.rows()[i].name.clone(),
            net_score: net_scores[i],
            rank: ranks[i],
        })
        .collect();

    debug!(
        alternatives = n,
        concordance_threshold = c_bar,
        discordance_threshold = d_bar,
        rule = ?params.discordance_rule,
        "ELECTRE ranking complete"
    );

    Ok(ElectreResult {
        rows,
        matrices: ElectreMatrices {
            alternatives: table.names().map(str::to_string).collect(),
            concordance,
            discordance,
            concordance_dominance,
            discordance_dominance,
            aggregate_dominance,
            concordance_threshold: c_bar,
            discordance_threshold: d_bar,
        },
        warnings,
    })
}

/// Column-wise Euclidean normalization followed by weighting.
fn weighted_normalized(
    table: &CriteriaTable,
    weights: &CriteriaWeights,
) -> (Vec<[f64; Criterion::COUNT]>, Vec<DegenerateColumn>) {
    let mut matrix = table.matrix();
    let mut warnings = Vec::new();

    for criterion in Criterion::ordered() {
        let j = criterion.index();
        let norm = matrix.iter().map(|row| row[j] * row[j]).sum::<f64>().sqrt();
        if norm == 0.0 {
            warnings.push(DegenerateColumn::record(
                DiagnosticStage::ElectreNormalization,
                criterion.label(),
            ));
        }
        for row in matrix.iter_mut() {
            row[j] = if norm == 0.0 {
                0.0
            } else {
                row[j] / norm * weights.get(criterion)
            };
        }
    }

    (matrix, warnings)
}

/// Concordance and discordance indices of `k` over `l`.
fn pairwise(
    k: &[f64; Criterion::COUNT],
    l: &[f64; Criterion::COUNT],
    weights: &[f64; Criterion::COUNT],
) -> (f64, f64) {
    let mut concordance = 0.0;
    let mut worst_discordant: f64 = 0.0;
    let mut widest_gap: f64 = 0.0;

    for j in 0..Criterion::COUNT {
        let gap = (k[j] - l[j]).abs();
        widest_gap = widest_gap.max(gap);
        if k[j] >= l[j] {
            concordance += weights[j];
        } else {
            worst_discordant = worst_discordant.max(gap);
        }
    }

    let discordance = if widest_gap == 0.0 {
        0.0
    } else {
        worst_discordant / widest_gap
    };
    (concordance, discordance)
}

fn off_diagonal_mean(matrix: &[Vec<f64>]) -> f64 {
    let n = matrix.len();
    if n < 2 {
        return 0.0;
    }
    let total: f64 = matrix
        .iter()
        .enumerate()
        .flat_map(|(k, row)| {
            row.iter()
                .enumerate()
                .filter(move |(l, _)| *l != k)
                .map(|(_, value)| *value)
        })
        .sum();
    total / (n * (n - 1)) as f64
}

fn dominance(matrix: &[Vec<f64>], test: impl Fn(f64) -> bool) -> Vec<Vec<u8>> {
    matrix
        .iter()
        .enumerate()
        .map(|(k, row)| {
            row.iter()
                .enumerate()
                .map(|(l, value)| u8::from(k != l && test(*value)))
                .collect()
        })
        .collect()
}
