mod electre;
mod vikor;

pub use electre::{
    electre, DiscordanceRule, ElectreMatrices, ElectreParams, ElectreResult, ElectreRow,
    ElectreThresholds,
};
pub use vikor::{
    vikor, AcceptableAdvantage, AdvantageVerdict, VikorResult, VikorRow, DEFAULT_STRATEGY_WEIGHT,
};

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::criteria::Criterion;
use super::domain::SelectionError;

/// Allowed deviation of the criteria weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Relative importance of each criterion, in [`Criterion::ordered`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct CriteriaWeights([f64; Criterion::COUNT]);

impl CriteriaWeights {
    pub fn new(weights: [f64; Criterion::COUNT]) -> Result<Self, SelectionError> {
        if let Some((index, weight)) = weights
            .iter()
            .enumerate()
            .find(|(_, weight)| !weight.is_finite() || **weight < 0.0)
        {
            return Err(SelectionError::invalid(format!(
                "weight for {} must be a non-negative number (found {weight})",
                Criterion::ordered()[index].label()
            )));
        }
        Ok(Self(weights))
    }

    pub fn as_array(&self) -> [f64; Criterion::COUNT] {
        self.0
    }

    pub fn get(&self, criterion: Criterion) -> f64 {
        self.0[criterion.index()]
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn ensure_normalized(&self) -> Result<(), SelectionError> {
        let total = self.sum();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SelectionError::invalid(format!(
                "criteria weights must sum to 1.0 (found {total:.3})"
            )));
        }
        Ok(())
    }
}

impl Default for CriteriaWeights {
    fn default() -> Self {
        Self([0.25, 0.20, 0.20, 0.15, 0.20])
    }
}

impl TryFrom<&[f64]> for CriteriaWeights {
    type Error = SelectionError;

    fn try_from(weights: &[f64]) -> Result<Self, Self::Error> {
        let array: [f64; Criterion::COUNT] = weights.try_into().map_err(|_| {
            SelectionError::invalid(format!(
                "expected {} criteria weights, got {}",
                Criterion::COUNT,
                weights.len()
            ))
        })?;
        Self::new(array)
    }
}

impl TryFrom<Vec<f64>> for CriteriaWeights {
    type Error = SelectionError;

    fn try_from(weights: Vec<f64>) -> Result<Self, Self::Error> {
        Self::try_from(weights.as_slice())
    }
}

impl From<CriteriaWeights> for Vec<f64> {
    fn from(weights: CriteriaWeights) -> Self {
        weights.0.to_vec()
    }
}

/// Ranking engines offered by the selection pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMethod {
    Vikor,
    Electre,
}

impl RankingMethod {
    pub const fn label(self) -> &'static str {
        match self {
            RankingMethod::Vikor => "VIKOR",
            RankingMethod::Electre => "ELECTRE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RankDirection {
    Ascending,
    Descending,
}

/// Standard competition ("min") ranking: equal values share the smallest rank and
/// the following rank skips accordingly.
pub(crate) fn competition_rank(values: &[f64], direction: RankDirection) -> Vec<usize> {
    let compare = |a: &f64, b: &f64| match direction {
        RankDirection::Ascending => a.total_cmp(b),
        RankDirection::Descending => b.total_cmp(a),
    };

    values
        .iter()
        .map(|value| {
            1 + values
                .iter()
                .filter(|other| compare(other, value) == Ordering::Less)
                .count()
        })
        .collect()
}

/// Row indices ordered by rank; ties keep table order.
pub(crate) fn rank_order(ranks: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..ranks.len()).collect();
    order.sort_by_key(|index| ranks[*index]);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn competition_rank_shares_minimum_rank() {
        let ranks = competition_rank(&[0.3, 0.1, 0.3, 0.5], RankDirection::Ascending);
        assert_eq!(ranks, vec![2, 1, 2, 4]);

        let ranks = competition_rank(&[2.0, 3.0, 3.0, 0.0], RankDirection::Descending);
        assert_eq!(ranks, vec![3, 1, 1, 4]);
    }

    #[test]
    fn rank_order_is_stable_for_ties() {
        assert_eq!(rank_order(&[2, 1, 2, 4]), vec![1, 0, 2, 3]);
    }

    #[test]
    fn weights_require_five_entries() {
        let short: &[f64] = &[0.5, 0.5];
        match CriteriaWeights::try_from(short) {
            Err(SelectionError::InvalidInput(message)) => assert!(message.contains("got 2")),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn weights_reject_negative_values() {
        assert!(CriteriaWeights::new([0.5, 0.5, 0.25, 0.0, -0.25]).is_err());
    }

    #[test]
    fn default_weights_are_normalized() {
        let weights = CriteriaWeights::default();
        assert!(weights.ensure_normalized().is_ok());
        assert_eq!(weights.get(Criterion::Ist), 0.25);
        assert_eq!(weights.get(Criterion::Kraepelin), 0.15);
    }

    #[test]
    fn unnormalized_weights_fail_sum_check() {
        let weights = CriteriaWeights::new([0.3, 0.3, 0.3, 0.3, 0.3]).expect("valid entries");
        assert!(weights.ensure_normalized().is_err());
    }

    #[test]
    fn weights_deserialize_from_json_array() {
        let weights: CriteriaWeights =
            serde_json::from_str("[0.2, 0.2, 0.2, 0.2, 0.2]").expect("parse");
        assert_eq!(weights.as_array(), [0.2; 5]);
        assert!(serde_json::from_str::<CriteriaWeights>("[1.0]").is_err());
    }
}
