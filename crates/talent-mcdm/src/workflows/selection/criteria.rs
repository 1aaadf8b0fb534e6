use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::domain::SelectionError;

/// The five benefit criteria every ranking engine consumes, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Ist,
    Papi,
    Mbti,
    Kraepelin,
    Disc,
}

impl Criterion {
    pub const COUNT: usize = 5;

    pub const fn ordered() -> [Criterion; Criterion::COUNT] {
        [
            Criterion::Ist,
            Criterion::Papi,
            Criterion::Mbti,
            Criterion::Kraepelin,
            Criterion::Disc,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Criterion::Ist => "IST",
            Criterion::Papi => "PAPI",
            Criterion::Mbti => "MBTI",
            Criterion::Kraepelin => "Kraepelin",
            Criterion::Disc => "DISC",
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Criterion::Ist => 0,
            Criterion::Papi => 1,
            Criterion::Mbti => 2,
            Criterion::Kraepelin => 3,
            Criterion::Disc => 4,
        }
    }
}

/// Aggregated criteria scores for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaRow {
    pub name: String,
    #[serde(rename = "IST")]
    pub ist: f64,
    #[serde(rename = "PAPI")]
    pub papi: f64,
    #[serde(rename = "MBTI")]
    pub mbti: f64,
    #[serde(rename = "Kraepelin")]
    pub kraepelin: f64,
    #[serde(rename = "DISC")]
    pub disc: f64,
}

impl CriteriaRow {
    pub fn new(name: impl Into<String>, values: [f64; Criterion::COUNT]) -> Self {
        let [ist, papi, mbti, kraepelin, disc] = values;
        Self {
            name: name.into(),
            ist,
            papi,
            mbti,
            kraepelin,
            disc,
        }
    }

    pub fn values(&self) -> [f64; Criterion::COUNT] {
        [self.ist, self.papi, self.mbti, self.kraepelin, self.disc]
    }

    pub fn value(&self, criterion: Criterion) -> f64 {
        self.values()[criterion.index()]
    }
}

/// Ordered, non-empty table of criteria rows keyed by candidate name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CriteriaRow>", into = "Vec<CriteriaRow>")]
pub struct CriteriaTable {
    rows: Vec<CriteriaRow>,
}

impl CriteriaTable {
    pub fn new(rows: Vec<CriteriaRow>) -> Result<Self, SelectionError> {
        if rows.is_empty() {
            return Err(SelectionError::invalid(
                "criteria table must contain at least one candidate",
            ));
        }

        let mut seen = HashSet::with_capacity(rows.len());
        for row in &rows {
            if !seen.insert(row.name.as_str()) {
                return Err(SelectionError::invalid(format!(
                    "candidate '{}' appears more than once",
                    row.name
                )));
            }
            if let Some(criterion) = Criterion::ordered()
                .into_iter()
                .find(|criterion| !row.value(*criterion).is_finite())
            {
                return Err(SelectionError::invalid(format!(
                    "candidate '{}' has a non-finite {} score",
                    row.name,
                    criterion.label()
                )));
            }
        }

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[CriteriaRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.name.as_str())
    }

    /// Row-major decision matrix.
    pub fn matrix(&self) -> Vec<[f64; Criterion::COUNT]> {
        self.rows.iter().map(CriteriaRow::values).collect()
    }

    pub fn column(&self, criterion: Criterion) -> Vec<f64> {
        self.rows.iter().map(|row| row.value(criterion)).collect()
    }
}

impl TryFrom<Vec<CriteriaRow>> for CriteriaTable {
    type Error = SelectionError;

    fn try_from(rows: Vec<CriteriaRow>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<CriteriaTable> for Vec<CriteriaRow> {
    fn from(table: CriteriaTable) -> Self {
        table.rows
    }
}

/// Pipeline step that found a column without spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticStage {
    DiscNormalization,
    VikorNormalization,
    ElectreNormalization,
}

impl DiagnosticStage {
    pub const fn label(self) -> &'static str {
        match self {
            DiagnosticStage::DiscNormalization => "DISC min-max normalization",
            DiagnosticStage::VikorNormalization => "VIKOR regret normalization",
            DiagnosticStage::ElectreNormalization => "ELECTRE vector normalization",
        }
    }
}

/// Non-fatal notice that a column contributed zero because it had no spread or norm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegenerateColumn {
    pub stage: DiagnosticStage,
    pub column: String,
}

impl DegenerateColumn {
    pub(crate) fn record(stage: DiagnosticStage, column: impl Into<String>) -> Self {
        let column = column.into();
        tracing::warn!(
            stage = stage.label(),
            column = %column,
            "degenerate column contributes zero"
        );
        Self { stage, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rejects_empty_rows() {
        assert!(matches!(
            CriteriaTable::new(Vec::new()),
            Err(SelectionError::InvalidInput(_))
        ));
    }

    #[test]
    fn table_rejects_duplicate_names() {
        let rows = vec![
            CriteriaRow::new("Ayu", [1.0; 5]),
            CriteriaRow::new("Ayu", [2.0; 5]),
        ];
        assert!(CriteriaTable::new(rows).is_err());
    }

    #[test]
    fn table_rejects_non_finite_scores() {
        let rows = vec![CriteriaRow::new("Ayu", [1.0, f64::NAN, 1.0, 1.0, 1.0])];
        match CriteriaTable::new(rows) {
            Err(SelectionError::InvalidInput(message)) => assert!(message.contains("PAPI")),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn columns_follow_criterion_order() {
        let table = CriteriaTable::new(vec![
            CriteriaRow::new("Ayu", [1.0, 2.0, 3.0, 4.0, 5.0]),
            CriteriaRow::new("Budi", [6.0, 7.0, 8.0, 9.0, 10.0]),
        ])
        .expect("valid table");

        assert_eq!(table.column(Criterion::Kraepelin), vec![4.0, 9.0]);
        assert_eq!(table.matrix()[1], [6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["Ayu", "Budi"]);
    }

    #[test]
    fn deserializing_validates_rows() {
        let result: Result<CriteriaTable, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }
}
