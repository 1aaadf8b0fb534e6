use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Column carrying the candidate identifier in tabular exports.
pub const NAME_FIELD: &str = "NAMA";

pub const IST_SUBTEST_FIELDS: [&str; 9] = ["SE", "WA", "AN", "GE", "ME", "RA", "ZR", "FA", "WU"];
pub const IST_IQ_FIELD: &str = "IQ";

/// PAPI scales counted in favour of the candidate.
pub const PAPI_POSITIVE_FIELDS: [&str; 9] = [
    "P_N", "P_G", "P_A", "P_L", "P_P", "P_I", "P_T", "P_V", "P_C",
];

/// PAPI scales treated as risk indicators and subtracted.
pub const PAPI_NEGATIVE_FIELDS: [&str; 6] = ["P_K", "P_X", "P_W", "P_F", "P_E", "P_S"];

pub const KRAEPELIN_FIELDS: [&str; 5] = ["K_C", "K_T", "K_A1", "K_A2", "K_H"];
pub const DISC_FIELDS: [&str; 4] = ["D_D", "D_I", "D_S", "D_C"];

/// Allowed deviation of the DISC weight sum from 1.0.
pub const DISC_WEIGHT_TOLERANCE: f64 = 0.01;

const MBTI_LETTERS: [char; 8] = ['E', 'I', 'S', 'N', 'T', 'F', 'J', 'P'];

/// Hard failures raised by the aggregation and ranking pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("missing field `{field}` ({context})")]
    MissingField { field: String, context: String },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl SelectionError {
    pub(crate) fn missing(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

/// Candidate row as collaborators deliver it: a name plus loosely keyed scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCandidate {
    #[serde(rename = "NAMA")]
    pub name: String,
    #[serde(flatten)]
    pub scores: BTreeMap<String, f64>,
}

impl RawCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scores: BTreeMap::new(),
        }
    }

    pub fn with_score(mut self, field: impl Into<String>, value: f64) -> Self {
        self.scores.insert(field.into(), value);
        self
    }

    pub fn score(&self, field: &str) -> Option<f64> {
        self.scores.get(field).copied()
    }

    fn require(&self, field: &str) -> Result<f64, SelectionError> {
        let value = self
            .score(field)
            .ok_or_else(|| SelectionError::missing(field, format!("candidate '{}'", self.name)))?;
        if !value.is_finite() {
            return Err(SelectionError::invalid(format!(
                "candidate '{}' has a non-finite value in `{field}`",
                self.name
            )));
        }
        Ok(value)
    }

    fn require_all<const N: usize>(&self, fields: [&str; N]) -> Result<[f64; N], SelectionError> {
        let mut values = [0.0; N];
        for (slot, field) in values.iter_mut().zip(fields) {
            *slot = self.require(field)?;
        }
        Ok(values)
    }
}

/// Contextual PAPI preference selected by a job profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PapiContext {
    /// O: need for closeness within a group.
    GroupAffinity,
    /// B: need to belong and relate personally.
    PersonalRelations,
    /// R: theoretical, conceptual thinker.
    Theoretical,
    /// D: interest in working with details.
    DetailOriented,
    /// Z: need for change.
    Change,
}

impl PapiContext {
    pub const fn all() -> [PapiContext; 5] {
        [
            PapiContext::GroupAffinity,
            PapiContext::PersonalRelations,
            PapiContext::Theoretical,
            PapiContext::DetailOriented,
            PapiContext::Change,
        ]
    }

    pub const fn letter(self) -> char {
        match self {
            PapiContext::GroupAffinity => 'O',
            PapiContext::PersonalRelations => 'B',
            PapiContext::Theoretical => 'R',
            PapiContext::DetailOriented => 'D',
            PapiContext::Change => 'Z',
        }
    }

    pub const fn field(self) -> &'static str {
        match self {
            PapiContext::GroupAffinity => "P_O",
            PapiContext::PersonalRelations => "P_B",
            PapiContext::Theoretical => "P_R",
            PapiContext::DetailOriented => "P_D",
            PapiContext::Change => "P_Z",
        }
    }

    fn parse(raw: &str, job_title: &str) -> Result<Self, SelectionError> {
        let letter = single_letter(raw, "PAPI context", job_title)?;
        if let Some(context) = Self::all().into_iter().find(|ctx| ctx.letter() == letter) {
            return Ok(context);
        }

        let field = format!("P_{letter}");
        let known = PAPI_POSITIVE_FIELDS
            .iter()
            .chain(PAPI_NEGATIVE_FIELDS.iter())
            .any(|name| *name == field);
        if known {
            Err(SelectionError::invalid(format!(
                "job profile '{job_title}' uses `{field}` as PAPI context, expected one of O, B, R, D, Z"
            )))
        } else {
            Err(SelectionError::missing(
                field,
                format!("PAPI context of job profile '{job_title}'"),
            ))
        }
    }
}

/// One pole of an MBTI dichotomy.
pub trait MbtiPole: Copy + Sized {
    /// Job profile column that selects this axis.
    const COLUMN: &'static str;

    fn poles() -> [Self; 2];
    fn letter(self) -> char;
    fn field(self) -> &'static str;
}

macro_rules! mbti_axis {
    ($name:ident, $column:literal, $first:ident = $first_letter:literal, $second:ident = $second_letter:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $first,
            $second,
        }

        impl MbtiPole for $name {
            const COLUMN: &'static str = $column;

            fn poles() -> [Self; 2] {
                [$name::$first, $name::$second]
            }

            fn letter(self) -> char {
                match self {
                    $name::$first => $first_letter,
                    $name::$second => $second_letter,
                }
            }

            fn field(self) -> &'static str {
                match self {
                    $name::$first => concat!("M_", $first_letter),
                    $name::$second => concat!("M_", $second_letter),
                }
            }
        }
    };
}

mbti_axis!(EnergyPole, "M", Extraverted = 'E', Introverted = 'I');
mbti_axis!(InformationPole, "B", Sensing = 'S', Intuition = 'N');
mbti_axis!(DecisionPole, "T", Thinking = 'T', Feeling = 'F');
mbti_axis!(LifestylePole, "I_M", Judging = 'J', Perceiving = 'P');

fn parse_pole<P: MbtiPole>(raw: &str, job_title: &str) -> Result<P, SelectionError> {
    let letter = single_letter(raw, P::COLUMN, job_title)?;
    if let Some(pole) = P::poles().into_iter().find(|pole| pole.letter() == letter) {
        return Ok(pole);
    }

    if MBTI_LETTERS.contains(&letter) {
        let [first, second] = P::poles();
        Err(SelectionError::invalid(format!(
            "job profile '{job_title}' selects '{letter}' in column {}, expected {} or {}",
            P::COLUMN,
            first.letter(),
            second.letter()
        )))
    } else {
        Err(SelectionError::missing(
            format!("M_{letter}"),
            format!("MBTI column {} of job profile '{job_title}'", P::COLUMN),
        ))
    }
}

fn single_letter(raw: &str, column: &str, job_title: &str) -> Result<char, SelectionError> {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) => Ok(letter.to_ascii_uppercase()),
        (None, _) => Err(SelectionError::invalid(format!(
            "job profile '{job_title}' has no selection in column {column}"
        ))),
        _ => Err(SelectionError::invalid(format!(
            "job profile '{job_title}' column {column} must hold a single letter, found '{trimmed}'"
        ))),
    }
}

/// Preferred pole on each of the four MBTI axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MbtiPreference {
    pub energy: EnergyPole,
    pub information: InformationPole,
    pub decision: DecisionPole,
    pub lifestyle: LifestylePole,
}

impl MbtiPreference {
    pub fn fields(&self) -> [&'static str; 4] {
        [
            self.energy.field(),
            self.information.field(),
            self.decision.field(),
            self.lifestyle.field(),
        ]
    }

    /// Four letter type code, e.g. `ENTJ`.
    pub fn code(&self) -> String {
        [
            self.energy.letter(),
            self.information.letter(),
            self.decision.letter(),
            self.lifestyle.letter(),
        ]
        .iter()
        .collect()
    }
}

/// Weights applied to the normalized DISC dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscWeights {
    pub dominance: f64,
    pub influence: f64,
    pub steadiness: f64,
    pub conscientiousness: f64,
}

impl DiscWeights {
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.dominance,
            self.influence,
            self.steadiness,
            self.conscientiousness,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    pub fn validate(&self, job_title: &str) -> Result<(), SelectionError> {
        if self
            .as_array()
            .iter()
            .any(|weight| !weight.is_finite() || *weight < 0.0)
        {
            return Err(SelectionError::invalid(format!(
                "job profile '{job_title}' has negative or non-finite DISC weights"
            )));
        }

        let total = self.sum();
        if (total - 1.0).abs() > DISC_WEIGHT_TOLERANCE {
            return Err(SelectionError::invalid(format!(
                "job profile '{job_title}' DISC weights must sum to 1.0 (found {total:.3})"
            )));
        }
        Ok(())
    }
}

/// Validated job position describing how raw fields map onto criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawJobProfile", try_from = "RawJobProfile")]
pub struct JobProfile {
    pub title: String,
    pub papi_context: PapiContext,
    pub mbti: MbtiPreference,
    pub disc: DiscWeights,
}

impl JobProfile {
    pub fn validate(&self) -> Result<(), SelectionError> {
        if self.title.trim().is_empty() {
            return Err(SelectionError::invalid("job profile title must not be empty"));
        }
        self.disc.validate(&self.title)
    }
}

/// Tabular job position row as stored by the job position editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawJobProfile {
    #[serde(rename = "Job Position")]
    pub title: String,
    #[serde(rename = "PAPI context", default)]
    pub papi_context: String,
    #[serde(rename = "M", default)]
    pub energy: String,
    #[serde(rename = "B", default)]
    pub information: String,
    #[serde(rename = "T", default)]
    pub decision: String,
    #[serde(rename = "I_M", default)]
    pub lifestyle: String,
    #[serde(rename = "D")]
    pub dominance: f64,
    #[serde(rename = "I_D")]
    pub influence: f64,
    #[serde(rename = "S")]
    pub steadiness: f64,
    #[serde(rename = "C")]
    pub conscientiousness: f64,
}

impl TryFrom<RawJobProfile> for JobProfile {
    type Error = SelectionError;

    fn try_from(raw: RawJobProfile) -> Result<Self, Self::Error> {
        let title = raw.title.trim().to_string();
        let profile = JobProfile {
            papi_context: PapiContext::parse(&raw.papi_context, &title)?,
            mbti: MbtiPreference {
                energy: parse_pole(&raw.energy, &title)?,
                information: parse_pole(&raw.information, &title)?,
                decision: parse_pole(&raw.decision, &title)?,
                lifestyle: parse_pole(&raw.lifestyle, &title)?,
            },
            disc: DiscWeights {
                dominance: raw.dominance,
                influence: raw.influence,
                steadiness: raw.steadiness,
                conscientiousness: raw.conscientiousness,
            },
            title,
        };
        profile.validate()?;
        Ok(profile)
    }
}

impl From<JobProfile> for RawJobProfile {
    fn from(profile: JobProfile) -> Self {
        RawJobProfile {
            title: profile.title,
            papi_context: profile.papi_context.letter().to_string(),
            energy: profile.mbti.energy.letter().to_string(),
            information: profile.mbti.information.letter().to_string(),
            decision: profile.mbti.decision.letter().to_string(),
            lifestyle: profile.mbti.lifestyle.letter().to_string(),
            dominance: profile.disc.dominance,
            influence: profile.disc.influence,
            steadiness: profile.disc.steadiness,
            conscientiousness: profile.disc.conscientiousness,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IstScores {
    pub subtests: [f64; 9],
    pub iq: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PapiScores {
    pub positive: [f64; 9],
    pub negative: [f64; 6],
    pub context: f64,
}

/// MBTI strengths on the poles the job profile prefers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MbtiScores {
    pub energy: f64,
    pub information: f64,
    pub decision: f64,
    pub lifestyle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KraepelinScores {
    pub speed: f64,
    pub accuracy: f64,
    pub consistency_level: f64,
    pub consistency_variation: f64,
    pub endurance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscScores {
    pub dominance: f64,
    pub influence: f64,
    pub steadiness: f64,
    pub conscientiousness: f64,
}

impl DiscScores {
    pub fn as_array(&self) -> [f64; 4] {
        [
            self.dominance,
            self.influence,
            self.steadiness,
            self.conscientiousness,
        ]
    }
}

/// Typed view of a candidate restricted to the fields a job profile references.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRecord {
    pub name: String,
    pub ist: IstScores,
    pub papi: PapiScores,
    pub mbti: MbtiScores,
    pub kraepelin: KraepelinScores,
    pub disc: DiscScores,
}

impl CandidateRecord {
    /// Validates every field `job` needs and extracts the typed groups.
    pub fn project(raw: &RawCandidate, job: &JobProfile) -> Result<Self, SelectionError> {
        if raw.name.trim().is_empty() {
            return Err(SelectionError::invalid(format!(
                "candidate rows require a non-empty {NAME_FIELD}"
            )));
        }

        let ist = IstScores {
            subtests: raw.require_all(IST_SUBTEST_FIELDS)?,
            iq: raw.require(IST_IQ_FIELD)?,
        };
        let papi = PapiScores {
            positive: raw.require_all(PAPI_POSITIVE_FIELDS)?,
            negative: raw.require_all(PAPI_NEGATIVE_FIELDS)?,
            context: raw.require(job.papi_context.field())?,
        };
        let [energy, information, decision, lifestyle] = raw.require_all(job.mbti.fields())?;
        let [speed, accuracy, consistency_level, consistency_variation, endurance] =
            raw.require_all(KRAEPELIN_FIELDS)?;
        let [dominance, influence, steadiness, conscientiousness] = raw.require_all(DISC_FIELDS)?;

        Ok(CandidateRecord {
            name: raw.name.trim().to_string(),
            ist,
            papi,
            mbti: MbtiScores {
                energy,
                information,
                decision,
                lifestyle,
            },
            kraepelin: KraepelinScores {
                speed,
                accuracy,
                consistency_level,
                consistency_variation,
                endurance,
            },
            disc: DiscScores {
                dominance,
                influence,
                steadiness,
                conscientiousness,
            },
        })
    }
}
