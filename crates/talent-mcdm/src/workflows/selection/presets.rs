use super::domain::{
    DecisionPole, DiscWeights, EnergyPole, InformationPole, JobProfile, LifestylePole,
    MbtiPreference, PapiContext,
};

impl JobProfile {
    /// Built-in positions offered when no job position export is configured.
    pub fn presets() -> Vec<JobProfile> {
        vec![
            preset(
                "Pre-Sales",
                PapiContext::GroupAffinity,
                (
                    EnergyPole::Extraverted,
                    InformationPole::Intuition,
                    DecisionPole::Thinking,
                    LifestylePole::Judging,
                ),
                [0.3, 0.4, 0.2, 0.1],
            ),
            preset(
                "IT Developer",
                PapiContext::Theoretical,
                (
                    EnergyPole::Introverted,
                    InformationPole::Intuition,
                    DecisionPole::Thinking,
                    LifestylePole::Perceiving,
                ),
                [0.1, 0.2, 0.2, 0.5],
            ),
            preset(
                "Sales Manager",
                PapiContext::PersonalRelations,
                (
                    EnergyPole::Extraverted,
                    InformationPole::Sensing,
                    DecisionPole::Feeling,
                    LifestylePole::Judging,
                ),
                [0.2, 0.3, 0.3, 0.2],
            ),
            preset(
                "Admin",
                PapiContext::DetailOriented,
                (
                    EnergyPole::Introverted,
                    InformationPole::Sensing,
                    DecisionPole::Thinking,
                    LifestylePole::Judging,
                ),
                [0.4, 0.1, 0.3, 0.2],
            ),
            preset(
                "Marketing",
                PapiContext::Change,
                (
                    EnergyPole::Extraverted,
                    InformationPole::Intuition,
                    DecisionPole::Feeling,
                    LifestylePole::Perceiving,
                ),
                [0.25, 0.25, 0.25, 0.25],
            ),
        ]
    }

    /// Case-insensitive lookup among `profiles` by title.
    pub fn find<'a>(profiles: &'a [JobProfile], title: &str) -> Option<&'a JobProfile> {
        let wanted = title.trim();
        profiles
            .iter()
            .find(|profile| profile.title.eq_ignore_ascii_case(wanted))
    }
}

fn preset(
    title: &str,
    papi_context: PapiContext,
    (energy, information, decision, lifestyle): (
        EnergyPole,
        InformationPole,
        DecisionPole,
        LifestylePole,
    ),
    [dominance, influence, steadiness, conscientiousness]: [f64; 4],
) -> JobProfile {
    JobProfile {
        title: title.to_string(),
        papi_context,
        mbti: MbtiPreference {
            energy,
            information,
            decision,
            lifestyle,
        },
        disc: DiscWeights {
            dominance,
            influence,
            steadiness,
            conscientiousness,
        },
    }
}
