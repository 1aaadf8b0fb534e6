use std::collections::BTreeSet;

use talent_mcdm::workflows::selection::{
    aggregate, electre, vikor, CandidateImporter, CriteriaRow, CriteriaTable, CriteriaWeights,
    DiagnosticStage, ElectreParams, ElectreThresholds, JobPositionImporter, JobProfile,
    RankingConfig, SelectionError, SelectionService,
};

fn fixture_candidates() -> Vec<talent_mcdm::workflows::selection::RawCandidate> {
    let data = include_bytes!("fixtures/dataset.csv");
    CandidateImporter::from_reader(&data[..]).expect("fixture dataset imports")
}

fn fixture_positions() -> Vec<JobProfile> {
    let data = include_bytes!("fixtures/job_positions.csv");
    JobPositionImporter::from_reader(&data[..]).expect("fixture positions import")
}

fn table(rows: &[(&str, [f64; 5])]) -> CriteriaTable {
    CriteriaTable::new(
        rows.iter()
            .map(|(name, values)| CriteriaRow::new(*name, *values))
            .collect(),
    )
    .expect("valid table")
}

#[test]
fn dataset_ranks_every_candidate_exactly_once() {
    let candidates = fixture_candidates();
    let positions = fixture_positions();
    assert_eq!(candidates.len(), 6);
    assert_eq!(positions.len(), 3);

    for job in &positions {
        let criteria = aggregate(&candidates, job).expect("aggregates");
        let names: BTreeSet<&str> = criteria.names().collect();

        let vikor = vikor(&criteria, &CriteriaWeights::default(), 0.5).expect("vikor ranks");
        let ranked: BTreeSet<&str> = vikor.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(ranked, names);
        assert_eq!(vikor.rows.len(), criteria.len());
        assert!(vikor
            .rows
            .iter()
            .all(|row| (1..=criteria.len()).contains(&row.rank)));
        assert!(vikor.rows.iter().all(|row| (0.0..=1.0).contains(&row.q)));

        let electre = electre(&criteria, &CriteriaWeights::default(), &ElectreParams::default())
            .expect("electre ranks");
        let ranked: BTreeSet<&str> = electre.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(ranked, names);
        assert!(electre
            .rows
            .iter()
            .all(|row| (1..=criteria.len()).contains(&row.rank)));
    }
}

#[test]
fn ranking_is_idempotent() {
    let candidates = fixture_candidates();
    let job = &fixture_positions()[1];
    let weights = CriteriaWeights::default();

    let first = aggregate(&candidates, job).expect("aggregates");
    let second = aggregate(&candidates, job).expect("aggregates");
    assert_eq!(first, second);

    assert_eq!(
        vikor(&first, &weights, 0.5).expect("ranks"),
        vikor(&second, &weights, 0.5).expect("ranks")
    );
    assert_eq!(
        electre(&first, &weights, &ElectreParams::default()).expect("ranks"),
        electre(&second, &weights, &ElectreParams::default()).expect("ranks")
    );
}

#[test]
fn constant_criterion_is_neutral_in_both_engines() {
    let criteria = table(&[
        ("Andi", [110.0, 20.0, 250.0, 12.0, 0.4]),
        ("Bunga", [120.0, 20.0, 230.0, 14.0, 0.6]),
        ("Cahyo", [100.0, 20.0, 240.0, 10.0, 0.2]),
    ]);
    let weights = CriteriaWeights::default();

    let vikor = vikor(&criteria, &weights, 0.5).expect("ranks despite constant column");
    assert!(vikor
        .warnings
        .iter()
        .any(|warning| warning.stage == DiagnosticStage::VikorNormalization
            && warning.column == "PAPI"));
    assert!(vikor.rows.iter().all(|row| (0.0..=1.0).contains(&row.q)));

    let zeroed = table(&[
        ("Andi", [110.0, 0.0, 250.0, 12.0, 0.4]),
        ("Bunga", [120.0, 0.0, 230.0, 14.0, 0.6]),
    ]);
    let electre = electre(&zeroed, &weights, &ElectreParams::default())
        .expect("ranks despite zero norm");
    assert!(electre
        .warnings
        .iter()
        .any(|warning| warning.stage == DiagnosticStage::ElectreNormalization));
}

#[test]
fn weakly_dominant_candidate_outranks() {
    let criteria = table(&[
        ("Andi", [120.0, 25.0, 250.0, 14.0, 0.6]),
        ("Bunga", [110.0, 25.0, 240.0, 12.0, 0.6]),
    ]);
    let result = electre(&criteria, &CriteriaWeights::default(), &ElectreParams::default())
        .expect("ranks");

    let matrices = &result.matrices;
    assert!((matrices.concordance[0][1] - 1.0).abs() < 1e-9);
    assert_eq!(matrices.discordance[0][1], 0.0);

    let andi = result
        .rows
        .iter()
        .find(|row| row.name == "Andi")
        .expect("ranked");
    let bunga = result
        .rows
        .iter()
        .find(|row| row.name == "Bunga")
        .expect("ranked");
    assert!(andi.net_score >= bunga.net_score);
    assert_eq!(result.rows[0].name, "Andi");
}

#[test]
fn legacy_fixed_thresholds_are_supported() {
    let criteria = table(&[
        ("Andi", [120.0, 25.0, 250.0, 14.0, 0.6]),
        ("Bunga", [110.0, 20.0, 240.0, 12.0, 0.2]),
        ("Cahyo", [100.0, 30.0, 260.0, 10.0, 0.4]),
    ]);
    let params = ElectreParams {
        thresholds: ElectreThresholds::Fixed {
            concordance: 0.6,
            discordance: 0.8,
        },
        ..ElectreParams::default()
    };

    let result = electre(&criteria, &CriteriaWeights::default(), &params).expect("ranks");
    assert_eq!(result.matrices.concordance_threshold, 0.6);
    assert_eq!(result.matrices.discordance_threshold, 0.8);
}

#[test]
fn wrong_weight_count_is_invalid_input() {
    let weights: &[f64] = &[0.25, 0.25, 0.25, 0.25];
    assert!(matches!(
        CriteriaWeights::try_from(weights),
        Err(SelectionError::InvalidInput(_))
    ));
}

#[test]
fn service_evaluates_imported_positions() {
    let service = SelectionService::new(RankingConfig::default(), fixture_positions());
    let candidates = fixture_candidates();
    let request = serde_json::from_value(serde_json::json!({
        "candidates": candidates,
        "job": "data analyst",
    }))
    .expect("request parses");

    let report = service.evaluate(&request).expect("evaluates");
    assert_eq!(report.job.title, "Data Analyst");
    assert_eq!(report.vikor.expect("vikor runs").rows.len(), 6);
    assert_eq!(report.electre.expect("electre runs").rows.len(), 6);
}
