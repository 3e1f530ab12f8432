// Unit tests for Helper Match

use helper_match::core::{
    decode::{decode_matches, decode_stats},
    encode::{encode_balancing_coefficients, encode_helpee, encode_helper, encode_request},
};
use helper_match::models::formats::{MatchesOutput, StatsOutput};
use helper_match::models::{
    BalancingCoefficients, GradeRestriction, Helpee, Helper, MandatorySubject, Match,
    MatchingSettings, Person, PersonId, Stats, SubjectWithGradeRestriction,
};
use helper_match::services::{ArtifactError, ArtifactStore};
use chrono::{TimeZone, Utc};
use serde_json::json;

fn fixed_person(id: i64, uuid: &str) -> Person {
    Person {
        id,
        uuid: uuid.to_string(),
        created_at: Utc.with_ymd_and_hms(2021, 3, 1, 10, 0, 0).unwrap(),
        state: "nw".to_string(),
        match_request_count: 2,
        excluded_matches: vec![PersonId::new("Dissolved")],
    }
}

#[test]
fn test_helper_document_shape() {
    let helper = Helper {
        person: fixed_person(1, "HelperA"),
        subjects: vec![SubjectWithGradeRestriction {
            name: "Deutsch".to_string(),
            grade_restriction: GradeRestriction { min: 1, max: 8 },
        }],
    };

    let document = serde_json::to_value(encode_helper(&helper)).unwrap();

    assert_eq!(
        document,
        json!({
            "id": 1,
            "uuid": "HelperA",
            "createdAt": "2021-03-01T10:00:00.000Z",
            "state": "nw",
            "numberOfOpenMatchRequests": 2,
            "hasDissolvedMatchesWith": [{"uuid": "Dissolved"}],
            "subjects": [{"name": "Deutsch", "grade": {"min": 1, "max": 8}}]
        })
    );
}

#[test]
fn test_helpee_document_shape() {
    let helpee = Helpee {
        person: fixed_person(2, "HelpeeA"),
        grade: 4,
        matching_priority: 10.0,
        subjects: vec![
            MandatorySubject { name: "Deutsch".to_string(), mandatory: None },
            MandatorySubject { name: "Mathematik".to_string(), mandatory: Some(true) },
        ],
    };

    let document = serde_json::to_value(encode_helpee(&helpee)).unwrap();

    assert_eq!(
        document,
        json!({
            "id": 2,
            "uuid": "HelpeeA",
            "createdAt": "2021-03-01T10:00:00.000Z",
            "state": "nw",
            "grade": 4,
            "matchingPriority": 10.0,
            "numberOfOpenMatchRequests": 2,
            "hasDissolvedMatchesWith": [{"uuid": "Dissolved"}],
            "subjects": [{"name": "Deutsch"}, {"name": "Mathematik", "mandatory": true}]
        })
    );
}

#[test]
fn test_coefficients_document_shape() {
    let document = serde_json::to_value(encode_balancing_coefficients(
        &BalancingCoefficients::default(),
    ))
    .unwrap();

    assert_eq!(
        document,
        json!({
            "BundeslandBonus": 0.05,
            "FachUebereinstimmung": 0.65,
            "MatchingPriorityBonus": 0.1,
            "WartezeitBonus": 0.2
        })
    );
}

#[test]
fn test_empty_request_documents() {
    let input = encode_request(&[], &[], &MatchingSettings::default());
    assert_eq!(serde_json::to_string(&input.helpers).unwrap(), "[]");
    assert_eq!(serde_json::to_string(&input.helpees).unwrap(), "[]");
}

#[test]
fn test_matches_document_null_defaults_to_empty() {
    let output: Option<MatchesOutput> = serde_json::from_str("null").unwrap();
    let matches = decode_matches(output);

    assert!(matches.is_empty());
}

#[test]
fn test_matches_document_decoding() {
    let raw = r#"[
        {"student uuid:": "HelperA", "pupil uuid:": "HelpeeA"},
        {"student uuid:": "HelperA", "pupil uuid:": "HelpeeB"}
    ]"#;
    let output: Option<MatchesOutput> = serde_json::from_str(raw).unwrap();

    assert_eq!(
        decode_matches(output),
        vec![Match::new("HelperA", "HelpeeA"), Match::new("HelperA", "HelpeeB")]
    );
}

#[test]
fn test_stats_document_null_defaults_to_zero() {
    let output: Option<StatsOutput> = serde_json::from_str("null").unwrap();
    let stats = decode_stats(output);

    assert_eq!(stats, Stats::default());
    assert_eq!(stats.edge_count, 0);
    assert!(stats.subject_stats.is_none());
}

#[test]
fn test_stats_totals_are_not_recomputed() {
    // edge count disagrees with the subject list on purpose
    let raw = r#"{
        "Number of pupils": 1,
        "Number of students": 1,
        "Total number of edges in the graph": 99,
        "Total number of found matches": 0,
        "Matching Cost": 0.5,
        "Average waiting days of a matched pupil": null,
        "Most waiting days of an unmatched pupil": 3.0,
        "Total number of covered subjects": 0,
        "Total number of uncovered subjects": 1,
        "Total number of offered subjects": 1,
        "Total number of matching edges with matching bundesland": 0,
        "subjects": []
    }"#;
    let output: Option<StatsOutput> = serde_json::from_str(raw).unwrap();
    let stats = decode_stats(output);

    assert_eq!(stats.edge_count, 99);
    assert_eq!(stats.matching_cost, 0.5);
    // present but empty stays an empty list
    assert_eq!(stats.subject_stats, Some(vec![]));
}

#[test]
fn test_store_round_trip_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(Some(dir.path().to_path_buf()), "unit-");

    let artifact = store.create_with(&json!({"WartezeitBonus": 0.2})).unwrap();
    let path = artifact.path().to_path_buf();
    assert!(path.file_name().unwrap().to_string_lossy().starts_with("unit-"));

    let value: Option<serde_json::Value> = store.read(&artifact).unwrap();
    assert_eq!(value, Some(json!({"WartezeitBonus": 0.2})));

    store.delete(vec![artifact]).unwrap();
    assert!(!path.exists());
}

#[test]
fn test_store_decode_error_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(Some(dir.path().to_path_buf()), "unit-");
    let artifact = store.create().unwrap();
    std::fs::write(artifact.path(), "[1, 2").unwrap();

    match store.read::<Vec<u32>>(&artifact) {
        Err(ArtifactError::Decode { path, .. }) => assert_eq!(path, artifact.path()),
        other => panic!("expected decode error, got {:?}", other),
    }
}
