//! Wire formats of the documents exchanged with the matching engine.
//!
//! Field names here are fixed by the engine and intentionally differ from the
//! domain model.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Dissolved-match reference as the engine reads it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DissolvedMatchInput {
    pub uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpeeSubjectInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelpeeInput {
    pub id: i64,
    pub uuid: String,
    #[serde(rename = "createdAt", with = "engine_timestamp")]
    pub created_at: DateTime<Utc>,
    pub state: String,
    pub grade: i32,
    #[serde(rename = "matchingPriority")]
    pub matching_priority: f64,
    #[serde(rename = "numberOfOpenMatchRequests")]
    pub number_of_open_match_requests: u32,
    #[serde(rename = "hasDissolvedMatchesWith")]
    pub has_dissolved_matches_with: Vec<DissolvedMatchInput>,
    pub subjects: Vec<HelpeeSubjectInput>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRangeInput {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelperSubjectInput {
    pub name: String,
    pub grade: GradeRangeInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelperInput {
    pub id: i64,
    pub uuid: String,
    #[serde(rename = "createdAt", with = "engine_timestamp")]
    pub created_at: DateTime<Utc>,
    pub state: String,
    #[serde(rename = "numberOfOpenMatchRequests")]
    pub number_of_open_match_requests: u32,
    #[serde(rename = "hasDissolvedMatchesWith")]
    pub has_dissolved_matches_with: Vec<DissolvedMatchInput>,
    pub subjects: Vec<HelperSubjectInput>,
}

pub type HelpeesInput = Vec<HelpeeInput>;
pub type HelpersInput = Vec<HelperInput>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalancingCoefficientsInput {
    #[serde(rename = "BundeslandBonus")]
    pub bundesland_bonus: f64,
    #[serde(rename = "FachUebereinstimmung")]
    pub fach_uebereinstimmung: f64,
    #[serde(rename = "MatchingPriorityBonus")]
    pub matching_priority_bonus: f64,
    #[serde(rename = "WartezeitBonus")]
    pub wartezeit_bonus: f64,
}

/// The three request documents of one engine run
#[derive(Debug, Clone, PartialEq)]
pub struct EngineInput {
    pub helpers: HelpersInput,
    pub helpees: HelpeesInput,
    pub balancing_coefficients: BalancingCoefficientsInput,
}

/// One pairing as reported by the engine (the trailing colons are part of the keys)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOutput {
    #[serde(rename = "pupil uuid:")]
    pub pupil_uuid: String,
    #[serde(rename = "student uuid:")]
    pub student_uuid: String,
}

pub type MatchesOutput = Vec<MatchOutput>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCountsOutput {
    pub offered: u64,
    pub requested: u64,
    #[serde(rename = "requests fulfilled")]
    pub requests_fulfilled: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectStatsOutput {
    pub name: String,
    pub stats: SubjectCountsOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsOutput {
    #[serde(rename = "Number of pupils")]
    pub number_of_pupils: u64,
    #[serde(rename = "Number of students")]
    pub number_of_students: u64,
    #[serde(rename = "Total number of edges in the graph")]
    pub total_edges: u64,
    #[serde(rename = "Total number of found matches")]
    pub total_matches: u64,
    #[serde(rename = "Matching Cost")]
    pub matching_cost: f64,
    #[serde(rename = "Average waiting days of a matched pupil", default)]
    pub average_waiting_days_matched: Option<f64>,
    #[serde(rename = "Most waiting days of an unmatched pupil", default)]
    pub most_waiting_days_unmatched: Option<f64>,
    #[serde(rename = "Total number of covered subjects")]
    pub covered_subjects: u64,
    #[serde(rename = "Total number of uncovered subjects")]
    pub uncovered_subjects: u64,
    #[serde(rename = "Total number of offered subjects")]
    pub offered_subjects: u64,
    #[serde(rename = "Total number of matching edges with matching bundesland")]
    pub matching_edges_with_matching_bundesland: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subjects: Option<Vec<SubjectStatsOutput>>,
}

/// `createdAt` as the engine expects it: RFC 3339, millisecond precision, `Z` suffix
pub mod engine_timestamp {
    use super::*;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
