use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Reference to a helper or helpee by its globally unique uuid
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
pub struct PersonId {
    #[validate(length(min = 1))]
    pub uuid: String,
}

impl PersonId {
    pub fn new(uuid: impl Into<String>) -> Self {
        Self { uuid: uuid.into() }
    }
}

impl From<&str> for PersonId {
    fn from(uuid: &str) -> Self {
        Self::new(uuid)
    }
}

/// Attributes shared by helpers and helpees
///
/// Embedded into [`Helper`] and [`Helpee`]; serialized flat so the JSON shape
/// of a helper is `{id, uuid, createdAt, ..., subjects}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Person {
    /// Engine-local ordinal, distinct from `uuid`
    pub id: i64,
    #[validate(length(min = 1))]
    pub uuid: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Region code, e.g. a federal state abbreviation like "nw"
    pub state: String,
    #[serde(rename = "matchRequestCount")]
    pub match_request_count: u32,
    /// Prior partners a new match must never be formed with
    #[serde(rename = "excludeMatchesWith", default)]
    #[validate(nested)]
    pub excluded_matches: Vec<PersonId>,
}

impl Person {
    pub fn person_id(&self) -> PersonId {
        PersonId::new(self.uuid.clone())
    }

    /// Whether `other` is on this person's dissolved-match exclusion list
    pub fn excludes(&self, other: &str) -> bool {
        self.excluded_matches.iter().any(|p| p.uuid == other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
}

/// Inclusive grade range a helper is willing to teach
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeRestriction {
    pub min: i32,
    pub max: i32,
}

impl GradeRestriction {
    pub fn contains(&self, grade: i32) -> bool {
        grade >= self.min && grade <= self.max
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectWithGradeRestriction {
    pub name: String,
    #[serde(rename = "gradeRestriction")]
    pub grade_restriction: GradeRestriction,
}

/// Subject requested by a helpee
///
/// `mandatory: None` and `Some(false)` both mean "nice to have".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MandatorySubject {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory: Option<bool>,
}

impl MandatorySubject {
    pub fn is_mandatory(&self) -> bool {
        self.mandatory.unwrap_or(false)
    }
}

/// A person offering tutoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Helper {
    #[serde(flatten)]
    #[validate(nested)]
    pub person: Person,
    pub subjects: Vec<SubjectWithGradeRestriction>,
}

/// A person requesting tutoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Helpee {
    #[serde(flatten)]
    #[validate(nested)]
    pub person: Person,
    pub grade: i32,
    #[serde(rename = "matchingPriority")]
    pub matching_priority: f64,
    pub subjects: Vec<MandatorySubject>,
}

/// Weights used by the engine's cost function
///
/// No invariant enforces that they sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BalancingCoefficients {
    #[serde(rename = "subjectMatching")]
    pub subject_matching: f64,
    pub state: f64,
    #[serde(rename = "waitingTime")]
    pub waiting_time: f64,
    #[serde(rename = "matchingPriority")]
    pub matching_priority: f64,
}

impl Default for BalancingCoefficients {
    fn default() -> Self {
        Self {
            subject_matching: 0.65,
            state: 0.05,
            waiting_time: 0.2,
            matching_priority: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingSettings {
    #[serde(rename = "balancingCoefficients")]
    pub balancing_coefficients: BalancingCoefficients,
}

/// A proposed helper/helpee pairing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    pub helper: PersonId,
    pub helpee: PersonId,
}

impl Match {
    pub fn new(helper: impl Into<String>, helpee: impl Into<String>) -> Self {
        Self {
            helper: PersonId::new(helper),
            helpee: PersonId::new(helpee),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectCounts {
    pub offered: u64,
    pub requested: u64,
    #[serde(rename = "fulfilledRequests")]
    pub fulfilled_requests: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectStats {
    pub name: String,
    pub stats: SubjectCounts,
}

/// Aggregate counters describing one matching run, as reported by the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "helperCount")]
    pub helper_count: u64,
    #[serde(rename = "helpeeCount")]
    pub helpee_count: u64,
    #[serde(rename = "edgeCount")]
    pub edge_count: u64,
    #[serde(rename = "matchCount")]
    pub match_count: u64,
    #[serde(rename = "matchingCost")]
    pub matching_cost: f64,
    /// `None` when the engine averaged over zero matches
    #[serde(rename = "averageWaitingDaysMatchedHelpee")]
    pub average_waiting_days_matched_helpee: Option<f64>,
    #[serde(rename = "mostWaitingDaysUnmatchedHelpee")]
    pub most_waiting_days_unmatched_helpee: Option<f64>,
    #[serde(rename = "numberOfCoveredSubjects")]
    pub number_of_covered_subjects: u64,
    #[serde(rename = "numberOfUncoveredSubjects")]
    pub number_of_uncovered_subjects: u64,
    #[serde(rename = "numberOfOfferedSubjects")]
    pub number_of_offered_subjects: u64,
    #[serde(rename = "numberOfMatchingEdgesWithMatchingState")]
    pub number_of_matching_edges_with_matching_state: u64,
    /// Absent when the engine omitted its per-subject breakdown
    #[serde(rename = "subjectStats", skip_serializing_if = "Option::is_none")]
    pub subject_stats: Option<Vec<SubjectStats>>,
}
