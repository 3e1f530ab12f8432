// Model exports
pub mod domain;
pub mod formats;
pub mod requests;
pub mod responses;

pub use domain::{
    BalancingCoefficients, GradeRestriction, Helpee, Helper, MandatorySubject, Match,
    MatchingSettings, Person, PersonId, Stats, Subject, SubjectCounts, SubjectStats,
    SubjectWithGradeRestriction,
};
pub use formats::{EngineInput, MatchesOutput, StatsOutput};
pub use requests::RunMatchingRequest;
pub use responses::{ErrorResponse, HealthResponse, RunMatchingResponse};
