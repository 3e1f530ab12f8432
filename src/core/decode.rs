use crate::models::formats::{MatchOutput, MatchesOutput, StatsOutput, SubjectStatsOutput};
use crate::models::{Match, PersonId, Stats, SubjectCounts, SubjectStats};

/// Lift the engine's match document into domain matches
///
/// A missing or `null` document means the engine found no matches; the
/// result is an empty list, not an error.
pub fn decode_matches(output: Option<MatchesOutput>) -> Vec<Match> {
    output
        .unwrap_or_default()
        .into_iter()
        .map(decode_match)
        .collect()
}

pub fn decode_match(output: MatchOutput) -> Match {
    Match {
        helper: PersonId::new(output.student_uuid),
        helpee: PersonId::new(output.pupil_uuid),
    }
}

/// Rename the engine's stats document into domain stats
///
/// A missing or `null` document yields the zero-valued aggregate. A present
/// document without a `subjects` array keeps `subject_stats` as `None`
/// instead of an empty list.
pub fn decode_stats(output: Option<StatsOutput>) -> Stats {
    let Some(output) = output else {
        return Stats::default();
    };

    Stats {
        helper_count: output.number_of_students,
        helpee_count: output.number_of_pupils,
        edge_count: output.total_edges,
        match_count: output.total_matches,
        matching_cost: output.matching_cost,
        average_waiting_days_matched_helpee: output.average_waiting_days_matched,
        most_waiting_days_unmatched_helpee: output.most_waiting_days_unmatched,
        number_of_covered_subjects: output.covered_subjects,
        number_of_uncovered_subjects: output.uncovered_subjects,
        number_of_offered_subjects: output.offered_subjects,
        number_of_matching_edges_with_matching_state: output
            .matching_edges_with_matching_bundesland,
        subject_stats: output
            .subjects
            .map(|subjects| subjects.into_iter().map(decode_subject_stats).collect()),
    }
}

fn decode_subject_stats(output: SubjectStatsOutput) -> SubjectStats {
    SubjectStats {
        name: output.name,
        stats: SubjectCounts {
            offered: output.stats.offered,
            requested: output.stats.requested,
            fulfilled_requests: output.stats.requests_fulfilled,
        },
    }
}
