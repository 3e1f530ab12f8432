use crate::models::formats::{
    BalancingCoefficientsInput, DissolvedMatchInput, EngineInput, GradeRangeInput, HelpeeInput,
    HelpeeSubjectInput, HelpeesInput, HelperInput, HelperSubjectInput, HelpersInput,
};
use crate::models::{
    BalancingCoefficients, Helpee, Helper, MandatorySubject, MatchingSettings, PersonId,
    SubjectWithGradeRestriction,
};

/// Build the three engine request documents
///
/// Pure and total: empty populations produce empty documents. Ordering,
/// exclusion lists and subject flags are carried over verbatim.
pub fn encode_request(
    helpers: &[Helper],
    helpees: &[Helpee],
    settings: &MatchingSettings,
) -> EngineInput {
    EngineInput {
        helpers: encode_helpers(helpers),
        helpees: encode_helpees(helpees),
        balancing_coefficients: encode_balancing_coefficients(&settings.balancing_coefficients),
    }
}

pub fn encode_helpers(helpers: &[Helper]) -> HelpersInput {
    helpers.iter().map(encode_helper).collect()
}

pub fn encode_helpees(helpees: &[Helpee]) -> HelpeesInput {
    helpees.iter().map(encode_helpee).collect()
}

pub fn encode_helper(helper: &Helper) -> HelperInput {
    let person = &helper.person;
    HelperInput {
        id: person.id,
        uuid: person.uuid.clone(),
        created_at: person.created_at,
        state: person.state.clone(),
        number_of_open_match_requests: person.match_request_count,
        has_dissolved_matches_with: encode_dissolved_matches(&person.excluded_matches),
        subjects: helper.subjects.iter().map(encode_helper_subject).collect(),
    }
}

pub fn encode_helpee(helpee: &Helpee) -> HelpeeInput {
    let person = &helpee.person;
    HelpeeInput {
        id: person.id,
        uuid: person.uuid.clone(),
        created_at: person.created_at,
        state: person.state.clone(),
        grade: helpee.grade,
        matching_priority: helpee.matching_priority,
        number_of_open_match_requests: person.match_request_count,
        has_dissolved_matches_with: encode_dissolved_matches(&person.excluded_matches),
        subjects: helpee.subjects.iter().map(encode_helpee_subject).collect(),
    }
}

pub fn encode_balancing_coefficients(
    coefficients: &BalancingCoefficients,
) -> BalancingCoefficientsInput {
    BalancingCoefficientsInput {
        bundesland_bonus: coefficients.state,
        fach_uebereinstimmung: coefficients.subject_matching,
        matching_priority_bonus: coefficients.matching_priority,
        wartezeit_bonus: coefficients.waiting_time,
    }
}

fn encode_helper_subject(subject: &SubjectWithGradeRestriction) -> HelperSubjectInput {
    HelperSubjectInput {
        name: subject.name.clone(),
        grade: GradeRangeInput {
            min: subject.grade_restriction.min,
            max: subject.grade_restriction.max,
        },
    }
}

fn encode_helpee_subject(subject: &MandatorySubject) -> HelpeeSubjectInput {
    HelpeeSubjectInput {
        name: subject.name.clone(),
        mandatory: subject.mandatory,
    }
}

fn encode_dissolved_matches(excluded: &[PersonId]) -> Vec<DissolvedMatchInput> {
    excluded
        .iter()
        .map(|p| DissolvedMatchInput { uuid: p.uuid.clone() })
        .collect()
}
