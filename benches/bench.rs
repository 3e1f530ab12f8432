// Criterion benchmarks for Helper Match

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use helper_match::core::{decode::decode_matches, encode::encode_request};
use helper_match::models::formats::MatchesOutput;
use helper_match::models::{
    GradeRestriction, Helpee, Helper, MandatorySubject, MatchingSettings, Person, PersonId,
    SubjectWithGradeRestriction,
};
use chrono::Utc;

const SUBJECTS: &[&str] = &["Deutsch", "Mathematik", "Englisch", "Physik", "Chemie", "Biologie"];

fn create_person(id: usize, prefix: &str) -> Person {
    Person {
        id: id as i64,
        uuid: format!("{}-{}", prefix, id),
        created_at: Utc::now(),
        state: if id % 2 == 0 { "nw" } else { "by" }.to_string(),
        match_request_count: 1 + (id % 3) as u32,
        excluded_matches: vec![PersonId::new(format!("dissolved-{}", id))],
    }
}

fn create_helper(id: usize) -> Helper {
    Helper {
        person: create_person(id, "helper"),
        subjects: (0..3)
            .map(|i| SubjectWithGradeRestriction {
                name: SUBJECTS[(id + i) % SUBJECTS.len()].to_string(),
                grade_restriction: GradeRestriction { min: 1, max: 13 },
            })
            .collect(),
    }
}

fn create_helpee(id: usize) -> Helpee {
    Helpee {
        person: create_person(id, "helpee"),
        grade: 1 + (id % 13) as i32,
        matching_priority: (id % 10) as f64,
        subjects: (0..2)
            .map(|i| MandatorySubject {
                name: SUBJECTS[(id + i) % SUBJECTS.len()].to_string(),
                mandatory: if i == 0 { Some(id % 4 == 0) } else { None },
            })
            .collect(),
    }
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_request");
    let settings = MatchingSettings::default();

    for size in [100, 1000, 10000].iter() {
        let helpers: Vec<Helper> = (0..*size).map(create_helper).collect();
        let helpees: Vec<Helpee> = (0..*size).map(create_helpee).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let input = encode_request(black_box(&helpers), black_box(&helpees), &settings);
                serde_json::to_vec(&input.helpees).unwrap()
            });
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_matches");

    for size in [100, 1000, 10000].iter() {
        let raw = serde_json::to_vec(
            &(0..*size)
                .map(|i| {
                    serde_json::json!({
                        "student uuid:": format!("helper-{}", i),
                        "pupil uuid:": format!("helpee-{}", i)
                    })
                })
                .collect::<Vec<_>>(),
        )
        .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let output: Option<MatchesOutput> = serde_json::from_slice(black_box(&raw)).unwrap();
                decode_matches(output)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
