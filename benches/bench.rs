// Criterion benchmarks for Speedy Match

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use speedy_match::core::{
    calculate_rank, check_visibility, Diet, Gender, MatchPreference, MatchProfile, Matcher, Rank,
    RankMap, RelationshipStatus, SmokingStatus,
};
use speedy_match::models::MatchingRules;
use std::collections::HashSet;
use uuid::Uuid;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn create_candidate(id: usize) -> MatchProfile {
    let diets = [Diet::Vegan, Diet::Vegetarian, Diet::Carnist];
    let smoking = [SmokingStatus::No, SmokingStatus::Yes, SmokingStatus::Sometimes];

    MatchProfile {
        id: Uuid::from_u128(id as u128 + 1),
        gender: if id % 2 == 0 { Gender::Female } else { Gender::Male },
        diet: diets[id % 3],
        smoking_status: smoking[(id / 3) % 3],
        relationship_status: RelationshipStatus::Single,
        date_of_birth: NaiveDate::from_ymd_opt(1985 + (id % 15) as i32, 1 + (id % 12) as u32, 1).unwrap(),
        height_cm: Some(150 + (id % 50) as i16),
        is_active: true,
        has_visible_photo: id % 7 != 0,
        last_visit: Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap() - Duration::minutes(id as i64),
        preference: MatchPreference::default(),
    }
}

fn create_viewer() -> MatchProfile {
    let mut viewer = create_candidate(0);
    viewer.id = Uuid::nil();
    viewer.gender = Gender::Male;
    viewer.preference.gender_to_match = [Gender::Female].into_iter().collect();
    viewer.preference.min_age_to_match = 25;
    viewer.preference.max_age_to_match = 40;
    viewer.preference.diet_match = RankMap::from_ranks(
        Uuid::nil(),
        [(Diet::Vegan, Rank::FIVE), (Diet::Vegetarian, Rank::FOUR), (Diet::Carnist, Rank::ONE)],
    )
    .unwrap();
    viewer
}

fn bench_calculate_rank(c: &mut Criterion) {
    let viewer = create_viewer();
    let candidate = create_candidate(4);

    c.bench_function("calculate_rank", |b| {
        b.iter(|| calculate_rank(black_box(&viewer), black_box(&candidate)));
    });
}

fn bench_visibility(c: &mut Criterion) {
    let viewer = create_viewer();
    let candidate = create_candidate(4);
    let rules = MatchingRules::default();

    c.bench_function("check_visibility", |b| {
        b.iter(|| {
            check_visibility(
                black_box(&viewer),
                black_box(&candidate),
                black_box(false),
                &rules,
                today(),
            )
        });
    });
}

fn bench_ranking(c: &mut Criterion) {
    let matcher = Matcher::with_default_rules();
    let viewer = create_viewer();
    let blocked: HashSet<Uuid> = (0..20).map(|i| Uuid::from_u128(i * 13 + 1)).collect();

    let mut group = c.benchmark_group("ranking");

    for candidate_count in [10, 100, 1000, 5000].iter() {
        let candidates: Vec<MatchProfile> = (0..*candidate_count).map(create_candidate).collect();

        group.bench_with_input(
            BenchmarkId::new("rank_candidates", candidate_count),
            candidate_count,
            |b, _| {
                b.iter(|| {
                    matcher.rank_candidates(
                        black_box(&viewer),
                        black_box(candidates.clone()),
                        black_box(&blocked),
                        today(),
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_calculate_rank, bench_visibility, bench_ranking);

criterion_main!(benches);
