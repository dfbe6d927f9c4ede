// Unit tests for Speedy Match

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use speedy_match::core::{
    age::{age_on, birth_date_range, is_within_range},
    calculate_rank, check_visibility, Attribute, get_rank_map, get_scalar_preferences, is_visible,
    load_profile, valid_values_by_name, Category, Diet, Exclusion, Gender, MatchError,
    MatchPreference, MatchProfile, Rank, RankMap, RelationshipStatus, SmokingStatus,
};
use speedy_match::models::{MatchingRules, StoredRankMap, UserRecord};
use uuid::Uuid;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn stored(pairs: &[(&str, serde_json::Value)]) -> StoredRankMap {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn create_test_profile(gender: Gender, wants: &[Gender], date_of_birth: NaiveDate) -> MatchProfile {
    MatchProfile {
        id: Uuid::new_v4(),
        gender,
        diet: Diet::Vegetarian,
        smoking_status: SmokingStatus::No,
        relationship_status: RelationshipStatus::Single,
        date_of_birth,
        height_cm: Some(168),
        is_active: true,
        has_visible_photo: true,
        last_visit: Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap(),
        preference: MatchPreference {
            gender_to_match: wants.iter().copied().collect(),
            ..MatchPreference::default()
        },
    }
}

fn create_test_record() -> UserRecord {
    let mut record = UserRecord::new(
        Uuid::new_v4(),
        Gender::Female,
        NaiveDate::from_ymd_opt(1994, 2, 2).unwrap(),
        Utc.with_ymd_and_hms(2026, 10, 1, 0, 0, 0).unwrap(),
    );
    record.diet = Diet::Vegan.code();
    record.smoking_status = 1;
    record.relationship_status = 1;
    record.height_cm = Some(165);
    record
}

#[test]
fn test_category_names_resolve() {
    assert_eq!(valid_values_by_name("diet").unwrap(), vec![1, 2, 3]);
    assert_eq!(valid_values_by_name("relationship_status").unwrap().len(), 8);
    assert!(matches!(
        valid_values_by_name("zodiac"),
        Err(MatchError::Configuration(_))
    ));
}

#[test]
fn test_incomplete_rank_map_fails_before_ranking() {
    let user_id = Uuid::new_v4();
    let map = stored(&[("1", json!(5)), ("2", json!(4))]);

    let err = RankMap::<Diet>::from_stored(user_id, &map).unwrap_err();
    match err {
        MatchError::IncompleteRankMap { category, missing, .. } => {
            assert_eq!(category, Category::Diet);
            assert_eq!(missing, "3");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rank_out_of_range_rejected() {
    let map = stored(&[("1", json!(5)), ("2", json!(6)), ("3", json!(0))]);
    assert!(matches!(
        RankMap::<SmokingStatus>::from_stored(Uuid::nil(), &map),
        Err(MatchError::InvalidRankValue { .. })
    ));

    let map = stored(&[("1", json!(5)), ("2", json!("high")), ("3", json!(0))]);
    assert!(matches!(
        RankMap::<SmokingStatus>::from_stored(Uuid::nil(), &map),
        Err(MatchError::InvalidRankValue { .. })
    ));
}

#[test]
fn test_unknown_key_rejected() {
    let map = stored(&[("0", json!(5)), ("1", json!(5)), ("2", json!(5)), ("3", json!(5))]);
    assert!(matches!(
        RankMap::<Diet>::from_stored(Uuid::nil(), &map),
        Err(MatchError::UnknownRankKey { .. })
    ));
}

#[test]
fn test_alias_keys_rejected() {
    let map = stored(&[("1", json!(0)), ("01", json!(5)), ("2", json!(5)), ("3", json!(5))]);
    assert!(matches!(
        RankMap::<Diet>::from_stored(Uuid::nil(), &map),
        Err(MatchError::UnknownRankKey { .. })
    ));

    let map = stored(&[("1", json!(5)), (" 2", json!(5)), ("+3", json!(0))]);
    assert!(matches!(
        RankMap::<SmokingStatus>::from_stored(Uuid::nil(), &map),
        Err(MatchError::UnknownRankKey { .. })
    ));
}

#[test]
fn test_rank_map_needs_a_five() {
    let map = stored(&[("1", json!(4)), ("2", json!(4)), ("3", json!(0))]);
    assert!(matches!(
        RankMap::<Diet>::from_stored(Uuid::nil(), &map),
        Err(MatchError::MissingPerfectRank { category: Category::Diet, .. })
    ));
}

#[test]
fn test_get_rank_map_by_category() {
    let mut record = create_test_record();
    record.preference.smoking_status_match = stored(&[("1", json!(5)), ("2", json!(0)), ("3", json!(2))]);

    let ranks = get_rank_map(&record, Category::SmokingStatus).unwrap();
    assert_eq!(ranks.get(&2), Some(&Rank::ZERO));
    assert_eq!(ranks.get(&3), Some(&Rank::TWO));
    assert_eq!(ranks.len(), 3);
}

#[test]
fn test_scalar_preferences_validation() {
    let rules = MatchingRules::default();
    let mut record = create_test_record();

    let prefs = get_scalar_preferences(&record, &rules).unwrap();
    assert_eq!(prefs.genders.len(), 3);
    assert_eq!((prefs.min_age, prefs.max_age), (0, 180));
    assert_eq!((prefs.min_height_cm, prefs.max_height_cm), (1, 450));

    record.preference.gender_to_match = vec![];
    assert!(matches!(
        get_scalar_preferences(&record, &rules),
        Err(MatchError::InvalidPreferences { .. })
    ));

    record.preference.gender_to_match = vec![1, 1];
    assert!(get_scalar_preferences(&record, &rules).is_err());

    record.preference.gender_to_match = vec![4];
    assert!(get_scalar_preferences(&record, &rules).is_err());

    record.preference.gender_to_match = vec![2];
    record.preference.min_age_to_match = 40;
    record.preference.max_age_to_match = 30;
    assert!(get_scalar_preferences(&record, &rules).is_err());

    record.preference.min_age_to_match = 18;
    record.preference.max_age_to_match = 181;
    assert!(get_scalar_preferences(&record, &rules).is_err());
}

#[test]
fn test_load_profile_rejects_invalid_attribute() {
    let mut record = create_test_record();
    record.diet = 9;

    assert!(matches!(
        load_profile(&record, &MatchingRules::default()),
        Err(MatchError::InvalidAttribute { .. })
    ));
}

#[test]
fn test_load_profile_decodes_record() {
    let record = create_test_record();
    let profile = load_profile(&record, &MatchingRules::default()).unwrap();

    assert_eq!(profile.id, record.id);
    assert_eq!(profile.gender, Gender::Female);
    assert_eq!(profile.diet, Diet::Vegan);
    assert_eq!(profile.smoking_status, SmokingStatus::No);
    assert_eq!(profile.relationship_status, RelationshipStatus::Single);
    assert_eq!(profile.preference.diet_match.rank_of(Diet::Carnist), Rank::FIVE);
}

#[test]
fn test_age_on_birthday_boundary() {
    let dob = NaiveDate::from_ymd_opt(1996, 10, 17).unwrap();
    assert_eq!(age_on(dob, today()), 30);
    assert_eq!(age_on(dob, today().pred_opt().unwrap()), 29);
}

#[test]
fn test_birth_date_range_contains_exact_ages() {
    let range = birth_date_range(20, 30, today());

    // Youngest accepted: turned 20 today
    assert!(is_within_range(NaiveDate::from_ymd_opt(2006, 10, 17).unwrap(), &range));
    // Oldest accepted: turns 31 tomorrow
    assert!(is_within_range(NaiveDate::from_ymd_opt(1995, 10, 18).unwrap(), &range));
    assert!(!is_within_range(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(), &range));
}

#[test]
fn test_rank_symmetry() {
    let mut a = create_test_profile(Gender::Male, &[Gender::Female], NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
    a.preference.relationship_status_match = RankMap::from_ranks(
        Uuid::nil(),
        RelationshipStatus::VALID_VALUES
            .iter()
            .map(|s| (*s, if *s == RelationshipStatus::Single { Rank::FIVE } else { Rank::ONE })),
    )
    .unwrap();
    let mut b = create_test_profile(Gender::Female, &[Gender::Male], NaiveDate::from_ymd_opt(1991, 1, 1).unwrap());
    b.relationship_status = RelationshipStatus::Divorced;

    assert_eq!(calculate_rank(&a, &b), Rank::ONE);
    assert_eq!(calculate_rank(&a, &b), calculate_rank(&b, &a));
}

#[test]
fn test_veto_regardless_of_other_categories() {
    let mut viewer = create_test_profile(Gender::Male, &[Gender::Female], NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
    viewer.preference.diet_match = RankMap::from_ranks(
        Uuid::nil(),
        [(Diet::Vegan, Rank::FIVE), (Diet::Vegetarian, Rank::FOUR), (Diet::Carnist, Rank::ZERO)],
    )
    .unwrap();
    let mut candidate = create_test_profile(Gender::Female, &[Gender::Male], NaiveDate::from_ymd_opt(1992, 1, 1).unwrap());
    candidate.diet = Diet::Carnist;

    assert_eq!(calculate_rank(&viewer, &candidate), Rank::ZERO);
}

#[test]
fn test_visibility_excludes_self() {
    let a = create_test_profile(Gender::Other, &Gender::ALL, NaiveDate::from_ymd_opt(1980, 4, 4).unwrap());
    assert!(!is_visible(&a, &a, false, &MatchingRules::default(), today()));
}

#[test]
fn test_candidate_outside_age_range_excluded() {
    let mut viewer = create_test_profile(Gender::Male, &[Gender::Female], NaiveDate::from_ymd_opt(1998, 1, 1).unwrap());
    viewer.preference.min_age_to_match = 20;
    viewer.preference.max_age_to_match = 30;
    let candidate = create_test_profile(Gender::Female, &[Gender::Male], NaiveDate::from_ymd_opt(1991, 5, 1).unwrap());

    assert_eq!(candidate.age_on(today()), 35);
    assert_eq!(
        check_visibility(&viewer, &candidate, false, &MatchingRules::default(), today()),
        Err(Exclusion::AgeMismatch)
    );
}
