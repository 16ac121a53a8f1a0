use std::collections::BTreeSet;

use stampbook_engine::{
    CourseDefinition, Evaluator, PlayerStatistics, ProgressionEngine, Requirement, StarRating,
    UnlockKind, is_unlocked, next_goals, next_locked, progress_for, rate, rate_against_par,
    unlocked_ids, validate,
};

fn engine() -> ProgressionEngine {
    ProgressionEngine::bundled().expect("bundled data loads")
}

#[test]
fn five_hundred_bananas_earn_both_banana_stamps_in_order() {
    let engine = engine();
    let stats = PlayerStatistics {
        total_bananas_collected: 500,
        ..PlayerStatistics::default()
    };
    let earned: Vec<&str> = engine
        .newly_earned_stamps(&stats, &BTreeSet::new())
        .into_iter()
        .map(|stamp| stamp.id.as_str())
        .collect();
    assert_eq!(earned, ["banana_lover", "banana_hoarder"]);

    let previously = BTreeSet::from(["banana_lover".to_string()]);
    let earned: Vec<&str> = engine
        .newly_earned_stamps(&stats, &previously)
        .into_iter()
        .map(|stamp| stamp.id.as_str())
        .collect();
    assert_eq!(earned, ["banana_hoarder"]);
}

#[test]
fn third_course_waits_for_three_stars_on_the_first() {
    let engine = engine();
    let evaluator = engine.evaluator();
    let course_3 = engine.unlockables().get("course_3").expect("course_3 ships");

    let mut stats = PlayerStatistics::default();
    stats.completed_courses.insert("course_1".to_string());
    stats.course_stars.insert("course_1".to_string(), 2);

    assert!(!is_unlocked(evaluator, course_3, &stats));
    let progress = progress_for(evaluator, course_3, &stats);
    assert!((progress.current - 2.0).abs() < f64::EPSILON);
    assert!((progress.target - 3.0).abs() < f64::EPSILON);
    assert!(!progress.is_complete);

    let next = next_locked(evaluator, engine.unlockables(), UnlockKind::Course, &stats)
        .expect("a course is still locked");
    assert_eq!(next.id, "course_3");

    stats.course_stars.insert("course_1".to_string(), 3);
    assert!(is_unlocked(evaluator, course_3, &stats));
    let unlocked = unlocked_ids(evaluator, engine.unlockables(), &stats);
    assert!(unlocked.contains("course_2"));
    assert!(unlocked.contains("course_3"));
    assert!(!unlocked.contains("course_4"));
}

#[test]
fn fresh_player_has_exactly_the_starters() {
    let engine = engine();
    let update = engine.evaluate(
        &PlayerStatistics::default(),
        &BTreeSet::new(),
        &BTreeSet::new(),
    );
    assert!(update.new_stamps.is_empty());
    assert_eq!(update.new_unlocks, ["course_1", "classic", "adventure"]);
}

#[test]
fn star_boundaries_at_par_120() {
    assert_eq!(rate_against_par(120.0, 120.0, 0.9, 2), StarRating::Three);
    assert_eq!(rate_against_par(120.0, 121.0, 1.0, 0), StarRating::Two);
    assert_eq!(rate_against_par(120.0, 200.0, 0.5, 5), StarRating::One);

    let course = CourseDefinition {
        par_time_seconds: 120.0,
        ..CourseDefinition::default()
    };
    assert_eq!(rate(&course, 119.0, 0.95, 0), StarRating::Three);
}

#[test]
fn zero_targets_are_complete_at_full_percent() {
    let evaluator = Evaluator::default();
    let stats = PlayerStatistics::default();
    for requirement in [
        Requirement::TotalCoins { count: 0 },
        Requirement::StampsEarned { count: 0 },
        Requirement::LongestAirTime { seconds: 0.0 },
    ] {
        let progress = evaluator.evaluate(&requirement, &stats);
        assert!(progress.is_complete);
        assert!((progress.percent_complete - 100.0).abs() < f64::EPSILON);
    }
}

#[test]
fn validator_reports_errors_and_warnings() {
    let empty: CourseDefinition = serde_json::from_str(
        r#"{ "id": "empty", "name": "Empty", "parTimeSeconds": 60, "areas": [] }"#,
    )
    .unwrap();
    let report = validate(&empty);
    assert!(!report.is_valid());
    assert!(
        report
            .error_messages()
            .iter()
            .any(|message| message.contains("at least one area"))
    );

    let unfinished: CourseDefinition = serde_json::from_str(
        r#"{
            "id": "open_ended",
            "name": "Open Ended",
            "parTimeSeconds": 60,
            "areas": [
                {
                    "id": "a1",
                    "bounds": { "x": 0, "y": 0, "width": 100, "height": 100 },
                    "checkpoint": { "x": 5, "y": 5, "isStart": true }
                },
                {
                    "id": "a2",
                    "bounds": { "x": 100, "y": 0, "width": 100, "height": 100 },
                    "checkpoint": { "x": 150, "y": 5 }
                }
            ]
        }"#,
    )
    .unwrap();
    let report = validate(&unfinished);
    assert!(report.is_valid());
    assert!(!report.warnings.is_empty());
}

#[test]
fn goals_hide_secret_stamps_until_earned() {
    let engine = engine();
    let stats = PlayerStatistics {
        total_bananas_collected: 90,
        ..PlayerStatistics::default()
    };
    let goals = next_goals(
        engine.stamps(),
        engine.evaluator(),
        &stats,
        &BTreeSet::new(),
        5,
    );
    assert_eq!(goals.len(), 5);
    assert_eq!(goals[0].stamp.id, "banana_lover");
    assert!(goals.iter().all(|goal| !goal.stamp.hidden));
}
