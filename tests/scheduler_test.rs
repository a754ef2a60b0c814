use chrono::{TimeZone, Utc};
use flashdeck::scheduler::{update, update_at, Quality, MAX_INTERVAL_DAYS, MIN_EASE};

fn q(v: i64) -> Quality {
    Quality::new(v).unwrap()
}

#[test]
fn first_review_good() {
    let result = update(q(4), 2.5, 0, 0);
    assert_eq!(result.reps, 1);
    assert_eq!(result.interval, 1);
    // quality 4 has a zero ease delta
    assert_eq!(result.ease, 2.5);
    assert!(result.next_due > Utc::now());
}

#[test]
fn second_review_good() {
    let result = update(q(4), 2.6, 1, 1);
    assert_eq!(result.reps, 2);
    assert_eq!(result.interval, 6);
    assert_eq!(result.ease, 2.6);
}

#[test]
fn third_review_multiplies_by_prior_ease() {
    let result = update(q(4), 2.5, 6, 2);
    assert_eq!(result.reps, 3);
    assert_eq!(result.interval, 15);
}

#[test]
fn interval_rounds_half_up() {
    // 5 * 2.5 = 12.5 exactly
    let result = update(q(5), 2.5, 5, 3);
    assert_eq!(result.interval, 13);
}

#[test]
fn failed_review_resets_streak_and_keeps_ease() {
    let result = update(q(2), 2.5, 6, 2);
    assert_eq!(result.reps, 0);
    assert_eq!(result.interval, 1);
    assert_eq!(result.ease, 2.5);
}

#[test]
fn ease_floor_holds_on_fail() {
    let result = update(q(0), 1.3, 1, 0);
    assert_eq!(result.ease, 1.3);
}

#[test]
fn ease_floor_holds_on_hard_pass() {
    let result = update(q(3), 1.35, 6, 2);
    assert_eq!(result.ease, MIN_EASE);
}

#[test]
fn quality_three_lowers_ease() {
    let result = update(q(3), 2.5, 1, 1);
    assert!((result.ease - 2.36).abs() < 1e-12);
}

#[test]
fn quality_five_raises_ease() {
    let result = update(q(5), 2.5, 1, 1);
    assert!((result.ease - 2.6).abs() < 1e-12);
}

#[test]
fn every_quality_satisfies_invariants() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    for quality in Quality::all() {
        let result = update_at(quality, 2.5, 1, 1, now);
        assert!(result.ease >= MIN_EASE, "ease below floor for q={quality}");
        assert!(result.interval >= 1, "interval < 1 for q={quality}");
        assert!(result.next_due > now, "next_due not in future for q={quality}");
        if quality.is_pass() {
            assert_eq!(result.reps, 2);
        } else {
            assert_eq!(result.reps, 0);
        }
    }
}

#[test]
fn repeated_perfect_reviews_grow_interval_monotonically() {
    let mut now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
    let mut ease = 2.5;
    let mut interval = 0;
    let mut reps = 0;
    let mut last_interval = 0;

    // Long enough that uncapped intervals would leave chrono's date range
    for _ in 0..40 {
        let result = update_at(q(5), ease, interval, reps, now);
        if result.reps >= 2 {
            assert!(
                result.interval >= last_interval,
                "interval shrank: {} -> {}",
                last_interval,
                result.interval
            );
        }
        assert!(result.next_due > now);

        last_interval = result.interval;
        ease = result.ease;
        interval = result.interval;
        reps = result.reps;
        now = result.next_due;
    }

    assert_eq!(reps, 40);
    assert_eq!(interval, MAX_INTERVAL_DAYS);
}

#[test]
fn repeated_failures_stay_at_floor() {
    let mut ease = 2.5;
    let mut interval = 10;
    let mut reps = 5;

    for _ in 0..10 {
        let result = update(q(3), ease, interval, reps);
        let failed = update(q(1), result.ease, result.interval, result.reps);
        ease = failed.ease;
        interval = failed.interval;
        reps = failed.reps;
    }

    assert_eq!(ease, MIN_EASE);
    assert_eq!(interval, 1);
    assert_eq!(reps, 0);
}

#[test]
fn next_due_is_whole_days_from_evaluation_time() {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();
    let result = update_at(q(4), 2.5, 1, 1, now);
    assert_eq!(result.next_due, Utc.with_ymd_and_hms(2025, 6, 7, 8, 30, 0).unwrap());
}
