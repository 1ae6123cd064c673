// tests/emission_governor.rs
#![cfg(feature = "system-emission_governor")]

use std::time::Duration;

use bevy_prng::WyRand;
use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use idle_emission::{EconomyConfig, Governor, ManualClock};
use rand_core::{RngCore, SeedableRng};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap()
}

fn governor_with(cfg: &EconomyConfig) -> (Governor<ManualClock>, ManualClock) {
    let clock = ManualClock::new(start());
    (Governor::new(cfg, clock.clone()), clock)
}

fn governor() -> (Governor<ManualClock>, ManualClock) {
    governor_with(&EconomyConfig::default())
}

/* ──────────────────────────────────────────────────────────────────────────
1) Daily cap
────────────────────────────────────────────────────────────────────────── */

#[test]
fn five_year_schedule_cap_follows_formula() {
    let (g, _) = governor();
    let per_user_per_day = (100_000_000_000.0_f64 / 1825.0 / 10_000.0) * 1000.0;
    assert_eq!(g.daily_cap(), (per_user_per_day * 1.25).floor() as u64);
    assert_eq!(g.daily_cap(), 6_849_315);
}

#[test]
fn one_huge_award_consumes_the_whole_cap() {
    let (mut g, _) = governor();
    let cap = g.daily_cap();
    assert_eq!(g.award(1e12), cap);
    assert!(!g.cap_reached());
    assert_eq!(g.award(1e12), 0);
    assert!(g.cap_reached());
    assert_eq!(g.state().coins_awarded_today, cap);
}

#[test]
fn unscaled_schedule_caps_at_6849() {
    let mut cfg = EconomyConfig::default();
    cfg.schedule.display_scale_factor = 1.0;
    let (mut g, _) = governor_with(&cfg);
    assert_eq!(g.daily_cap(), 6_849);
    assert_eq!(g.award(1_000_000.0), 6_849);
    assert_eq!(g.award(1_000_000.0), 0);
    assert!(g.cap_reached());
}

#[test]
fn adversarial_stream_never_exceeds_cap() {
    for seed in [1_u64, 7, 42, 0xDEAD_BEEF] {
        let mut rng = WyRand::from_seed(seed.to_le_bytes());
        let (mut g, clock) = governor();
        let mut paid = 0_u64;

        for _ in 0..2_000 {
            let u = rng.next_u64();
            let raw = match u % 7 {
                0 => f64::NAN,
                1 => -((u >> 8) as f64),
                2 => f64::MAX,
                3 => f64::INFINITY,
                4 => (u % 1_000) as f64,
                5 => (u % 50_000) as f64 + 0.75,
                _ => (u % 5_000_000) as f64,
            };
            paid += g.award(raw);
            assert!(g.state().coins_awarded_today <= g.daily_cap());

            clock.advance_secs((u % 10) as i64);
            g.tick();
            let d = g.difficulty();
            assert!((0.4..=4.0).contains(&d), "difficulty escaped bounds: {d}");
        }
        assert_eq!(paid, g.state().coins_awarded_today);
    }
}

#[test]
fn junk_inputs_credit_nothing() {
    let (mut g, _) = governor();
    for raw in [f64::NAN, -5.0, f64::NEG_INFINITY, f64::INFINITY, 0.0, 0.99] {
        assert_eq!(g.award(raw), 0, "raw {raw}");
    }
    assert_eq!(g.state().coins_awarded_today, 0);
    assert!(!g.cap_reached());
}

/* ──────────────────────────────────────────────────────────────────────────
2) Day rollover
────────────────────────────────────────────────────────────────────────── */

#[test]
fn rollover_resets_counter_and_keeps_cap() {
    let (mut g, clock) = governor();
    let cap = g.daily_cap();
    g.award(1e12);
    g.award(1.0);
    assert!(g.cap_reached());

    clock.advance(TimeDelta::days(1));
    assert_eq!(g.award(100.0), 100);
    assert_eq!(g.state().coins_awarded_today, 100);
    assert_eq!(g.daily_cap(), cap);
    assert!(!g.cap_reached());
    assert_eq!(g.state().current_day, NaiveDate::from_ymd_opt(2026, 5, 5).unwrap());
}

#[test]
fn day_boundary_follows_offset() {
    let mut cfg = EconomyConfig::default();
    cfg.day_offset_minutes = 10 * 60;
    let (mut g, clock) = governor_with(&cfg);
    g.award(500.0);
    // 09:00 UTC is 19:00 at +10h; five hours later it is tomorrow there.
    clock.advance_secs(5 * 3600);
    assert_eq!(g.award(1.0), 1);
    assert_eq!(g.state().coins_awarded_today, 1);
}

#[test]
fn restore_keeps_stale_day_until_next_award() {
    let clock = ManualClock::new(start());
    let yesterday = NaiveDate::from_ymd_opt(2026, 5, 3).unwrap();
    let mut g = Governor::restore(&EconomyConfig::default(), clock, yesterday, u64::MAX, f64::NAN);
    assert_eq!(g.state().coins_awarded_today, g.daily_cap());
    assert_eq!(g.difficulty(), 1.0);

    assert_eq!(g.award(10.0), 10);
    assert_eq!(g.state().current_day, NaiveDate::from_ymd_opt(2026, 5, 4).unwrap());
}

#[test]
fn restore_clamps_difficulty() {
    let clock = ManualClock::new(start());
    let today = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
    let g = Governor::restore(&EconomyConfig::default(), clock.clone(), today, 0, 99.0);
    assert_eq!(g.difficulty(), 4.0);
    let g = Governor::restore(&EconomyConfig::default(), clock, today, 0, 0.01);
    assert_eq!(g.difficulty(), 0.4);
}

/* ──────────────────────────────────────────────────────────────────────────
3) Difficulty feedback
────────────────────────────────────────────────────────────────────────── */

#[test]
fn sustained_overshoot_converges_to_max() {
    let (mut g, clock) = governor();
    let mut last = g.difficulty();
    for _ in 0..100 {
        // ~20k coins/min against a ~3.8k/min target.
        g.award(10_000.0 * g.difficulty());
        clock.advance_secs(30);
        g.tick();
        assert!(g.difficulty() >= last);
        assert!(g.difficulty() <= 4.0);
        last = g.difficulty();
    }
    assert_eq!(g.difficulty(), 4.0);
    assert!(!g.cap_reached());
}

#[test]
fn sustained_undershoot_converges_to_min() {
    let (mut g, clock) = governor();
    for _ in 0..100 {
        clock.advance_secs(30);
        g.tick();
        assert!(g.difficulty() >= 0.4);
    }
    assert_eq!(g.difficulty(), 0.4);
}

#[test]
fn on_target_rate_holds_difficulty() {
    let (mut g, clock) = governor();
    let per_window = g.schedule().target_per_minute / 2.0;
    for _ in 0..20 {
        g.award(per_window);
        clock.advance_secs(30);
        g.tick();
    }
    assert_eq!(g.difficulty(), 1.0);
}

#[test]
fn tick_is_cheap_between_windows() {
    let (mut g, clock) = governor();
    g.award(10_000.0);
    for _ in 0..29 {
        clock.advance_secs(1);
        g.tick();
    }
    assert_eq!(g.state().window_coins, 10_000);
    assert_eq!(g.difficulty(), 1.0);
}

/* ──────────────────────────────────────────────────────────────────────────
4) Flat offline estimate
────────────────────────────────────────────────────────────────────────── */

#[test]
fn flat_offline_estimate_counts_whole_minutes() {
    let (g, _) = governor();
    let target = g.schedule().target_per_minute;
    assert_eq!(g.offline_coins(Duration::ZERO), 0.0);
    assert_eq!(g.offline_coins(Duration::from_secs(59)), 0.0);
    assert_eq!(g.offline_coins(Duration::from_secs(90 * 60 + 59)), 90.0 * target * 0.30);
}

#[test]
fn flat_offline_estimate_is_capped() {
    let (g, _) = governor();
    let six_hours = g.offline_coins(Duration::from_secs(6 * 3600));
    assert_eq!(g.offline_coins(Duration::from_secs(30 * 3600)), six_hours);
}
