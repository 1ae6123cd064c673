// src/systems/emission_governor.rs

//! # Emission Governor
//!
//! Turns raw reward proposals into credited currency. Two rules:
//!
//! - **Daily cap**: a long-term budget spread over `schedule_years`, shared by
//!   a floor estimate of users, with headroom on top. Nothing a day credits can
//!   exceed it.
//! - **Difficulty**: raw amounts are divided by a multiplier that a deadband
//!   controller nudges every smoothing window so the observed payout rate
//!   tracks the per-minute target.
//!
//! The governor never fails. Junk input credits zero.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::clock::{Clock, day_key};
use crate::config::{DifficultyConfig, EconomyConfig, OfflineConfig, ScheduleConfig};
use crate::mechanics::{control, econ, format};

/// Quantities derived once from the schedule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Schedule {
    pub budget_per_day: f64,
    pub budget_per_user_per_day: f64,
    pub currency_per_user_per_day: f64,
    pub target_per_minute: f64,
    pub daily_cap: u64,
}

impl Schedule {
    pub fn derive(s: &ScheduleConfig) -> Self {
        let budget_per_day = econ::per_day(s.total_budget, s.schedule_years);
        let budget_per_user_per_day = econ::per_user(budget_per_day, s.assumed_user_baseline);
        let currency_per_user_per_day = budget_per_user_per_day * s.display_scale_factor;
        Self {
            budget_per_day,
            budget_per_user_per_day,
            currency_per_user_per_day,
            target_per_minute: econ::per_minute(currency_per_user_per_day),
            daily_cap: econ::cap_with_headroom(currency_per_user_per_day, s.headroom),
        }
    }
}

/// Mutable per-session state.
#[derive(Clone, Debug, PartialEq)]
pub struct GovernorState {
    pub current_day: NaiveDate,
    pub coins_awarded_today: u64,
    pub daily_cap: u64,
    pub window_coins: u64,
    pub window_start: DateTime<Utc>,
    pub difficulty: f64,
    pub cap_reached: bool,
}

/// What the UI shows about today's emission.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GovernorStatus {
    pub day: NaiveDate,
    pub awarded_today: u64,
    pub daily_cap: u64,
    pub remaining_today: u64,
    pub difficulty: f64,
    pub cap_reached: bool,
    pub target_per_minute: f64,
}

impl fmt::Display for GovernorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} today (x{:.2} difficulty)",
            format::grouped(self.awarded_today),
            format::grouped(self.daily_cap),
            self.difficulty,
        )?;
        if self.cap_reached {
            write!(f, ", daily cap reached")?;
        }
        Ok(())
    }
}

pub struct Governor<C: Clock> {
    schedule: Schedule,
    policy: DifficultyConfig,
    offline: OfflineConfig,
    day_offset_minutes: i32,
    state: GovernorState,
    clock: C,
}

impl<C: Clock> Governor<C> {
    pub fn new(cfg: &EconomyConfig, clock: C) -> Self {
        let now = clock.now();
        let schedule = Schedule::derive(&cfg.schedule);
        let policy = cfg.difficulty.sanitized();
        let state = GovernorState {
            current_day: day_key(now, cfg.day_offset_minutes),
            coins_awarded_today: 0,
            daily_cap: schedule.daily_cap,
            window_coins: 0,
            window_start: now,
            difficulty: policy.initial,
            cap_reached: false,
        };
        Self {
            schedule,
            policy,
            offline: cfg.offline,
            day_offset_minutes: cfg.day_offset_minutes,
            state,
            clock,
        }
    }

    /// Restores the persisted counters onto a fresh governor. The day key is
    /// kept as stored, so a stale day rolls over on the next award.
    pub fn restore(cfg: &EconomyConfig, clock: C, day: NaiveDate, awarded: u64, difficulty: f64) -> Self {
        let mut g = Self::new(cfg, clock);
        g.state.current_day = day;
        g.state.coins_awarded_today = awarded.min(g.state.daily_cap);
        g.state.cap_reached = false;
        if difficulty.is_finite() {
            g.state.difficulty = difficulty.clamp(g.policy.min, g.policy.max);
        }
        if awarded != g.state.coins_awarded_today || difficulty != g.state.difficulty {
            warn!(awarded, difficulty, "restored governor values clamped");
        }
        g
    }

    pub fn state(&self) -> &GovernorState {
        &self.state
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn daily_cap(&self) -> u64 {
        self.state.daily_cap
    }

    pub fn difficulty(&self) -> f64 {
        self.state.difficulty
    }

    /// True once today's cap is exhausted. A proposal that floors to zero
    /// under the current difficulty does not set it.
    pub fn cap_reached(&self) -> bool {
        self.state.cap_reached
    }

    pub fn remaining_today(&self) -> u64 {
        self.state.daily_cap.saturating_sub(self.state.coins_awarded_today)
    }

    pub fn status(&self) -> GovernorStatus {
        GovernorStatus {
            day: self.state.current_day,
            awarded_today: self.state.coins_awarded_today,
            daily_cap: self.state.daily_cap,
            remaining_today: self.remaining_today(),
            difficulty: self.state.difficulty,
            cap_reached: self.state.cap_reached,
            target_per_minute: self.schedule.target_per_minute,
        }
    }

    /// Credits as much of `raw` as difficulty and today's cap allow.
    pub fn award(&mut self, raw: f64) -> u64 {
        let now = self.clock.now();
        self.award_at(raw, now)
    }

    /// Bonus/gift entry point; same policy as [`award`](Self::award).
    pub fn gift(&mut self, raw: f64) -> u64 {
        self.award(raw)
    }

    pub fn award_at(&mut self, raw: f64, now: DateTime<Utc>) -> u64 {
        self.roll_day(now);

        let raw = if raw.is_finite() { raw.max(0.0) } else { 0.0 };
        // raw is finite and difficulty positive, so this is never NaN; the
        // saturating cast maps an overflow to u64::MAX before the cap clamp.
        let scaled = (raw / self.state.difficulty).floor() as u64;
        let remaining = self.remaining_today();
        let credited = scaled.min(remaining);

        if credited == 0 {
            if remaining == 0 && !self.state.cap_reached {
                info!(day = %self.state.current_day, cap = self.state.daily_cap, "daily cap reached");
            }
            // Only the cap marks the day as done; a tiny proposal flooring to 0 does not.
            self.state.cap_reached |= remaining == 0;
            return 0;
        }

        self.state.coins_awarded_today += credited;
        self.state.window_coins += credited;
        credited
    }

    /// Feedback step; cheap to call every frame, acts once per window.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.tick_at(now);
    }

    pub fn tick_at(&mut self, now: DateTime<Utc>) {
        self.roll_day(now);

        let elapsed = now - self.state.window_start;
        if elapsed.num_milliseconds() < 0 {
            // Clock moved backwards; restart the window rather than divide by a negative.
            self.state.window_start = now;
            self.state.window_coins = 0;
            return;
        }
        if elapsed.num_seconds() < i64::from(self.policy.window_secs) {
            return;
        }

        let minutes = elapsed.num_milliseconds() as f64 / 60_000.0;
        let observed = self.state.window_coins as f64 / minutes;
        let target = self.schedule.target_per_minute;
        let nudge = control::classify(observed, target, self.policy.deadband);
        let before = self.state.difficulty;
        self.state.difficulty = control::step_multiplicative(
            before,
            nudge,
            self.policy.grow,
            self.policy.shrink,
            self.policy.min,
            self.policy.max,
        );
        debug!(observed, target, ?nudge, before, after = self.state.difficulty, "difficulty window closed");

        self.state.window_coins = 0;
        self.state.window_start = now;
    }

    /// Flat raw estimate for an absence: whole minutes away (capped) times the
    /// target rate times the offline efficiency. Fallback when lanes are unknown.
    pub fn offline_coins(&self, away: Duration) -> f64 {
        let cap_minutes = (self.offline.cap_hours * 60.0).max(0.0);
        let minutes = ((away.as_millis() / 60_000) as f64).min(cap_minutes);
        minutes * self.schedule.target_per_minute * self.offline.efficiency
    }

    fn roll_day(&mut self, now: DateTime<Utc>) {
        let today = day_key(now, self.day_offset_minutes);
        if today == self.state.current_day {
            return;
        }
        info!(
            from = %self.state.current_day,
            to = %today,
            awarded = self.state.coins_awarded_today,
            "day rollover"
        );
        self.state.current_day = today;
        self.state.coins_awarded_today = 0;
        self.state.daily_cap = self.schedule.daily_cap;
        self.state.cap_reached = false;
    }
}
