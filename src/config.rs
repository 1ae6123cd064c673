//! # Economy Configuration
//!
//! Every balance constant lives here, loaded once at startup from TOML and
//! passed to the systems that need it. Missing sections fall back to
//! [`Default`], which is the five-year schedule used in the tests.
//!
//! ```toml
//! day_offset_minutes = 0
//!
//! [schedule]
//! total_budget = 100_000_000_000.0
//! schedule_years = 5.0
//! assumed_user_baseline = 10_000.0
//! display_scale_factor = 1000.0
//! headroom = 1.25
//!
//! [offline]
//! efficiency = 0.30
//! cap_hours = 6.0
//!
//! [difficulty]
//! initial = 1.0
//! min = 0.4
//! max = 4.0
//! grow = 1.06
//! shrink = 0.94
//! deadband = 0.10
//! window_secs = 30
//!
//! [mining]
//! lanes = 3
//! initial_capacity = 20.0
//! growth = 1.15
//! reward_factor = 0.5
//! gold_multiplier = 1.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Long-term token budget and how it is shared out.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Budget units allocated to this reward mechanism over its lifetime.
    pub total_budget: f64,
    /// Years over which `total_budget` is distributed.
    pub schedule_years: f64,
    /// Floor estimate of concurrent users; a static design assumption.
    pub assumed_user_baseline: f64,
    /// Budget units to in-game currency.
    pub display_scale_factor: f64,
    /// Daily cap over the daily target (1.25 = 25% headroom).
    pub headroom: f64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            total_budget: 100_000_000_000.0,
            schedule_years: 5.0,
            assumed_user_baseline: 10_000.0,
            display_scale_factor: 1000.0,
            headroom: 1.25,
        }
    }
}

/// Payout while the player is away.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OfflineConfig {
    /// Fraction of the active target rate paid by the flat estimate, in (0, 1].
    pub efficiency: f64,
    /// Absence beyond this many hours earns nothing.
    pub cap_hours: f64,
}

impl Default for OfflineConfig {
    fn default() -> Self {
        Self { efficiency: 0.30, cap_hours: 6.0 }
    }
}

impl OfflineConfig {
    pub fn cap_secs(&self) -> f64 {
        (self.cap_hours * 3600.0).max(0.0)
    }
}

/// Feedback policy for the difficulty multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub initial: f64,
    pub min: f64,
    pub max: f64,
    /// Factor applied when the observed rate overshoots the band.
    pub grow: f64,
    /// Factor applied when the observed rate undershoots the band.
    pub shrink: f64,
    /// Relative half-width of the no-change band around the target.
    pub deadband: f64,
    /// Length of one smoothing window.
    pub window_secs: u32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            initial: 1.0,
            min: 0.4,
            max: 4.0,
            grow: 1.06,
            shrink: 0.94,
            deadband: 0.10,
            window_secs: 30,
        }
    }
}

impl DifficultyConfig {
    /// Same policy with every field safe to step and clamp with; unusable
    /// values fall back to the defaults.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let mut out = self;
        if !(out.min.is_finite() && out.max.is_finite() && out.min > 0.0 && out.min <= out.max) {
            out.min = d.min;
            out.max = d.max;
        }
        if !out.initial.is_finite() {
            out.initial = d.initial;
        }
        if !(out.grow.is_finite() && out.grow > 1.0) {
            out.grow = d.grow;
        }
        if !(out.shrink > 0.0 && out.shrink < 1.0) {
            out.shrink = d.shrink;
        }
        if !(out.deadband >= 0.0 && out.deadband < 1.0) {
            out.deadband = d.deadband;
        }
        if out.window_secs == 0 {
            out.window_secs = d.window_secs;
        }
        out.initial = out.initial.clamp(out.min, out.max);
        out
    }
}

/// Node rules shared by live play and offline replay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    pub lanes: usize,
    pub initial_capacity: f64,
    /// Capacity ratio between consecutive nodes on a lane (> 1).
    pub growth: f64,
    pub reward_factor: f64,
    pub gold_multiplier: f64,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            lanes: 3,
            initial_capacity: 20.0,
            growth: 1.15,
            reward_factor: 0.5,
            gold_multiplier: 1.0,
        }
    }
}

/// The whole economy configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub schedule: ScheduleConfig,
    pub offline: OfflineConfig,
    pub difficulty: DifficultyConfig,
    pub mining: MiningConfig,
    /// Day boundary as minutes east of UTC.
    pub day_offset_minutes: i32,
}

impl EconomyConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] for values that break an invariant.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let cfg: Self = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// As [`from_toml_str`](Self::from_toml_str), plus [`ConfigError::Io`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks every field the systems rely on.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        let s = &self.schedule;
        positive("schedule.total_budget", s.total_budget)?;
        positive("schedule.schedule_years", s.schedule_years)?;
        positive("schedule.assumed_user_baseline", s.assumed_user_baseline)?;
        positive("schedule.display_scale_factor", s.display_scale_factor)?;
        check(
            "schedule.headroom",
            s.headroom.is_finite() && s.headroom >= 1.0,
            "must be at least 1.0",
        )?;

        let o = &self.offline;
        check(
            "offline.efficiency",
            o.efficiency > 0.0 && o.efficiency <= 1.0,
            "must be in (0, 1]",
        )?;
        check(
            "offline.cap_hours",
            o.cap_hours.is_finite() && o.cap_hours >= 0.0,
            "must be a non-negative number of hours",
        )?;

        let d = &self.difficulty;
        positive("difficulty.min", d.min)?;
        positive("difficulty.max", d.max)?;
        check("difficulty.max", d.min <= d.max, "must not be below difficulty.min")?;
        check(
            "difficulty.initial",
            d.initial >= d.min && d.initial <= d.max,
            "must lie within [min, max]",
        )?;
        check("difficulty.grow", d.grow.is_finite() && d.grow > 1.0, "must be above 1.0")?;
        check("difficulty.shrink", d.shrink > 0.0 && d.shrink < 1.0, "must be in (0, 1)")?;
        check(
            "difficulty.deadband",
            d.deadband >= 0.0 && d.deadband < 1.0,
            "must be in [0, 1)",
        )?;
        check("difficulty.window_secs", d.window_secs > 0, "must be positive")?;

        let m = &self.mining;
        check("mining.lanes", m.lanes > 0, "need at least one lane")?;
        check(
            "mining.initial_capacity",
            m.initial_capacity.is_finite() && m.initial_capacity >= 1.0,
            "must be at least 1.0",
        )?;
        check("mining.growth", m.growth.is_finite() && m.growth > 1.0, "must be above 1.0")?;
        check(
            "mining.reward_factor",
            m.reward_factor.is_finite() && m.reward_factor >= 0.0,
            "must be non-negative",
        )?;
        check(
            "mining.gold_multiplier",
            m.gold_multiplier.is_finite() && m.gold_multiplier >= 0.0,
            "must be non-negative",
        )?;
        Ok(())
    }
}

fn positive(field: &'static str, v: f64) -> ConfigResult<()> {
    check(field, v.is_finite() && v > 0.0, "must be a positive number")
}

fn check(field: &'static str, ok: bool, reason: &str) -> ConfigResult<()> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid { field, reason: reason.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        EconomyConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = EconomyConfig::from_toml_str(
            r#"
            [offline]
            cap_hours = 8.0
            "#,
        )
        .unwrap();
        assert_eq!(cfg.offline.cap_hours, 8.0);
        assert_eq!(cfg.offline.efficiency, 0.30);
        assert_eq!(cfg.schedule, ScheduleConfig::default());
    }

    #[test]
    fn rejects_inverted_bounds() {
        let err = EconomyConfig::from_toml_str(
            r#"
            [difficulty]
            min = 5.0
            max = 4.0
            initial = 4.5
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "difficulty.max", .. }));
    }

    #[test]
    fn sanitized_bounds_never_invert() {
        let cfg = DifficultyConfig { min: 3.0, max: 1.0, initial: f64::NAN, ..DifficultyConfig::default() };
        let s = cfg.sanitized();
        assert_eq!((s.min, s.max, s.initial), (0.4, 4.0, 1.0));
        let cfg = DifficultyConfig { initial: 9.0, ..DifficultyConfig::default() };
        assert_eq!(cfg.sanitized().initial, 4.0);
    }

    #[test]
    fn sanitized_steps_stay_usable() {
        let cfg = DifficultyConfig {
            grow: f64::NAN,
            shrink: 1.5,
            deadband: f64::INFINITY,
            window_secs: 0,
            ..DifficultyConfig::default()
        };
        assert_eq!(cfg.sanitized(), DifficultyConfig::default());
    }

    #[test]
    fn rejects_flat_node_growth() {
        let err = EconomyConfig::from_toml_str("[mining]\ngrowth = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "mining.growth", .. }));
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(matches!(
            EconomyConfig::from_toml_str("[schedule\n"),
            Err(ConfigError::Parse(_))
        ));
    }
}
