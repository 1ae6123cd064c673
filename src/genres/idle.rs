// src/genres/idle.rs
#![cfg(feature = "genre-idle")]

//! Idle genre session.
//!
//! Coordinates the reward systems for one player session:
//! - production_lanes      → node depletion on N parallel lanes
//! - emission_governor     → daily cap + difficulty feedback
//! - offline_accumulation  → node replay over an absence
//!
//! The session has no drawing or input code. The render loop calls
//! [`IdleSession::frame`] with its frame delta, then reads lanes and status
//! back for display. On resume the app sets lane rates from the player's
//! equipment and calls [`IdleSession::resume`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::config::EconomyConfig;
use crate::error::SnapshotResult;
use crate::snapshot::{GovernorSnapshot, LaneSnapshot, SNAPSHOT_VERSION, Snapshot};
use crate::systems::emission_governor::{Governor, GovernorStatus};
use crate::systems::offline_accumulation::OfflineSimulator;
use crate::systems::production_lanes::ProductionLane;
use crate::systems::sdk::{Hook, apply_hooks, notify_credit};

/// Which model priced an absence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OfflineModel {
    /// Exact replay of node breaks on the saved lanes.
    NodeReplay,
    /// Flat per-minute estimate, used when lane progress was not saved.
    FlatEstimate,
}

/// What a resume paid out, for the "welcome back" screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OfflineReport {
    pub away: Duration,
    /// Part of `away` that counted (at most the offline cap).
    pub credited_away: Duration,
    pub raw: f64,
    pub credited: u64,
    pub breaks: u32,
    pub model: OfflineModel,
}

/// What one live frame produced.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub breaks: u32,
    pub raw: f64,
    pub credited: u64,
}

pub struct IdleSession<C: Clock> {
    governor: Governor<C>,
    simulator: OfflineSimulator,
    lanes: Vec<ProductionLane>,
    lanes_known: bool,
    last_seen: Option<DateTime<Utc>>,
    hooks: Vec<Box<dyn Hook>>,
}

impl<C: Clock> IdleSession<C> {
    /// A brand-new player: fresh lanes, fresh day.
    pub fn new(cfg: &EconomyConfig, clock: C) -> Self {
        let governor = Governor::new(cfg, clock);
        let simulator = OfflineSimulator::new(cfg);
        let lanes = ProductionLane::fresh(cfg.mining.lanes, simulator.rules());
        let last_seen = Some(governor.clock().now());
        Self { governor, simulator, lanes, lanes_known: true, last_seen, hooks: Vec::new() }
    }

    /// Rebuilds a session from a decoded snapshot. Out-of-range values are
    /// clamped; lanes missing from the snapshot start at their first node.
    pub fn restore(cfg: &EconomyConfig, clock: C, snap: &Snapshot) -> Self {
        let g = &snap.governor;
        let governor = Governor::restore(cfg, clock, g.current_day, g.coins_awarded_today, g.difficulty);
        let simulator = OfflineSimulator::new(cfg);
        let rules = *simulator.rules();

        let (lanes, lanes_known) = match &snap.lanes {
            Some(saved) => {
                let lanes = (0..cfg.mining.lanes)
                    .map(|i| match saved.iter().find(|l| l.lane_index == i) {
                        Some(l) => ProductionLane::from_parts(
                            i,
                            l.node_index,
                            l.node_capacity,
                            l.node_remaining,
                            &rules,
                        ),
                        None => ProductionLane::new(i, &rules),
                    })
                    .collect();
                (lanes, true)
            }
            None => (ProductionLane::fresh(cfg.mining.lanes, &rules), false),
        };

        Self { governor, simulator, lanes, lanes_known, last_seen: snap.last_seen, hooks: Vec::new() }
    }

    /// Decodes and restores.
    ///
    /// # Errors
    ///
    /// Any [`SnapshotError`](crate::error::SnapshotError) from decoding.
    pub fn restore_from_json(cfg: &EconomyConfig, clock: C, text: &str) -> SnapshotResult<Self> {
        let snap = Snapshot::from_json(text)?;
        Ok(Self::restore(cfg, clock, &snap))
    }

    /// Restores when a usable blob exists, otherwise starts fresh.
    pub fn restore_or_fresh(cfg: &EconomyConfig, clock: C, blob: Option<&str>) -> Self {
        let Some(text) = blob else {
            return Self::new(cfg, clock);
        };
        match Snapshot::from_json(text) {
            Ok(snap) => Self::restore(cfg, clock, &snap),
            Err(e) => {
                warn!(error = %e, "discarding unreadable snapshot, starting fresh");
                Self::new(cfg, clock)
            }
        }
    }

    pub fn with_hook(mut self, hook: Box<dyn Hook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn add_hook(&mut self, hook: Box<dyn Hook>) {
        self.hooks.push(hook);
    }

    pub fn governor(&self) -> &Governor<C> {
        &self.governor
    }

    pub fn lanes(&self) -> &[ProductionLane] {
        &self.lanes
    }

    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    pub fn status(&self) -> GovernorStatus {
        self.governor.status()
    }

    /// Sets a lane's production rate from external game state (equipment).
    pub fn set_lane_rate(&mut self, lane: usize, rate: f64) {
        match self.lanes.get_mut(lane) {
            Some(l) => l.set_production_rate(rate),
            None => debug!(lane, "rate for unknown lane ignored"),
        }
    }

    /// One live frame: advance every lane by `dt` seconds, award each break
    /// as it happens, then run the governor's feedback tick.
    pub fn frame(&mut self, dt: f64) -> FrameReport {
        let now = self.governor.clock().now();
        let Self { governor, simulator, lanes, hooks, .. } = self;
        let rules = simulator.rules();

        let mut report = FrameReport::default();
        for lane in lanes.iter_mut() {
            let acc = lane.advance(dt, rules, |e| {
                let e = apply_hooks(hooks, &e);
                let credited = governor.award_at(e.raw, now);
                notify_credit(hooks, e.raw, credited);
                report.credited += credited;
                e.raw
            });
            report.breaks += acc.breaks;
            report.raw += acc.raw;
        }

        governor.tick_at(now);
        self.last_seen = Some(now);
        report
    }

    /// Bonus payout through the governor.
    pub fn gift(&mut self, raw: f64) -> u64 {
        let credited = self.governor.gift(raw);
        notify_credit(&mut self.hooks, raw, credited);
        credited
    }

    /// Records "the player is here now" without producing anything; call it
    /// when the app is backgrounded so the next resume measures from here.
    pub fn mark_seen(&mut self) {
        self.last_seen = Some(self.governor.clock().now());
    }

    /// Prices the time since `last_seen` and credits it through the governor.
    pub fn resume(&mut self) -> OfflineReport {
        let now = self.governor.clock().now();
        let away = self
            .last_seen
            .map(|t| (now - t).to_std().unwrap_or_default())
            .unwrap_or_default();
        let secs = self.simulator.clamp_seconds(away.as_secs_f64());

        let (raw, breaks, model) = if self.lanes_known {
            let acc = self.simulator.simulate_elapsed_with_hooks(secs, &mut self.lanes, &mut self.hooks);
            (acc.raw, acc.breaks, OfflineModel::NodeReplay)
        } else {
            // Fresh lanes stand in from here on.
            self.lanes_known = true;
            (self.governor.offline_coins(away), 0, OfflineModel::FlatEstimate)
        };

        let credited = self.governor.award_at(raw, now);
        notify_credit(&mut self.hooks, raw, credited);
        self.last_seen = Some(now);

        let report = OfflineReport {
            away,
            credited_away: Duration::from_secs_f64(secs),
            raw,
            credited,
            breaks,
            model,
        };
        info!(
            away_secs = away.as_secs(),
            raw,
            credited,
            breaks,
            model = ?model,
            "offline earnings credited"
        );
        report
    }

    /// Everything worth persisting. `last_seen` is carried as is, so saving a
    /// restored session before [`resume`](Self::resume) keeps the pending absence.
    pub fn snapshot(&self) -> Snapshot {
        let st = self.governor.state();
        Snapshot {
            version: SNAPSHOT_VERSION,
            governor: GovernorSnapshot {
                current_day: st.current_day,
                coins_awarded_today: st.coins_awarded_today,
                difficulty: st.difficulty,
            },
            lanes: Some(
                self.lanes
                    .iter()
                    .map(|l| LaneSnapshot {
                        lane_index: l.lane_index(),
                        node_index: l.node_index(),
                        node_capacity: l.node_capacity(),
                        node_remaining: l.node_remaining(),
                    })
                    .collect(),
            ),
            last_seen: self.last_seen,
        }
    }
}
