use tracing::debug;

use crate::config::{EconomyConfig, OfflineConfig};
use crate::systems::production_lanes::{NodeRules, ProductionLane};
use crate::systems::sdk::{Accrual, Hook, apply_hooks};

/// Replays production over an absence, one node break at a time.
#[derive(Clone, Copy, Debug)]
pub struct OfflineSimulator {
    rules: NodeRules,
    offline: OfflineConfig,
}

impl OfflineSimulator {
    pub fn new(cfg: &EconomyConfig) -> Self {
        Self { rules: NodeRules::from(&cfg.mining), offline: cfg.offline }
    }

    pub fn rules(&self) -> &NodeRules {
        &self.rules
    }

    /// Longest absence that still earns, in seconds.
    pub fn cap_secs(&self) -> f64 {
        self.offline.cap_secs()
    }

    /// Clamps junk and over-long absences into `[0, cap]`.
    pub fn clamp_seconds(&self, seconds: f64) -> f64 {
        if seconds.is_finite() {
            seconds.clamp(0.0, self.cap_secs())
        } else if seconds > 0.0 {
            self.cap_secs()
        } else {
            0.0
        }
    }

    /// Raw reward the lanes would have produced over `seconds` away, capped
    /// at the offline limit. Lanes end up exactly where live play would have
    /// left them.
    pub fn simulate_elapsed(&self, seconds: f64, lanes: &mut [ProductionLane]) -> Accrual {
        self.simulate_elapsed_with_hooks(seconds, lanes, &mut [])
    }

    pub fn simulate_elapsed_with_hooks(
        &self,
        seconds: f64,
        lanes: &mut [ProductionLane],
        hooks: &mut [Box<dyn Hook>],
    ) -> Accrual {
        self.replay(self.clamp_seconds(seconds), lanes, hooks)
    }

    /// Uncapped replay; the caller owns the clamp.
    pub fn replay(
        &self,
        seconds: f64,
        lanes: &mut [ProductionLane],
        hooks: &mut [Box<dyn Hook>],
    ) -> Accrual {
        let mut total = Accrual::default();
        if !(seconds.is_finite() && seconds > 0.0) {
            return total;
        }
        for lane in lanes.iter_mut() {
            if lane.production_rate() <= 0.0 {
                continue;
            }
            let acc = lane.advance(seconds, &self.rules, |e| apply_hooks(hooks, &e).raw);
            debug!(lane = lane.lane_index(), breaks = acc.breaks, raw = acc.raw, "offline lane replayed");
            total.merge(acc);
        }
        total
    }
}
