use tracing::trace;

use crate::config::MiningConfig;
use crate::mechanics::mining;
use crate::systems::sdk::{Accrual, BreakEvent};

/// Node rules shared by every lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeRules {
    pub initial_capacity: f64,
    pub growth: f64,
    pub reward_factor: f64,
    pub gold_multiplier: f64,
}

impl From<&MiningConfig> for NodeRules {
    // Nodes must start at >= 1 and strictly grow; unusable values fall back.
    fn from(m: &MiningConfig) -> Self {
        let d = MiningConfig::default();
        let initial_capacity = if m.initial_capacity.is_finite() && m.initial_capacity >= 1.0 {
            m.initial_capacity
        } else {
            d.initial_capacity
        };
        let growth = if m.growth.is_finite() && m.growth > 1.0 { m.growth } else { d.growth };
        Self {
            initial_capacity,
            growth,
            reward_factor: m.reward_factor,
            gold_multiplier: m.gold_multiplier,
        }
    }
}

impl NodeRules {
    pub fn capacity_at(&self, index: u32) -> f64 {
        mining::capacity_at(self.initial_capacity, self.growth, index)
    }

    pub fn reward(&self, capacity: f64) -> f64 {
        mining::break_reward(capacity, self.reward_factor, self.gold_multiplier)
    }
}

/// One production track: a rate and the node it is currently chewing through.
///
/// Invariant: `0 <= node_remaining <= node_capacity`, and
/// `node_capacity == rules.capacity_at(node_index)` for lanes built by this type.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductionLane {
    lane_index: usize,
    production_rate: f64,
    node_index: u32,
    node_capacity: f64,
    node_remaining: f64,
}

impl ProductionLane {
    /// A lane at its first node with no production.
    pub fn new(lane_index: usize, rules: &NodeRules) -> Self {
        let cap = rules.capacity_at(0);
        Self {
            lane_index,
            production_rate: 0.0,
            node_index: 0,
            node_capacity: cap,
            node_remaining: cap,
        }
    }

    /// `count` fresh lanes, indexed `0..count`.
    pub fn fresh(count: usize, rules: &NodeRules) -> Vec<Self> {
        (0..count).map(|i| Self::new(i, rules)).collect()
    }

    /// Rebuilds a lane from persisted node progress. Out-of-range values are
    /// pulled back inside the invariant; an unusable capacity restarts the lane.
    pub fn from_parts(
        lane_index: usize,
        node_index: u32,
        node_capacity: f64,
        node_remaining: f64,
        rules: &NodeRules,
    ) -> Self {
        if !(node_capacity.is_finite() && node_capacity > 0.0) {
            return Self::new(lane_index, rules);
        }
        let node_remaining = if node_remaining.is_finite() {
            node_remaining.clamp(0.0, node_capacity)
        } else {
            node_capacity
        };
        Self {
            lane_index,
            production_rate: 0.0,
            node_index,
            node_capacity,
            node_remaining,
        }
    }

    pub fn lane_index(&self) -> usize {
        self.lane_index
    }

    pub fn production_rate(&self) -> f64 {
        self.production_rate
    }

    /// Sets throughput per second. Negative or non-finite rates mean idle.
    pub fn set_production_rate(&mut self, rate: f64) {
        self.production_rate = if rate.is_finite() { rate.max(0.0) } else { 0.0 };
    }

    pub fn node_index(&self) -> u32 {
        self.node_index
    }

    pub fn node_capacity(&self) -> f64 {
        self.node_capacity
    }

    pub fn node_remaining(&self) -> f64 {
        self.node_remaining
    }

    /// Fraction of the current node already mined, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.node_capacity > 0.0 {
            (1.0 - self.node_remaining / self.node_capacity).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Runs the lane for `seconds` at its current rate.
    ///
    /// Every break is handed to `on_break`, which returns the raw reward to
    /// count for it (hooks may scale it). Live frames and offline replay both
    /// go through here, so a long interval replays exactly the breaks that
    /// short frames would have produced at the same constant rate.
    pub fn advance(
        &mut self,
        seconds: f64,
        rules: &NodeRules,
        mut on_break: impl FnMut(BreakEvent) -> f64,
    ) -> Accrual {
        let mut acc = Accrual::default();
        let rate = self.production_rate;
        if !(seconds.is_finite() && seconds > 0.0) || rate <= 0.0 {
            return acc;
        }

        let mut left = seconds;
        loop {
            let ttb = mining::time_to_break(self.node_remaining, rate);
            if ttb <= left {
                let event = BreakEvent {
                    lane: self.lane_index,
                    node_index: self.node_index,
                    capacity: self.node_capacity,
                    raw: rules.reward(self.node_capacity),
                };
                trace!(lane = event.lane, node = event.node_index, raw = event.raw, "node broken");
                acc.add(on_break(event));
                self.next_node(rules);
                left -= ttb;
            } else {
                self.node_remaining = mining::deplete(self.node_remaining, rate, left);
                break;
            }
        }
        acc
    }

    fn next_node(&mut self, rules: &NodeRules) {
        self.node_index = self.node_index.saturating_add(1);
        self.node_capacity = rules.capacity_at(self.node_index);
        self.node_remaining = self.node_capacity;
    }
}
