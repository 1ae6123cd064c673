// src/systems/sdk.rs

//! # Systems SDK
//!
//! Shared event types + hook protocol for the reward **systems** (emission
//! governor, production lanes, offline accumulation). A *system* owns its own
//! state and exposes pure-ish operations; the session in `genres::idle` wires
//! them together.
//!
//! ## The reward pipeline
//! ```text
//! lane.advance(dt) -> BreakEvent { raw } -> hooks scale raw -> governor.award(raw) -> credited
//! ```
//! Offline replay runs the same pipeline minus the governor: it sums the
//! hook-scaled raw rewards and hands the total to the caller, who awards it.
//!
//! ## Hooks (optional sub-mechanics)
//! Implement [`Hook`] for pluggable effects:
//!
//! - `reward_multiplier(&BreakEvent) -> f64`
//!   Multiply a break's raw reward *before* the governor sees it (boosts,
//!   events, pets). Default 1.0. Negative or non-finite results count as 0.
//!
//! - `on_break(&BreakEvent)`
//!   Observe breaks (quest counters, achievement taps, UI particles).
//!
//! - `on_credit(raw, credited)`
//!   Observe what the governor actually paid for a raw proposal.
//!
//! Hooks let you extend behavior without editing the system modules.
//!
//! ## Determinism
//! - Systems never read randomness. Replays with the same inputs produce the
//!   same events in the same order (lane 0 first, then lane 1, ...).
//! - Keep hooks deterministic too if you rely on replay equality.
//!
//! ## Anti-patterns to avoid
//! - Don't credit currency from a hook. Raw amounts must always pass through
//!   the governor, or the daily cap stops meaning anything.
//! - Don't rebuild depletion math in hooks. Hooks *modulate*, they don't
//!   re-simulate.

/// One node broken on one lane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreakEvent {
    pub lane: usize,
    /// Index of the node that broke (0 = first node on the lane).
    pub node_index: u32,
    pub capacity: f64,
    /// Raw reward before hooks and governor.
    pub raw: f64,
}

/// Raw production over some interval.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Accrual {
    pub raw: f64,
    pub breaks: u32,
}

impl Accrual {
    pub fn add(&mut self, raw: f64) {
        self.raw += raw;
        self.breaks += 1;
    }

    pub fn merge(&mut self, other: Accrual) {
        self.raw += other.raw;
        self.breaks += other.breaks;
    }
}

/// A sub-mechanic that can scale raw rewards and observe the pipeline.
pub trait Hook {
    /// (Optional) multiply a break's raw reward (default: 1.0).
    fn reward_multiplier(&mut self, _event: &BreakEvent) -> f64 {
        1.0
    }
    /// (Optional) observe a break after its raw reward is final.
    fn on_break(&mut self, _event: &BreakEvent) {}
    /// (Optional) observe a governor credit.
    fn on_credit(&mut self, _raw: f64, _credited: u64) {}
}

/// Runs every hook over a break and returns the final raw reward.
pub fn apply_hooks(hooks: &mut [Box<dyn Hook>], event: &BreakEvent) -> BreakEvent {
    let mut out = *event;
    for h in hooks.iter_mut() {
        let m = h.reward_multiplier(&out);
        out.raw *= if m.is_finite() { m.max(0.0) } else { 0.0 };
    }
    out.raw = out.raw.floor();
    for h in hooks.iter_mut() {
        h.on_break(&out);
    }
    out
}

/// Notifies every hook of a governor credit.
pub fn notify_credit(hooks: &mut [Box<dyn Hook>], raw: f64, credited: u64) {
    for h in hooks.iter_mut() {
        h.on_credit(raw, credited);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double;
    impl Hook for Double {
        fn reward_multiplier(&mut self, _event: &BreakEvent) -> f64 {
            2.0
        }
    }

    struct Junk;
    impl Hook for Junk {
        fn reward_multiplier(&mut self, _event: &BreakEvent) -> f64 {
            f64::NAN
        }
    }

    fn event(raw: f64) -> BreakEvent {
        BreakEvent { lane: 0, node_index: 0, capacity: 20.0, raw }
    }

    #[test]
    fn multipliers_compose() {
        let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(Double), Box::new(Double)];
        assert_eq!(apply_hooks(&mut hooks, &event(10.0)).raw, 40.0);
    }

    #[test]
    fn junk_multiplier_zeroes_reward() {
        let mut hooks: Vec<Box<dyn Hook>> = vec![Box::new(Double), Box::new(Junk)];
        assert_eq!(apply_hooks(&mut hooks, &event(10.0)).raw, 0.0);
    }

    #[test]
    fn no_hooks_is_identity() {
        assert_eq!(apply_hooks(&mut [], &event(7.0)).raw, 7.0);
    }
}
