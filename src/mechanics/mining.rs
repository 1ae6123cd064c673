/// Mining mechanics: node depletion and the raw reward of a break.

/// Floor on a partially depleted node so the next time-to-break stays positive.
pub const MIN_REMAINING: f64 = 1.0;

/// Capacity of the `index`-th node on a lane: initial * growth^index.
#[inline]
pub fn capacity_at(initial: f64, growth: f64, index: u32) -> f64 {
    initial * growth.powi(index.min(i32::MAX as u32) as i32)
}

/// Seconds until a node with `remaining` breaks at `rate`; infinite when idle.
#[inline]
pub fn time_to_break(remaining: f64, rate: f64) -> f64 {
    if rate > 0.0 {
        remaining.max(0.0) / rate
    } else {
        f64::INFINITY
    }
}

/// Raw reward of a broken node: floor(capacity * reward_factor * gold).
#[inline]
pub fn break_reward(capacity: f64, reward_factor: f64, gold_multiplier: f64) -> f64 {
    let r = (capacity * reward_factor * gold_multiplier).floor();
    if r.is_finite() { r.max(0.0) } else { 0.0 }
}

/// Remaining after `seconds` of partial depletion, never below the floor
/// (or below where it started, if it started under the floor).
#[inline]
pub fn deplete(remaining: f64, rate: f64, seconds: f64) -> f64 {
    (remaining - rate * seconds).max(MIN_REMAINING.min(remaining))
}
