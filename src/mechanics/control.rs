/// Control mechanics: multiplicative steps with a deadband.

/// Which way a deadband controller moved its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Nudge {
    Up,
    Down,
    Hold,
}

/// Classify `observed` against `target` with a symmetric relative band.
/// Above `target * (1 + band)` is `Up`, below `target * (1 - band)` is `Down`.
#[inline]
pub fn classify(observed: f64, target: f64, band: f64) -> Nudge {
    let band = band.max(0.0);
    if !observed.is_finite() || !target.is_finite() {
        return Nudge::Hold;
    }
    if observed > target * (1.0 + band) {
        Nudge::Up
    } else if observed < target * (1.0 - band) {
        Nudge::Down
    } else {
        Nudge::Hold
    }
}

/// Multiplicative step: x' = clamp(x * up | x * down | x, lo, hi).
#[inline]
pub fn step_multiplicative(x: f64, nudge: Nudge, up: f64, down: f64, lo: f64, hi: f64) -> f64 {
    let next = match nudge {
        Nudge::Up => x * up,
        Nudge::Down => x * down,
        Nudge::Hold => x,
    };
    next.clamp(lo, hi)
}
