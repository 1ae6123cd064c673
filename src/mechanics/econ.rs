/// Economy mechanics: spreading a fixed budget over a schedule.

pub const DAYS_PER_YEAR: f64 = 365.0;
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Budget released per day when `total` is spread evenly over `years`.
#[inline]
pub fn per_day(total: f64, years: f64) -> f64 {
    let days = DAYS_PER_YEAR * years;
    if days > 0.0 { total / days } else { 0.0 }
}

/// Conservative per-user share: divide by a floor estimate of concurrent users.
#[inline]
pub fn per_user(per_day: f64, user_baseline: f64) -> f64 {
    if user_baseline > 0.0 { per_day / user_baseline } else { 0.0 }
}

/// Per-minute rate of a daily amount.
#[inline]
pub fn per_minute(per_day: f64) -> f64 {
    per_day / MINUTES_PER_DAY
}

/// Integer daily ceiling: floor(daily * headroom), saturating at 0 for junk input.
#[inline]
pub fn cap_with_headroom(daily: f64, headroom: f64) -> u64 {
    let cap = (daily * headroom).floor();
    if cap.is_finite() && cap > 0.0 { cap as u64 } else { 0 }
}
