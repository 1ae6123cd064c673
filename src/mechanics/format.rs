//! Formatting helpers for currency amounts and away time shown next to rewards.

use std::time::Duration;

const SUFFIXES: [(f64, &str); 5] = [
    (1e15, "Q"),
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

/// Compact currency text: `999`, `1.25K`, `6.85M`. Junk input renders as `0`.
pub fn compact(amount: f64) -> String {
    if !amount.is_finite() || amount <= 0.0 {
        return "0".to_string();
    }
    for (scale, suffix) in SUFFIXES {
        if amount >= scale {
            let v = amount / scale;
            // Two decimals below 10, one below 100, none above.
            let text = if v < 10.0 {
                format!("{:.2}", truncate(v, 2))
            } else if v < 100.0 {
                format!("{:.1}", truncate(v, 1))
            } else {
                format!("{:.0}", v.floor())
            };
            return format!("{text}{suffix}");
        }
    }
    format!("{:.0}", amount.floor())
}

/// Integer currency with thousands separators: `6,849,315`.
pub fn grouped(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Away time as `2h 05m`, `12m`, or `45s`.
pub fn away(d: Duration) -> String {
    let secs = d.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m")
    } else if m > 0 {
        format!("{m}m")
    } else {
        format!("{s}s")
    }
}

// Truncate instead of rounding so `999_999` never shows as `1000.0K`.
fn truncate(v: f64, decimals: i32) -> f64 {
    let p = 10f64.powi(decimals);
    (v * p).floor() / p
}
