// demos/idle.rs
// Run with:
//   RUST_LOG=idle_emission=debug cargo run --example idle

use chrono::{TimeDelta, Utc};
use idle_emission::mechanics::format;
use idle_emission::{EconomyConfig, IdleSession, ManualClock};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = EconomyConfig::default();
    let clock = ManualClock::new(Utc::now());
    let mut session = IdleSession::new(&cfg, clock.clone());

    // Equipment says: two pickaxes, third lane empty.
    session.set_lane_rate(0, 45.0);
    session.set_lane_rate(1, 18.0);

    // Ten minutes of live play at 60 fps.
    let mut live = 0;
    for _ in 0..10 * 60 * 60 {
        clock.advance(TimeDelta::microseconds(16_667));
        live += session.frame(1.0 / 60.0).credited;
    }
    println!("== Live ==");
    println!("credited  -> {}", format::grouped(live));
    println!("status    -> {}", session.status());

    // Save, close the app, come back the next evening.
    let blob = match session.snapshot().to_json() {
        Ok(blob) => blob,
        Err(e) => {
            eprintln!("snapshot failed: {e}");
            return;
        }
    };
    clock.advance(TimeDelta::hours(30));

    let mut session = IdleSession::restore_or_fresh(&cfg, clock.clone(), Some(&blob));
    session.set_lane_rate(0, 45.0);
    session.set_lane_rate(1, 18.0);
    let report = session.resume();

    println!("== Welcome back ==");
    println!("away      -> {} (paid for {})", format::away(report.away), format::away(report.credited_away));
    println!("model     -> {:?}", report.model);
    println!("breaks    -> {}", report.breaks);
    println!("raw       -> {}", format::compact(report.raw));
    println!("credited  -> {}", format::grouped(report.credited));
    println!("status    -> {}", session.status());
    for lane in session.lanes() {
        println!(
            "lane {}    -> node #{} ({:.0}% mined, capacity {})",
            lane.lane_index(),
            lane.node_index(),
            lane.progress() * 100.0,
            format::compact(lane.node_capacity()),
        );
    }
}
