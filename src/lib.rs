/*!
`idle_emission` — the reward economy of an idle mining game.

What it does
- Converts player activity into a bounded, self-balancing currency stream
  under a fixed long-term token budget.
- **Emission governor**: divides raw reward proposals by a difficulty
  multiplier, floors them to whole coins and clamps them to a daily cap
  derived from the budget schedule. A deadband feedback tick nudges the
  multiplier so the payout rate tracks a per-minute target.
- **Offline accrual**: replays node depletion on every production lane over
  an absence (capped), producing exactly the breaks live play would have.
  The raw total then goes through the governor like any other reward.

How to use (call surface only)
- Load an [`EconomyConfig`] (TOML or `Default`) and pick a [`Clock`].
- Build an [`IdleSession`] (fresh, or restored from a [`Snapshot`]).
- Set lane rates from equipment: `session.set_lane_rate(lane, rate)`.
- Each frame: `session.frame(dt)`; on return from background: `session.resume()`.
- Persist `session.snapshot().to_json()` whenever the app saves.

Lower level, the systems are usable on their own:
- `Governor::award(raw) -> credited`, `Governor::tick()`, `Governor::offline_coins(away)`.
- `OfflineSimulator::simulate_elapsed(seconds, &mut lanes) -> Accrual`.

What it does NOT do
- No rendering, input, audio, wallets or on-chain calls. No randomness.
- No I/O on the reward path: nothing here reads storage or fails on bad numbers.
*/

pub mod clock;
pub mod config;
pub mod error;
pub mod snapshot;

pub mod mechanics;
pub mod systems;
pub mod genres;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EconomyConfig;
pub use error::{ConfigError, SnapshotError};
pub use snapshot::Snapshot;

#[cfg(feature = "system-emission_governor")]
pub use systems::emission_governor::{Governor, GovernorStatus};
#[cfg(feature = "system-production_lanes")]
pub use systems::production_lanes::{NodeRules, ProductionLane};
#[cfg(feature = "system-offline_accumulation")]
pub use systems::offline_accumulation::OfflineSimulator;
#[cfg(feature = "genre-idle")]
pub use genres::idle::{FrameReport, IdleSession, OfflineModel, OfflineReport};
