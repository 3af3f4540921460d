//! Bot Arena - a deterministic tick-based arena simulation
//!
//! Several independently-controlled bots compete by submitting one order per
//! tick; an authoritative referee resolves all orders and owns the only true
//! world state.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, bots, orders, arena resolution)
//! - `controller`: The decision surface handed to each bot per tick
//! - `game`: Match lifecycle (order collection under deadline, resolution, standings)
//! - `config`: Data-driven tuning for sensors, weapons, and drive limits

pub mod config;
pub mod controller;
pub mod error;
pub mod game;
pub mod sim;

pub use config::MatchConfig;
pub use controller::{BotView, Controller};
pub use error::{MatchError, SetupError};
pub use game::{BotSpec, Match, MatchPhase};

/// Simulation tuning constants (defaults for [`MatchConfig`])
pub mod consts {
    /// Starting health for every bot
    pub const FULL_HEALTH: f64 = 100.0;
    /// Damage subtracted from a target on a weapon hit
    pub const WEAPON_DAMAGE: f64 = 25.0;
    /// Fixed angular width of the weapon's hit window (radians)
    pub const WEAPON_ARC: f64 = 0.1;
    /// Maximum sensor range; scan contact distances are normalized by this
    pub const SENSOR_MAX_RANGE: f64 = 1_000.0;
    /// Maximum facing change per tick (radians)
    pub const MAX_TURN_PER_TICK: f64 = std::f64::consts::FRAC_PI_8;
    /// Maximum speed change per tick
    pub const MAX_ACCEL_PER_TICK: f64 = 10.0;
    /// Per-tick controller decision deadline (milliseconds)
    pub const DECISION_DEADLINE_MS: u64 = 50;
}
