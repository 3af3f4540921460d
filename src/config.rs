//! Match tuning
//!
//! The engine never hard-codes sensor, weapon, or drive numbers at the call
//! sites; everything routes through a config value so tests and the demo
//! binary can tune them. Defaults come from [`crate::consts`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts;

/// Tunable parameters for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Starting health for every bot
    pub full_health: f64,
    /// Damage subtracted from the target on a weapon hit
    pub weapon_damage: f64,
    /// Fixed angular width of the weapon's hit window (radians)
    pub weapon_arc: f64,
    /// Maximum sensor range; contact distances are normalized by this
    pub sensor_max_range: f64,
    /// Maximum facing change per tick (radians)
    pub max_turn_per_tick: f64,
    /// Maximum speed change per tick
    pub max_accel_per_tick: f64,
    /// Per-tick controller decision deadline (milliseconds)
    pub decision_deadline_ms: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            full_health: consts::FULL_HEALTH,
            weapon_damage: consts::WEAPON_DAMAGE,
            weapon_arc: consts::WEAPON_ARC,
            sensor_max_range: consts::SENSOR_MAX_RANGE,
            max_turn_per_tick: consts::MAX_TURN_PER_TICK,
            max_accel_per_tick: consts::MAX_ACCEL_PER_TICK,
            decision_deadline_ms: consts::DECISION_DEADLINE_MS,
        }
    }
}

impl MatchConfig {
    pub fn decision_deadline(&self) -> Duration {
        Duration::from_millis(self.decision_deadline_ms)
    }

    /// Parse a config from JSON. Used by the demo binary to honor an
    /// override file; persistence itself is not part of the core.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
