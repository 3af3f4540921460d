//! The single tagged action a controller may submit per tick

use serde::{Deserialize, Serialize};

use super::geometry::Angle;

/// One order per bot per tick. Exactly one variant, with an explicit payload
/// per variant; no shared parameter slots.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Order {
    /// Do nothing this tick. Also what a timed-out or panicked controller
    /// gets credited with.
    #[default]
    Nothing,
    /// Request a new speed; the arena bounds the per-tick change
    Accelerate { speed: f64 },
    /// Request a new facing; the arena bounds the per-tick change
    Turn { facing: Angle },
    /// Instantaneous hit-scan shot along `direction`, out to `range`
    Fire { direction: Angle, range: f64 },
    /// Sweep the sensor cone centered on `direction`; the reading arrives in
    /// next tick's view
    Scan { direction: Angle, cone_width: Angle },
}
