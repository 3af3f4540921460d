//! The decision surface
//!
//! A controller is a function from a frozen, read-only view of permitted
//! world state to exactly one [`Order`]. It never touches authoritative
//! arena state, and it may be invoked concurrently with every other
//! controller, so implementations keep any memory behind their own interior
//! mutability.
//!
//! The built-in controllers double as the demo fleet and the test fleet; the
//! engine treats them no differently from external ones.

use std::f64::consts::PI;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::sim::{Angle, BotId, Order, Point, ScanReading, ScanResult};

/// The frozen per-tick snapshot a controller decides from: its own state and
/// its own most recent sensor reading, nothing about anyone else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotView {
    pub tick: u64,
    pub id: BotId,
    pub name: String,
    pub health: f64,
    pub position: Point,
    pub facing: Angle,
    pub speed: f64,
    /// Result of the most recently resolved scan order, if any. Scans
    /// resolve at the end of a tick, so this is always at least one tick old.
    pub last_scan: Option<ScanReading>,
}

/// One decision per tick. Must complete within the configured deadline or
/// the tick proceeds with [`Order::Nothing`] for this bot.
#[async_trait]
pub trait Controller: Send + Sync {
    async fn decide(&self, view: BotView) -> Order;
}

/// Never does anything. Useful as a target drone.
#[derive(Debug, Default)]
pub struct Sitter;

#[async_trait]
impl Controller for Sitter {
    async fn decide(&self, _view: BotView) -> Order {
        Order::Nothing
    }
}

/// Drives around at random off a seeded generator, so a given seed always
/// wanders the same path.
pub struct Wanderer {
    rng: Mutex<Pcg32>,
}

impl Wanderer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(Pcg32::seed_from_u64(seed)),
        }
    }
}

#[async_trait]
impl Controller for Wanderer {
    async fn decide(&self, _view: BotView) -> Order {
        let mut rng = self.rng.lock().expect("wanderer rng poisoned");
        match rng.random_range(0..3u8) {
            0 => Order::Accelerate {
                speed: rng.random_range(0.0..50.0),
            },
            1 => Order::Turn {
                facing: Angle::new(rng.random_range(-PI..PI)),
            },
            _ => Order::Nothing,
        }
    }
}

const HUNTER_CONE: f64 = PI / 4.0;
const HUNTER_SWEEP_STEP: f64 = PI / 6.0;
const HUNTER_FIRE_RANGE: f64 = 800.0;

/// Sweeps its sensor around the compass; on a contact, shoots down the
/// reconstructed bearing. Remembers only its own last scan direction.
pub struct Hunter {
    scan_direction: Mutex<Angle>,
}

impl Hunter {
    pub fn new() -> Self {
        Self {
            scan_direction: Mutex::new(Angle::ZERO),
        }
    }
}

impl Default for Hunter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Controller for Hunter {
    async fn decide(&self, view: BotView) -> Order {
        let mut scan_direction = self.scan_direction.lock().expect("hunter memory poisoned");

        // A fresh contact from last tick's sweep: fire down its bearing
        if let Some(ScanReading {
            tick,
            result: ScanResult::Contact { bearing_frac, .. },
        }) = view.last_scan
            && tick + 1 == view.tick
        {
            let target = *scan_direction + bearing_frac * HUNTER_CONE;
            return Order::Fire {
                direction: target,
                range: HUNTER_FIRE_RANGE,
            };
        }

        // Otherwise keep sweeping
        *scan_direction = (*scan_direction + HUNTER_SWEEP_STEP).normalized();
        Order::Scan {
            direction: *scan_direction,
            cone_width: Angle::new(HUNTER_CONE),
        }
    }
}
