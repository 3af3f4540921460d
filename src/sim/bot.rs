//! Authoritative bot records
//!
//! A bot is a name, a health pool, and a kinematic entity. Records are only
//! mutated by the arena's resolution phase, and are retained after death for
//! postmortem reporting.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::{Angle, Entity, Point};

/// Bot identity, assigned ascending in registration order. All deterministic
/// resolution ordering and tie-breaking uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BotId(pub u32);

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a sensor sweep saw. Identity of the reflector is hidden; the caller
/// learns only a normalized distance/bearing signal for the nearest one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScanResult {
    /// Nothing inside the cone
    Clear,
    /// Nearest reflector inside the cone
    Contact {
        /// Distance divided by the configured maximum sensor range
        distance_frac: f64,
        /// Bearing offset from the cone center, divided by the cone width
        bearing_frac: f64,
    },
}

/// A sensor reading plus the tick it was taken on. Scanning is itself an
/// order, so readings reach the controller one tick after they are requested.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScanReading {
    pub tick: u64,
    pub result: ScanResult,
}

/// One participant in the match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bot {
    id: BotId,
    name: String,
    health: f64,
    entity: Entity,
    death_tick: Option<u64>,
    last_scan: Option<ScanReading>,
}

impl Bot {
    /// New bot at full health with speed zero.
    pub fn new(id: BotId, name: String, position: Point, facing: Angle, full_health: f64) -> Self {
        Self {
            id,
            name,
            health: full_health,
            entity: Entity::new(position, facing, 0.0),
            death_tick: None,
            last_scan: None,
        }
    }

    pub fn id(&self) -> BotId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn alive(&self) -> bool {
        self.health > 0.0
    }

    /// Tick on which health crossed zero, if it has.
    pub fn death_tick(&self) -> Option<u64> {
        self.death_tick
    }

    pub fn position(&self) -> Point {
        self.entity.position()
    }

    pub fn facing(&self) -> Angle {
        self.entity.facing()
    }

    pub fn speed(&self) -> f64 {
        self.entity.speed()
    }

    pub fn last_scan(&self) -> Option<ScanReading> {
        self.last_scan
    }

    pub(crate) fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Apply a bounded drive request: the facing delta is clamped to
    /// `max_turn` (shortest way) and the speed delta to `max_accel` per tick.
    /// Negative speed requests clamp to zero before the delta bound, so speed
    /// can never go negative.
    pub(crate) fn drive(&mut self, direction: Angle, speed: f64, max_turn: f64, max_accel: f64) {
        let delta = self.entity.facing().shortest_to(direction.normalized());
        let turn = delta.clamp(-max_turn, max_turn);
        self.entity.set_facing(self.entity.facing() + turn);

        let requested = speed.max(0.0);
        let accel = (requested - self.entity.speed()).clamp(-max_accel, max_accel);
        self.entity.set_speed(self.entity.speed() + accel);
    }

    pub(crate) fn advance(&mut self) {
        self.entity.advance();
    }

    /// Subtract damage; health may go negative. Returns true if this hit
    /// killed the bot, recording the death tick.
    pub(crate) fn apply_damage(&mut self, amount: f64, tick: u64) -> bool {
        let was_alive = self.alive();
        self.health -= amount;
        if was_alive && !self.alive() {
            self.death_tick = Some(tick);
            return true;
        }
        false
    }

    pub(crate) fn record_scan(&mut self, reading: ScanReading) {
        self.last_scan = Some(reading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn test_bot() -> Bot {
        Bot::new(BotId(0), "tester".into(), Point::ZERO, Angle::ZERO, 100.0)
    }

    #[test]
    fn test_new_bot_is_alive_and_stationary() {
        let bot = test_bot();
        assert!(bot.alive());
        assert_eq!(bot.speed(), 0.0);
        assert_eq!(bot.death_tick(), None);
        assert_eq!(bot.last_scan(), None);
    }

    #[test]
    fn test_drive_clamps_acceleration() {
        let mut bot = test_bot();
        bot.drive(Angle::ZERO, 100.0, PI, 10.0);
        assert_eq!(bot.speed(), 10.0);
        bot.drive(Angle::ZERO, 100.0, PI, 10.0);
        assert_eq!(bot.speed(), 20.0);
    }

    #[test]
    fn test_drive_never_goes_negative() {
        let mut bot = test_bot();
        bot.drive(Angle::ZERO, 5.0, PI, 10.0);
        assert_eq!(bot.speed(), 5.0);
        bot.drive(Angle::ZERO, -50.0, PI, 10.0);
        assert_eq!(bot.speed(), 0.0);
        bot.drive(Angle::ZERO, -50.0, PI, 10.0);
        assert_eq!(bot.speed(), 0.0);
    }

    #[test]
    fn test_drive_clamps_turn_shortest_way() {
        let mut bot = test_bot();
        // Request a full reversal with a quarter-turn limit
        bot.drive(Angle::new(PI), 0.0, PI / 2.0, 10.0);
        assert!(bot.facing().near(Angle::new(PI / 2.0), 1e-9));

        // Requesting -0.1 from facing 0 should turn clockwise, not the long way
        let mut bot = test_bot();
        bot.drive(Angle::new(-0.1), 0.0, PI / 2.0, 10.0);
        assert!(bot.facing().near(Angle::new(-0.1), 1e-9));
    }

    #[test]
    fn test_damage_marks_death_once() {
        let mut bot = test_bot();
        assert!(!bot.apply_damage(60.0, 3));
        assert!(bot.alive());
        assert!(bot.apply_damage(60.0, 7));
        assert!(!bot.alive());
        assert_eq!(bot.death_tick(), Some(7));
        // Further damage doesn't move the death tick
        assert!(!bot.apply_damage(10.0, 9));
        assert_eq!(bot.death_tick(), Some(7));
        assert!(bot.health() < 0.0);
    }
}
