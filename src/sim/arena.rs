//! The authoritative arena
//!
//! Owns every bot record (alive and dead) and the monotonic tick counter.
//! Resolution is strictly sequential in ascending bot id, which makes the
//! whole simulation deterministic for a given order stream: motion first,
//! then hit-scan fire against post-movement positions, then sensor sweeps
//! against the final state of the tick.

use serde::{Deserialize, Serialize};

use super::bot::{Bot, BotId, ScanReading, ScanResult};
use super::geometry::{Angle, Point, bearing, distance};
use super::order::Order;
use crate::config::MatchConfig;
use crate::error::MatchError;

/// A notable event, journaled for external logging/replay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchEvent {
    /// A bot's health crossed zero
    Death { tick: u64, bot: BotId, by: BotId },
    /// A controller missed the decision deadline; `Nothing` was substituted
    DecisionTimeout { tick: u64, bot: BotId },
    /// An order carried an invalid parameter and was consumed as a no-op
    OrderRejected {
        tick: u64,
        bot: BotId,
        reason: RejectReason,
    },
}

/// Why an order was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    NonPositiveFireRange,
    NonPositiveConeWidth,
    /// A NaN or infinite payload; folded angles and cone filters are
    /// meaningless for non-finite values, so these never reach the kinematics
    NonFiniteParameter,
}

/// Nearest living bot inside a cone query
#[derive(Debug, Clone, Copy)]
struct ConeHit {
    id: BotId,
    distance: f64,
    /// Signed bearing offset from the cone center, radians
    offset: f64,
}

/// Authoritative world state: all bots plus the tick counter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena {
    bots: Vec<Bot>,
    tick: u64,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bot at full health, speed zero. Ids ascend in registration order.
    pub fn register(
        &mut self,
        name: String,
        position: Point,
        facing: Angle,
        full_health: f64,
    ) -> BotId {
        let id = BotId(self.bots.len() as u32);
        self.bots.push(Bot::new(id, name, position, facing, full_health));
        id
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn bots(&self) -> &[Bot] {
        &self.bots
    }

    pub fn bot(&self, id: BotId) -> &Bot {
        &self.bots[id.0 as usize]
    }

    pub fn living_count(&self) -> usize {
        self.bots.iter().filter(|b| b.alive()).count()
    }

    /// Ids of living bots, ascending
    pub fn living_ids(&self) -> Vec<BotId> {
        self.bots
            .iter()
            .filter(|b| b.alive())
            .map(|b| b.id())
            .collect()
    }

    /// Only the match loop advances the tick counter.
    pub(crate) fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Resolve one tick's worth of orders. `orders` must be sorted ascending
    /// by bot id; the match loop guarantees it.
    pub(crate) fn resolve(
        &mut self,
        orders: &[(BotId, Order)],
        config: &MatchConfig,
        events: &mut Vec<MatchEvent>,
    ) -> Result<(), MatchError> {
        debug_assert!(orders.windows(2).all(|w| w[0].0 < w[1].0));

        let orders = self.screen_payloads(orders, events);
        self.apply_motion(&orders, config);
        self.advance_all();
        self.resolve_fire(&orders, config, events);
        self.resolve_scans(&orders, config, events);
        self.check_invariants()
    }

    /// Drop any order carrying a NaN or infinite payload before it can touch
    /// the kinematics. A NaN facing would spread to the position, and a
    /// NaN-position bot passes every cone filter as an omnipresent decoy.
    fn screen_payloads(
        &self,
        orders: &[(BotId, Order)],
        events: &mut Vec<MatchEvent>,
    ) -> Vec<(BotId, Order)> {
        orders
            .iter()
            .filter(|&&(id, order)| {
                let finite = match order {
                    Order::Nothing => true,
                    Order::Accelerate { speed } => speed.is_finite(),
                    Order::Turn { facing } => facing.radians().is_finite(),
                    Order::Fire { direction, range } => {
                        direction.radians().is_finite() && range.is_finite()
                    }
                    Order::Scan {
                        direction,
                        cone_width,
                    } => direction.radians().is_finite() && cone_width.radians().is_finite(),
                };
                if !finite && self.bots[id.0 as usize].alive() {
                    log::warn!("bot {id} order rejected: non-finite payload {order:?}");
                    events.push(MatchEvent::OrderRejected {
                        tick: self.tick,
                        bot: id,
                        reason: RejectReason::NonFiniteParameter,
                    });
                }
                finite
            })
            .copied()
            .collect()
    }

    /// Phase 1: bounded Accelerate/Turn deltas for living bots
    fn apply_motion(&mut self, orders: &[(BotId, Order)], config: &MatchConfig) {
        for &(id, order) in orders {
            let bot = &mut self.bots[id.0 as usize];
            if !bot.alive() {
                continue;
            }
            match order {
                Order::Accelerate { speed } => {
                    let facing = bot.facing();
                    bot.drive(facing, speed, config.max_turn_per_tick, config.max_accel_per_tick);
                }
                Order::Turn { facing } => {
                    let speed = bot.speed();
                    bot.drive(facing, speed, config.max_turn_per_tick, config.max_accel_per_tick);
                }
                _ => {}
            }
        }
    }

    /// Phase 2: one discrete jump for every living bot
    fn advance_all(&mut self) {
        for bot in self.bots.iter_mut().filter(|b| b.alive()) {
            bot.advance();
        }
    }

    /// Phase 3: hit-scan fire against post-movement positions. Deaths take
    /// effect immediately: a bot killed earlier in this phase neither fires
    /// nor can be hit afterward.
    fn resolve_fire(
        &mut self,
        orders: &[(BotId, Order)],
        config: &MatchConfig,
        events: &mut Vec<MatchEvent>,
    ) {
        for &(id, order) in orders {
            let Order::Fire { direction, range } = order else {
                continue;
            };
            if !self.bots[id.0 as usize].alive() {
                continue;
            }
            if range <= 0.0 {
                log::warn!("bot {id} fire rejected: range {range} <= 0");
                events.push(MatchEvent::OrderRejected {
                    tick: self.tick,
                    bot: id,
                    reason: RejectReason::NonPositiveFireRange,
                });
                continue;
            }
            let Some(hit) = self.nearest_in_cone(id, direction, config.weapon_arc / 2.0, range)
            else {
                continue;
            };
            let tick = self.tick;
            let firer = self.bots[id.0 as usize].name().to_string();
            let target = &mut self.bots[hit.id.0 as usize];
            if target.apply_damage(config.weapon_damage, tick) {
                log::info!("tick {tick}: {} destroyed by {firer}", target.name());
                events.push(MatchEvent::Death {
                    tick,
                    bot: hit.id,
                    by: id,
                });
            }
        }
    }

    /// Phase 4: sensor sweeps against the final post-movement, post-combat
    /// state. Readings land in sensor memory for delivery next tick.
    fn resolve_scans(
        &mut self,
        orders: &[(BotId, Order)],
        config: &MatchConfig,
        events: &mut Vec<MatchEvent>,
    ) {
        for &(id, order) in orders {
            let Order::Scan {
                direction,
                cone_width,
            } = order
            else {
                continue;
            };
            if !self.bots[id.0 as usize].alive() {
                continue;
            }
            if cone_width.radians() <= 0.0 {
                log::warn!("bot {id} scan rejected: cone width {cone_width} <= 0");
                events.push(MatchEvent::OrderRejected {
                    tick: self.tick,
                    bot: id,
                    reason: RejectReason::NonPositiveConeWidth,
                });
                continue;
            }
            let half_width = cone_width.radians() / 2.0;
            let result = match self.nearest_in_cone(id, direction, half_width, config.sensor_max_range)
            {
                Some(hit) => ScanResult::Contact {
                    distance_frac: hit.distance / config.sensor_max_range,
                    bearing_frac: hit.offset / cone_width.radians(),
                },
                None => ScanResult::Clear,
            };
            let tick = self.tick;
            self.bots[id.0 as usize].record_scan(ScanReading { tick, result });
        }
    }

    /// Nearest *other living* bot within `range` of `origin` and within
    /// `half_width` of `direction`. Ties go to the lowest id because the scan
    /// iterates ascending and only a strictly nearer hit replaces the best.
    fn nearest_in_cone(
        &self,
        origin: BotId,
        direction: Angle,
        half_width: f64,
        range: f64,
    ) -> Option<ConeHit> {
        let from = self.bots[origin.0 as usize].position();
        let mut best: Option<ConeHit> = None;
        for bot in &self.bots {
            if bot.id() == origin || !bot.alive() {
                continue;
            }
            let d = distance(from, bot.position());
            if d > range {
                continue;
            }
            let offset = direction.normalized().shortest_to(bearing(from, bot.position()));
            if offset.abs() > half_width {
                continue;
            }
            if best.is_none_or(|b| d < b.distance) {
                best = Some(ConeHit {
                    id: bot.id(),
                    distance: d,
                    offset,
                });
            }
        }
        best
    }

    /// The drive clamps make negative speed unreachable; seeing one anyway is
    /// a programming defect and aborts the match.
    fn check_invariants(&self) -> Result<(), MatchError> {
        for bot in &self.bots {
            if bot.entity().speed() < 0.0 {
                return Err(MatchError::InvariantViolation(format!(
                    "bot {} has negative speed {}",
                    bot.id(),
                    bot.entity().speed()
                )));
            }
        }
        Ok(())
    }
}
