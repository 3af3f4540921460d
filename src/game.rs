//! Match lifecycle and the tick loop
//!
//! Drives the round: snapshot the world, collect one order per living bot
//! under a deadline, resolve in deterministic order, check termination.
//! Collection runs one task per bot because each task gets only an immutable
//! snapshot; resolution is strictly single-threaded and is the sole mutator
//! of arena state. There is no cross-tick concurrency: collecting for tick
//! n+1 never starts before tick n has fully committed.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::config::MatchConfig;
use crate::controller::{BotView, Controller};
use crate::error::{MatchError, SetupError};
use crate::sim::{Angle, Arena, Bot, BotId, MatchEvent, Order, Point};

/// Where the match is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Ticks are still being played
    Running,
    /// At most one bot remains; no further collecting or resolving occurs
    Ended,
}

/// One roster entry: a bot's starting state and the controller that owns it
pub struct BotSpec {
    pub name: String,
    pub position: Point,
    pub facing: Angle,
    pub controller: Arc<dyn Controller>,
}

impl BotSpec {
    pub fn new(
        name: impl Into<String>,
        position: Point,
        facing: Angle,
        controller: Arc<dyn Controller>,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            facing,
            controller,
        }
    }
}

/// An authoritative match: one arena, one controller per bot, and the
/// round/termination bookkeeping.
pub struct Match {
    arena: Arena,
    controllers: Vec<Arc<dyn Controller>>,
    config: MatchConfig,
    phase: MatchPhase,
    events: Vec<MatchEvent>,
}

impl Match {
    /// Validate the roster and bind one controller per bot. Fails before any
    /// tick runs if there are fewer than two bots or duplicate names.
    pub fn setup(roster: Vec<BotSpec>, config: MatchConfig) -> Result<Self, MatchError> {
        if roster.len() < 2 {
            return Err(SetupError::NotEnoughBots(roster.len()).into());
        }
        let mut arena = Arena::new();
        let mut controllers = Vec::with_capacity(roster.len());
        for spec in roster {
            if arena.bots().iter().any(|b| b.name() == spec.name) {
                return Err(SetupError::DuplicateName(spec.name).into());
            }
            arena.register(spec.name, spec.position, spec.facing, config.full_health);
            controllers.push(spec.controller);
        }
        log::info!("match set up with {} bots", arena.bots().len());
        Ok(Self {
            arena,
            controllers,
            config,
            phase: MatchPhase::Running,
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Journal of notable events (deaths, timeouts, rejected orders) with
    /// tick numbers, for external logging/replay.
    pub fn events(&self) -> &[MatchEvent] {
        &self.events
    }

    /// Play one full round: collect orders, resolve, check termination.
    /// Returns the phase after the round. A no-op once ended.
    pub async fn step(&mut self) -> Result<MatchPhase, MatchError> {
        if self.phase == MatchPhase::Ended {
            return Ok(MatchPhase::Ended);
        }

        let orders = self.collect_orders().await;
        self.arena.resolve(&orders, &self.config, &mut self.events)?;

        if self.arena.living_count() <= 1 {
            log::info!("match ended on tick {}", self.arena.tick());
            self.phase = MatchPhase::Ended;
        } else {
            self.arena.advance_tick();
        }
        Ok(self.phase)
    }

    /// Run rounds until the match ends. Dropping the returned future mid-round
    /// aborts all in-flight controller tasks without waiting for them.
    pub async fn run_until_ended(&mut self) -> Result<(), MatchError> {
        while self.step().await? == MatchPhase::Running {}
        Ok(())
    }

    /// Bots ordered by death tick ascending, survivors last, ties by id.
    pub fn standings(&self) -> Vec<&Bot> {
        let mut order: Vec<&Bot> = self.arena.bots().iter().collect();
        order.sort_by_key(|b| (b.death_tick().unwrap_or(u64::MAX), b.id()));
        order
    }

    /// Collecting phase: one task per living bot, each racing the decision
    /// deadline. A timeout or panic inside a task costs that bot its order
    /// (`Nothing`) and nothing else; siblings are unaffected. Resolution
    /// order comes out ascending by id regardless of completion order.
    async fn collect_orders(&mut self) -> Vec<(BotId, Order)> {
        let living = self.arena.living_ids();
        let mut orders: BTreeMap<BotId, Order> =
            living.iter().map(|&id| (id, Order::Nothing)).collect();

        let mut tasks = JoinSet::new();
        for &id in &living {
            let controller = Arc::clone(&self.controllers[id.0 as usize]);
            let view = self.view_for(id);
            let deadline = self.config.decision_deadline();
            tasks.spawn(async move {
                let decision = timeout(deadline, controller.decide(view)).await;
                (id, decision)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, Ok(order))) => {
                    orders.insert(id, order);
                }
                Ok((id, Err(_elapsed))) => {
                    log::warn!(
                        "tick {}: bot {id} missed the decision deadline",
                        self.arena.tick()
                    );
                    self.events.push(MatchEvent::DecisionTimeout {
                        tick: self.arena.tick(),
                        bot: id,
                    });
                }
                // A panicked controller task; its bot keeps the Nothing default
                Err(join_error) => {
                    log::warn!("controller task failed: {join_error}");
                }
            }
        }

        orders.into_iter().collect()
    }

    /// Freeze the restricted world view for one bot: its own state plus its
    /// own most recent sensor reading.
    fn view_for(&self, id: BotId) -> BotView {
        let bot = self.arena.bot(id);
        BotView {
            tick: self.arena.tick(),
            id,
            name: bot.name().to_string(),
            health: bot.health(),
            position: bot.position(),
            facing: bot.facing(),
            speed: bot.speed(),
            last_scan: bot.last_scan(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::Sitter;
    use crate::sim::ScanResult;
    use async_trait::async_trait;
    use std::f64::consts::PI;
    use std::time::{Duration, Instant};

    fn config() -> MatchConfig {
        MatchConfig {
            weapon_damage: 50.0,
            weapon_arc: 0.2,
            decision_deadline_ms: 20,
            ..Default::default()
        }
    }

    /// Fires along a fixed direction every tick
    struct Turret {
        direction: Angle,
    }

    #[async_trait]
    impl Controller for Turret {
        async fn decide(&self, _view: BotView) -> Order {
            Order::Fire {
                direction: self.direction,
                range: 500.0,
            }
        }
    }

    /// Never returns within any reasonable deadline
    struct Staller;

    #[async_trait]
    impl Controller for Staller {
        async fn decide(&self, _view: BotView) -> Order {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Order::Nothing
        }
    }

    /// Panics on every decision
    struct Crasher;

    #[async_trait]
    impl Controller for Crasher {
        async fn decide(&self, _view: BotView) -> Order {
            panic!("controller bug");
        }
    }

    fn duel(attacker: Arc<dyn Controller>, defender: Arc<dyn Controller>) -> Match {
        Match::setup(
            vec![
                BotSpec::new(
                    "attacker",
                    Point::ZERO,
                    Angle::ZERO,
                    attacker,
                ),
                BotSpec::new("defender", Point::new(100.0, 0.0), Angle::ZERO, defender),
            ],
            config(),
        )
        .unwrap()
    }

    #[test]
    fn test_setup_rejects_single_bot() {
        let result = Match::setup(
            vec![BotSpec::new(
                "loner",
                Point::ZERO,
                Angle::ZERO,
                Arc::new(Sitter),
            )],
            config(),
        );
        assert!(matches!(
            result.err(),
            Some(MatchError::Setup(SetupError::NotEnoughBots(1)))
        ));
    }

    #[test]
    fn test_setup_rejects_duplicate_names() {
        let result = Match::setup(
            vec![
                BotSpec::new("twin", Point::ZERO, Angle::ZERO, Arc::new(Sitter)),
                BotSpec::new("twin", Point::new(10.0, 0.0), Angle::ZERO, Arc::new(Sitter)),
            ],
            config(),
        );
        assert!(matches!(
            result.err(),
            Some(MatchError::Setup(SetupError::DuplicateName(name))) if name == "twin"
        ));
    }

    #[tokio::test]
    async fn test_two_bot_match_ends_when_one_remains() {
        let mut game = duel(
            Arc::new(Turret {
                direction: Angle::ZERO,
            }),
            Arc::new(Sitter),
        );

        // 100 health / 50 damage: dead on the second tick
        assert_eq!(game.step().await.unwrap(), MatchPhase::Running);
        assert_eq!(game.step().await.unwrap(), MatchPhase::Ended);

        let standings = game.standings();
        assert_eq!(standings[0].name(), "defender");
        assert_eq!(standings[0].death_tick(), Some(1));
        assert_eq!(standings[1].name(), "attacker");
        assert!(standings[1].alive());
        assert!(game
            .events()
            .contains(&MatchEvent::Death {
                tick: 1,
                bot: BotId(1),
                by: BotId(0),
            }));

        // Further steps are no-ops
        assert_eq!(game.step().await.unwrap(), MatchPhase::Ended);
        assert_eq!(game.arena().tick(), 1);
    }

    #[tokio::test]
    async fn test_run_until_ended() {
        let mut game = duel(
            Arc::new(Turret {
                direction: Angle::ZERO,
            }),
            Arc::new(Sitter),
        );
        game.run_until_ended().await.unwrap();
        assert_eq!(game.phase(), MatchPhase::Ended);
        assert_eq!(game.arena().living_count(), 1);
    }

    #[tokio::test]
    async fn test_stalled_controller_times_out_without_delaying_the_round() {
        let mut game = duel(
            Arc::new(Turret {
                direction: Angle::ZERO,
            }),
            Arc::new(Staller),
        );

        let started = Instant::now();
        game.step().await.unwrap();
        // Well under the staller's hour-long nap, just over the 20ms deadline
        assert!(started.elapsed() < Duration::from_secs(5));

        assert!(game.events().contains(&MatchEvent::DecisionTimeout {
            tick: 0,
            bot: BotId(1),
        }));
        // The turret's order still resolved
        assert_eq!(game.arena().bot(BotId(1)).health(), 50.0);
    }

    #[tokio::test]
    async fn test_panicking_controller_costs_only_its_own_order() {
        let mut game = duel(
            Arc::new(Turret {
                direction: Angle::ZERO,
            }),
            Arc::new(Crasher),
        );
        game.step().await.unwrap();
        // The sibling task was unaffected and its fire order landed
        assert_eq!(game.arena().bot(BotId(1)).health(), 50.0);
    }

    #[tokio::test]
    async fn test_scan_reading_arrives_one_tick_late() {
        // Scanner that records the views it was handed
        struct Recorder {
            seen: std::sync::Mutex<Vec<Option<ScanResult>>>,
        }

        #[async_trait]
        impl Controller for Recorder {
            async fn decide(&self, view: BotView) -> Order {
                self.seen
                    .lock()
                    .unwrap()
                    .push(view.last_scan.map(|r| r.result));
                Order::Scan {
                    direction: Angle::ZERO,
                    cone_width: Angle::new(1.0),
                }
            }
        }

        let recorder = Arc::new(Recorder {
            seen: std::sync::Mutex::new(Vec::new()),
        });
        let mut game = duel(recorder.clone(), Arc::new(Sitter));
        game.step().await.unwrap();
        game.step().await.unwrap();

        let seen = recorder.seen.lock().unwrap();
        // Tick 0's view predates any scan; tick 1's view carries tick 0's sweep
        assert_eq!(seen[0], None);
        assert!(matches!(seen[1], Some(ScanResult::Contact { .. })));
    }

    #[tokio::test]
    async fn test_simultaneous_kill_intents_resolve_in_id_order() {
        // Both bots fire lethal shots the same tick. Fire resolves ascending
        // by id, so bot 0 kills bot 1 before bot 1's shot is considered.
        let lethal = MatchConfig {
            weapon_damage: 200.0,
            ..config()
        };
        let mut game = Match::setup(
            vec![
                BotSpec::new(
                    "east",
                    Point::ZERO,
                    Angle::ZERO,
                    Arc::new(Turret {
                        direction: Angle::ZERO,
                    }) as Arc<dyn Controller>,
                ),
                BotSpec::new(
                    "west",
                    Point::new(100.0, 0.0),
                    Angle::ZERO,
                    Arc::new(Turret {
                        direction: Angle::new(PI),
                    }),
                ),
            ],
            lethal,
        )
        .unwrap();

        game.run_until_ended().await.unwrap();
        // Bot 0 resolves first and kills bot 1, whose return fire is dropped
        let standings = game.standings();
        assert_eq!(standings[0].name(), "west");
        assert_eq!(standings[1].name(), "east");
        assert!(standings[1].alive());
    }
}
