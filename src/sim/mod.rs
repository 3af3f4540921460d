//! Deterministic simulation module
//!
//! All authoritative world state lives here. This module must be pure and
//! deterministic:
//! - One discrete jump per tick, no continuous integration
//! - Stable resolution order (ascending bot id)
//! - No platform, rendering, or network dependencies

pub mod arena;
pub mod bot;
pub mod geometry;
pub mod order;

pub use arena::{Arena, MatchEvent, RejectReason};
pub use bot::{Bot, BotId, ScanReading, ScanResult};
pub use geometry::{Angle, Entity, Point, bearing, distance};
pub use order::Order;
