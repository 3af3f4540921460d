//! 2D geometry primitives for the arena simulation
//!
//! Angles are stored anti-clockwise in radians from the 3 o'clock position.
//! Turns clockwise are negative and anti-clockwise are positive. The kinematic
//! model is intentionally oversimplified: entities have position, facing, and
//! speed, but no size, mass, impulse, or collision.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use std::f64::consts::TAU;

/// Linear distance between two points. Always non-negative.
pub fn distance(a: Point, b: Point) -> f64 {
    DVec2::from(a).distance(DVec2::from(b))
}

/// Angle of the ray from `from` to `to`.
///
/// Computed with a two-argument arctangent so all four quadrants and the
/// vertical case (zero delta-x) resolve without division by zero.
pub fn bearing(from: Point, to: Point) -> Angle {
    Angle::new((to.y - from.y).atan2(to.x - from.x))
}

/// A point in 2D space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Tolerance comparison. A negative epsilon never matches.
    pub fn near(&self, other: Point, epsilon: f64) -> bool {
        if epsilon < 0.0 {
            return false;
        }
        distance(*self, other) < epsilon
    }
}

impl From<Point> for DVec2 {
    fn from(p: Point) -> Self {
        DVec2::new(p.x, p.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Point::new(v.x, v.y)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, other: Point) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, other: Point) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.x, self.y)
    }
}

/// A signed angle in radians, unbounded until normalized
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn new(radians: f64) -> Self {
        Self(radians)
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self(degrees * TAU / 360.0)
    }

    pub fn radians(&self) -> f64 {
        self.0
    }

    pub fn degrees(&self) -> f64 {
        self.0 * 360.0 / TAU
    }

    /// Fold the value into a single orbit, the open interval (-2π, 2π).
    /// Idempotent once inside that range. Remainder keeps the dividend's
    /// sign and is constant-time for any magnitude; an iterative fold would
    /// never terminate once the value's ULP exceeds 2π.
    pub fn normalized(self) -> Angle {
        Angle(self.0 % TAU)
    }

    /// Signed shortest-way difference to `other`, in [-π, π]
    pub fn shortest_to(self, other: Angle) -> f64 {
        let mut delta = (other.0 - self.0) % TAU;
        if delta > TAU / 2.0 {
            delta -= TAU;
        } else if delta < -TAU / 2.0 {
            delta += TAU;
        }
        delta
    }

    /// Tolerance comparison. A negative epsilon never matches.
    pub fn near(&self, other: Angle, epsilon: f64) -> bool {
        if epsilon < 0.0 {
            return false;
        }
        (self.0 - other.0).abs() <= epsilon
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, other: Angle) -> Angle {
        Angle(self.0 + other.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, other: Angle) -> Angle {
        Angle(self.0 - other.0)
    }
}

impl Add<f64> for Angle {
    type Output = Angle;
    fn add(self, other: f64) -> Angle {
        Angle(self.0 + other)
    }
}

impl Sub<f64> for Angle {
    type Output = Angle;
    fn sub(self, other: f64) -> Angle {
        Angle(self.0 - other)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}r", self.0)
    }
}

/// A kinematic object with position, facing, and non-negative speed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Entity {
    position: Point,
    facing: Angle,
    speed: f64,
}

impl Entity {
    pub fn new(position: Point, facing: Angle, speed: f64) -> Self {
        let mut entity = Self {
            position,
            facing: facing.normalized(),
            speed: 0.0,
        };
        entity.set_speed(speed);
        entity
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn facing(&self) -> Angle {
        self.facing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_position(&mut self, position: Point) -> Point {
        self.position = position;
        self.position
    }

    /// Facing is normalized on assignment.
    pub fn set_facing(&mut self, facing: Angle) -> Angle {
        self.facing = facing.normalized();
        self.facing
    }

    /// Negative speeds are rejected; the prior value is retained. Returns the
    /// speed in effect after the call.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        if speed >= 0.0 {
            self.speed = speed;
        }
        self.speed
    }

    /// Jump the entity to its next position: one invocation = one tick.
    pub fn advance(&mut self) {
        let velocity = DVec2::from_angle(self.facing.radians()) * self.speed;
        self.position = (DVec2::from(self.position) + velocity).into();
    }
}
