use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, ConfigError, MathError};

/// A 2-D value vector. Arithmetic always yields a new vector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same value on both axes.
    pub const fn splat(v: f64) -> Self {
        Self { x: v, y: v }
    }

    pub fn dot(self, other: Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Elementwise product.
    pub fn hadamard(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x * other.x, self.y * other.y)
    }

    /// Elementwise division. Zero components follow IEEE rules (inf / NaN).
    pub fn elementwise_div(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x / other.x, self.y / other.y)
    }

    /// Elementwise division that refuses zero divisors.
    pub fn checked_div(self, other: Vec2) -> Result<Vec2, MathError> {
        if other.x == 0.0 {
            return Err(MathError::DivisionByZero { index: 0 });
        }
        if other.y == 0.0 {
            return Err(MathError::DivisionByZero { index: 1 });
        }
        Ok(self.elementwise_div(other))
    }

    pub fn scale(self, s: f64) -> Vec2 {
        Vec2::new(self.x * s, self.y * s)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Vec2 {
    fn from(v: [f64; 2]) -> Self {
        Vec2::new(v[0], v[1])
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;

    fn mul(self, rhs: f64) -> Vec2 {
        self.scale(rhs)
    }
}

/// Mass (or flock importance), replicated on both axes so that elementwise
/// division works on velocity vectors directly. Always strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mass(f64);

impl Mass {
    pub const UNIT: Mass = Mass(1.0);

    pub fn new(m: f64) -> Result<Self, ConfigError> {
        ensure_positive("mass", m)?;
        Ok(Self(m))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::splat(self.0)
    }
}

/// One semi-implicit Euler step: fold `step` into the momentum, then move.
///
/// `v' = (v ⊙ m + step) ⊘ m`, `x' = x + v'`.
pub fn integrate(position: Vec2, velocity: Vec2, mass: Mass, step: Vec2) -> (Vec2, Vec2) {
    let m = mass.as_vec2();
    let velocity = (velocity.hadamard(m) + step).elementwise_div(m);
    (position + velocity, velocity)
}

fn check_lengths(a: &[f64], b: &[f64]) -> Result<(), MathError> {
    if a.len() != b.len() {
        return Err(MathError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

pub fn sum(a: &[f64], b: &[f64]) -> Result<Vec<f64>, MathError> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

pub fn diff(a: &[f64], b: &[f64]) -> Result<Vec<f64>, MathError> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

pub fn elementwise_product(a: &[f64], b: &[f64]) -> Result<Vec<f64>, MathError> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).collect())
}

/// Fails at the first zero divisor instead of producing a non-finite result.
pub fn elementwise_divide(a: &[f64], b: &[f64]) -> Result<Vec<f64>, MathError> {
    check_lengths(a, b)?;
    if let Some(index) = b.iter().position(|&d| d == 0.0) {
        return Err(MathError::DivisionByZero { index });
    }
    Ok(a.iter().zip(b).map(|(x, y)| x / y).collect())
}

pub fn dot(a: &[f64], b: &[f64]) -> Result<f64, MathError> {
    check_lengths(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}
