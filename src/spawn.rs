use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SpawnRanges;
use crate::math::Vec2;

/// Entity state drawn from [`SpawnRanges`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnState {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: f64,
}

/// Seeded source of every random number a session uses.
#[derive(Clone, Debug)]
pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Seed from the platform entropy source (`crypto.getRandomValues` on the web).
    pub fn from_entropy() -> Result<Self, getrandom::Error> {
        Ok(Self::seeded(getrandom::u64()?))
    }

    /// Uniform in `[-0.5, 0.5)`.
    pub fn centered(&mut self) -> f64 {
        self.rng.random::<f64>() - 0.5
    }

    /// One independent centered draw per axis.
    pub fn centered_vec2(&mut self) -> Vec2 {
        let x = self.centered();
        let y = self.centered();
        Vec2::new(x, y)
    }

    pub fn spawn_state(&mut self, ranges: &SpawnRanges, time_scale: f64) -> SpawnState {
        let position = self.centered_vec2() * ranges.position;
        let velocity = self.centered_vec2() * (ranges.velocity * time_scale);
        let mass = 1.0 + self.rng.random::<f64>() * ranges.mass;
        SpawnState {
            position,
            velocity,
            mass,
        }
    }
}
