use crate::config::SwarmWeights;
use crate::error::ConfigError;
use crate::flocking::{Neighborhood, Peer};
use crate::math::{integrate, Mass, Vec2};
use crate::surface::Surface;

/// A ball rolling on a [`Surface`]. The surface is borrowed per update and
/// never stored, so one surface serves the whole session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass: Mass,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, mass: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            position,
            velocity,
            mass: Mass::new(mass)?,
        })
    }

    pub fn at_rest(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            mass: Mass::UNIT,
        }
    }

    /// Steepest-descent impulse `−dt · ∇h(position)`.
    pub fn descent_step(&self, surface: &Surface, dt: f64) -> Vec2 {
        surface.gradient(self.position).hadamard(Vec2::splat(-dt))
    }

    /// Plain descent with momentum.
    pub fn update(&mut self, surface: &Surface, dt: f64) {
        let step = self.descent_step(surface, dt);
        self.apply(step);
    }

    /// Descent blended with the weighted flock terms of `hood`.
    pub fn update_in_swarm(
        &mut self,
        surface: &Surface,
        hood: &Neighborhood,
        weights: &SwarmWeights,
        dt: f64,
    ) {
        let dt2 = Vec2::splat(dt);
        let step = self.descent_step(surface, dt).hadamard(weights.surface)
            + hood.separation.hadamard(weights.separation).hadamard(dt2)
            + hood.alignment.hadamard(weights.alignment).hadamard(dt2)
            + hood.cohesion.hadamard(weights.cohesion).hadamard(dt2);
        self.apply(step);
    }

    /// Display radius in percent of the view box; higher ground draws bigger.
    pub fn radius(&self, surface: &Surface, size_range: f64) -> f64 {
        let val = surface.height(self.position) * size_range;
        (100.0 - size_range + val) * 0.005
    }

    pub fn peer(&self) -> Peer {
        Peer {
            position: self.position,
            velocity: self.velocity,
            mass: self.mass.value(),
        }
    }

    fn apply(&mut self, step: Vec2) {
        let (position, velocity) = integrate(self.position, self.velocity, self.mass, step);
        self.position = position;
        self.velocity = velocity;
    }
}
