use crate::config::FlockConfig;
use crate::error::ConfigError;
use crate::flocking::{Neighborhood, Peer};
use crate::math::{integrate, Mass, Vec2};

/// Neighborhoods of one bird, one per behavior since each behavior may look
/// at a different number of peers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BirdNeighborhoods {
    pub separation: Neighborhood,
    pub alignment: Neighborhood,
    pub cohesion: Neighborhood,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bird {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Importance; heavier birds turn more slowly.
    pub mass: Mass,
}

impl Bird {
    pub fn new(position: Vec2, velocity: Vec2, mass: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            position,
            velocity,
            mass: Mass::new(mass)?,
        })
    }

    /// Advances the bird by `dt`. `noise` holds one uniform draw in
    /// `[-0.5, 0.5)` per axis and is scaled by the configured jitter.
    pub fn update(&mut self, hoods: &BirdNeighborhoods, config: &FlockConfig, noise: Vec2, dt: f64) {
        let jitter = noise * (config.jitter * dt);
        let step = hoods.separation.separation * (config.separation.weight * dt)
            + hoods.alignment.alignment * (config.alignment.weight * dt)
            + hoods.cohesion.cohesion * (config.cohesion.weight * dt)
            + (-self.position) * (config.centering * dt)
            + jitter;

        let (position, velocity) = integrate(self.position, self.velocity, self.mass, step);
        self.position = position;
        self.velocity = velocity;
    }

    /// Inside the closed square `[-half_extent, half_extent]²`.
    pub fn is_inside(&self, half_extent: f64) -> bool {
        self.position.x.abs() <= half_extent && self.position.y.abs() <= half_extent
    }

    pub fn peer(&self) -> Peer {
        Peer {
            position: self.position,
            velocity: self.velocity,
            mass: self.mass.value(),
        }
    }
}
