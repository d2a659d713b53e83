use log::{debug, trace, warn};

use crate::config::{SessionConfig, SpawnRanges, SwarmConfig};
use crate::error::{ensure_positive, ConfigError};
use crate::flocking::Neighborhood;
use crate::math::Vec2;
use crate::neighbors::nearest_neighbors;
use crate::particle::Particle;
use crate::render::RenderBuffers;
use crate::spawn::Sampler;
use crate::surface::Surface;

/// Particles that descend a surface and flock with their nearest peers.
pub struct Swarm {
    config: SwarmConfig,
    surface: Surface,
    particles: Vec<Particle>,
    neighborhoods: Vec<Neighborhood>,
    sampler: Sampler,
    render: RenderBuffers,
    step_index: u64,
}

impl Swarm {
    pub fn new(config: SwarmConfig, sampler: Sampler) -> Result<Self, ConfigError> {
        config.validate()?;
        let surface = config.surface.build()?;
        Ok(Self {
            config,
            surface,
            particles: Vec::new(),
            neighborhoods: Vec::new(),
            sampler,
            render: RenderBuffers::default(),
            step_index: 0,
        })
    }

    pub fn spawn(&mut self, ranges: &SpawnRanges) -> Result<(), ConfigError> {
        ranges.validate()?;
        self.particles.clear();
        self.particles.reserve(ranges.count);
        for _ in 0..ranges.count {
            let s = self
                .sampler
                .spawn_state(ranges, self.config.display.time_scale);
            self.particles
                .push(Particle::new(s.position, s.velocity, s.mass)?);
        }
        self.step_index = 0;
        debug!(
            "swarm: spawned {} particles on {}, k = {}",
            self.particles.len(),
            self.surface.name(),
            self.config.neighbors
        );
        self.sync_render_buffers();
        Ok(())
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
        self.sync_render_buffers();
    }

    /// Every particle sees its neighbors as they were before the tick.
    pub fn tick(&mut self, dt: f64) -> Result<(), ConfigError> {
        ensure_positive("dt", dt)?;
        let dt = dt * self.config.display.time_scale;
        self.step_index = self.step_index.wrapping_add(1);

        let positions: Vec<Vec2> = self.particles.iter().map(|p| p.position).collect();
        self.neighborhoods.clear();
        for i in 0..self.particles.len() {
            let picked = nearest_neighbors(i, &positions, self.config.neighbors, self.config.metric);
            self.neighborhoods.push(Neighborhood::gather(
                positions[i],
                picked.iter().map(|&j| self.particles[j].peer()),
            ));
        }

        for (particle, hood) in self.particles.iter_mut().zip(&self.neighborhoods) {
            particle.update_in_swarm(&self.surface, hood, &self.config.weights, dt);
        }

        if self.particles.iter().any(|p| !p.position.is_finite()) {
            warn!("swarm: non-finite particle state at step {}", self.step_index);
        }
        trace!("swarm: step {} dt {}", self.step_index, dt);
        self.sync_render_buffers();
        Ok(())
    }

    pub fn set_surface(&mut self, surface: Surface) {
        debug!("swarm: surface set to {}", surface.name());
        self.surface = surface;
        self.particles.clear();
        self.step_index = 0;
        self.sync_render_buffers();
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Neighborhoods used by the last tick, in particle order.
    pub fn neighborhoods(&self) -> &[Neighborhood] {
        &self.neighborhoods
    }

    pub fn render(&self) -> &RenderBuffers {
        &self.render
    }

    pub(crate) fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    fn sync_render_buffers(&mut self) {
        let surface = &self.surface;
        let size_range = self.config.display.size_range;
        self.render.sync(
            self.particles
                .iter()
                .map(|p| (p.position, p.radius(surface, size_range))),
        );
    }
}
