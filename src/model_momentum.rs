use log::{debug, trace, warn};

use crate::config::{MomentumConfig, SessionConfig, SpawnRanges};
use crate::error::{ensure_positive, ConfigError};
use crate::particle::Particle;
use crate::render::RenderBuffers;
use crate::spawn::Sampler;
use crate::surface::Surface;

/// Independent particles descending one shared surface.
pub struct Momentum {
    config: MomentumConfig,
    surface: Surface,
    particles: Vec<Particle>,
    sampler: Sampler,
    render: RenderBuffers,
    step_index: u64,
}

impl Momentum {
    pub fn new(config: MomentumConfig, sampler: Sampler) -> Result<Self, ConfigError> {
        config.validate()?;
        let surface = config.surface.build()?;
        Ok(Self {
            config,
            surface,
            particles: Vec::new(),
            sampler,
            render: RenderBuffers::default(),
            step_index: 0,
        })
    }

    /// Replaces every particle with `ranges.count` freshly sampled ones.
    pub fn spawn(&mut self, ranges: &SpawnRanges) -> Result<(), ConfigError> {
        ranges.validate()?;
        self.particles.clear();
        self.particles.reserve(ranges.count);
        for _ in 0..ranges.count {
            let particle = self.sample(ranges)?;
            self.particles.push(particle);
        }
        self.step_index = 0;
        debug!(
            "momentum: spawned {} particles on {}",
            self.particles.len(),
            self.surface.name()
        );
        self.sync_render_buffers();
        Ok(())
    }

    /// Adds one sampled particle without disturbing the others.
    pub fn spawn_one(&mut self, ranges: &SpawnRanges) -> Result<(), ConfigError> {
        ranges.validate()?;
        let particle = self.sample(ranges)?;
        self.push(particle);
        Ok(())
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
        self.sync_render_buffers();
    }

    pub fn tick(&mut self, dt: f64) -> Result<(), ConfigError> {
        ensure_positive("dt", dt)?;
        let dt = dt * self.config.display.time_scale;
        self.step_index = self.step_index.wrapping_add(1);

        for particle in &mut self.particles {
            particle.update(&self.surface, dt);
        }

        if self.particles.iter().any(|p| !p.position.is_finite()) {
            warn!("momentum: non-finite particle state at step {}", self.step_index);
        }
        trace!("momentum: step {} dt {}", self.step_index, dt);
        self.sync_render_buffers();
        Ok(())
    }

    /// Swaps the surface and empties the field; the next `spawn` starts a new session.
    pub fn set_surface(&mut self, surface: Surface) {
        debug!("momentum: surface set to {}", surface.name());
        self.surface = surface;
        self.particles.clear();
        self.step_index = 0;
        self.sync_render_buffers();
    }

    pub fn config(&self) -> &MomentumConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn render(&self) -> &RenderBuffers {
        &self.render
    }

    pub(crate) fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    fn sample(&mut self, ranges: &SpawnRanges) -> Result<Particle, ConfigError> {
        let s = self
            .sampler
            .spawn_state(ranges, self.config.display.time_scale);
        Particle::new(s.position, s.velocity, s.mass)
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
