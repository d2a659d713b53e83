use log::{debug, trace, warn};

use crate::bird::{Bird, BirdNeighborhoods};
use crate::config::{FlockConfig, SessionConfig, SpawnRanges};
use crate::error::{ensure_positive, ConfigError};
use crate::flocking::Neighborhood;
use crate::math::Vec2;
use crate::neighbors::nearest_neighbors;
use crate::render::RenderBuffers;
use crate::spawn::Sampler;

/// Display radius of a bird, percent of the view box.
pub const BIRD_RADIUS: f64 = 0.25;

/// Birds flocking in a bounded square; birds that fly out are dropped.
pub struct Flock {
    config: FlockConfig,
    birds: Vec<Bird>,
    neighborhoods: Vec<BirdNeighborhoods>,
    sampler: Sampler,
    render: RenderBuffers,
    step_index: u64,
}

impl Flock {
    pub fn new(config: FlockConfig, sampler: Sampler) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            birds: Vec::new(),
            neighborhoods: Vec::new(),
            sampler,
            render: RenderBuffers::default(),
            step_index: 0,
        })
    }

    pub fn spawn(&mut self, ranges: &SpawnRanges) -> Result<(), ConfigError> {
        ranges.validate()?;
        self.birds.clear();
        self.birds.reserve(ranges.count);
        for _ in 0..ranges.count {
            let s = self.sampler.spawn_state(ranges, self.config.time_scale);
            self.birds.push(Bird::new(s.position, s.velocity, s.mass)?);
        }
        self.step_index = 0;
        debug!("flock: spawned {} birds", self.birds.len());
        self.sync_render_buffers();
        Ok(())
    }

    pub fn push(&mut self, bird: Bird) {
        self.birds.push(bird);
        self.sync_render_buffers();
    }

    /// Gathers every neighborhood from the pre-tick state, moves every bird,
    /// then drops the ones that left the domain.
    pub fn tick(&mut self, dt: f64) -> Result<(), ConfigError> {
        ensure_positive("dt", dt)?;
        let dt = dt * self.config.time_scale;
        self.step_index = self.step_index.wrapping_add(1);

        let positions: Vec<Vec2> = self.birds.iter().map(|b| b.position).collect();
        let max_k = self.config.max_neighbors();
        self.neighborhoods.clear();
        for i in 0..self.birds.len() {
            // one ranking serves every behavior: each takes its own prefix
            let picked = nearest_neighbors(i, &positions, max_k, self.config.metric);
            let hood = |k: usize| {
                Neighborhood::gather_weighted(
                    positions[i],
                    picked[..k.min(picked.len())]
                        .iter()
                        .map(|&j| self.birds[j].peer()),
                )
            };
            self.neighborhoods.push(BirdNeighborhoods {
                separation: hood(self.config.separation.neighbors),
                alignment: hood(self.config.alignment.neighbors),
                cohesion: hood(self.config.cohesion.neighbors),
            });
        }

        for (bird, hoods) in self.birds.iter_mut().zip(&self.neighborhoods) {
            let noise = self.sampler.centered_vec2();
            bird.update(hoods, &self.config, noise, dt);
        }

        let before = self.birds.len();
        let half_extent = self.config.half_extent;
        self.birds.retain(|b| b.is_inside(half_extent));
        let removed = before - self.birds.len();
        if removed > 0 {
            debug!(
                "flock: {} birds left the domain at step {}, {} remain",
                removed,
                self.step_index,
                self.birds.len()
            );
        }
        if self.birds.iter().any(|b| !b.velocity.is_finite()) {
            warn!("flock: non-finite bird state at step {}", self.step_index);
        }
        trace!("flock: step {} dt {}", self.step_index, dt);

        self.sync_render_buffers();
        Ok(())
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    /// Neighborhoods used by the last tick, in bird order.
    pub fn neighborhoods(&self) -> &[BirdNeighborhoods] {
        &self.neighborhoods
    }

    pub fn render(&self) -> &RenderBuffers {
        &self.render
    }

    pub(crate) fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    fn sync_render_buffers(&mut self) {
        self.render
            .sync(self.birds.iter().map(|b| (b.position, BIRD_RADIUS)));
    }
}

#[cfg(test)]
mod tests {
    use super::Flock;
    use crate::bird::Bird;
    use crate::config::{FlockConfig, SpawnRanges};
    use crate::math::Vec2;
    use crate::spawn::Sampler;

    fn flock() -> Flock {
        Flock::new(FlockConfig::default(), Sampler::seeded(9)).unwrap()
    }

    #[test]
    fn spawn_uses_requested_count() {
        let mut f = flock();
        f.spawn(&SpawnRanges::default()).unwrap();
        assert_eq!(f.birds().len(), 50);
        assert_eq!(f.render().positions().len(), 100);
    }

    #[test]
    fn birds_outside_domain_are_removed() {
        let mut f = flock();
        f.push(Bird::new(Vec2::new(6.0, 0.0), Vec2::ZERO, 1.0).unwrap());
        f.push(Bird::new(Vec2::new(0.0, -7.5), Vec2::ZERO, 1.0).unwrap());
        f.push(Bird::new(Vec2::new(1.0, 1.0), Vec2::ZERO, 1.0).unwrap());
        f.tick(1.0).unwrap();
        assert_eq!(f.birds().len(), 1);
        assert!(f.birds()[0].position.x.abs() < 2.0);
        assert_eq!(f.render().len(), 1);
    }

    #[test]
    fn same_seed_same_flight() {
        let mut a = flock();
        let mut b = flock();
        a.spawn(&SpawnRanges::default()).unwrap();
        b.spawn(&SpawnRanges::default()).unwrap();
        for _ in 0..10 {
            a.tick(1.0).unwrap();
            b.tick(1.0).unwrap();
        }
        assert_eq!(a.birds(), b.birds());
    }

    #[test]
    fn behaviors_use_their_own_neighbor_counts() {
        let mut config = FlockConfig::default();
        config.separation.neighbors = 1;
        config.alignment.neighbors = 2;
        config.cohesion.neighbors = 4;
        let mut f = Flock::new(config, Sampler::seeded(2)).unwrap();
        f.spawn(&SpawnRanges {
            count: 4,
            ..SpawnRanges::default()
        })
        .unwrap();
        f.tick(1.0).unwrap();
        for hoods in f.neighborhoods() {
            assert_eq!(hoods.separation.count, 1);
            assert_eq!(hoods.alignment.count, 2);
            assert_eq!(hoods.cohesion.count, 3);
        }
    }

    #[test]
    fn heavier_birds_pull_harder() {
        let mut f = flock();
        f.push(Bird::new(Vec2::ZERO, Vec2::ZERO, 1.0).unwrap());
        f.push(Bird::new(Vec2::new(-1.0, 0.0), Vec2::ZERO, 1.0).unwrap());
        f.push(Bird::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 3.0).unwrap());
        f.tick(1.0).unwrap();

        let hood = f.neighborhoods()[0].cohesion;
        assert_eq!(hood.count, 2);
        assert!((hood.cohesion.x - 0.5).abs() < 1e-12);
        assert!(f.birds()[0].velocity.x > 0.0);
    }
}
