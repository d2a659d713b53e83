//! Momentum: particles rolling down analytic surfaces and flocking birds,
//! stepped on a fixed timer by the host page.
//!
//! The page drives a [`Sim`] through `tick(dt)` and reads `positions()` and
//! `radii()` back after each step. Everything below the handle is plain Rust
//! and can be used without wasm.

use wasm_bindgen::prelude::*;

pub mod bird;
pub mod config;
pub mod error;
pub mod flocking;
pub mod math;
pub mod matrix;
pub mod model_flock;
pub mod model_momentum;
pub mod model_swarm;
pub mod neighbors;
pub mod particle;
pub mod render;
pub mod spawn;
pub mod surface;

pub use config::{FlockConfig, MomentumConfig, SessionConfig, SpawnRanges, SwarmConfig};
pub use error::{ConfigError, MathError, ModelError, SurfaceError};
pub use math::{Mass, Vec2};
pub use model_flock::Flock;
pub use model_momentum::Momentum;
pub use model_swarm::Swarm;
pub use surface::Surface;

use render::RenderBuffers;
use spawn::Sampler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelKind {
    Momentum,
    Swarm,
    Flock,
}

impl ModelKind {
    pub fn from_u32(value: u32) -> Self {
        match value {
            1 => Self::Swarm,
            2 => Self::Flock,
            _ => Self::Momentum,
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            Self::Momentum => 0,
            Self::Swarm => 1,
            Self::Flock => 2,
        }
    }
}

enum Scene {
    Momentum(Momentum),
    Swarm(Swarm),
    Flock(Flock),
}

#[wasm_bindgen]
pub struct Sim {
    kind: ModelKind,
    scene: Scene,
}

#[wasm_bindgen]
impl Sim {
    /// Default configuration for `kind` (0 momentum, 1 swarm, 2 flock).
    #[wasm_bindgen(constructor)]
    pub fn new(kind: u32, seed: u32) -> Result<Sim, JsError> {
        Sim::build(ModelKind::from_u32(kind), None, Sampler::seeded(u64::from(seed)))
            .map_err(to_js)
    }

    /// Configuration from (partial) JSON, see [`config`].
    pub fn from_config(kind: u32, config_json: &str, seed: u32) -> Result<Sim, JsError> {
        Sim::build(
            ModelKind::from_u32(kind),
            Some(config_json),
            Sampler::seeded(u64::from(seed)),
        )
        .map_err(to_js)
    }

    /// Like `from_config`, seeded from the browser's entropy source.
    pub fn with_entropy(kind: u32, config_json: &str) -> Result<Sim, JsError> {
        let sampler = Sampler::from_entropy().map_err(|e| to_js(e.into()))?;
        Sim::build(ModelKind::from_u32(kind), Some(config_json), sampler).map_err(to_js)
    }

    pub fn spawn(&mut self) -> Result<(), JsError> {
        self.try_spawn().map_err(to_js)
    }

    pub fn spawn_one(&mut self) -> Result<(), JsError> {
        self.try_spawn_one().map_err(to_js)
    }

    pub fn tick(&mut self, dt: f64) -> Result<(), JsError> {
        self.try_tick(dt).map_err(to_js)
    }

    pub fn set_surface(&mut self, name: &str) -> Result<(), JsError> {
        self.try_set_surface(name).map_err(to_js)
    }

    /// Replaces the whole configuration and clears the field.
    pub fn configure(&mut self, config_json: &str) -> Result<(), JsError> {
        self.try_configure(config_json).map_err(to_js)
    }

    pub fn kind(&self) -> u32 {
        self.kind.as_u32()
    }

    pub fn count(&self) -> usize {
        self.render().len()
    }

    /// Interleaved `[x0, y0, x1, y1, ...]`, y pointing up.
    pub fn positions(&self) -> Vec<f64> {
        self.render().positions().to_vec()
    }

    pub fn radii(&self) -> Vec<f64> {
        self.render().radii().to_vec()
    }
}

impl Sim {
    pub fn build(
        kind: ModelKind,
        config_json: Option<&str>,
        sampler: Sampler,
    ) -> Result<Sim, ModelError> {
        let scene = match kind {
            ModelKind::Momentum => {
                let config = parse_or_default::<MomentumConfig>(config_json)?;
                Scene::Momentum(Momentum::new(config, sampler)?)
            }
            ModelKind::Swarm => {
                let config = parse_or_default::<SwarmConfig>(config_json)?;
                Scene::Swarm(Swarm::new(config, sampler)?)
            }
            ModelKind::Flock => {
                let config = parse_or_default::<FlockConfig>(config_json)?;
                Scene::Flock(Flock::new(config, sampler)?)
            }
        };
        log::debug!("sim: built {:?} scene", kind);
        Ok(Sim { kind, scene })
    }

    pub fn try_spawn(&mut self) -> Result<(), ModelError> {
        match &mut self.scene {
            Scene::Momentum(m) => {
                let ranges = m.config().spawn;
                m.spawn(&ranges)?
            }
            Scene::Swarm(s) => {
                let ranges = s.config().spawn;
                s.spawn(&ranges)?
            }
            Scene::Flock(f) => {
                let ranges = f.config().spawn;
                f.spawn(&ranges)?
            }
        }
        Ok(())
    }

    pub fn try_spawn_one(&mut self) -> Result<(), ModelError> {
        match &mut self.scene {
            Scene::Momentum(m) => {
                let ranges = m.config().spawn;
                m.spawn_one(&ranges)?;
                Ok(())
            }
            Scene::Swarm(_) | Scene::Flock(_) => Err(ModelError::Unsupported("spawn_one")),
        }
    }

    pub fn try_tick(&mut self, dt: f64) -> Result<(), ModelError> {
        match &mut self.scene {
            Scene::Momentum(m) => m.tick(dt)?,
            Scene::Swarm(s) => s.tick(dt)?,
            Scene::Flock(f) => f.tick(dt)?,
        }
        Ok(())
    }

    pub fn try_set_surface(&mut self, name: &str) -> Result<(), ModelError> {
        let surface = Surface::from_name(name)?;
        match &mut self.scene {
            Scene::Momentum(m) => m.set_surface(surface),
            Scene::Swarm(s) => s.set_surface(surface),
            Scene::Flock(_) => return Err(ModelError::Unsupported("set_surface")),
        }
        Ok(())
    }

    pub fn try_configure(&mut self, config_json: &str) -> Result<(), ModelError> {
        let sampler = match &self.scene {
            Scene::Momentum(m) => m.sampler().clone(),
            Scene::Swarm(s) => s.sampler().clone(),
            Scene::Flock(f) => f.sampler().clone(),
        };
        *self = Sim::build(self.kind, Some(config_json), sampler)?;
        Ok(())
    }

    pub fn render(&self) -> &RenderBuffers {
        match &self.scene {
            Scene::Momentum(m) => m.render(),
            Scene::Swarm(s) => s.render(),
            Scene::Flock(f) => f.render(),
        }
    }
}

fn parse_or_default<C>(json: Option<&str>) -> Result<C, ModelError>
where
    C: SessionConfig + Default,
{
    match json {
        Some(json) if !json.trim().is_empty() => C::from_json(json),
        _ => Ok(C::default()),
    }
}

fn to_js(e: ModelError) -> JsError {
    JsError::new(&e.to_string())
}
