//! Session configuration for the three demos.
//!
//! Every struct deserializes with `#[serde(default)]`, so the page only sends
//! the fields it wants to change, e.g.
//!
//! ```json
//! { "time_scale": 0.05, "surface": { "kind": "binorm", "sdx": 0.5, "sdy": 0.8, "cor": 0.3 } }
//! ```
//!
//! A config is an immutable snapshot. Changing anything means building a new
//! config and respawning.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{
    ensure_finite, ensure_non_negative, ensure_positive, ConfigError, ModelError,
};
use crate::math::Vec2;
use crate::neighbors::NeighborMetric;
use crate::surface::Surface;

/// Half width of the square view box shared by all demos.
pub const VIEW_HALF_EXTENT: f64 = 5.0;
pub const DEFAULT_TIME_SCALE: f64 = 0.05;
pub const DEFAULT_SIZE_RANGE: f64 = 10.0;

pub trait SessionConfig: DeserializeOwned + Sized {
    fn validate(&self) -> Result<(), ConfigError>;

    /// Parses (possibly partial) JSON and validates the result.
    fn from_json(json: &str) -> Result<Self, ModelError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Ranges for uniformly sampled entity state.
///
/// Positions land in `[-0.5, 0.5) · position`, velocities in
/// `[-0.5, 0.5) · velocity · time_scale`, masses in `1 + [0, 1) · mass`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRanges {
    pub count: usize,
    pub position: f64,
    pub velocity: f64,
    pub mass: f64,
}

impl Default for SpawnRanges {
    fn default() -> Self {
        Self {
            count: 50,
            position: 1.5,
            velocity: 0.5,
            mass: 0.0,
        }
    }
}

impl SpawnRanges {
    /// Wide, resting start used by the surface demos. A position range of 8
    /// spreads particles over `[-4, 4)²`, most of the ±5 view box.
    pub const fn scattered(count: usize) -> Self {
        Self {
            count,
            position: 8.0,
            velocity: 0.0,
            mass: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_non_negative("spawn.position", self.position)?;
        ensure_non_negative("spawn.velocity", self.velocity)?;
        ensure_non_negative("spawn.mass", self.mass)?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadraticParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Default for QuadraticParams {
    fn default() -> Self {
        Self {
            a: 2.0,
            b: 2.0,
            c: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosenbrockParams {
    pub a: f64,
    pub b: f64,
}

impl Default for RosenbrockParams {
    fn default() -> Self {
        Self { a: 1.0, b: 100.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BivariateNormalParams {
    pub sdx: f64,
    pub sdy: f64,
    pub cor: f64,
}

impl Default for BivariateNormalParams {
    fn default() -> Self {
        Self {
            sdx: 0.5,
            sdy: 0.5,
            cor: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SurfaceConfig {
    Parabola(QuadraticParams),
    Banana(RosenbrockParams),
    Binorm(BivariateNormalParams),
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        SurfaceConfig::Parabola(QuadraticParams::default())
    }
}

impl SurfaceConfig {
    pub fn build(&self) -> Result<Surface, ConfigError> {
        match *self {
            SurfaceConfig::Parabola(p) => Surface::quadratic(p.a, p.b, p.c),
            SurfaceConfig::Banana(p) => Surface::rosenbrock(p.a, p.b),
            SurfaceConfig::Binorm(p) => Surface::bivariate_normal(p.sdx, p.sdy, p.cor),
        }
    }
}

fn validate_common(time_scale: f64, size_range: f64) -> Result<(), ConfigError> {
    ensure_positive("time_scale", time_scale)?;
    ensure_finite("size_range", size_range)
}

/// Particles rolling down a surface, no interaction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    pub surface: SurfaceConfig,
    #[serde(flatten)]
    pub display: DisplayConfig,
    pub spawn: SpawnRanges,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceConfig::default(),
            display: DisplayConfig::default(),
            spawn: SpawnRanges::scattered(100),
        }
    }
}

impl SessionConfig for MomentumConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.surface.build()?;
        validate_common(self.display.time_scale, self.display.size_range)?;
        self.spawn.validate()
    }
}

/// Step scaling and particle sizing shared by the surface demos.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Multiplies every `dt` handed to `tick`.
    pub time_scale: f64,
    /// Spread of the height-dependent particle radius.
    pub size_range: f64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
            size_range: DEFAULT_SIZE_RANGE,
        }
    }
}

/// Per-axis weights of the terms blended by a swarm particle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmWeights {
    pub surface: Vec2,
    pub separation: Vec2,
    pub alignment: Vec2,
    pub cohesion: Vec2,
}

impl Default for SwarmWeights {
    fn default() -> Self {
        Self {
            surface: Vec2::splat(1.0),
            separation: Vec2::splat(0.33),
            alignment: Vec2::splat(0.33),
            cohesion: Vec2::splat(0.33),
        }
    }
}

impl SwarmWeights {
    fn validate(&self) -> Result<(), ConfigError> {
        for (field, w) in [
            ("weights.surface", self.surface),
            ("weights.separation", self.separation),
            ("weights.alignment", self.alignment),
            ("weights.cohesion", self.cohesion),
        ] {
            if !w.is_finite() {
                return Err(ConfigError::NotFinite { field });
            }
        }
        Ok(())
    }
}

/// Particles descending a surface while flocking with their nearest peers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmConfig {
    pub surface: SurfaceConfig,
    #[serde(flatten)]
    pub display: DisplayConfig,
    pub neighbors: usize,
    pub metric: NeighborMetric,
    pub weights: SwarmWeights,
    pub spawn: SpawnRanges,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            surface: SurfaceConfig::default(),
            display: DisplayConfig::default(),
            neighbors: 5,
            metric: NeighborMetric::default(),
            weights: SwarmWeights::default(),
            spawn: SpawnRanges::scattered(50),
        }
    }
}

impl SessionConfig for SwarmConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.surface.build()?;
        validate_common(self.display.time_scale, self.display.size_range)?;
        if self.neighbors == 0 {
            return Err(ConfigError::InvalidCount {
                field: "neighbors",
                value: 0,
            });
        }
        self.weights.validate()?;
        self.spawn.validate()
    }
}

/// Neighbor count and weight of one flocking behavior.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Behavior {
    pub neighbors: usize,
    pub weight: f64,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            neighbors: 5,
            weight: 0.5,
        }
    }
}

impl Behavior {
    fn validate(
        &self,
        count_field: &'static str,
        weight_field: &'static str,
    ) -> Result<(), ConfigError> {
        if self.neighbors == 0 {
            return Err(ConfigError::InvalidCount {
                field: count_field,
                value: 0,
            });
        }
        ensure_finite(weight_field, self.weight)
    }
}

/// Birds flocking without a surface inside a square domain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockConfig {
    pub time_scale: f64,
    /// Birds beyond `±half_extent` on either axis leave the flock.
    pub half_extent: f64,
    /// Magnitude of the per-axis uniform velocity noise.
    pub jitter: f64,
    pub metric: NeighborMetric,
    pub separation: Behavior,
    pub alignment: Behavior,
    pub cohesion: Behavior,
    /// Weight of the pull toward the origin.
    pub centering: f64,
    pub spawn: SpawnRanges,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            time_scale: DEFAULT_TIME_SCALE,
            half_extent: VIEW_HALF_EXTENT,
            jitter: 0.1,
            metric: NeighborMetric::default(),
            separation: Behavior {
                neighbors: 5,
                weight: 0.1,
            },
            alignment: Behavior::default(),
            cohesion: Behavior::default(),
            centering: 0.05,
            spawn: SpawnRanges::default(),
        }
    }
}

impl FlockConfig {
    /// Largest k over all behaviors; one selection pass serves all three.
    pub fn max_neighbors(&self) -> usize {
        self.separation
            .neighbors
            .max(self.alignment.neighbors)
            .max(self.cohesion.neighbors)
    }
}

impl SessionConfig for FlockConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        ensure_positive("time_scale", self.time_scale)?;
        ensure_positive("half_extent", self.half_extent)?;
        ensure_non_negative("jitter", self.jitter)?;
        self.separation
            .validate("separation.neighbors", "separation.weight")?;
        self.alignment
            .validate("alignment.neighbors", "alignment.weight")?;
        self.cohesion
            .validate("cohesion.neighbors", "cohesion.weight")?;
        ensure_finite("centering", self.centering)?;
        self.spawn.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{
        FlockConfig, MomentumConfig, SessionConfig, SpawnRanges, SurfaceConfig, SwarmConfig,
        VIEW_HALF_EXTENT,
    };
    use crate::error::{ConfigError, ModelError};
    use crate::neighbors::NeighborMetric;
    use crate::surface::Surface;

    #[test]
    fn defaults_validate() {
        assert!(MomentumConfig::default().validate().is_ok());
        assert!(SwarmConfig::default().validate().is_ok());
        assert!(FlockConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = FlockConfig::from_json(r#"{ "jitter": 0.3, "cohesion": { "weight": 1.0 } }"#)
            .unwrap();
        assert_eq!(config.jitter, 0.3);
        assert_eq!(config.cohesion.weight, 1.0);
        assert_eq!(config.cohesion.neighbors, 5);
        assert_eq!(config.half_extent, 5.0);
        assert_eq!(config.metric, NeighborMetric::DotProduct);
    }

    #[test]
    fn surface_is_selected_by_kind() {
        let config = MomentumConfig::from_json(
            r#"{ "surface": { "kind": "banana" }, "time_scale": 0.1 }"#,
        )
        .unwrap();
        assert_eq!(config.surface.build().unwrap(), Surface::banana());
        assert_eq!(config.display.time_scale, 0.1);
    }

    #[test]
    fn zero_neighbor_count_is_a_config_error() {
        let err = SwarmConfig::from_json(r#"{ "neighbors": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Config(ConfigError::InvalidCount { field: "neighbors", .. })
        ));

        let mut flock = FlockConfig::default();
        flock.alignment.neighbors = 0;
        assert!(flock.validate().is_err());
    }

    #[test]
    fn invalid_surface_parameters_fail_validation() {
        let config = MomentumConfig {
            surface: SurfaceConfig::Binorm(super::BivariateNormalParams {
                sdx: 0.5,
                sdy: 0.5,
                cor: 1.0,
            }),
            ..MomentumConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            FlockConfig::from_json("{ not json"),
            Err(ModelError::Json(_))
        ));
    }

    #[test]
    fn negative_spread_is_rejected() {
        let mut config = FlockConfig::default();
        config.spawn.mass = -2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn scattered_spawn_fits_the_view_box() {
        let ranges = SpawnRanges::scattered(10);
        assert!(ranges.position / 2.0 < VIEW_HALF_EXTENT);
        assert!(ranges.position / 2.0 > 0.5 * VIEW_HALF_EXTENT);
        assert_eq!(ranges.velocity, 0.0);
    }
}
