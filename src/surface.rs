//! Analytic height fields the particles roll on.
//!
//! Every surface exposes a height and its exact gradient. The set of surfaces
//! is closed, so dispatch is a match rather than a trait object.

use std::f64::consts::PI;

use crate::error::{ensure_finite, ensure_positive, ConfigError, SurfaceError};
use crate::math::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Surface {
    /// `a·x² + b·y² + c·xy`
    Quadratic { a: f64, b: f64, c: f64 },
    /// Rosenbrock banana `(a − x)² + b(y − x²)²`
    Rosenbrock { a: f64, b: f64 },
    /// Negative log-density of a centered bivariate normal.
    BivariateNormal(BivariateNormal),
}

impl Default for Surface {
    fn default() -> Self {
        Surface::parabola()
    }
}

impl Surface {
    pub const fn parabola() -> Self {
        Surface::Quadratic {
            a: 2.0,
            b: 2.0,
            c: 0.0,
        }
    }

    pub const fn banana() -> Self {
        Surface::Rosenbrock { a: 1.0, b: 100.0 }
    }

    pub fn quadratic(a: f64, b: f64, c: f64) -> Result<Self, ConfigError> {
        ensure_finite("surface.a", a)?;
        ensure_finite("surface.b", b)?;
        ensure_finite("surface.c", c)?;
        Ok(Surface::Quadratic { a, b, c })
    }

    pub fn rosenbrock(a: f64, b: f64) -> Result<Self, ConfigError> {
        ensure_finite("surface.a", a)?;
        ensure_finite("surface.b", b)?;
        Ok(Surface::Rosenbrock { a, b })
    }

    pub fn bivariate_normal(sdx: f64, sdy: f64, cor: f64) -> Result<Self, ConfigError> {
        Ok(Surface::BivariateNormal(BivariateNormal::new(sdx, sdy, cor)?))
    }

    /// Looks a surface up by the names the page uses, with default parameters.
    pub fn from_name(name: &str) -> Result<Self, SurfaceError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "parabola" | "quadratic" => Ok(Surface::parabola()),
            "banana" | "rosenbrock" => Ok(Surface::banana()),
            "binorm" | "bivariate_normal" => {
                Ok(Surface::BivariateNormal(BivariateNormal::standard()))
            }
            _ => Err(SurfaceError::Unknown(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Surface::Quadratic { .. } => "parabola",
            Surface::Rosenbrock { .. } => "banana",
            Surface::BivariateNormal(_) => "binorm",
        }
    }

    pub fn height(&self, p: Vec2) -> f64 {
        match *self {
            Surface::Quadratic { a, b, c } => a * p.x * p.x + b * p.y * p.y + c * p.x * p.y,
            Surface::Rosenbrock { a, b } => {
                let dy = p.y - p.x * p.x;
                (a - p.x) * (a - p.x) + b * dy * dy
            }
            Surface::BivariateNormal(ref n) => n.height(p),
        }
    }

    pub fn gradient(&self, p: Vec2) -> Vec2 {
        match *self {
            Surface::Quadratic { a, b, c } => {
                Vec2::new(2.0 * a * p.x + c * p.y, 2.0 * b * p.y + c * p.x)
            }
            Surface::Rosenbrock { a, b } => Vec2::new(
                -2.0 * a + 4.0 * b * p.x * p.x * p.x - 4.0 * b * p.x * p.y + 2.0 * p.x,
                2.0 * b * (p.y - p.x * p.x),
            ),
            Surface::BivariateNormal(ref n) => n.gradient(p),
        }
    }
}

/// Centered bivariate normal with its normalisation terms computed once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BivariateNormal {
    sdx: f64,
    sdy: f64,
    cor: f64,
    log_norm: f64,
    fact: f64,
    sdx2: f64,
    sdy2: f64,
    sdxy: f64,
}

impl BivariateNormal {
    pub fn new(sdx: f64, sdy: f64, cor: f64) -> Result<Self, ConfigError> {
        ensure_positive("surface.sdx", sdx)?;
        ensure_positive("surface.sdy", sdy)?;
        ensure_finite("surface.cor", cor)?;
        if cor <= -1.0 || cor >= 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "surface.cor",
                value: cor,
                min: -1.0,
                max: 1.0,
            });
        }

        let one_minus_r2 = 1.0 - cor * cor;
        Ok(Self {
            sdx,
            sdy,
            cor,
            log_norm: (2.0 * PI * sdx * sdy * one_minus_r2.sqrt()).ln(),
            fact: 1.0 / (2.0 * one_minus_r2),
            sdx2: sdx * sdx,
            sdy2: sdy * sdy,
            sdxy: sdx * sdy,
        })
    }

    pub fn standard() -> Self {
        Self {
            sdx: 0.5,
            sdy: 0.5,
            cor: 0.0,
            log_norm: (2.0 * PI * 0.25).ln(),
            fact: 0.5,
            sdx2: 0.25,
            sdy2: 0.25,
            sdxy: 0.25,
        }
    }

    pub fn params(&self) -> (f64, f64, f64) {
        (self.sdx, self.sdy, self.cor)
    }

    pub fn height(&self, p: Vec2) -> f64 {
        let quad = p.x * p.x / self.sdx2 - 2.0 * self.cor * p.x * p.y / self.sdxy
            + p.y * p.y / self.sdy2;
        self.log_norm + self.fact * quad
    }

    pub fn gradient(&self, p: Vec2) -> Vec2 {
        let ddx = 2.0 * p.x / self.sdx2 - 2.0 * self.cor * p.y / self.sdxy;
        let ddy = 2.0 * p.y / self.sdy2 - 2.0 * self.cor * p.x / self.sdxy;
        Vec2::new(self.fact * ddx, self.fact * ddy)
    }
}
