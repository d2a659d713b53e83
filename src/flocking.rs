//! Separation, alignment and cohesion terms for one entity.

use crate::math::Vec2;

/// A neighbor as seen at the start of the tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peer {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Importance of the neighbor; only [`Neighborhood::gather_weighted`] reads it.
    pub mass: f64,
}

/// Flock-derived terms for one entity. All three are zero when there are no
/// neighbors, which is the same as switching the behavior off.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Neighborhood {
    /// Mean of `self − neighbor` over all neighbors.
    pub separation: Vec2,
    /// Mean neighbor velocity.
    pub alignment: Vec2,
    /// From `self` to the neighbor centroid.
    pub cohesion: Vec2,
    pub count: usize,
}

impl Neighborhood {
    /// Plain means over `peers`.
    pub fn gather<I>(position: Vec2, peers: I) -> Self
    where
        I: IntoIterator<Item = Peer>,
    {
        Self::accumulate(position, peers, |_| 1.0)
    }

    /// Means weighted by each peer's importance, `Σ mⱼ·termⱼ / Σ mⱼ`.
    /// Same as [`gather`](Self::gather) when every mass is equal.
    pub fn gather_weighted<I>(position: Vec2, peers: I) -> Self
    where
        I: IntoIterator<Item = Peer>,
    {
        Self::accumulate(position, peers, |peer| peer.mass)
    }

    fn accumulate<I, W>(position: Vec2, peers: I, weight: W) -> Self
    where
        I: IntoIterator<Item = Peer>,
        W: Fn(&Peer) -> f64,
    {
        let mut separation = Vec2::ZERO;
        let mut alignment = Vec2::ZERO;
        let mut centroid = Vec2::ZERO;
        let mut total = 0.0;
        let mut count = 0usize;

        for peer in peers {
            let w = weight(&peer);
            separation += (position - peer.position) * w;
            alignment += peer.velocity * w;
            centroid += peer.position * w;
            total += w;
            count += 1;
        }

        if count == 0 || total <= 0.0 {
            return Self::default();
        }

        let inv = 1.0 / total;
        Self {
            separation: separation * inv,
            alignment: alignment * inv,
            cohesion: centroid * inv - position,
            count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::{Neighborhood, Peer};
    use crate::math::Vec2;

    #[test]
    fn empty_neighborhood_is_zero() {
        let hood = Neighborhood::gather(Vec2::new(3.0, -1.0), std::iter::empty());
        assert!(hood.is_empty());
        assert_eq!(hood.separation, Vec2::ZERO);
        assert_eq!(hood.alignment, Vec2::ZERO);
        assert_eq!(hood.cohesion, Vec2::ZERO);
    }

    #[test]
    fn terms_average_over_peers() {
        let peers = [
            Peer {
                position: Vec2::new(2.0, 0.0),
                velocity: Vec2::new(1.0, 0.0),
                mass: 1.0,
            },
            Peer {
                position: Vec2::new(0.0, 2.0),
                velocity: Vec2::new(0.0, 1.0),
                mass: 1.0,
            },
        ];
        let hood = Neighborhood::gather(Vec2::ZERO, peers);
        assert_eq!(hood.count, 2);
        assert_eq!(hood.separation, Vec2::new(-1.0, -1.0));
        assert_eq!(hood.alignment, Vec2::new(0.5, 0.5));
        assert_eq!(hood.cohesion, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn heavy_neighbor_pulls_the_centroid() {
        let light = Peer {
            position: Vec2::new(-1.0, 0.0),
            velocity: Vec2::new(0.0, -1.0),
            mass: 1.0,
        };
        let heavy = Peer {
            position: Vec2::new(1.0, 0.0),
            velocity: Vec2::new(0.0, 1.0),
            mass: 3.0,
        };
        let plain = Neighborhood::gather(Vec2::ZERO, [light, heavy]);
        assert_eq!(plain.cohesion, Vec2::ZERO);

        let hood = Neighborhood::gather_weighted(Vec2::ZERO, [light, heavy]);
        assert_eq!(hood.count, 2);
        // (-1·1 + 1·3) / 4
        assert!((hood.cohesion.x - 0.5).abs() < 1e-12);
        assert!((hood.separation.x + 0.5).abs() < 1e-12);
        assert!((hood.alignment.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn unit_masses_weight_like_plain_means() {
        let peers = [
            Peer {
                position: Vec2::new(0.5, 2.0),
                velocity: Vec2::new(0.1, 0.0),
                mass: 1.0,
            },
            Peer {
                position: Vec2::new(-1.5, 0.25),
                velocity: Vec2::new(0.0, -0.3),
                mass: 1.0,
            },
        ];
        let origin = Vec2::new(0.2, -0.1);
        let a = Neighborhood::gather(origin, peers);
        let b = Neighborhood::gather_weighted(origin, peers);
        assert!((a.cohesion.x - b.cohesion.x).abs() < 1e-12);
        assert!((a.cohesion.y - b.cohesion.y).abs() < 1e-12);
        assert!((a.alignment.y - b.alignment.y).abs() < 1e-12);
    }
}
