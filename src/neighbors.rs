use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// How closeness between two positions is scored when picking neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborMetric {
    /// Raw dot product of the two position vectors. Not a distance: it favours
    /// peers on the opposite side of the origin. This is what the demos ship with.
    #[default]
    DotProduct,
    /// Squared Euclidean distance.
    SquaredDistance,
}

impl NeighborMetric {
    pub fn measure(self, from: Vec2, to: Vec2) -> f64 {
        match self {
            NeighborMetric::DotProduct => from.dot(to),
            NeighborMetric::SquaredDistance => {
                let d = to - from;
                d.dot(d)
            }
        }
    }
}

/// Indices of the `k` entries of `positions` with the smallest metric relative
/// to `positions[subject]`, ascending. The subject itself is never returned and
/// ties keep collection order. `k` larger than the population is clamped.
pub fn nearest_neighbors(
    subject: usize,
    positions: &[Vec2],
    k: usize,
    metric: NeighborMetric,
) -> Vec<usize> {
    let Some(&origin) = positions.get(subject) else {
        return Vec::new();
    };
    let cap = k.min(positions.len() - 1);
    if cap == 0 {
        return Vec::new();
    }

    let mut scores: Vec<f64> = Vec::with_capacity(cap + 1);
    let mut picked: Vec<usize> = Vec::with_capacity(cap + 1);

    for (j, &candidate) in positions.iter().enumerate() {
        if j == subject {
            continue;
        }
        let score = metric.measure(origin, candidate);

        // strict comparison keeps earlier entries ahead on ties
        let mut insert_at = picked.len();
        while insert_at > 0 && score < scores[insert_at - 1] {
            insert_at -= 1;
        }
        if insert_at < cap {
            scores.insert(insert_at, score);
            picked.insert(insert_at, j);
            scores.truncate(cap);
            picked.truncate(cap);
        }
    }

    picked
}

#[cfg(test)]
mod tests {
    use super::{nearest_neighbors, NeighborMetric};
    use crate::math::Vec2;

    fn line(xs: &[f64]) -> Vec<Vec2> {
        xs.iter().map(|&x| Vec2::new(x, 0.0)).collect()
    }

    #[test]
    fn dot_product_ranks_by_projection_not_distance() {
        let positions = line(&[1.0, 1.1, -3.0, 0.5]);
        // from x=1 the dot product is just the other x, so -3 ranks first
        assert_eq!(
            nearest_neighbors(0, &positions, 2, NeighborMetric::DotProduct),
            vec![2, 3]
        );
        assert_eq!(
            nearest_neighbors(0, &positions, 2, NeighborMetric::SquaredDistance),
            vec![1, 3]
        );
    }

    #[test]
    fn never_includes_subject() {
        let positions = line(&[-10.0, 0.0, 1.0]);
        let picked = nearest_neighbors(0, &positions, 5, NeighborMetric::SquaredDistance);
        assert!(!picked.contains(&0));
    }

    #[test]
    fn k_is_clamped_to_population() {
        let positions = line(&[0.0, 1.0, 2.0, 3.0]);
        let picked = nearest_neighbors(1, &positions, 10, NeighborMetric::DotProduct);
        assert_eq!(picked.len(), 3);
        assert_eq!(picked, vec![0, 2, 3]);
    }

    #[test]
    fn ties_keep_collection_order() {
        let positions = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(-1.0, 0.0),
        ];
        // from the origin every dot product is zero
        assert_eq!(
            nearest_neighbors(0, &positions, 2, NeighborMetric::DotProduct),
            vec![1, 2]
        );
    }

    #[test]
    fn lone_entity_and_zero_k_have_no_neighbors() {
        let positions = line(&[1.0]);
        assert!(nearest_neighbors(0, &positions, 3, NeighborMetric::DotProduct).is_empty());
        let positions = line(&[1.0, 2.0]);
        assert!(nearest_neighbors(0, &positions, 0, NeighborMetric::DotProduct).is_empty());
        assert!(nearest_neighbors(7, &positions, 1, NeighborMetric::DotProduct).is_empty());
    }
}
