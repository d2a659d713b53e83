use momentum_wasm::bird::Bird;
use momentum_wasm::config::{FlockConfig, MomentumConfig, SpawnRanges, SwarmConfig};
use momentum_wasm::neighbors::{nearest_neighbors, NeighborMetric};
use momentum_wasm::particle::Particle;
use momentum_wasm::spawn::Sampler;
use momentum_wasm::{Flock, Momentum, Surface, Swarm, Vec2};

/// Config with `time_scale = 1` so `tick(dt)` steps by exactly `dt`.
fn unscaled_momentum() -> Momentum {
    let mut config = MomentumConfig::default();
    config.display.time_scale = 1.0;
    Momentum::new(config, Sampler::seeded(0)).unwrap()
}

// ==================================================================================
// Surface descent
// ==================================================================================

#[test]
fn parabola_descent_single_step() {
    let surface = Surface::quadratic(2.0, 2.0, 0.0).unwrap();
    assert_eq!(surface.gradient(Vec2::new(1.0, 0.0)), Vec2::new(4.0, 0.0));

    let mut m = unscaled_momentum();
    m.push(Particle::new(Vec2::new(1.0, 0.0), Vec2::ZERO, 1.0).unwrap());
    m.tick(0.1).unwrap();

    let p = m.particles()[0];
    assert!((p.velocity.x + 0.4).abs() < 1e-12, "velocity {:?}", p.velocity);
    assert_eq!(p.velocity.y, 0.0);
    // x' = x + v' = 1 - 0.4
    assert!((p.position.x - 0.6).abs() < 1e-12, "position {:?}", p.position);
}

#[test]
fn momentum_carries_particles_past_the_minimum() {
    let mut m = unscaled_momentum();
    m.push(Particle::at_rest(Vec2::new(1.0, 0.0)));
    let mut crossed = false;
    for _ in 0..20 {
        m.tick(0.05).unwrap();
        crossed |= m.particles()[0].position.x < 0.0;
    }
    assert!(crossed);
}

#[test]
fn banana_descent_stays_finite_for_small_steps() {
    let mut config = MomentumConfig::default();
    config.surface = momentum_wasm::config::SurfaceConfig::Banana(Default::default());
    let mut m = Momentum::new(config, Sampler::seeded(4)).unwrap();
    m.spawn(&SpawnRanges {
        count: 20,
        position: 1.0,
        velocity: 0.0,
        mass: 1.0,
    })
    .unwrap();
    for _ in 0..50 {
        m.tick(0.01).unwrap();
    }
    assert!(m.particles().iter().all(|p| p.position.is_finite()));
}

// ==================================================================================
// Neighbor selection
// ==================================================================================

#[test]
fn oversized_k_returns_everyone_else() {
    let positions: Vec<Vec2> = (0..4).map(|i| Vec2::new(i as f64, 1.0)).collect();
    for subject in 0..positions.len() {
        let picked = nearest_neighbors(subject, &positions, 50, NeighborMetric::DotProduct);
        assert_eq!(picked.len(), positions.len() - 1);
        assert!(!picked.contains(&subject));
    }
}

// ==================================================================================
// Swarm
// ==================================================================================

#[test]
fn swarm_without_neighbors_matches_plain_descent() {
    let mut s = Swarm::new(SwarmConfig::default(), Sampler::seeded(1)).unwrap();
    let start = Particle::new(Vec2::new(-1.5, 0.5), Vec2::new(0.02, 0.0), 2.0).unwrap();
    s.push(start);

    let mut m = Momentum::new(MomentumConfig::default(), Sampler::seeded(1)).unwrap();
    m.push(start);

    for _ in 0..10 {
        s.tick(1.0).unwrap();
        m.tick(1.0).unwrap();
    }
    assert_eq!(s.particles()[0], m.particles()[0]);
}

// ==================================================================================
// Flock
// ==================================================================================

#[test]
fn birds_leaving_the_view_box_are_dropped() {
    let mut f = Flock::new(FlockConfig::default(), Sampler::seeded(8)).unwrap();
    f.push(Bird::new(Vec2::new(5.5, 0.0), Vec2::ZERO, 1.0).unwrap());
    f.push(Bird::new(Vec2::new(-0.5, 0.5), Vec2::ZERO, 1.0).unwrap());
    f.push(Bird::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, -8.0), 1.0).unwrap());
    f.tick(1.0).unwrap();

    assert_eq!(f.birds().len(), 1);
    assert!(f.birds()[0].is_inside(5.0));
}

#[test]
fn flock_stays_together_for_a_while() {
    let mut f = Flock::new(FlockConfig::default(), Sampler::seeded(21)).unwrap();
    f.spawn(&SpawnRanges::default()).unwrap();
    for _ in 0..100 {
        f.tick(1.0).unwrap();
    }
    assert!(!f.birds().is_empty());
    assert!(f.birds().iter().all(|b| b.is_inside(5.0)));
    assert_eq!(f.render().len(), f.birds().len());
}
