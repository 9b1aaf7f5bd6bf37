//! Anchor point generation.
//!
//! Every animated shape is seeded by one [`AnchorPoint`]. Sets are either laid
//! out by hand ([`fixed_layout`]) or drawn from a seeded RNG ([`generate`]).

use glam::Vec3;
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Half extent of the cube random positions are drawn from.
pub const SPAWN_EXTENT: f32 = 5.0;

/// A point that seeds one expanded shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPoint {
    pub position: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl AnchorPoint {
    pub fn new(position: Vec3, direction: Vec3) -> Self {
        Self {
            position,
            direction: direction.try_normalize().unwrap_or(Vec3::Y),
        }
    }
}

/// How the random generator is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SeedPolicy {
    /// Seed from the operating system, different every run.
    #[default]
    Entropy,
    /// Reproducible sets.
    Fixed(u64),
}

impl SeedPolicy {
    /// A sibling policy for another set, so two sets drawn from one fixed
    /// seed differ.
    pub fn derive(self, salt: u64) -> Self {
        match self {
            SeedPolicy::Entropy => SeedPolicy::Entropy,
            SeedPolicy::Fixed(seed) => SeedPolicy::Fixed(seed.wrapping_add(salt)),
        }
    }
}

impl From<Option<u64>> for SeedPolicy {
    fn from(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => SeedPolicy::Fixed(seed),
            None => SeedPolicy::Entropy,
        }
    }
}

/// Draws `count` anchors with positions uniform in `[-5, 5]^3`.
///
/// Directions are built from components uniform in `[0, 1]` and then
/// normalized, so every direction lies in the positive octant.
pub fn generate(count: usize, seed: SeedPolicy) -> Vec<AnchorPoint> {
    let mut rng = match seed {
        SeedPolicy::Entropy => StdRng::from_os_rng(),
        SeedPolicy::Fixed(seed) => StdRng::seed_from_u64(seed),
    };

    (0..count)
        .map(|_| {
            let position = Vec3::new(
                rng.random_range(-SPAWN_EXTENT..=SPAWN_EXTENT),
                rng.random_range(-SPAWN_EXTENT..=SPAWN_EXTENT),
                rng.random_range(-SPAWN_EXTENT..=SPAWN_EXTENT),
            );
            let direction = Vec3::new(
                rng.random_range(0.0..=1.0),
                rng.random_range(0.0..=1.0),
                rng.random_range(0.0..=1.0),
            );
            AnchorPoint::new(position, direction)
        })
        .collect()
}

/// Distance between the centres of two face-adjacent shapes of scale `a`
/// along an axis.
pub fn cell_height(a: f32) -> f32 {
    2.0 * (2.0 * 2.0_f32.sqrt() / 2.0 * a)
}

/// The hand-placed ten point layout: a 3x2 grid in the XZ plane plus four
/// body centred points, which packs the expanded shapes face to face.
pub fn fixed_layout(a: f32) -> Vec<AnchorPoint> {
    let height = cell_height(a);
    let half = height / 2.0;

    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(height, 0.0, 0.0),
        Vec3::new(-height, 0.0, 0.0),
        Vec3::new(0.0, 0.0, height),
        Vec3::new(height, 0.0, height),
        Vec3::new(-height, 0.0, height),
        Vec3::new(half, half, half),
        Vec3::new(-half, half, half),
        Vec3::new(half, -half, half),
        Vec3::new(-half, -half, half),
    ]
    .into_iter()
    .map(|position| AnchorPoint::new(position, Vec3::Y))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set() {
        assert!(generate(0, SeedPolicy::Fixed(7)).is_empty());
    }

    #[test]
    fn test_random_bounds_and_bias() {
        let anchors = generate(500, SeedPolicy::Fixed(42));
        assert_eq!(anchors.len(), 500);
        for anchor in &anchors {
            assert!(anchor.position.abs().max_element() <= SPAWN_EXTENT);
            assert!((anchor.direction.length() - 1.0).abs() < 1e-5);
            assert!(anchor.direction.min_element() >= 0.0);
        }
    }

    #[test]
    fn test_fixed_seed_is_reproducible() {
        let a = generate(32, SeedPolicy::Fixed(1234));
        let b = generate(32, SeedPolicy::Fixed(1234));
        assert_eq!(a, b);
        assert_ne!(a, generate(32, SeedPolicy::Fixed(4321)));
    }

    #[test]
    fn test_derived_seeds_differ() {
        let seed = SeedPolicy::Fixed(5);
        assert_eq!(seed.derive(0), seed);
        assert_ne!(generate(8, seed.derive(1)), generate(8, seed.derive(2)));
        assert_eq!(SeedPolicy::Entropy.derive(3), SeedPolicy::Entropy);
    }

    #[test]
    fn test_fixed_layout_literals() {
        let anchors = fixed_layout(1.0);
        let height = 2.0 * (2.0 * 2.0_f32.sqrt() / 2.0);
        assert_eq!(anchors.len(), 10);
        assert_eq!(anchors[0].position, Vec3::ZERO);
        assert_eq!(anchors[1].position, Vec3::new(height, 0.0, 0.0));
        assert_eq!(anchors[2].position, Vec3::new(-height, 0.0, 0.0));
        assert_eq!(anchors[4].position, Vec3::new(height, 0.0, height));
        assert_eq!(
            anchors[9].position,
            Vec3::new(-height / 2.0, -height / 2.0, height / 2.0)
        );
        assert_eq!(fixed_layout(1.0), anchors);
    }
}
