//! Per-frame displacement of anchor points.
//!
//! [`AnimatorState`] owns the anchors, the displaced position buffer and the
//! time accumulator of one demo variant. The frame driver calls
//! [`AnimatorState::advance`] once per frame and hands
//! [`AnimatorState::current_positions`] (or [`AnimatorState::phase`]) to the
//! draw stage.

use glam::Vec3;
use rayon::prelude::*;

use crate::anchor::AnchorPoint;

/// Allowed range for the oscillation intensity.
pub const INTENSITY_RANGE: (f32, f32) = (-5.0, 5.0);

/// Point sets at least this large are recomputed in parallel.
pub const PARALLEL_THRESHOLD: usize = 4096;

/// How the oscillation is consumed by the draw stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplacementMode {
    /// Every anchor is pushed along its own direction.
    PerPoint,
    /// Anchors stay put; a single `[0, 1]` phase drives a blend instead.
    ScalarPhase,
}

pub struct AnimatorState {
    anchors: Vec<AnchorPoint>,
    displaced: Vec<Vec3>,
    time: f64,
    mode: DisplacementMode,
    intensity: f32,
    pub playing: bool,
}

impl AnimatorState {
    pub fn new(anchors: Vec<AnchorPoint>, mode: DisplacementMode) -> Self {
        let displaced = anchors.iter().map(|anchor| anchor.position).collect();
        let mut state = Self {
            anchors,
            displaced,
            time: 0.0,
            mode,
            intensity: 1.0,
            playing: true,
        };
        state.recompute();
        state
    }

    /// Advances the time accumulator by `dt` seconds (if playing) and
    /// recomputes the displaced positions.
    pub fn advance(&mut self, dt: f32) {
        debug_assert!(dt >= 0.0, "negative frame delta {dt}");
        if self.playing {
            self.time += f64::from(dt.max(0.0));
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        match self.mode {
            DisplacementMode::PerPoint => {
                let offset = self.intensity * self.time.sin() as f32;
                let displace = |(out, anchor): (&mut Vec3, &AnchorPoint)| {
                    *out = anchor.position + offset * anchor.direction;
                };
                if self.anchors.len() >= PARALLEL_THRESHOLD {
                    self.displaced
                        .par_iter_mut()
                        .zip(self.anchors.par_iter())
                        .for_each(displace);
                } else {
                    self.displaced
                        .iter_mut()
                        .zip(self.anchors.iter())
                        .for_each(displace);
                }
            }
            DisplacementMode::ScalarPhase => {
                for (out, anchor) in self.displaced.iter_mut().zip(&self.anchors) {
                    *out = anchor.position;
                }
            }
        }
    }

    pub fn current_positions(&self) -> &[Vec3] {
        &self.displaced
    }

    pub fn anchors(&self) -> &[AnchorPoint] {
        &self.anchors
    }

    /// `(sin(time) + 1) / 2`, always within `[0, 1]`.
    pub fn phase(&self) -> f32 {
        ((self.time.sin() + 1.0) / 2.0) as f32
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn mode(&self) -> DisplacementMode {
        self.mode
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Sets the intensity, clamped to [`INTENSITY_RANGE`]. Takes effect on
    /// the next [`advance`](Self::advance).
    pub fn set_intensity(&mut self, intensity: f32) {
        let (min, max) = INTENSITY_RANGE;
        if intensity.is_finite() {
            self.intensity = intensity.clamp(min, max);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::anchor::{SeedPolicy, fixed_layout, generate};

    fn swarm(count: usize) -> AnimatorState {
        AnimatorState::new(generate(count, SeedPolicy::Fixed(9)), DisplacementMode::PerPoint)
    }

    #[test]
    fn test_buffer_matches_anchor_count() {
        for count in [0, 1, 37, PARALLEL_THRESHOLD + 3] {
            let mut state = swarm(count);
            state.advance(0.016);
            assert_eq!(state.current_positions().len(), state.anchors().len());
        }
    }

    #[test]
    fn test_accumulation_is_associative() {
        let mut stepped = swarm(16);
        for dt in [0.1, 0.25, 0.016, 0.5, 0.134] {
            stepped.advance(dt);
        }
        let mut single = swarm(16);
        single.advance(0.1 + 0.25 + 0.016 + 0.5 + 0.134);

        assert!((stepped.time() - single.time()).abs() < 1e-6);
        for (a, b) in stepped.current_positions().iter().zip(single.current_positions()) {
            assert!(a.abs_diff_eq(*b, 1e-5));
        }
    }

    #[test]
    fn test_rest_at_multiples_of_pi() {
        for intensity in [-5.0, -1.0, 0.5, 3.0] {
            let mut state = swarm(20);
            state.set_intensity(intensity);
            state.advance(PI as f32);
            for (displaced, anchor) in state.current_positions().iter().zip(state.anchors()) {
                assert!(displaced.abs_diff_eq(anchor.position, 1e-4));
            }
            state.advance(PI as f32);
            for (displaced, anchor) in state.current_positions().iter().zip(state.anchors()) {
                assert!(displaced.abs_diff_eq(anchor.position, 1e-4));
            }
        }
    }

    #[test]
    fn test_peak_displacement() {
        let mut state = swarm(8);
        state.set_intensity(2.0);
        state.advance(std::f32::consts::FRAC_PI_2);
        for (displaced, anchor) in state.current_positions().iter().zip(state.anchors()) {
            let expected = anchor.position + 2.0 * anchor.direction;
            assert!(displaced.abs_diff_eq(expected, 1e-4));
        }
    }

    #[test]
    fn test_zero_advance_is_noop() {
        let mut state = swarm(12);
        state.advance(0.7);
        let before = state.current_positions().to_vec();
        state.advance(0.0);
        assert_eq!(state.current_positions(), before.as_slice());
    }

    #[test]
    fn test_paused_does_not_accumulate() {
        let mut state = swarm(4);
        state.advance(1.0);
        state.playing = false;
        state.advance(3.0);
        assert_eq!(state.time(), 1.0);
    }

    #[test]
    fn test_intensity_is_clamped() {
        let mut state = swarm(1);
        state.set_intensity(12.0);
        assert_eq!(state.intensity(), 5.0);
        state.set_intensity(-9.0);
        assert_eq!(state.intensity(), -5.0);
        state.set_intensity(f32::NAN);
        assert_eq!(state.intensity(), -5.0);
    }

    #[test]
    fn test_scalar_phase_keeps_layout() {
        let anchors = fixed_layout(1.0);
        let mut state = AnimatorState::new(anchors.clone(), DisplacementMode::ScalarPhase);
        assert!((state.phase() - 0.5).abs() < 1e-6);
        for dt in [0.3, 1.1, 2.9] {
            state.advance(dt);
            assert!((0.0..=1.0).contains(&state.phase()));
            for (displaced, anchor) in state.current_positions().iter().zip(&anchors) {
                assert_eq!(*displaced, anchor.position);
            }
        }

        let mut peak = AnimatorState::new(anchors, DisplacementMode::ScalarPhase);
        peak.advance(std::f32::consts::FRAC_PI_2);
        assert!(peak.phase() > 0.999);
    }

    #[test]
    fn test_parallel_path_matches_serial_formula() {
        let mut state = swarm(PARALLEL_THRESHOLD);
        state.advance(1.3);
        let offset = (1.3_f64).sin() as f32;
        for (displaced, anchor) in state.current_positions().iter().zip(state.anchors()) {
            assert!(displaced.abs_diff_eq(anchor.position + offset * anchor.direction, 1e-5));
        }
    }
}
