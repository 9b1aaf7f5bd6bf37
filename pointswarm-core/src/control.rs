//! Requests from input handlers to the render loop.
//!
//! Input callbacks only push plain [`ControlRequest`] values. The frame driver
//! drains the [`ControlQueue`] at the start of the next frame, so nothing
//! touches animator state while a draw is in progress.

use std::{collections::VecDeque, fmt};

use serde::{Deserialize, Serialize};

/// The selectable demos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Random points, displaced per point, inline shaders.
    Swarm,
    /// Fixed layout driven by a single phase, shaders from disk.
    Honeycomb,
    /// Random points, displaced per point, shaders from disk.
    Cloud,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::Swarm, Variant::Honeycomb, Variant::Cloud];

    pub fn next(self) -> Self {
        match self {
            Variant::Swarm => Variant::Honeycomb,
            Variant::Honeycomb => Variant::Cloud,
            Variant::Cloud => Variant::Swarm,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Variant::Swarm => 0,
            Variant::Honeycomb => 1,
            Variant::Cloud => 2,
        }
    }

    /// Directory name under the shader root, also used as the program name.
    pub fn name(self) -> &'static str {
        match self {
            Variant::Swarm => "swarm",
            Variant::Honeycomb => "honeycomb",
            Variant::Cloud => "cloud",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlRequest {
    SelectVariant(Variant),
    NextVariant,
    SetIntensity(f32),
    NudgeIntensity(f32),
    TogglePlay,
    Reload,
}

#[derive(Debug, Default)]
pub struct ControlQueue {
    pending: VecDeque<ControlRequest>,
}

impl ControlQueue {
    pub fn push(&mut self, request: ControlRequest) {
        self.pending.push_back(request);
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and yields every pending request in arrival order.
    pub fn drain(&mut self) -> impl Iterator<Item = ControlRequest> + '_ {
        self.pending.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_cycle() {
        let mut variant = Variant::Swarm;
        for expected in [Variant::Honeycomb, Variant::Cloud, Variant::Swarm] {
            variant = variant.next();
            assert_eq!(variant, expected);
        }
        for (i, variant) in Variant::ALL.iter().enumerate() {
            assert_eq!(variant.index(), i);
        }
    }

    #[test]
    fn test_queue_drains_in_order() {
        let mut queue = ControlQueue::default();
        queue.push(ControlRequest::TogglePlay);
        queue.push(ControlRequest::NudgeIntensity(0.1));
        queue.push(ControlRequest::Reload);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(
            drained,
            vec![
                ControlRequest::TogglePlay,
                ControlRequest::NudgeIntensity(0.1),
                ControlRequest::Reload,
            ]
        );
        assert!(queue.is_empty());
    }
}
