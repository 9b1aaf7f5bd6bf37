//! The core of Point Swarm. Everything here is independent of the graphics
//! API: anchor generation, per-frame displacement, the shape tables and
//! shading maths, the shader compile/swap rules, input hand-off and
//! configuration.

pub mod anchor;
pub mod config;
pub mod control;
pub mod motion;
pub mod shader;
pub mod shape;

pub use anchor::{AnchorPoint, SeedPolicy};
pub use control::{ControlQueue, ControlRequest, Variant};
pub use motion::{AnimatorState, DisplacementMode};
