//! Physics module - pointer dynamics, gesture state, and ray anchoring
//!
//! Re-exports only. All logic in submodules.

mod pointer;
mod spring;
mod confidence_gate;
mod gesture;
mod camera;
mod ripple_anchor;

pub use pointer::Pointer2D;
pub use spring::{SpringState, SpringIntegrator, damping, SPRING_K, DAMPING_RATIO};
pub use confidence_gate::{PointerUnifier, PointerSource, HAND_CONFIDENCE_THRESHOLD};
pub use gesture::{
    GestureState, GesturePhase, GestureTransition, GestureStateMachine,
    RED_TINT_RATE, PEAKYNESS_RATE,
};
pub use camera::{Camera, Ray};
pub use ripple_anchor::{RippleAnchor, TerrainPlane, BASE_RIPPLE_STRENGTH, SPEED_RIPPLE_GAIN};
