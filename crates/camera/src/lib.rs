//! Camera controller: a first-person fly camera.
//!
//! Input events are queued by the host and drained once per frame; the
//! controller then integrates position and orientation over the elapsed
//! time and derives view and projection matrices on demand.
//!
//! # Invariants
//! - Integration is frame-rate independent for constant input: translation
//!   is integrated exactly along the turning heading, pitch clamp included.
//! - Camera state has exactly one owner; hosts only hold an `InputSender`.

mod camera;
mod controller;

pub use camera::{Camera, FAR_PLANE, NEAR_PLANE, ORTHO_PIXELS_PER_UNIT, Projection};
pub use controller::{CameraController, ControlState, ControllerSettings};
