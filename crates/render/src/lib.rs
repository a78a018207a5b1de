//! Render loop: once per display refresh, advance the camera, derive view and
//! projection, clear the frame and invoke every draw closure of the current
//! scene with the shared per-frame uniforms.
//!
//! # Invariants
//! - The loop never mutates the scene or the configuration store.
//! - Every closure of a frame receives identical view, projection and light.
//! - Resizing recomputes matrices only; geometry is never rebuilt for it.

mod recorder;
mod render_loop;

pub use recorder::{RecordedDraw, RecordedFrame, RecordingBackend};
pub use render_loop::{FrameClock, FrameStats, RenderLoop, Viewport};
