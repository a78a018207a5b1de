//! wgpu shading backend for the room scene.
//!
//! Consumes [`roomview_scene::DrawCall`]s: meshes are uploaded once per
//! [`roomview_scene::MeshKey`], per-draw uniforms go into one dynamic-offset
//! buffer, and each frame is encoded as a single depth-tested pass.
//!
//! # Invariants
//! - The backend never touches the scene or configuration; it only reads draw calls.
//! - GPU mesh buffers unused for a whole frame are released at the end of it.

mod backend;
mod context;
mod layout;
mod shaders;

pub use backend::{WgpuFrame, WgpuRenderer};
pub use context::{GpuContext, GpuError};
pub use layout::{DrawUniforms, Vertex, align_to, linear_to_srgb, vertices_of};
