//! Scene assembler: turns the wall configuration into a list of draw
//! closures, each pairing a generated mesh with resolved shading.
//!
//! The render loop only ever sees a complete [`Scene`]. Store changes mark the
//! assembler dirty and the next [`SceneAssembler::sync`] swaps in a new scene.

mod assembler;
mod cache;
mod draw;
mod layout;

pub use assembler::{Scene, SceneAssembler, SceneSettings};
pub use cache::GeometryCache;
pub use draw::{
    ClosureKind, DrawCall, DrawClosure, FrameUniforms, MeshKey, Placement, Shading,
    ShadingBackend, WallShading,
};
pub use layout::{WALL_THICKNESS, Wall, interior_origin, wall_placement, walls};
