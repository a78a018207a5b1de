//! Geometry generator: procedural meshes for axis-aligned rectangular prisms
//! and for the thin border prisms that outline their edges.
//!
//! # Invariants
//! - A prism mesh always has 24 vertices and 36 indices, whatever its size.
//! - Faces never share vertices, so each carries its own normal, UV and size.
//! - Generation never fails: degenerate sizes give zero-area faces.

mod edges;
mod prism;

pub use edges::{EDGE_COUNT, Edge, EdgeBorderPrism, box_edges, build_edges, merge_border_mesh};
pub use prism::{
    FACE_COUNT, FACE_NORMALS, Mesh, PRISM_INDEX_COUNT, PRISM_VERTEX_COUNT, PrismSize, build_prism,
};
