use glam::Vec3;
use roomview_common::Axis;
use serde::Serialize;

use crate::prism::{Mesh, PRISM_INDEX_COUNT, PRISM_VERTEX_COUNT, PrismSize};

/// Number of edges on a rectangular prism.
pub const EDGE_COUNT: usize = 12;

/// One edge of a box, running from `start` to `end` along `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Edge {
    pub start: Vec3,
    pub end: Vec3,
    pub axis: Axis,
}

impl Edge {
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }
}

/// A thin prism laid along one box edge, used to draw outlines as filled
/// geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeBorderPrism {
    pub edge: Edge,
    /// Minimum corner of the border prism in the box's object space.
    pub origin: Vec3,
    pub size: PrismSize,
}

impl EdgeBorderPrism {
    /// Mesh of this border prism, already placed at `origin`.
    pub fn mesh(&self) -> Mesh {
        let mut mesh = Mesh::with_capacity(PRISM_VERTEX_COUNT, PRISM_INDEX_COUNT);
        mesh.append_translated(&self.size.build(), self.origin);
        mesh
    }

    pub fn max_corner(&self) -> Vec3 {
        self.origin + self.size.to_vec3()
    }
}

/// The 12 edges of the box `[0,l]×[0,h]×[0,w]`: four along x, then four
/// along y, then four along z.
pub fn box_edges(l: f32, h: f32, w: f32) -> [Edge; EDGE_COUNT] {
    let along_x = |y: f32, z: f32| Edge {
        start: Vec3::new(0.0, y, z),
        end: Vec3::new(l, y, z),
        axis: Axis::X,
    };
    let along_y = |x: f32, z: f32| Edge {
        start: Vec3::new(x, 0.0, z),
        end: Vec3::new(x, h, z),
        axis: Axis::Y,
    };
    let along_z = |x: f32, y: f32| Edge {
        start: Vec3::new(x, y, 0.0),
        end: Vec3::new(x, y, w),
        axis: Axis::Z,
    };
    [
        along_x(0.0, 0.0),
        along_x(h, 0.0),
        along_x(0.0, w),
        along_x(h, w),
        along_y(0.0, 0.0),
        along_y(l, 0.0),
        along_y(0.0, w),
        along_y(l, w),
        along_z(0.0, 0.0),
        along_z(l, 0.0),
        along_z(0.0, h),
        along_z(l, h),
    ]
}

/// Build the 12 border prisms outlining the box `[0,l]×[0,h]×[0,w]`.
///
/// Each prism has a `thickness × thickness` cross-section and sits inside the
/// box against its edge. X edges run the full length; Y and Z edges are
/// trimmed by `thickness` at both ends so neighbours meet at the corners
/// without overlapping. A zero thickness yields zero-area segments along the
/// edges themselves.
///
/// `thickness` is clamped to `[0, min(l, h, w) / 2]`, so opposite borders at
/// most touch. A box with a non-positive extent gets zero-thickness borders.
pub fn build_edges(l: f32, h: f32, w: f32, thickness: f32) -> Vec<EdgeBorderPrism> {
    let half_smallest = (0.5 * l.min(h).min(w)).max(0.0);
    let t = thickness.clamp(0.0, half_smallest);
    // Inset of the cross-section for an edge lying at the low or high side.
    let inset = |at_max: bool, extent: f32| if at_max { extent - t } else { 0.0 };
    let trimmed = |extent: f32| (extent - 2.0 * t).max(0.0);

    let mut prisms = Vec::with_capacity(EDGE_COUNT);
    for (i, edge) in box_edges(l, h, w).into_iter().enumerate() {
        // Bit 0 of the position within each group of four selects the first
        // perpendicular axis' high side, bit 1 the second's.
        let hi_a = (i % 4) & 1 == 1;
        let hi_b = (i % 4) & 2 == 2;
        let (origin, size) = match edge.axis {
            Axis::X => (
                Vec3::new(0.0, inset(hi_a, h), inset(hi_b, w)),
                PrismSize::new(l, t, t),
            ),
            Axis::Y => (
                Vec3::new(inset(hi_a, l), t, inset(hi_b, w)),
                PrismSize::new(t, trimmed(h), t),
            ),
            Axis::Z => (
                Vec3::new(inset(hi_a, l), inset(hi_b, h), t),
                PrismSize::new(t, t, trimmed(w)),
            ),
        };
        prisms.push(EdgeBorderPrism { edge, origin, size });
    }
    prisms
}

/// Merge border prisms into a single mesh so an outline is one draw call.
pub fn merge_border_mesh(prisms: &[EdgeBorderPrism]) -> Mesh {
    let mut mesh = Mesh::with_capacity(
        prisms.len() * PRISM_VERTEX_COUNT,
        prisms.len() * PRISM_INDEX_COUNT,
    );
    for prism in prisms {
        mesh.append_translated(&prism.size.build(), prism.origin);
    }
    mesh
}
