use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Number of faces on a rectangular prism.
pub const FACE_COUNT: usize = 6;
/// Vertices per prism: four per face, none shared across faces.
pub const PRISM_VERTEX_COUNT: usize = FACE_COUNT * 4;
/// Indices per prism: two triangles per face.
pub const PRISM_INDEX_COUNT: usize = FACE_COUNT * 6;

/// Triangle pattern applied to every face's local corners 0..3.
const FACE_TRIANGLES: [u32; 6] = [2, 1, 0, 2, 0, 3];

/// Outward normals in face order: +z, +x, -z, -x, +y, -y.
pub const FACE_NORMALS: [[f32; 3]; FACE_COUNT] = [
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0],
    [0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
];

const FACE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Extents of an axis-aligned box: `length` along x, `height` along y,
/// `width` along z.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PrismSize {
    pub length: f32,
    pub height: f32,
    pub width: f32,
}

impl PrismSize {
    pub const fn new(length: f32, height: f32, width: f32) -> Self {
        Self {
            length,
            height,
            width,
        }
    }

    pub fn splat(edge: f32) -> Self {
        Self::new(edge, edge, edge)
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.length, self.height, self.width)
    }

    /// Bit pattern of the three extents, usable as an exact hash key.
    pub fn key(self) -> [u32; 3] {
        [
            self.length.to_bits(),
            self.height.to_bits(),
            self.width.to_bits(),
        ]
    }

    pub fn build(self) -> Mesh {
        build_prism(self.length, self.height, self.width)
    }
}

/// Indexed triangle mesh with the per-vertex attributes the wall shader reads.
///
/// All attribute vectors have the same length. Indices reference that range.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    /// Each vertex's face extent in that face's own 2D parameterization.
    pub face_sizes: Vec<[f32; 2]>,
    /// Lower bounding corner of each vertex's face, object space.
    pub min_vertex: Vec<[f32; 3]>,
    /// Upper bounding corner of each vertex's face, object space.
    pub max_vertex: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            uvs: Vec::with_capacity(vertices),
            face_sizes: Vec::with_capacity(vertices),
            min_vertex: Vec::with_capacity(vertices),
            max_vertex: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append `other` with every position (and face bound) shifted by `offset`.
    pub fn append_translated(&mut self, other: &Mesh, offset: Vec3) {
        let base = self.positions.len() as u32;
        let shift = |p: &[f32; 3]| (Vec3::from_array(*p) + offset).to_array();

        self.positions.extend(other.positions.iter().map(shift));
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.face_sizes.extend_from_slice(&other.face_sizes);
        self.min_vertex.extend(other.min_vertex.iter().map(shift));
        self.max_vertex.extend(other.max_vertex.iter().map(shift));
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Append one quad face. `corners` must be wound so that the triangles
    /// `(2,1,0)` and `(2,0,3)` are counter-clockwise seen from outside.
    fn push_face(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], size: [f32; 2]) {
        let base = self.positions.len() as u32;

        let mut lo = Vec3::from_array(corners[0]);
        let mut hi = lo;
        for c in &corners[1..] {
            lo = lo.min(Vec3::from_array(*c));
            hi = hi.max(Vec3::from_array(*c));
        }

        for (corner, uv) in corners.iter().zip(FACE_UVS) {
            self.positions.push(*corner);
            self.normals.push(normal);
            self.uvs.push(uv);
            self.face_sizes.push(size);
            self.min_vertex.push(lo.to_array());
            self.max_vertex.push(hi.to_array());
        }
        self.indices.extend(FACE_TRIANGLES.iter().map(|i| base + i));
    }
}

/// Generate the 24-vertex, 12-triangle mesh of the box `[0,l]×[0,h]×[0,w]`.
///
/// Faces are emitted in the order +z, +x, -z, -x, +y, -y. Zero or negative
/// extents are accepted and collapse the affected faces to zero area; the
/// index list stays valid either way.
pub fn build_prism(l: f32, h: f32, w: f32) -> Mesh {
    let mut mesh = Mesh::with_capacity(PRISM_VERTEX_COUNT, PRISM_INDEX_COUNT);

    #[rustfmt::skip]
    let faces: [([[f32; 3]; 4], [f32; 2]); FACE_COUNT] = [
        // +z
        ([[0.0, h, w], [l, h, w], [l, 0.0, w], [0.0, 0.0, w]], [l, h]),
        // +x
        ([[l, h, w], [l, h, 0.0], [l, 0.0, 0.0], [l, 0.0, w]], [w, h]),
        // -z
        ([[l, h, 0.0], [0.0, h, 0.0], [0.0, 0.0, 0.0], [l, 0.0, 0.0]], [l, h]),
        // -x
        ([[0.0, h, 0.0], [0.0, h, w], [0.0, 0.0, w], [0.0, 0.0, 0.0]], [w, h]),
        // +y
        ([[0.0, h, 0.0], [l, h, 0.0], [l, h, w], [0.0, h, w]], [l, w]),
        // -y
        ([[0.0, 0.0, w], [l, 0.0, w], [l, 0.0, 0.0], [0.0, 0.0, 0.0]], [l, w]),
    ];

    for ((corners, size), normal) in faces.into_iter().zip(FACE_NORMALS) {
        mesh.push_face(corners, normal, size);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn face_range(face: usize) -> std::ops::Range<usize> {
        face * 4..face * 4 + 4
    }

    #[test]
    fn prism_has_fixed_counts() {
        for (l, h, w) in [(1.0, 2.0, 3.0), (0.0, 0.0, 0.0), (10.0, 0.0, 4.0)] {
            let mesh = build_prism(l, h, w);
            assert_eq!(mesh.positions.len(), 24);
            assert_eq!(mesh.normals.len(), 24);
            assert_eq!(mesh.uvs.len(), 24);
            assert_eq!(mesh.face_sizes.len(), 24);
            assert_eq!(mesh.min_vertex.len(), 24);
            assert_eq!(mesh.max_vertex.len(), 24);
            assert_eq!(mesh.indices.len(), 36);
            assert!(mesh.indices.iter().all(|&i| i < 24));
        }
    }

    #[test]
    fn negative_extents_still_give_a_valid_mesh() {
        for (l, h, w) in [(-2.0, 3.0, -1.0), (-1.0, -1.0, -1.0), (4.0, -0.5, 2.0)] {
            let mesh = build_prism(l, h, w);
            assert_eq!(mesh.vertex_count(), 24);
            assert_eq!(mesh.indices.len(), 36);
            assert!(mesh.indices.iter().all(|&i| i < 24));
            assert!(mesh.positions.iter().flatten().all(|v| v.is_finite()));
            assert!(mesh.normals.iter().all(|n| n.iter().map(|c| c * c).sum::<f32>() == 1.0));
        }
    }

    #[test]
    fn each_axis_normal_appears_on_four_vertices() {
        let mesh = build_prism(2.0, 3.0, 4.0);
        for n in FACE_NORMALS {
            let count = mesh.normals.iter().filter(|m| **m == n).count();
            assert_eq!(count, 4, "normal {n:?}");
        }
    }

    #[test]
    fn triangles_face_outward() {
        let mesh = build_prism(2.0, 3.0, 4.0);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(mesh.positions[i as usize]));
            let winding = (b - a).cross(c - a).normalize();
            let normal = Vec3::from_array(mesh.normals[tri[0] as usize]);
            assert!(winding.dot(normal) > 0.999, "triangle {tri:?} winds inward");
        }
    }

    #[test]
    fn vertices_lie_on_their_face_plane() {
        let mesh = build_prism(2.0, 3.0, 4.0);
        let center = Vec3::new(1.0, 1.5, 2.0);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let p = Vec3::from_array(*p);
            let n = Vec3::from_array(*n);
            // Distance from center along the normal equals the half extent.
            let half = (Vec3::new(2.0, 3.0, 4.0) * n.abs()).element_sum() / 2.0;
            assert!(((p - center).dot(n) - half).abs() < 1e-6);
        }
    }

    #[test]
    fn face_sizes_follow_face_extents() {
        let mesh = build_prism(10.0, 8.0, 6.0);
        let expected = [
            [10.0, 8.0],
            [6.0, 8.0],
            [10.0, 8.0],
            [6.0, 8.0],
            [10.0, 6.0],
            [10.0, 6.0],
        ];
        for (face, size) in expected.iter().enumerate() {
            for v in face_range(face) {
                assert_eq!(mesh.face_sizes[v], *size);
            }
        }
    }

    #[test]
    fn min_max_vertex_bound_each_face() {
        let mesh = build_prism(1.0, 2.0, 3.0);
        // Top face spans the full footprint at y = h.
        for v in face_range(4) {
            assert_eq!(mesh.min_vertex[v], [0.0, 2.0, 0.0]);
            assert_eq!(mesh.max_vertex[v], [1.0, 2.0, 3.0]);
        }
        // +x face sits at x = l.
        for v in face_range(1) {
            assert_eq!(mesh.min_vertex[v], [1.0, 0.0, 0.0]);
            assert_eq!(mesh.max_vertex[v], [1.0, 2.0, 3.0]);
        }
    }

    #[test]
    fn uvs_repeat_per_face() {
        let mesh = build_prism(1.0, 1.0, 1.0);
        for face in 0..FACE_COUNT {
            assert_eq!(&mesh.uvs[face * 4..face * 4 + 4], &FACE_UVS);
        }
    }

    #[test]
    fn zero_height_collapses_side_faces() {
        let mesh = build_prism(5.0, 0.0, 5.0);
        assert!(mesh.positions.iter().all(|p| p[1] == 0.0));
        assert_eq!(mesh.face_sizes[0], [5.0, 0.0]);
    }

    #[test]
    fn append_translated_offsets_indices_and_positions() {
        let a = build_prism(1.0, 1.0, 1.0);
        let mut merged = a.clone();
        merged.append_translated(&a, Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(merged.vertex_count(), 48);
        assert_eq!(merged.triangle_count(), 24);
        assert!(merged.indices[36..].iter().all(|&i| (24..48).contains(&i)));
        assert_eq!(merged.positions[24][0], a.positions[0][0] + 5.0);
        assert_eq!(merged.max_vertex[24][0], a.max_vertex[0][0] + 5.0);
    }
}
