use bytemuck::{Pod, Zeroable};
use roomview_geometry::Mesh;
use roomview_scene::{DrawCall, Shading};

/// Interleaved vertex as read by the wall shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub face_size: [f32; 2],
    pub min_vertex: [f32; 3],
    pub max_vertex: [f32; 3],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 6] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x2,
        3 => Float32x2,
        4 => Float32x3,
        5 => Float32x3,
    ];

    pub fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave a mesh's attribute streams.
pub fn vertices_of(mesh: &Mesh) -> Vec<Vertex> {
    (0..mesh.vertex_count())
        .map(|i| Vertex {
            position: mesh.positions[i],
            normal: mesh.normals[i],
            uv: mesh.uvs[i],
            face_size: mesh.face_sizes[i],
            min_vertex: mesh.min_vertex[i],
            max_vertex: mesh.max_vertex[i],
        })
        .collect()
}

/// Shading mode stored in `params.y`.
const MODE_WALL: f32 = 0.0;
const MODE_SOLID: f32 = 1.0;

/// Per-draw uniform block. Field order and padding match `DrawUniforms` in
/// the WGSL source.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// xyz = light position.
    pub light_position: [f32; 4],
    /// rgb = gradient start (or solid colour), w = gradient angle in radians.
    pub color_start: [f32; 4],
    /// rgb = gradient end.
    pub color_end: [f32; 4],
    pub pattern_color: [f32; 4],
    /// start scale, end scale, amount, blur.
    pub pattern: [f32; 4],
    /// x = pattern kind, y = shading mode, z = 1 when the shader must
    /// sRGB-encode its output.
    pub params: [f32; 4],
}

impl DrawUniforms {
    pub fn from_call(call: &DrawCall<'_>) -> Self {
        let mut uniforms = Self {
            model: call.model.to_cols_array_2d(),
            view: call.view.to_cols_array_2d(),
            projection: call.projection.to_cols_array_2d(),
            light_position: call.light_position.extend(1.0).to_array(),
            ..Self::zeroed()
        };
        match call.shading {
            Shading::Wall(wall) => {
                let [r, g, b] = wall.color_start;
                uniforms.color_start = [r, g, b, wall.gradient_angle];
                let [r, g, b] = wall.color_end;
                uniforms.color_end = [r, g, b, 0.0];
                uniforms.pattern_color = wall.pattern_color;
                uniforms.pattern = [
                    wall.pattern_start_scale,
                    wall.pattern_end_scale,
                    wall.pattern_amount,
                    wall.pattern_blur,
                ];
                uniforms.params = [wall.pattern_kind as f32, MODE_WALL, 0.0, 0.0];
            }
            Shading::Solid([r, g, b]) => {
                uniforms.color_start = [*r, *g, *b, 0.0];
                uniforms.params = [0.0, MODE_SOLID, 0.0, 0.0];
            }
        }
        uniforms
    }

    /// Mark whether the target lacks hardware sRGB encoding, in which case
    /// the fragment shader encodes its linear output itself.
    pub fn with_output_encoding(mut self, encode_srgb: bool) -> Self {
        self.params[2] = if encode_srgb { 1.0 } else { 0.0 };
        self
    }
}

/// Encode one linear channel with the sRGB transfer curve.
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Round `size` up to a multiple of `alignment` (a power of two).
pub fn align_to(size: u64, alignment: u64) -> u64 {
    (size + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3};
    use roomview_common::{Rgb, WallRole, srgb_to_linear};
    use roomview_config::{OverlayPattern, PatternColor, WallAppearance};
    use roomview_geometry::build_prism;
    use roomview_scene::{ClosureKind, MeshKey, WallShading};

    fn call<'a>(mesh: &'a Mesh, shading: &'a Shading) -> DrawCall<'a> {
        DrawCall {
            kind: ClosureKind::Wall(WallRole::Front),
            mesh_key: MeshKey::Prism([0; 3]),
            mesh,
            model: Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            light_position: Vec3::new(0.0, 5.0, 0.0),
            shading,
        }
    }

    #[test]
    fn vertex_is_sixteen_floats() {
        assert_eq!(std::mem::size_of::<Vertex>(), 64);
    }

    #[test]
    fn uniform_block_is_vec4_aligned() {
        assert_eq!(std::mem::size_of::<DrawUniforms>() % 16, 0);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 3 * 64 + 6 * 16);
    }

    #[test]
    fn interleaving_keeps_attributes_together() {
        let mesh = build_prism(2.0, 3.0, 4.0);
        let vertices = vertices_of(&mesh);
        assert_eq!(vertices.len(), 24);
        for (i, v) in vertices.iter().enumerate() {
            assert_eq!(v.position, mesh.positions[i]);
            assert_eq!(v.normal, mesh.normals[i]);
            assert_eq!(v.face_size, mesh.face_sizes[i]);
            assert_eq!(v.max_vertex, mesh.max_vertex[i]);
        }
    }

    #[test]
    fn wall_uniforms_carry_appearance() {
        let appearance = WallAppearance {
            color_end: Rgb::BLACK,
            overlay_pattern: OverlayPattern::Diamond,
            pattern_color: PatternColor::InvertedGradient,
            pattern_amount: 12.0,
            ..WallAppearance::default()
        };
        let shading = Shading::Wall(WallShading::resolve(&appearance));
        let mesh = build_prism(1.0, 1.0, 1.0);
        let uniforms = DrawUniforms::from_call(&call(&mesh, &shading));

        assert_eq!(uniforms.params[0], 2.0);
        assert_eq!(uniforms.params[1], MODE_WALL);
        assert_eq!(uniforms.pattern_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniforms.pattern[2], 12.0);
        assert_eq!(uniforms.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniforms.light_position, [0.0, 5.0, 0.0, 1.0]);
    }

    #[test]
    fn solid_uniforms_select_solid_mode() {
        let shading = Shading::Solid([0.2, 0.3, 0.4]);
        let mesh = build_prism(1.0, 1.0, 1.0);
        let uniforms = DrawUniforms::from_call(&call(&mesh, &shading));
        assert_eq!(uniforms.params[1], MODE_SOLID);
        assert_eq!(uniforms.params[2], 0.0);
        assert_eq!(uniforms.with_output_encoding(true).params[2], 1.0);
        assert_eq!(uniforms.color_start, [0.2, 0.3, 0.4, 0.0]);
    }

    #[test]
    fn srgb_encoding_inverts_the_decode() {
        for c in [0.0, 0.01, 0.2, 0.5, 0.98, 1.0] {
            assert!((linear_to_srgb(srgb_to_linear(c)) - c).abs() < 1e-5, "{c}");
        }
        assert!(linear_to_srgb(0.214) > 0.49);
    }

    #[test]
    fn alignment_rounds_up() {
        assert_eq!(align_to(288, 256), 512);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(1, 16), 16);
    }
}
