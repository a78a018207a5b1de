use std::rc::Rc;

use glam::{Mat4, Vec3};
use roomview_common::{Rgb, WallRole};
use roomview_config::{PatternColor, WallAppearance};
use roomview_geometry::Mesh;

/// Identity of a generated mesh. Equal keys always denote identical geometry,
/// so backends may cache uploaded buffers by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshKey {
    /// A prism, keyed by the bit patterns of its extents.
    Prism([u32; 3]),
    /// A merged edge-border mesh: box extents plus thickness.
    Border([u32; 4]),
}

/// Wall appearance resolved into the values the wall shader consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallShading {
    pub color_start: [f32; 3],
    pub color_end: [f32; 3],
    pub gradient_angle: f32,
    /// 0 = none, 1 = circle, 2 = diamond.
    pub pattern_kind: u32,
    /// Straight RGBA.
    pub pattern_color: [f32; 4],
    pub pattern_start_scale: f32,
    pub pattern_end_scale: f32,
    pub pattern_amount: f32,
    pub pattern_blur: f32,
}

impl WallShading {
    pub fn resolve(appearance: &WallAppearance) -> Self {
        let pattern_color = match appearance.pattern_color {
            PatternColor::Rgb(c) => c.with_alpha(1.0),
            PatternColor::InvertedGradient => appearance.color_end.with_alpha(1.0),
            PatternColor::WhiteOpacity(a) => Rgb::WHITE.with_alpha(a),
        };
        Self {
            color_start: appearance.color_start.to_array(),
            color_end: appearance.color_end.to_array(),
            gradient_angle: appearance.gradient_angle_degrees.to_radians(),
            pattern_kind: appearance.overlay_pattern.code(),
            pattern_color,
            pattern_start_scale: appearance.pattern_start_scale,
            pattern_end_scale: appearance.pattern_end_scale,
            pattern_amount: appearance.pattern_amount,
            pattern_blur: appearance.pattern_blur,
        }
    }
}

/// Fixed shading parameters baked into a closure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    Wall(WallShading),
    /// Flat colour, lit like the walls.
    Solid([f32; 3]),
}

/// What a closure draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClosureKind {
    Wall(WallRole),
    LightMarker,
    RoomBorder,
}

impl ClosureKind {
    pub fn label(self) -> &'static str {
        match self {
            ClosureKind::Wall(role) => role.label(),
            ClosureKind::LightMarker => "light-marker",
            ClosureKind::RoomBorder => "room-border",
        }
    }
}

/// Where a closure places its mesh in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    Fixed(Mat4),
    /// Centered on the per-frame light position.
    AtLight { half_extent: Vec3 },
}

/// Values shared by every draw call of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub light_position: Vec3,
}

/// One draw request handed to a shading backend.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub kind: ClosureKind,
    pub mesh_key: MeshKey,
    pub mesh: &'a Mesh,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub light_position: Vec3,
    pub shading: &'a Shading,
}

/// Consumer of draw calls. Implementations decide how (and whether) to
/// rasterize; the scene only promises the uniform and attribute set.
pub trait ShadingBackend {
    /// Start a frame, clearing colour and depth.
    fn begin_frame(&mut self, clear_color: [f32; 4]);

    fn draw(&mut self, call: &DrawCall<'_>);

    /// Finish the frame and submit whatever was recorded.
    fn end_frame(&mut self);
}

/// Geometry plus static shading, ready to be invoked with per-frame uniforms.
#[derive(Debug, Clone)]
pub struct DrawClosure {
    kind: ClosureKind,
    mesh_key: MeshKey,
    mesh: Rc<Mesh>,
    placement: Placement,
    shading: Shading,
}

impl DrawClosure {
    pub fn new(
        kind: ClosureKind,
        mesh_key: MeshKey,
        mesh: Rc<Mesh>,
        placement: Placement,
        shading: Shading,
    ) -> Self {
        Self {
            kind,
            mesh_key,
            mesh,
            placement,
            shading,
        }
    }

    pub fn kind(&self) -> ClosureKind {
        self.kind
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn mesh(&self) -> &Rc<Mesh> {
        &self.mesh
    }

    pub fn mesh_key(&self) -> MeshKey {
        self.mesh_key
    }

    pub fn shading(&self) -> &Shading {
        &self.shading
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn model(&self, frame: &FrameUniforms) -> Mat4 {
        match self.placement {
            Placement::Fixed(model) => model,
            Placement::AtLight { half_extent } => {
                Mat4::from_translation(frame.light_position - half_extent)
            }
        }
    }

    pub fn invoke(&self, frame: &FrameUniforms, backend: &mut dyn ShadingBackend) {
        backend.draw(&DrawCall {
            kind: self.kind,
            mesh_key: self.mesh_key,
            mesh: &self.mesh,
            model: self.model(frame),
            view: frame.view,
            projection: frame.projection,
            light_position: frame.light_position,
            shading: &self.shading,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomview_config::OverlayPattern;
    use roomview_geometry::build_prism;

    struct CountingBackend {
        models: Vec<Mat4>,
    }

    impl ShadingBackend for CountingBackend {
        fn begin_frame(&mut self, _clear_color: [f32; 4]) {}

        fn draw(&mut self, call: &DrawCall<'_>) {
            self.models.push(call.model);
        }

        fn end_frame(&mut self) {}
    }

    fn frame_at(light: Vec3) -> FrameUniforms {
        FrameUniforms {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            light_position: light,
        }
    }

    #[test]
    fn inverted_gradient_resolves_to_end_color() {
        let appearance = WallAppearance {
            color_start: Rgb::WHITE,
            color_end: Rgb::BLACK,
            overlay_pattern: OverlayPattern::Circle,
            pattern_color: PatternColor::InvertedGradient,
            ..WallAppearance::default()
        };
        let shading = WallShading::resolve(&appearance);
        assert_eq!(shading.pattern_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(shading.pattern_kind, 1);
    }

    #[test]
    fn explicit_and_white_opacity_colors() {
        let mut appearance = WallAppearance {
            pattern_color: PatternColor::Rgb(Rgb::RED),
            ..WallAppearance::default()
        };
        assert_eq!(
            WallShading::resolve(&appearance).pattern_color,
            [1.0, 0.0, 0.0, 1.0]
        );
        appearance.pattern_color = PatternColor::WhiteOpacity(0.4);
        assert_eq!(
            WallShading::resolve(&appearance).pattern_color,
            [1.0, 1.0, 1.0, 0.4]
        );
    }

    #[test]
    fn gradient_angle_is_converted_to_radians() {
        let appearance = WallAppearance {
            gradient_angle_degrees: 180.0,
            ..WallAppearance::default()
        };
        let shading = WallShading::resolve(&appearance);
        assert!((shading.gradient_angle - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn light_placement_follows_frame() {
        let closure = DrawClosure::new(
            ClosureKind::LightMarker,
            MeshKey::Prism([0; 3]),
            Rc::new(build_prism(1.0, 1.0, 1.0)),
            Placement::AtLight {
                half_extent: Vec3::splat(0.5),
            },
            Shading::Solid([0.2, 0.3, 0.4]),
        );
        let mut backend = CountingBackend { models: Vec::new() };
        closure.invoke(&frame_at(Vec3::new(1.0, 2.0, 3.0)), &mut backend);
        closure.invoke(&frame_at(Vec3::ZERO), &mut backend);
        assert_eq!(
            backend.models[0].w_axis.truncate(),
            Vec3::new(0.5, 1.5, 2.5)
        );
        assert_eq!(backend.models[1].w_axis.truncate(), Vec3::splat(-0.5));
    }

    #[test]
    fn fixed_placement_ignores_light() {
        let model = Mat4::from_translation(Vec3::new(-5.0, -1.0, -5.0));
        let closure = DrawClosure::new(
            ClosureKind::Wall(WallRole::Bottom),
            MeshKey::Prism([0; 3]),
            Rc::new(build_prism(10.0, 1.0, 10.0)),
            Placement::Fixed(model),
            Shading::Solid([1.0; 3]),
        );
        assert_eq!(closure.model(&frame_at(Vec3::splat(9.0))), model);
        assert_eq!(closure.kind().label(), "bottom");
    }
}
