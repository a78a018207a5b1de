use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Near clipping plane shared by both projections.
pub const NEAR_PLANE: f32 = 0.1;
/// Far clipping plane shared by both projections.
pub const FAR_PLANE: f32 = 100.0;
/// Screen pixels per world unit for the orthographic projection.
pub const ORTHO_PIXELS_PER_UNIT: f32 = 50.0;

/// Projection used when turning a view into clip space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Camera pose: position, yaw about the vertical axis, pitch about the
/// yaw-rotated horizontal axis, and vertical field of view (radians).
///
/// At yaw = pitch = 0 the camera looks down -Z. Positive yaw turns right,
/// positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(2.0, 6.0, 2.0),
            yaw: std::f32::consts::PI * 3.0 / 4.0,
            pitch: -std::f32::consts::PI / 6.0,
            fov: std::f32::consts::FRAC_PI_2,
        }
    }
}

impl Camera {
    /// Rotation taking camera-local directions to world space.
    pub fn orientation(&self) -> Mat4 {
        Mat4::from_rotation_y(-self.yaw) * Mat4::from_rotation_x(self.pitch)
    }

    /// Unit facing direction, including vertical tilt.
    pub fn forward(&self) -> Vec3 {
        self.orientation().transform_vector3(Vec3::NEG_Z)
    }

    /// Unit strafe direction (camera-local +X).
    pub fn right(&self) -> Vec3 {
        self.orientation().transform_vector3(Vec3::X)
    }

    /// Look-at transform toward `position + forward` with world up (0,1,0).
    ///
    /// Degenerates when pitch reaches ±90°, where forward is parallel to up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    /// Perspective projection for a viewport. `height` must be non-zero.
    pub fn perspective_proj(&self, width: f32, height: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov, width / height, NEAR_PLANE, FAR_PLANE)
    }

    /// Orthographic projection whose extents follow the viewport size.
    pub fn ortho_proj(&self, width: f32, height: f32) -> Mat4 {
        let hw = width / 2.0 / ORTHO_PIXELS_PER_UNIT;
        let hh = height / 2.0 / ORTHO_PIXELS_PER_UNIT;
        Mat4::orthographic_rh(-hw, hw, -hh, hh, NEAR_PLANE, FAR_PLANE)
    }

    pub fn projection(&self, projection: Projection, width: f32, height: f32) -> Mat4 {
        match projection {
            Projection::Perspective => self.perspective_proj(width, height),
            Projection::Orthographic => self.ortho_proj(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn level(yaw: f32, pitch: f32) -> Camera {
        Camera {
            position: Vec3::ZERO,
            yaw,
            pitch,
            ..Camera::default()
        }
    }

    #[test]
    fn default_camera() {
        let cam = Camera::default();
        assert!(cam.position.y > 0.0);
        let vp = cam.perspective_proj(1280.0, 720.0) * cam.view_matrix();
        // Should produce a valid matrix (no NaN)
        assert!(!vp.is_nan());
    }

    #[test]
    fn unrotated_camera_faces_negative_z() {
        let cam = level(0.0, 0.0);
        assert!(cam.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(cam.right().abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn positive_yaw_turns_right() {
        let cam = level(FRAC_PI_2, 0.0);
        assert!(cam.forward().abs_diff_eq(Vec3::X, 1e-6));
    }

    #[test]
    fn positive_pitch_looks_up() {
        let cam = level(0.0, 0.3);
        assert!(cam.forward().y > 0.0);
        assert!((cam.forward().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn view_maps_position_to_origin() {
        let mut cam = Camera::default();
        for pos in [Vec3::new(2.0, 6.0, 2.0), Vec3::new(-7.5, 0.3, 11.0)] {
            cam.position = pos;
            cam.yaw += 0.4;
            let p = cam.view_matrix().transform_point3(pos);
            assert!(p.length() < 1e-5, "{p:?}");
        }
    }

    #[test]
    fn view_places_forward_point_on_negative_z() {
        let cam = Camera::default();
        let ahead = cam.view_matrix().transform_point3(cam.position + cam.forward() * 3.0);
        assert!(ahead.abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-4));
    }

    #[test]
    fn ortho_extents_follow_viewport() {
        let cam = Camera::default();
        let proj = cam.ortho_proj(100.0, 50.0);
        // Right edge of a 100 px viewport is 1 unit from center at 50 px/unit.
        let edge = proj.project_point3(Vec3::new(1.0, 0.0, -1.0));
        assert!((edge.x - 1.0).abs() < 1e-5);
        let top = proj.project_point3(Vec3::new(0.0, 0.5, -1.0));
        assert!((top.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn projection_selects_mode() {
        let cam = Camera::default();
        assert_eq!(
            cam.projection(Projection::Orthographic, 800.0, 600.0),
            cam.ortho_proj(800.0, 600.0)
        );
        assert_eq!(
            cam.projection(Projection::Perspective, 800.0, 600.0),
            cam.perspective_proj(800.0, 600.0)
        );
    }
}
