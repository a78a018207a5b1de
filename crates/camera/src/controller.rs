use std::collections::HashSet;

use glam::{Mat4, Vec2, Vec3};
use roomview_input::{Binding, ControlKey, InputEvent, InputReceiver, InputSender, input_channel};
use serde::{Deserialize, Serialize};

use crate::camera::Camera;

/// Tunables for pose integration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControllerSettings {
    /// Translation speed in world units per second.
    pub move_speed: f32,
    /// Rotation speed in radians per second.
    pub look_speed: f32,
    /// Symmetric pitch bound in radians. `None` leaves pitch unbounded, which
    /// flips the view once it passes straight up or down.
    pub pitch_limit: Option<f32>,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            move_speed: 4.0,
            look_speed: 0.7,
            pitch_limit: Some(89.0_f32.to_radians()),
        }
    }
}

/// Movement and look accumulators driven by control-key transitions.
///
/// `move_dir` holds (strafe, vertical, forward/back) and `look_dir` holds
/// (yaw rate sign, pitch rate sign), each component in {-1, 0, 1}.
#[derive(Debug, Clone, Default)]
pub struct ControlState {
    move_dir: [i8; 3],
    look_dir: [i8; 2],
    held: HashSet<ControlKey>,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one key transition. Returns true if the accumulators changed.
    ///
    /// Auto-repeats and presses of an already-held key are ignored. Releasing
    /// a key clears its whole axis, even if the opposing key is still down.
    pub fn apply(&mut self, event: InputEvent) -> bool {
        let key = event.key;
        if event.pressed {
            if event.repeat || !self.held.insert(key) {
                return false;
            }
        } else {
            self.held.remove(&key);
        }

        let slot = match key.binding() {
            Binding::Move { axis, sign } => (&mut self.move_dir[axis], sign),
            Binding::Look { axis, sign } => (&mut self.look_dir[axis], sign),
        };
        let value = if event.pressed { slot.1 } else { 0 };
        let changed = *slot.0 != value;
        *slot.0 = value;
        changed
    }

    pub fn move_dir(&self) -> Vec3 {
        Vec3::new(
            self.move_dir[0] as f32,
            self.move_dir[1] as f32,
            self.move_dir[2] as f32,
        )
    }

    pub fn look_dir(&self) -> Vec2 {
        Vec2::new(self.look_dir[0] as f32, self.look_dir[1] as f32)
    }

    pub fn is_idle(&self) -> bool {
        self.move_dir == [0; 3] && self.look_dir == [0; 2]
    }

    pub fn is_held(&self, key: ControlKey) -> bool {
        self.held.contains(&key)
    }
}

/// Owns the camera pose and advances it from queued input once per frame.
pub struct CameraController {
    camera: Camera,
    settings: ControllerSettings,
    controls: ControlState,
    input: InputReceiver,
}

impl CameraController {
    /// Create a controller and the sender hosts use to feed it key events.
    pub fn new(camera: Camera, settings: ControllerSettings) -> (Self, InputSender) {
        let (tx, rx) = input_channel();
        let controller = Self {
            camera,
            settings,
            controls: ControlState::new(),
            input: rx,
        };
        (controller, tx)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ControllerSettings {
        &mut self.settings
    }

    pub fn controls(&self) -> &ControlState {
        &self.controls
    }

    /// Drain queued input, then integrate `dt` seconds of motion.
    pub fn update(&mut self, dt: f32) {
        for event in self.input.drain() {
            if self.controls.apply(event) {
                tracing::trace!(?event, "control state changed");
            }
        }
        self.integrate(dt);
    }

    /// Advance the pose by `dt` seconds with the current accumulators.
    ///
    /// Yaw and pitch change linearly over the step and the translation is the
    /// exact integral of the turning heading, so one step of `dt` lands on the
    /// same pose as any subdivision of it. Once pitch reaches its limit the
    /// rest of the step is integrated with pitch held at the bound.
    pub fn integrate(&mut self, dt: f32) {
        if self.controls.is_idle() || dt <= 0.0 {
            return;
        }
        let rate = self.controls.look_dir() * self.settings.look_speed;
        let velocity = self.controls.move_dir() * self.settings.move_speed;
        let yaw = self.camera.yaw;

        let (pitch, bound) = match self.settings.pitch_limit {
            Some(limit) => {
                let pitch = self.camera.pitch.clamp(-limit, limit);
                let bound = if rate.y > 0.0 { limit } else { -limit };
                (pitch, (rate.y != 0.0).then_some(bound))
            }
            None => (self.camera.pitch, None),
        };
        let free = match bound {
            Some(bound) => ((bound - pitch) / rate.y).clamp(0.0, dt),
            None => dt,
        };

        let mut travel = swept_travel(velocity, yaw, rate.x, pitch, rate.y, free);
        let end_pitch = match bound {
            Some(bound) if free < dt => {
                let yaw_at = yaw + rate.x * free;
                travel += swept_travel(velocity, yaw_at, rate.x, bound, 0.0, dt - free);
                bound
            }
            _ => pitch + rate.y * dt,
        };

        self.camera.position += travel;
        self.camera.yaw = yaw + rate.x * dt;
        self.camera.pitch = match self.settings.pitch_limit {
            Some(limit) => end_pitch.clamp(-limit, limit),
            None => end_pitch,
        };
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }
}

/// `sin(x) / x`, continuous at zero.
fn sinc(x: f32) -> f32 {
    if x.abs() < 1e-4 {
        1.0 - x * x / 6.0
    } else {
        x.sin() / x
    }
}

/// Integrals of `cos(c + k t)` and `sin(c + k t)` over `t ∈ [0, span]`.
fn trig_integrals(c: f32, k: f32, span: f32) -> (f32, f32) {
    let half = k * span / 2.0;
    let scale = span * sinc(half);
    let mid = c + half;
    (mid.cos() * scale, mid.sin() * scale)
}

/// Displacement of a local velocity carried by an orientation whose yaw and
/// pitch advance at constant rates for `span` seconds.
///
/// The world direction is `RotY(-yaw) · RotX(pitch) · v`; expanding the
/// products of yaw and pitch trigonometry into sums leaves only terms linear
/// in time, each integrated in closed form.
fn swept_travel(v: Vec3, yaw: f32, yaw_rate: f32, pitch: f32, pitch_rate: f32, span: f32) -> Vec3 {
    if span <= 0.0 {
        return Vec3::ZERO;
    }
    let (cos_yaw, sin_yaw) = trig_integrals(yaw, yaw_rate, span);
    let (cos_pitch, sin_pitch) = trig_integrals(pitch, pitch_rate, span);
    let (cos_sum, sin_sum) = trig_integrals(yaw + pitch, yaw_rate + pitch_rate, span);
    let (cos_diff, sin_diff) = trig_integrals(yaw - pitch, yaw_rate - pitch_rate, span);

    Vec3::new(
        v.x * cos_yaw - v.y * 0.5 * (cos_diff - cos_sum) - v.z * 0.5 * (sin_sum + sin_diff),
        v.y * cos_pitch - v.z * sin_pitch,
        v.x * sin_yaw + v.y * 0.5 * (sin_sum - sin_diff) + v.z * 0.5 * (cos_diff + cos_sum),
    )
}
