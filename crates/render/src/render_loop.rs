use glam::{Mat4, Vec3};
use roomview_camera::{CameraController, Projection};
use roomview_scene::{FrameUniforms, Scene, ShadingBackend};
use serde::Serialize;

/// Drawable surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, e.g. while the window is minimized.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Turns absolute frame timestamps into clamped per-frame deltas.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last: Option<f64>,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self { last: None, max_dt }
    }

    /// Seconds since the previous call, in `0.0..=max_dt`. The first call
    /// returns 0. A timestamp earlier than the previous one also yields 0.
    pub fn tick(&mut self, now_secs: f64) -> f32 {
        let dt = match self.last {
            Some(last) => ((now_secs - last) as f32).clamp(0.0, self.max_dt),
            None => 0.0,
        };
        self.last = Some(now_secs);
        dt
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }

    /// Forget the previous timestamp so the next tick starts from rest.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(0.1)
    }
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameStats {
    pub frame: u64,
    pub dt: f32,
    pub draw_calls: usize,
    pub scene_generation: u64,
}

/// Per-frame driver: camera update, matrices, clear, draw.
///
/// The loop owns only per-frame state. Camera controller, scene and backend
/// are lent to [`tick`](RenderLoop::tick) so the host can edit them between
/// frames.
#[derive(Debug, Clone)]
pub struct RenderLoop {
    pub clock: FrameClock,
    pub light_position: Vec3,
    pub clear_color: [f32; 4],
    pub projection: Projection,
    viewport: Viewport,
    frame: u64,
}

impl RenderLoop {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            clock: FrameClock::default(),
            light_position: Vec3::new(0.0, 5.0, 0.0),
            clear_color: [0.08, 0.08, 0.1, 1.0],
            projection: Projection::default(),
            viewport,
            frame: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames drawn so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        tracing::debug!(width, height, "viewport resized");
    }

    /// Projection matrix for the current viewport and projection mode.
    pub fn projection_matrix(&self, controller: &CameraController) -> Mat4 {
        let Viewport { width, height } = self.viewport;
        controller.camera().projection(
            self.projection,
            width as f32,
            height.max(1) as f32,
        )
    }

    /// Draw one frame at time `now_secs`.
    pub fn tick(
        &mut self,
        now_secs: f64,
        controller: &mut CameraController,
        scene: &Scene,
        backend: &mut dyn ShadingBackend,
    ) -> FrameStats {
        let dt = self.clock.tick(now_secs);
        controller.update(dt);

        let uniforms = FrameUniforms {
            view: controller.view_matrix(),
            projection: self.projection_matrix(controller),
            light_position: self.light_position,
        };

        backend.begin_frame(self.clear_color);
        scene.draw(&uniforms, backend);
        backend.end_frame();

        self.frame += 1;
        let stats = FrameStats {
            frame: self.frame,
            dt,
            draw_calls: scene.closures.len(),
            scene_generation: scene.generation,
        };
        tracing::trace!(?stats, "frame drawn");
        stats
    }
}
