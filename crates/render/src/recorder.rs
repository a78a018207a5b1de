use std::fmt::Write as _;

use glam::{Mat4, Vec3};
use roomview_scene::{ClosureKind, DrawCall, MeshKey, Shading, ShadingBackend};

/// A draw call with the mesh reduced to its key and sizes.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    pub kind: ClosureKind,
    pub mesh_key: MeshKey,
    pub vertex_count: usize,
    pub index_count: usize,
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub light_position: Vec3,
    pub shading: Shading,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordedFrame {
    pub clear_color: [f32; 4],
    pub draws: Vec<RecordedDraw>,
}

/// Backend that keeps draw calls in memory instead of rasterizing them.
///
/// Useful for headless runs and for checking what the render loop emits.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    frames: Vec<RecordedFrame>,
    open: Option<RecordedFrame>,
    history: Option<usize>,
    completed: u64,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the most recent `frames` completed frames.
    pub fn with_history(frames: usize) -> Self {
        Self {
            history: Some(frames.max(1)),
            ..Self::default()
        }
    }

    /// Completed frames, oldest first.
    pub fn frames(&self) -> &[RecordedFrame] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&RecordedFrame> {
        self.frames.last()
    }

    /// Human-readable dump of the most recent frame.
    pub fn summary(&self) -> String {
        let Some(frame) = self.last_frame() else {
            return "=== no frame recorded ===\n".to_string();
        };
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {} ({} draws) ===",
            self.completed,
            frame.draws.len()
        );
        let [r, g, b, a] = frame.clear_color;
        let _ = writeln!(out, "Clear: ({r:.2}, {g:.2}, {b:.2}, {a:.2})");
        if let Some(first) = frame.draws.first() {
            let eye = first.view.inverse().w_axis.truncate();
            let l = first.light_position;
            let _ = writeln!(
                out,
                "Eye: ({:.2}, {:.2}, {:.2})  Light: ({:.2}, {:.2}, {:.2})",
                eye.x, eye.y, eye.z, l.x, l.y, l.z
            );
        }
        for draw in &frame.draws {
            let t = draw.model.w_axis;
            let shading = match draw.shading {
                Shading::Wall(w) => format!("wall pattern={}", w.pattern_kind),
                Shading::Solid([r, g, b]) => format!("solid ({r:.2}, {g:.2}, {b:.2})"),
            };
            let _ = writeln!(
                out,
                "  {:<12} verts={:<4} tris={:<4} at=({:.2}, {:.2}, {:.2}) {shading}",
                draw.kind.label(),
                draw.vertex_count,
                draw.index_count / 3,
                t.x,
                t.y,
                t.z,
            );
        }
        out
    }
}

impl ShadingBackend for RecordingBackend {
    fn begin_frame(&mut self, clear_color: [f32; 4]) {
        if self.open.is_some() {
            tracing::warn!("begin_frame without end_frame; discarding open frame");
        }
        self.open = Some(RecordedFrame {
            clear_color,
            draws: Vec::new(),
        });
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        let Some(frame) = self.open.as_mut() else {
            tracing::warn!(kind = call.kind.label(), "draw outside a frame ignored");
            return;
        };
        frame.draws.push(RecordedDraw {
            kind: call.kind,
            mesh_key: call.mesh_key,
            vertex_count: call.mesh.vertex_count(),
            index_count: call.mesh.indices.len(),
            model: call.model,
            view: call.view,
            projection: call.projection,
            light_position: call.light_position,
            shading: *call.shading,
        });
    }

    fn end_frame(&mut self) {
        if let Some(frame) = self.open.take() {
            self.completed += 1;
            self.frames.push(frame);
            let limit = self.history.unwrap_or(usize::MAX);
            if self.frames.len() > limit {
                let excess = self.frames.len() - limit;
                self.frames.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomview_common::WallRole;
    use roomview_config::WallConfigStore;
    use roomview_scene::{FrameUniforms, SceneAssembler, SceneSettings};

    fn draw_scene(backend: &mut RecordingBackend, light: Vec3) {
        let mut store = WallConfigStore::default();
        let assembler = SceneAssembler::new(&mut store, SceneSettings::default());
        let frame = FrameUniforms {
            view: Mat4::look_at_rh(Vec3::new(0.0, 5.0, 3.0), Vec3::ZERO, Vec3::Y),
            projection: Mat4::IDENTITY,
            light_position: light,
        };
        backend.begin_frame([0.0, 0.0, 0.0, 1.0]);
        assembler.scene().draw(&frame, backend);
        backend.end_frame();
    }

    #[test]
    fn records_one_entry_per_closure() {
        let mut backend = RecordingBackend::new();
        draw_scene(&mut backend, Vec3::ZERO);
        let frame = backend.last_frame().unwrap();
        assert_eq!(frame.draws.len(), 8);
        assert_eq!(frame.draws[0].kind, ClosureKind::Wall(WallRole::Bottom));
        assert_eq!(frame.draws[0].vertex_count, 24);
        assert_eq!(frame.draws[0].index_count, 36);
    }

    #[test]
    fn draws_outside_a_frame_are_dropped() {
        let mut store = WallConfigStore::default();
        let assembler = SceneAssembler::new(&mut store, SceneSettings::default());
        let frame = FrameUniforms {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            light_position: Vec3::ZERO,
        };
        let mut backend = RecordingBackend::new();
        assembler.scene().draw(&frame, &mut backend);
        backend.end_frame();
        assert!(backend.frames().is_empty());
    }

    #[test]
    fn history_keeps_latest_frames() {
        let mut backend = RecordingBackend::with_history(2);
        for i in 0..5 {
            draw_scene(&mut backend, Vec3::splat(i as f32));
        }
        assert_eq!(backend.frames().len(), 2);
        let light = backend.last_frame().unwrap().draws[0].light_position;
        assert_eq!(light, Vec3::splat(4.0));
    }

    #[test]
    fn summary_lists_every_draw() {
        let mut backend = RecordingBackend::new();
        assert!(backend.summary().contains("no frame"));
        draw_scene(&mut backend, Vec3::new(0.0, 5.0, 0.0));
        let text = backend.summary();
        assert!(text.starts_with("=== Frame 1 (8 draws)"));
        assert!(text.contains("5.00, 3.00)  Light: (0.00, 5.00, 0.00)"));
        for label in ["bottom", "front", "room-border", "light-marker"] {
            assert!(text.contains(label), "missing {label}");
        }
    }
}
