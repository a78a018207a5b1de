use std::cell::Cell;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use roomview_common::Rgb;
use roomview_config::{RoomConfig, SubscriptionId, WallConfigStore};
use roomview_geometry::PrismSize;
use serde::{Deserialize, Serialize};

use crate::cache::GeometryCache;
use crate::draw::{
    ClosureKind, DrawClosure, FrameUniforms, Placement, Shading, ShadingBackend, WallShading,
};
use crate::layout::{Wall, interior_origin, walls};

/// Extras drawn alongside the six walls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Thickness of the interior edge outline; `None` hides it.
    pub border_thickness: Option<f32>,
    pub border_color: Rgb,
    /// Edge length of the cube drawn at the light position; `None` hides it.
    pub light_marker_size: Option<f32>,
    pub light_marker_color: Rgb,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            border_thickness: Some(0.04),
            border_color: Rgb::from_srgb(0.5, 0.6, 0.7),
            light_marker_size: Some(0.6),
            light_marker_color: Rgb::from_srgb(0.2, 0.3, 0.4),
        }
    }
}

/// One immutable snapshot of everything the render loop draws.
#[derive(Debug, Clone)]
pub struct Scene {
    pub closures: Vec<DrawClosure>,
    pub walls: [Wall; 6],
    /// Incremented on every rebuild.
    pub generation: u64,
}

impl Scene {
    /// Invoke every closure in order with the same frame uniforms.
    pub fn draw(&self, frame: &FrameUniforms, backend: &mut dyn ShadingBackend) {
        for closure in &self.closures {
            closure.invoke(frame, backend);
        }
    }

    pub fn closure(&self, kind: ClosureKind) -> Option<&DrawClosure> {
        self.closures.iter().find(|c| c.kind() == kind)
    }
}

/// Rebuilds the [`Scene`] whenever the wall configuration store changes.
///
/// The store subscription only raises a flag; the rebuild happens in
/// [`sync`](SceneAssembler::sync), which the owner calls between frames.
/// Any number of mutations between two syncs costs one rebuild, and a frame
/// never sees a partially built scene.
#[derive(Debug)]
pub struct SceneAssembler {
    scene: Scene,
    settings: SceneSettings,
    cache: GeometryCache,
    dirty: Rc<Cell<bool>>,
    subscription: SubscriptionId,
}

impl SceneAssembler {
    pub fn new(store: &mut WallConfigStore, settings: SceneSettings) -> Self {
        let dirty = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dirty);
        let subscription = store.subscribe(move || flag.set(true));

        let mut cache = GeometryCache::new();
        let scene = build_scene(store.config(), &settings, &mut cache, 0);
        tracing::info!(closures = scene.closures.len(), "scene assembled");
        Self {
            scene,
            settings,
            cache,
            dirty,
            subscription,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn settings(&self) -> &SceneSettings {
        &self.settings
    }

    /// Change the extras. Takes effect on the next sync.
    pub fn set_settings(&mut self, settings: SceneSettings) {
        if settings != self.settings {
            self.settings = settings;
            self.dirty.set(true);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    pub fn cache(&self) -> &GeometryCache {
        &self.cache
    }

    /// Rebuild if the store changed since the last sync. Returns whether a
    /// rebuild happened.
    pub fn sync(&mut self, store: &WallConfigStore) -> bool {
        if !self.dirty.replace(false) {
            return false;
        }
        self.rebuild(store.config());
        true
    }

    /// Build a fresh scene from `config` and swap it in.
    pub fn rebuild(&mut self, config: &RoomConfig) {
        let generation = self.scene.generation + 1;
        self.scene = build_scene(config, &self.settings, &mut self.cache, generation);
        tracing::debug!(
            generation,
            cached_meshes = self.cache.len(),
            "scene rebuilt"
        );
    }

    /// Drop the store subscription. The current scene stays usable.
    pub fn detach(self, store: &mut WallConfigStore) -> Scene {
        store.unsubscribe(self.subscription);
        self.scene
    }
}

fn build_scene(
    config: &RoomConfig,
    settings: &SceneSettings,
    cache: &mut GeometryCache,
    generation: u64,
) -> Scene {
    let walls = walls(config);
    let mut closures = Vec::with_capacity(walls.len() + 2);

    for wall in &walls {
        let (mesh_key, mesh) = cache.prism(wall.size);
        closures.push(DrawClosure::new(
            ClosureKind::Wall(wall.role),
            mesh_key,
            mesh,
            Placement::Fixed(Mat4::from_translation(wall.offset)),
            Shading::Wall(WallShading::resolve(&wall.appearance)),
        ));
    }

    if let Some(thickness) = settings.border_thickness {
        let room = config.room;
        let size = PrismSize::new(room.length, room.height, room.width);
        let (mesh_key, mesh) = cache.border(size, thickness);
        closures.push(DrawClosure::new(
            ClosureKind::RoomBorder,
            mesh_key,
            mesh,
            Placement::Fixed(Mat4::from_translation(interior_origin(&room))),
            Shading::Solid(settings.border_color.to_array()),
        ));
    }

    if let Some(edge) = settings.light_marker_size {
        let (mesh_key, mesh) = cache.prism(PrismSize::splat(edge));
        closures.push(DrawClosure::new(
            ClosureKind::LightMarker,
            mesh_key,
            mesh,
            Placement::AtLight {
                half_extent: Vec3::splat(edge / 2.0),
            },
            Shading::Solid(settings.light_marker_color.to_array()),
        ));
    }

    cache.finish_pass();
    Scene {
        closures,
        walls,
        generation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomview_common::WallRole;
    use roomview_config::{AppearanceEdit, OverlayPattern, PatternColor};

    const TOP_FACE: std::ops::Range<usize> = 16..20;

    fn bare() -> SceneSettings {
        SceneSettings {
            border_thickness: None,
            light_marker_size: None,
            ..SceneSettings::default()
        }
    }

    fn wall_shading(scene: &Scene, role: WallRole) -> WallShading {
        match scene.closure(ClosureKind::Wall(role)).map(|c| *c.shading()) {
            Some(Shading::Wall(shading)) => shading,
            other => panic!("no wall shading for {role:?}: {other:?}"),
        }
    }

    #[test]
    fn default_scene_has_walls_border_and_marker() {
        let mut store = WallConfigStore::default();
        let assembler = SceneAssembler::new(&mut store, SceneSettings::default());
        let scene = assembler.scene();
        assert_eq!(scene.closures.len(), 8);
        for role in WallRole::ALL {
            assert!(scene.closure(ClosureKind::Wall(role)).is_some());
        }
        assert!(scene.closure(ClosureKind::RoomBorder).is_some());
        assert!(scene.closure(ClosureKind::LightMarker).is_some());
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn floor_mesh_matches_room_footprint() {
        let mut store = WallConfigStore::default();
        store.set_room_length(10.0);
        store.set_room_height(8.0);
        store.set_room_width(10.0);
        let assembler = SceneAssembler::new(&mut store, bare());

        let bottom = assembler
            .scene()
            .closure(ClosureKind::Wall(WallRole::Bottom))
            .unwrap();
        let mesh = bottom.mesh();
        for i in TOP_FACE {
            assert_eq!(mesh.normals[i], [0.0, 1.0, 0.0]);
            assert_eq!(mesh.face_sizes[i], [10.0, 10.0]);
        }
        assert_eq!(wall_shading(assembler.scene(), WallRole::Bottom).pattern_kind, 0);
    }

    #[test]
    fn inverted_circle_pattern_uses_gradient_end() {
        let mut store = WallConfigStore::default();
        let mut assembler = SceneAssembler::new(&mut store, bare());
        for edit in [
            AppearanceEdit::ColorStart(Rgb::WHITE),
            AppearanceEdit::ColorEnd(Rgb::BLACK),
            AppearanceEdit::OverlayPattern(OverlayPattern::Circle),
            AppearanceEdit::PatternColor(PatternColor::InvertedGradient),
        ] {
            store.set_wall(WallRole::Front, edit);
        }
        assert!(assembler.sync(&store));

        let shading = wall_shading(assembler.scene(), WallRole::Front);
        assert_eq!(shading.pattern_kind, 1);
        assert_eq!(shading.pattern_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(shading.color_start, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn many_mutations_cost_one_rebuild() {
        let mut store = WallConfigStore::default();
        let mut assembler = SceneAssembler::new(&mut store, bare());
        assert!(!assembler.sync(&store));

        for i in 0..5 {
            store.set_room_length(5.0 + i as f32);
        }
        assert!(assembler.is_dirty());
        assert!(assembler.sync(&store));
        assert!(!assembler.sync(&store));
        assert_eq!(assembler.scene().generation, 1);

        let (size, _) = crate::layout::wall_placement(WallRole::Bottom, store.room());
        assert_eq!(assembler.scene().walls[0].size, size);
        assert_eq!(size.length, 9.0);
    }

    #[test]
    fn equal_sized_walls_share_a_mesh() {
        let mut store = WallConfigStore::default();
        let assembler = SceneAssembler::new(&mut store, bare());
        let scene = assembler.scene();
        let mesh = |role| scene.closure(ClosureKind::Wall(role)).unwrap().mesh().clone();
        assert!(Rc::ptr_eq(&mesh(WallRole::Bottom), &mesh(WallRole::Top)));
        assert!(Rc::ptr_eq(&mesh(WallRole::Left), &mesh(WallRole::Right)));
        // floor/ceiling, side walls, back/front
        assert_eq!(assembler.cache().len(), 3);
    }

    #[test]
    fn appearance_edit_reuses_geometry() {
        let mut store = WallConfigStore::default();
        let mut assembler = SceneAssembler::new(&mut store, bare());
        let before = assembler.cache().generated();
        store.set_wall(WallRole::Left, AppearanceEdit::PatternAmount(20.0));
        assembler.sync(&store);
        assert_eq!(assembler.cache().generated(), before);
        assert_eq!(wall_shading(assembler.scene(), WallRole::Left).pattern_amount, 20.0);
    }

    #[test]
    fn settings_change_marks_dirty() {
        let mut store = WallConfigStore::default();
        let mut assembler = SceneAssembler::new(&mut store, bare());
        assembler.set_settings(SceneSettings::default());
        assert!(assembler.sync(&store));
        assert_eq!(assembler.scene().closures.len(), 8);
    }

    #[test]
    fn detach_unsubscribes() {
        let mut store = WallConfigStore::default();
        let assembler = SceneAssembler::new(&mut store, bare());
        let scene = assembler.detach(&mut store);
        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(scene.closures.len(), 6);
    }

    #[test]
    fn border_sits_at_interior_origin() {
        let mut store = WallConfigStore::default();
        store.set_room_length(6.0);
        store.set_room_width(4.0);
        let assembler = SceneAssembler::new(&mut store, SceneSettings::default());
        let border = assembler.scene().closure(ClosureKind::RoomBorder).unwrap();
        let frame = FrameUniforms {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            light_position: Vec3::ZERO,
        };
        assert_eq!(
            border.model(&frame).w_axis.truncate(),
            Vec3::new(-3.0, 0.0, -2.0)
        );
    }
}
