use glam::Vec3;
use roomview_common::WallRole;
use roomview_config::{RoomConfig, RoomDimensions, WallAppearance};
use roomview_geometry::PrismSize;

/// Thickness of every wall slab.
pub const WALL_THICKNESS: f32 = 1.0;

/// A wall slab: its prism size, where its minimum corner sits in world
/// space, and how it is shaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub role: WallRole,
    pub size: PrismSize,
    pub offset: Vec3,
    pub appearance: WallAppearance,
}

/// Size and world offset of a wall for the given room.
///
/// The interior spans `x ∈ [-L/2, L/2]`, `y ∈ [0, H]`, `z ∈ [-W/2, W/2]`, so
/// the floor surface passes through the origin. Each slab lies just outside
/// the interior, its inner face flush with it.
pub fn wall_placement(role: WallRole, room: &RoomDimensions) -> (PrismSize, Vec3) {
    let RoomDimensions {
        length: l,
        height: h,
        width: w,
    } = *room;
    let t = WALL_THICKNESS;
    let (x0, z0) = (-l / 2.0, -w / 2.0);
    match role {
        WallRole::Bottom => (PrismSize::new(l, t, w), Vec3::new(x0, -t, z0)),
        WallRole::Top => (PrismSize::new(l, t, w), Vec3::new(x0, h, z0)),
        WallRole::Left => (PrismSize::new(t, h, w), Vec3::new(x0 - t, 0.0, z0)),
        WallRole::Right => (PrismSize::new(t, h, w), Vec3::new(l / 2.0, 0.0, z0)),
        WallRole::Back => (PrismSize::new(l, h, t), Vec3::new(x0, 0.0, z0 - t)),
        WallRole::Front => (PrismSize::new(l, h, t), Vec3::new(x0, 0.0, w / 2.0)),
    }
}

/// Minimum corner of the room interior in world space.
pub fn interior_origin(room: &RoomDimensions) -> Vec3 {
    Vec3::new(-room.length / 2.0, 0.0, -room.width / 2.0)
}

/// The six walls for a configuration, in [`WallRole::ALL`] order.
pub fn walls(config: &RoomConfig) -> [Wall; 6] {
    WallRole::ALL.map(|role| {
        let (size, offset) = wall_placement(role, &config.room);
        Wall {
            role,
            size,
            offset,
            appearance: *config.walls.get(role),
        }
    })
}
