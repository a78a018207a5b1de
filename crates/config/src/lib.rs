//! Wall configuration: room dimensions and per-wall appearance, held in a
//! single store that notifies subscribers on every change.
//!
//! # Invariants
//! - One notification per mutation, delivered synchronously to every subscriber.
//! - The store never validates values; ranges are advisory for the panel.
//! - Configuration files only seed the store at startup; nothing is written back.

mod appearance;
mod room;
mod store;

pub use appearance::{
    AppearanceEdit, GRADIENT_ANGLE_RANGE, OverlayPattern, PATTERN_AMOUNT_RANGE,
    PATTERN_BLUR_RANGE, PATTERN_SCALE_RANGE, PatternColor, WallAppearance,
};
pub use room::{ConfigError, ROOM_DIMENSION_RANGE, RoomConfig, RoomDimensions, WallSet};
pub use store::{SubscriptionId, WallConfigStore};
