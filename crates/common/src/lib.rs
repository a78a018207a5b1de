//! Shared value types used across the roomview crates.

mod types;

pub use types::{Axis, Rgb, WallRole, srgb_to_linear};
