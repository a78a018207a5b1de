//! Input: control keys for the fly camera and the queue that carries them
//! from host event handlers to the per-frame integration step.
//!
//! # Invariants
//! - Only the ten bound control keys ever reach the queue.
//! - The queue has one writer and one reader; the reader drains once per frame.

pub mod action;
mod queue;

pub use action::{Binding, ControlKey, InputEvent};
pub use queue::{InputReceiver, InputSender, input_channel};
