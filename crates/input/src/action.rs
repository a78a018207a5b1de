use serde::{Deserialize, Serialize};

/// A named fly-camera control.
///
/// Hosts translate their own key events into these; the camera controller
/// consumes control keys, never raw platform events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKey {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Up,
    Down,
    LookUp,
    LookDown,
    LookLeft,
    LookRight,
}

impl ControlKey {
    pub const ALL: [ControlKey; 10] = [
        ControlKey::Forward,
        ControlKey::Back,
        ControlKey::StrafeLeft,
        ControlKey::StrafeRight,
        ControlKey::Up,
        ControlKey::Down,
        ControlKey::LookUp,
        ControlKey::LookDown,
        ControlKey::LookLeft,
        ControlKey::LookRight,
    ];

    /// Map a physical key-code name (`"KeyW"`, `"ArrowUp"`, ...) to its control.
    pub fn from_code(code: &str) -> Option<Self> {
        let key = match code {
            "KeyW" => ControlKey::Forward,
            "KeyS" => ControlKey::Back,
            "KeyA" => ControlKey::StrafeLeft,
            "KeyD" => ControlKey::StrafeRight,
            "Space" => ControlKey::Up,
            "ShiftLeft" => ControlKey::Down,
            "ArrowUp" => ControlKey::LookUp,
            "ArrowDown" => ControlKey::LookDown,
            "ArrowLeft" => ControlKey::LookLeft,
            "ArrowRight" => ControlKey::LookRight,
            _ => return None,
        };
        Some(key)
    }

    /// The key-code name bound to this control.
    pub fn code(self) -> &'static str {
        match self {
            ControlKey::Forward => "KeyW",
            ControlKey::Back => "KeyS",
            ControlKey::StrafeLeft => "KeyA",
            ControlKey::StrafeRight => "KeyD",
            ControlKey::Up => "Space",
            ControlKey::Down => "ShiftLeft",
            ControlKey::LookUp => "ArrowUp",
            ControlKey::LookDown => "ArrowDown",
            ControlKey::LookLeft => "ArrowLeft",
            ControlKey::LookRight => "ArrowRight",
        }
    }

    /// The accumulator slot this key drives and the sign it writes there.
    pub fn binding(self) -> Binding {
        match self {
            ControlKey::StrafeLeft => Binding::Move { axis: 0, sign: -1 },
            ControlKey::StrafeRight => Binding::Move { axis: 0, sign: 1 },
            ControlKey::Up => Binding::Move { axis: 1, sign: 1 },
            ControlKey::Down => Binding::Move { axis: 1, sign: -1 },
            ControlKey::Forward => Binding::Move { axis: 2, sign: -1 },
            ControlKey::Back => Binding::Move { axis: 2, sign: 1 },
            ControlKey::LookLeft => Binding::Look { axis: 0, sign: -1 },
            ControlKey::LookRight => Binding::Look { axis: 0, sign: 1 },
            ControlKey::LookUp => Binding::Look { axis: 1, sign: 1 },
            ControlKey::LookDown => Binding::Look { axis: 1, sign: -1 },
        }
    }
}

/// Where a control key writes: a component of the move vector
/// (strafe, vertical, forward/back) or of the look vector (yaw, pitch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Move { axis: usize, sign: i8 },
    Look { axis: usize, sign: i8 },
}

/// A key transition for a control key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    pub key: ControlKey,
    pub pressed: bool,
    /// Set by hosts for auto-repeated key-down events.
    pub repeat: bool,
}

impl InputEvent {
    pub fn press(key: ControlKey) -> Self {
        Self {
            key,
            pressed: true,
            repeat: false,
        }
    }

    pub fn release(key: ControlKey) -> Self {
        Self {
            key,
            pressed: false,
            repeat: false,
        }
    }
}
