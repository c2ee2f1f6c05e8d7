//! Per-frame input commands
//!
//! The platform layer (or a scripted driver) translates key state into an
//! [`InputCommands`] set once per frame; everything downstream only sees
//! these flags.

use bitflags::bitflags;

bitflags! {
    /// Actions requested during one frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InputCommands: u16 {
        /// Move along the view direction
        const FORWARD = 1 << 0;
        /// Move against the view direction
        const BACK = 1 << 1;
        /// Strafe left
        const LEFT = 1 << 2;
        /// Strafe right
        const RIGHT = 1 << 3;
        /// Pitch up
        const ROT_UP = 1 << 4;
        /// Pitch down
        const ROT_DOWN = 1 << 5;
        /// Yaw left
        const ROT_LEFT = 1 << 6;
        /// Yaw right
        const ROT_RIGHT = 1 << 7;
        /// Cast a shoot ray along the view direction
        const SHOOT = 1 << 8;
        /// Discard the terrain and build it again
        const REGENERATE = 1 << 9;

        /// Any translation command
        const MOVEMENT = Self::FORWARD.bits() | Self::BACK.bits() | Self::LEFT.bits() | Self::RIGHT.bits();
        /// Any rotation command
        const ROTATION = Self::ROT_UP.bits() | Self::ROT_DOWN.bits() | Self::ROT_LEFT.bits() | Self::ROT_RIGHT.bits();
    }
}

impl InputCommands {
    /// Parse a key name as used by scripted input, e.g. `"forward"` or `"shoot"`
    ///
    /// Accepts the command names and the default key bindings (`w`, `a`,
    /// `s`, `d`, `space`), case-insensitive.
    pub fn from_key_name(name: &str) -> Option<Self> {
        let command = match name.trim().to_ascii_lowercase().as_str() {
            "forward" | "w" => Self::FORWARD,
            "back" | "s" => Self::BACK,
            "left" | "a" => Self::LEFT,
            "right" | "d" => Self::RIGHT,
            "rot_up" | "up" => Self::ROT_UP,
            "rot_down" | "down" => Self::ROT_DOWN,
            "rot_left" => Self::ROT_LEFT,
            "rot_right" => Self::ROT_RIGHT,
            "shoot" | "space" => Self::SHOOT,
            "regenerate" => Self::REGENERATE,
            _ => return None,
        };
        Some(command)
    }
}
