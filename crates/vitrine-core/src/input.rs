#![forbid(unsafe_code)]

//! Normalisation of DOM key and pointer values.
//!
//! The host forwards raw `KeyboardEvent.key`, `PointerEvent.pointerType` and
//! `MouseEvent.button` values; these helpers map them onto the small closed
//! sets the controllers understand.

use serde::{Deserialize, Serialize};

/// Discrete navigation keys handled globally by the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavKey {
    Prev,
    Next,
}

impl NavKey {
    /// Map a DOM `key` value to a navigation key.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Prev),
            "ArrowRight" => Some(Self::Next),
            _ => None,
        }
    }
}

/// Whether a DOM `key` value activates a focused thumbnail or swatch.
#[must_use]
pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

/// Physical pointer type reported by `PointerEvent.pointerType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Mouse,
    Pen,
    Touch,
    Unknown,
}

impl PointerKind {
    #[must_use]
    pub fn from_dom(pointer_type: &str) -> Self {
        match pointer_type {
            "mouse" => Self::Mouse,
            "pen" => Self::Pen,
            "touch" => Self::Touch,
            _ => Self::Unknown,
        }
    }
}

/// Button reported by `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
    Other,
}

impl PointerButton {
    #[must_use]
    pub const fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Other,
        }
    }

    /// Only primary mouse buttons start a drag; touch and pen always do.
    #[must_use]
    pub fn starts_drag(self, kind: PointerKind) -> bool {
        kind != PointerKind::Mouse || self == Self::Primary
    }
}
