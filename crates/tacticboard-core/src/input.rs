//! Pointer input in client coordinates.

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What the pointer landed on when it went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerTarget {
    /// Empty canvas (or a drawing on it).
    #[default]
    Canvas,
    /// A player token; dragging tokens is handled by the host.
    Player(Uuid),
    /// A toolbar button or other UI control over the canvas.
    Control,
}

impl PointerTarget {
    /// Whether a press on this target may start a drawing gesture.
    pub fn starts_gesture(self) -> bool {
        matches!(self, PointerTarget::Canvas)
    }
}

/// Unified mouse/touch pointer event.
///
/// Positions are in client space; [`CanvasViewport::to_local`] maps them onto
/// the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, target: PointerTarget },
    Move { position: Point },
    Up { position: Point },
    /// Pointer left the canvas; ends the gesture like `Up`.
    Leave { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position }
            | PointerEvent::Leave { position } => position,
        }
    }

    /// Whether this event finishes the current gesture.
    pub fn is_release(&self) -> bool {
        matches!(self, PointerEvent::Up { .. } | PointerEvent::Leave { .. })
    }
}

/// Placement of the canvas within the client area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasViewport {
    /// Top-left corner of the canvas in client coordinates.
    pub origin: Point,
    /// Canvas size in pixels.
    pub size: Size,
}

impl Default for CanvasViewport {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            size: Size::new(600.0, 400.0),
        }
    }
}

impl CanvasViewport {
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Convert a client position to canvas-local coordinates.
    pub fn to_local(&self, client: Point) -> Point {
        client - self.origin.to_vec2()
    }

    /// Canvas-local bounds.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size)
    }

    /// Offset to apply to a local point to get back to client space.
    pub fn offset(&self) -> Vec2 {
        self.origin.to_vec2()
    }
}
