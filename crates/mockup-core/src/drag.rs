//! Drag-to-rotate input state
//!
//! Mouse and single-finger touch input share one state machine: a press
//! records the position, each move while pressed yields a rotation delta
//! proportional to the pointer travel, and a release ends the drag.

/// Pointer position in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}

impl PointerPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rotation produced by one pointer move, in radians
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationDelta {
    /// Added to rotation Y, from horizontal travel
    pub yaw: f32,
    /// Added to rotation X, from vertical travel
    pub pitch: f32,
}

/// Tracks an in-progress drag
#[derive(Debug, Clone)]
pub struct DragController {
    dragging: bool,
    previous: PointerPosition,
    sensitivity: f32,
}

impl DragController {
    pub fn new(sensitivity: f32) -> Self {
        Self {
            dragging: false,
            previous: PointerPosition::default(),
            sensitivity,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn pointer_down(&mut self, position: PointerPosition) {
        self.dragging = true;
        self.previous = position;
    }

    /// Returns the rotation delta while dragging and updates the anchor.
    ///
    /// `apply` is false when there is nothing to rotate; the move is then
    /// ignored entirely and the anchor stays where it was.
    pub fn pointer_move(&mut self, position: PointerPosition, apply: bool) -> Option<RotationDelta> {
        if !self.dragging || !apply {
            return None;
        }
        let delta = RotationDelta {
            yaw: (position.x - self.previous.x) * self.sensitivity,
            pitch: (position.y - self.previous.y) * self.sensitivity,
        };
        self.previous = position;
        Some(delta)
    }

    /// Ends the drag; used for pointer-up and pointer-leave
    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    /// Starts a drag for exactly one touch; multi-touch is ignored
    pub fn touch_start(&mut self, touches: &[PointerPosition]) -> bool {
        match touches {
            [touch] => {
                self.pointer_down(*touch);
                true
            }
            _ => false,
        }
    }

    /// Same as [`pointer_move`](Self::pointer_move) for exactly one touch
    pub fn touch_move(&mut self, touches: &[PointerPosition], apply: bool) -> Option<RotationDelta> {
        match touches {
            [touch] => self.pointer_move(*touch, apply),
            _ => None,
        }
    }

    pub fn touch_end(&mut self) {
        self.dragging = false;
    }
}
