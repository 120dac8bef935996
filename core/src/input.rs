//! Pointer input accumulation
//!
//! Window events arrive many times per frame; the camera only wants the sum.
//! [`OrbitInput`] collects drag and scroll between frames and hands them over
//! once per frame through [`OrbitInput::take`].

use glam::Vec2;

/// Input gathered since the last frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrbitDeltas {
    /// Cursor movement in pixels while the button was held
    pub drag: Vec2,
    /// Scroll in lines (positive = away from the user = zoom in)
    pub scroll: f32,
}

impl OrbitDeltas {
    pub fn is_empty(&self) -> bool {
        self.drag == Vec2::ZERO && self.scroll == 0.0
    }
}

/// Drag/scroll state for the orbit camera
#[derive(Debug, Clone, Default)]
pub struct OrbitInput {
    dragging: bool,
    /// Last cursor position seen while dragging
    anchor: Option<Vec2>,
    pending: OrbitDeltas,
}

impl OrbitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rotation button went down
    pub fn press(&mut self) {
        self.dragging = true;
        self.anchor = None;
    }

    /// Rotation button went up
    pub fn release(&mut self) {
        self.dragging = false;
        self.anchor = None;
    }

    /// Cursor left the window or focus was lost
    pub fn cancel(&mut self) {
        self.release();
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Cursor moved to `position` (window pixels)
    pub fn cursor_moved(&mut self, position: Vec2) {
        if !self.dragging {
            return;
        }

        // The first move after a press only sets the anchor
        if let Some(anchor) = self.anchor {
            self.pending.drag += position - anchor;
        }
        self.anchor = Some(position);
    }

    /// Scroll wheel moved by `lines`
    pub fn scroll(&mut self, lines: f32) {
        if lines.is_finite() {
            self.pending.scroll += lines;
        }
    }

    /// Drain everything gathered since the last call
    pub fn take(&mut self) -> OrbitDeltas {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_without_press_ignored() {
        let mut input = OrbitInput::new();
        input.cursor_moved(Vec2::new(10.0, 10.0));
        input.cursor_moved(Vec2::new(50.0, 10.0));
        assert!(input.take().is_empty());
    }

    #[test]
    fn test_drag_accumulates() {
        let mut input = OrbitInput::new();
        input.cursor_moved(Vec2::new(100.0, 100.0));
        input.press();
        input.cursor_moved(Vec2::new(100.0, 100.0));
        input.cursor_moved(Vec2::new(110.0, 95.0));
        input.cursor_moved(Vec2::new(130.0, 90.0));

        let deltas = input.take();
        assert_eq!(deltas.drag, Vec2::new(30.0, -10.0));
        assert_eq!(deltas.scroll, 0.0);
    }

    #[test]
    fn test_first_move_after_press_does_not_jump() {
        let mut input = OrbitInput::new();
        input.press();
        input.cursor_moved(Vec2::new(500.0, 500.0));
        assert_eq!(input.take().drag, Vec2::ZERO);
    }

    #[test]
    fn test_release_stops_drag() {
        let mut input = OrbitInput::new();
        input.press();
        input.cursor_moved(Vec2::new(0.0, 0.0));
        input.cursor_moved(Vec2::new(5.0, 0.0));
        input.release();
        input.cursor_moved(Vec2::new(100.0, 0.0));
        assert!(!input.is_dragging());

        assert_eq!(input.take().drag, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_new_press_resets_anchor() {
        let mut input = OrbitInput::new();
        input.press();
        input.cursor_moved(Vec2::new(0.0, 0.0));
        input.release();
        input.press();
        input.cursor_moved(Vec2::new(300.0, 300.0));
        input.cursor_moved(Vec2::new(301.0, 300.0));

        assert_eq!(input.take().drag, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_take_drains() {
        let mut input = OrbitInput::new();
        input.scroll(1.0);
        input.scroll(2.5);
        input.scroll(f32::NAN);

        let deltas = input.take();
        assert_eq!(deltas.scroll, 3.5);
        assert!(input.take().is_empty());
    }

    #[test]
    fn test_cancel_ends_drag() {
        let mut input = OrbitInput::new();
        input.press();
        input.cancel();
        assert!(!input.is_dragging());
    }
}
