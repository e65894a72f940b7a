use snaptext_types::CaptureRect;

/// A pointer event in absolute screen pixels.
#[derive(Debug, Clone, Copy)]
pub enum PointerEvent {
    Pressed { x: i32, y: i32 },
    Moved { x: i32, y: i32 },
    Released { x: i32, y: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// Waiting for the first press.
    Armed,
    /// Anchor set, tracking the cursor.
    Dragging,
    /// Release seen, rectangle final.
    Captured,
}

/// Drag-selection state machine. The hosting window feeds pointer events in
/// and reads back the live rectangle for feedback drawing; once `Captured`
/// the rectangle is final.
#[derive(Debug)]
pub struct SelectionOverlay {
    phase: SelectionPhase,
    anchor: (i32, i32),
    cursor: (i32, i32),
}

impl SelectionOverlay {
    pub fn new() -> Self {
        Self {
            phase: SelectionPhase::Armed,
            anchor: (0, 0),
            cursor: (0, 0),
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn handle(&mut self, event: PointerEvent) {
        match (self.phase, event) {
            (SelectionPhase::Armed, PointerEvent::Pressed { x, y }) => {
                self.anchor = (x, y);
                self.cursor = (x, y);
                self.phase = SelectionPhase::Dragging;
            }
            (SelectionPhase::Dragging, PointerEvent::Moved { x, y }) => {
                self.cursor = (x, y);
            }
            (SelectionPhase::Dragging, PointerEvent::Released { x, y }) => {
                self.cursor = (x, y);
                self.phase = SelectionPhase::Captured;
            }
            // Moves before the press and stray events after capture are ignored.
            _ => {}
        }
    }

    /// The rectangle between anchor and cursor, normalized. `None` until the
    /// drag has started.
    pub fn live_rect(&self) -> Option<CaptureRect> {
        match self.phase {
            SelectionPhase::Armed => None,
            _ => Some(CaptureRect::from_corners(self.anchor, self.cursor)),
        }
    }

    /// The final rectangle, available once the drag has been released.
    pub fn result(&self) -> Option<CaptureRect> {
        match self.phase {
            SelectionPhase::Captured => self.live_rect(),
            _ => None,
        }
    }
}

impl Default for SelectionOverlay {
    fn default() -> Self {
        Self::new()
    }
}
