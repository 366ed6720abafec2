use crate::interaction::dnd::DragPayload;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// `Idle` means no session exists; a session is `Pending` until the pointer
/// travels past the threshold on either axis, then `Dragging` for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Pending,
    Dragging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Cmd on macOS, Ctrl elsewhere.
    pub command: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Open the detail view, or the deep link in a new context.
    Click { subject: DragPayload, new_tab: bool },
    Drop { subject: DragPayload, at: Point },
}

/// Creates press sessions with the configured drag threshold.
#[derive(Debug, Clone, Copy)]
pub struct PointerTracker {
    threshold_px: f64,
}

impl PointerTracker {
    pub fn new(threshold_px: f64) -> Self {
        Self { threshold_px }
    }

    pub fn press(&self, subject: DragPayload, at: Point) -> PressSession {
        PressSession {
            subject,
            origin: at,
            threshold_px: self.threshold_px,
            state: GestureState::Pending,
        }
    }
}

/// Lives from pointer-down to pointer-up; `release` consumes it.
#[derive(Debug, Clone)]
pub struct PressSession {
    subject: DragPayload,
    origin: Point,
    threshold_px: f64,
    state: GestureState,
}

impl PressSession {
    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn subject(&self) -> &DragPayload {
        &self.subject
    }

    fn beyond_threshold(&self, at: Point) -> bool {
        (at.x - self.origin.x).abs() > self.threshold_px
            || (at.y - self.origin.y).abs() > self.threshold_px
    }

    pub fn move_to(&mut self, at: Point) -> GestureState {
        if self.state == GestureState::Pending && self.beyond_threshold(at) {
            self.state = GestureState::Dragging;
        }
        self.state
    }

    pub fn release(mut self, at: Point, modifiers: Modifiers) -> Gesture {
        self.move_to(at);
        match self.state {
            GestureState::Dragging => Gesture::Drop {
                subject: self.subject,
                at,
            },
            _ => Gesture::Click {
                subject: self.subject,
                new_tab: modifiers.command,
            },
        }
    }
}
