//! Pointer input and the grab/drag state machine.
//!
//! The tracker never owns a body. It remembers which slot of the body list it
//! holds and mutates that slot when the simulation hands it the list.

use crate::body::Body;
use kurbo::{Point, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Pressed,
    Released,
    Dragged,
}

/// One pointer event, in viewport coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub button: PointerButton,
    pub position: Point,
}

impl PointerEvent {
    pub fn pressed(button: PointerButton, position: Point) -> Self {
        PointerEvent {
            kind: PointerEventKind::Pressed,
            button,
            position,
        }
    }

    pub fn released(button: PointerButton, position: Point) -> Self {
        PointerEvent {
            kind: PointerEventKind::Released,
            button,
            position,
        }
    }

    pub fn dragged(button: PointerButton, position: Point) -> Self {
        PointerEvent {
            kind: PointerEventKind::Dragged,
            button,
            position,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Slot of the held body in the simulation's list
        index: usize,
        /// Body centre minus pointer position at grab time
        offset: Vec2,
        /// Body centre after the previous drag move
        previous: Point,
    },
}

/// Tracks which body, if any, the pointer holds
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    state: DragState,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Index of the held body
    pub fn active(&self) -> Option<usize> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { index, .. } => Some(index),
        }
    }

    /// Grabs the first body, in list order, that contains `at`.
    ///
    /// Returns the grabbed index. A press that misses leaves the state alone.
    pub fn press(&mut self, bodies: &mut [Body], at: Point) -> Option<usize> {
        let index = bodies.iter().position(|b| b.hit_test(at))?;

        // Only one body may be held
        if self.state != DragState::Idle {
            self.release(bodies);
        }

        let body = &mut bodies[index];
        body.dragged = true;
        self.state = DragState::Dragging {
            index,
            offset: body.position - at,
            previous: body.position,
        };
        log::debug!("grabbed body {} at ({:.1}, {:.1})", index, at.x, at.y);
        Some(index)
    }

    /// Lets go of everything, clearing the drag flag on every body
    pub fn release(&mut self, bodies: &mut [Body]) {
        for body in bodies.iter_mut() {
            body.dragged = false;
        }
        if let DragState::Dragging { index, .. } = self.state {
            log::debug!("released body {}", index);
        }
        self.state = DragState::Idle;
    }

    /// Moves the held body so it keeps its grab offset from `at`.
    ///
    /// The body's velocity becomes its displacement since the last move over
    /// `delta_time`. A non-positive `delta_time` moves the body but leaves its
    /// velocity as it was. Returns `false` when nothing was moved.
    pub fn drag(&mut self, bodies: &mut [Body], at: Point, delta_time: f64) -> bool {
        let DragState::Dragging {
            index,
            offset,
            previous,
        } = &mut self.state
        else {
            return false;
        };
        let Some(body) = bodies.get_mut(*index).filter(|b| b.dragged) else {
            return false;
        };

        body.position = at + *offset;
        if delta_time > 0.0 {
            body.velocity = (body.position - *previous) / delta_time;
        } else {
            log::warn!("drag move with frame time {}; keeping velocity", delta_time);
        }
        *previous = body.position;
        true
    }
}
