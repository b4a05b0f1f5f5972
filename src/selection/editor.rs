use log::{debug, info};

use super::geometry::{CursorHint, HandlePosition, SelectionRect, apply_drag, hit_test};
use crate::input::Key;
use crate::util::Point;

/// Input delivered to the editor by a backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEvent {
    /// Primary button pressed. `click_count` is 2 for a double-click.
    PointerDown { position: Point, click_count: u32 },
    /// Pointer moved with the primary button held.
    PointerDrag { position: Point },
    /// Primary button released.
    PointerUp { position: Point },
    /// Pointer moved with no button held.
    PointerMove { position: Point },
    Key(Key),
    /// Right click anywhere on the overlay.
    SecondaryClick,
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorOutcome {
    Confirmed(SelectionRect),
    Cancelled,
}

/// Side effects the host should carry out after an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorEffect {
    Redraw,
    SetCursor(CursorHint),
    Finished(EditorOutcome),
}

/// Active press: which zone was grabbed, where, and the rectangle at that time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub handle: Option<HandlePosition>,
    pub origin: Point,
    pub rect_at_start: SelectionRect,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorState {
    Idle,
    Dragging(DragSession),
    Confirmed(SelectionRect),
    Cancelled,
}

impl EditorState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EditorState::Confirmed(_) | EditorState::Cancelled)
    }
}

/// Interactive rectangle editor driven by [`EditorEvent`]s.
///
/// All transitions go through [`RegionEditor::handle`]; once a terminal state
/// is reached every further event is ignored.
#[derive(Debug, Clone)]
pub struct RegionEditor {
    rect: SelectionRect,
    state: EditorState,
    cursor: CursorHint,
    outcome: Option<EditorOutcome>,
}

impl RegionEditor {
    pub fn new(rect: SelectionRect) -> Self {
        debug!(
            "Region editor opened at ({:.0}, {:.0}) {:.0}x{:.0}",
            rect.x, rect.y, rect.width, rect.height
        );
        Self {
            rect,
            state: EditorState::Idle,
            cursor: CursorHint::Default,
            outcome: None,
        }
    }

    pub fn rect(&self) -> SelectionRect {
        self.rect
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// Handle currently being dragged, if any.
    pub fn active_handle(&self) -> Option<HandlePosition> {
        match self.state {
            EditorState::Dragging(session) => session.handle,
            _ => None,
        }
    }

    /// Returns the outcome once; later calls yield `None`.
    pub fn take_outcome(&mut self) -> Option<EditorOutcome> {
        self.outcome.take()
    }

    pub fn handle(&mut self, event: EditorEvent) -> Vec<EditorEffect> {
        if self.state.is_terminal() {
            return Vec::new();
        }

        match event {
            EditorEvent::PointerDown {
                position,
                click_count,
            } => self.on_pointer_down(position, click_count),
            EditorEvent::PointerDrag { position } => self.on_pointer_drag(position),
            EditorEvent::PointerUp { position } => self.on_pointer_up(position),
            EditorEvent::PointerMove { position } => self.update_cursor(position),
            EditorEvent::Key(key) if key.is_confirm() => {
                self.finish(EditorOutcome::Confirmed(self.rect))
            }
            EditorEvent::Key(Key::Escape) | EditorEvent::SecondaryClick => {
                self.finish(EditorOutcome::Cancelled)
            }
            EditorEvent::Key(_) => Vec::new(),
        }
    }

    fn on_pointer_down(&mut self, position: Point, click_count: u32) -> Vec<EditorEffect> {
        if click_count >= 2 {
            return self.finish(EditorOutcome::Confirmed(self.rect));
        }

        let handle = hit_test(&self.rect, position);
        debug!("Pointer down at {:?} on {:?}", position, handle);
        self.state = EditorState::Dragging(DragSession {
            handle,
            origin: position,
            rect_at_start: self.rect,
        });
        let hint = handle.map(HandlePosition::cursor_hint).unwrap_or_default();
        self.set_cursor(hint).into_iter().collect()
    }

    fn on_pointer_drag(&mut self, position: Point) -> Vec<EditorEffect> {
        let EditorState::Dragging(session) = self.state else {
            return Vec::new();
        };
        let Some(handle) = session.handle else {
            return Vec::new();
        };

        let dx = position.x - session.origin.x;
        let dy = position.y - session.origin.y;
        let next = apply_drag(&session.rect_at_start, handle, dx, dy);
        if next == self.rect {
            return Vec::new();
        }
        self.rect = next;
        vec![EditorEffect::Redraw]
    }

    fn on_pointer_up(&mut self, position: Point) -> Vec<EditorEffect> {
        if matches!(self.state, EditorState::Dragging(_)) {
            self.state = EditorState::Idle;
        }
        self.update_cursor(position)
    }

    fn update_cursor(&mut self, position: Point) -> Vec<EditorEffect> {
        if matches!(self.state, EditorState::Dragging(_)) {
            return Vec::new();
        }
        let hint = hit_test(&self.rect, position)
            .map(HandlePosition::cursor_hint)
            .unwrap_or_default();
        self.set_cursor(hint).into_iter().collect()
    }

    fn set_cursor(&mut self, hint: CursorHint) -> Option<EditorEffect> {
        if hint == self.cursor {
            return None;
        }
        self.cursor = hint;
        Some(EditorEffect::SetCursor(hint))
    }

    fn finish(&mut self, outcome: EditorOutcome) -> Vec<EditorEffect> {
        self.state = match outcome {
            EditorOutcome::Confirmed(rect) => EditorState::Confirmed(rect),
            EditorOutcome::Cancelled => EditorState::Cancelled,
        };
        info!("Region editor finished: {:?}", outcome);
        self.outcome = Some(outcome);
        vec![EditorEffect::Finished(outcome)]
    }
}
