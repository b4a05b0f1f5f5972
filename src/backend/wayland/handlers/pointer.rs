// Turns overlay pointer events into editor events: presses with click counts,
// drags while the primary button is held, hover moves and right-click cancel.
use std::time::Instant;

use log::debug;
use smithay_client_toolkit::seat::pointer::{
    BTN_LEFT, BTN_MIDDLE, BTN_RIGHT, PointerEvent, PointerEventKind, PointerHandler,
};
use wayland_client::{Connection, QueueHandle, protocol::wl_pointer};

use crate::input::MouseButton;
use crate::selection::EditorEvent;

use super::super::state::WaylandState;

fn mouse_button(button: u32) -> Option<MouseButton> {
    match button {
        BTN_LEFT => Some(MouseButton::Left),
        BTN_MIDDLE => Some(MouseButton::Middle),
        BTN_RIGHT => Some(MouseButton::Right),
        _ => None,
    }
}

impl PointerHandler for WaylandState {
    fn pointer_frame(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        _pointer: &wl_pointer::WlPointer,
        events: &[PointerEvent],
    ) {
        for event in events {
            if !self.controller.is_selecting() || !self.surface.owns(&event.surface) {
                continue;
            }

            let position = self.to_global(event.position);
            self.pointer_position = position;

            match event.kind {
                PointerEventKind::Enter { .. } => {
                    debug!("Pointer entered overlay at {:?}", position);
                    if let Some(editor) = self.controller.editor() {
                        self.set_cursor(editor.cursor());
                    }
                    self.editor_event(EditorEvent::PointerMove { position }, qh);
                }
                PointerEventKind::Leave { .. } => {
                    debug!("Pointer left overlay");
                }
                PointerEventKind::Motion { .. } => {
                    let event = if self.primary_down {
                        EditorEvent::PointerDrag { position }
                    } else {
                        EditorEvent::PointerMove { position }
                    };
                    self.editor_event(event, qh);
                }
                PointerEventKind::Press { button, .. } => match mouse_button(button) {
                    Some(MouseButton::Left) => {
                        let click_count = self.clicks.press(position, Instant::now());
                        debug!("Primary press #{} at {:?}", click_count, position);
                        self.primary_down = true;
                        self.editor_event(
                            EditorEvent::PointerDown {
                                position,
                                click_count,
                            },
                            qh,
                        );
                    }
                    Some(MouseButton::Right) => {
                        self.editor_event(EditorEvent::SecondaryClick, qh);
                    }
                    Some(MouseButton::Middle) | None => {}
                },
                PointerEventKind::Release { button, .. } => {
                    if mouse_button(button) == Some(MouseButton::Left) && self.primary_down {
                        self.primary_down = false;
                        self.editor_event(EditorEvent::PointerUp { position }, qh);
                    }
                }
                PointerEventKind::Axis { .. } => {}
            }
        }
    }
}
