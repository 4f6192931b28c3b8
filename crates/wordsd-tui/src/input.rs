//! Translation from crossterm events to engine input.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode, MouseButton,
    MouseEvent, MouseEventKind,
};
use wordsd_core::InputEvent;

/// What the runtime should do with one terminal event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Engine(InputEvent),
    Resize { width: u16, height: u16 },
    Quit,
    Ignore,
}

/// Keyboard advance: a press that lands on nothing clickable.
const KEYBOARD_CLICK: InputEvent = InputEvent::PointerDown { x: -1.0, y: -1.0 };

pub fn translate(event: &Event, backlog_open: bool) -> Action {
    match event {
        Event::Key(key) => translate_key(key, backlog_open),
        Event::Mouse(mouse) => translate_mouse(mouse),
        Event::Resize(width, height) => Action::Resize {
            width: *width,
            height: *height,
        },
        _ => Action::Ignore,
    }
}

fn translate_key(key: &KeyEvent, backlog_open: bool) -> Action {
    if let KeyCode::Modifier(
        ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl,
    ) = key.code
    {
        return match key.kind {
            KeyEventKind::Press => Action::Engine(InputEvent::ModifierDown),
            KeyEventKind::Release => Action::Engine(InputEvent::ModifierUp),
            KeyEventKind::Repeat => Action::Ignore,
        };
    }

    if key.kind != KeyEventKind::Press {
        return Action::Ignore;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc if backlog_open => Action::Engine(InputEvent::ContextClick { x: 0.0, y: 0.0 }),
        KeyCode::Esc => Action::Quit,
        KeyCode::Tab => Action::Engine(InputEvent::ModifierToggle),
        KeyCode::Enter | KeyCode::Char(' ') => Action::Engine(KEYBOARD_CLICK),
        KeyCode::PageUp | KeyCode::Up => Action::Engine(InputEvent::Wheel { delta_y: -1.0 }),
        KeyCode::PageDown | KeyCode::Down => Action::Engine(InputEvent::Wheel { delta_y: 1.0 }),
        _ => Action::Ignore,
    }
}

fn translate_mouse(mouse: &MouseEvent) -> Action {
    let x = f32::from(mouse.column);
    let y = f32::from(mouse.row);
    let event = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => InputEvent::PointerDown { x, y },
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            InputEvent::PointerMove { x, y }
        }
        MouseEventKind::Up(MouseButton::Left) => InputEvent::PointerUp { x, y },
        MouseEventKind::Down(MouseButton::Right) => InputEvent::ContextClick { x, y },
        MouseEventKind::ScrollUp => InputEvent::Wheel { delta_y: -1.0 },
        MouseEventKind::ScrollDown => InputEvent::Wheel { delta_y: 1.0 },
        _ => return Action::Ignore,
    };
    Action::Engine(event)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_control_press_and_release_drive_modifier() {
        let ctrl = KeyCode::Modifier(ModifierKeyCode::LeftControl);
        assert_eq!(
            translate(&key(ctrl, KeyEventKind::Press, KeyModifiers::CONTROL), false),
            Action::Engine(InputEvent::ModifierDown)
        );
        assert_eq!(
            translate(&key(ctrl, KeyEventKind::Release, KeyModifiers::NONE), false),
            Action::Engine(InputEvent::ModifierUp)
        );
        assert_eq!(
            translate(&key(ctrl, KeyEventKind::Repeat, KeyModifiers::CONTROL), false),
            Action::Ignore
        );
    }

    #[test]
    fn test_quit_keys() {
        let ctrl_c = key(KeyCode::Char('c'), KeyEventKind::Press, KeyModifiers::CONTROL);
        assert_eq!(translate(&ctrl_c, false), Action::Quit);
        let q = key(KeyCode::Char('q'), KeyEventKind::Press, KeyModifiers::NONE);
        assert_eq!(translate(&q, true), Action::Quit);
    }

    #[test]
    fn test_escape_closes_backlog_before_quitting() {
        let esc = key(KeyCode::Esc, KeyEventKind::Press, KeyModifiers::NONE);
        assert!(matches!(
            translate(&esc, true),
            Action::Engine(InputEvent::ContextClick { .. })
        ));
        assert_eq!(translate(&esc, false), Action::Quit);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let enter = key(KeyCode::Enter, KeyEventKind::Release, KeyModifiers::NONE);
        assert_eq!(translate(&enter, false), Action::Ignore);
    }

    #[test]
    fn test_mouse_translation() {
        assert_eq!(
            translate(&mouse(MouseEventKind::Down(MouseButton::Left), 7, 4), false),
            Action::Engine(InputEvent::PointerDown { x: 7.0, y: 4.0 })
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Down(MouseButton::Right), 1, 1), false),
            Action::Engine(InputEvent::ContextClick { x: 1.0, y: 1.0 })
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::ScrollUp, 0, 0), false),
            Action::Engine(InputEvent::Wheel { delta_y: -1.0 })
        );
        assert_eq!(
            translate(&mouse(MouseEventKind::Drag(MouseButton::Left), 3, 9), false),
            Action::Engine(InputEvent::PointerMove { x: 3.0, y: 9.0 })
        );
    }

    #[test]
    fn test_resize() {
        assert_eq!(
            translate(&Event::Resize(120, 40), false),
            Action::Resize {
                width: 120,
                height: 40
            }
        );
    }
}
