//! Adapter to convert winit key events to our KeyboardShortcut type
//!
//! This is the entry point of the keyboard trigger path: the window's event
//! handler converts the event here, then hands the chord to
//! [`dispatch_shortcut`](super::dispatch_shortcut).

use winit::keyboard::{Key, KeyCode as WinitKeyCode, ModifiersState, NamedKey, PhysicalKey};

use super::types::{KeyCode, KeyboardShortcut, Modifiers};

/// Convert winit key event data to a shortcut
///
/// The logo key (Cmd on macOS) folds into Ctrl so that `Cmd+S` and `Ctrl+S`
/// resolve to the same binding. Returns None for keys that cannot be bound.
pub fn keystroke_from_winit(
    logical_key: &Key,
    physical_key: PhysicalKey,
    modifiers: ModifiersState,
) -> Option<KeyboardShortcut> {
    let mods = Modifiers::new(
        modifiers.control_key() || modifiers.super_key(),
        modifiers.alt_key(),
        modifiers.shift_key(),
    );

    // Numpad keys are only distinguishable by their physical location
    if let Some(key) = numpad_from_physical(physical_key) {
        return Some(KeyboardShortcut::new(key, mods));
    }

    let key_code = match logical_key {
        Key::Named(named) => match named {
            NamedKey::Enter => Some(KeyCode::Enter),
            NamedKey::Escape => Some(KeyCode::Escape),
            NamedKey::Tab => Some(KeyCode::Tab),
            NamedKey::Backspace => Some(KeyCode::Backspace),
            NamedKey::Delete => Some(KeyCode::Delete),
            NamedKey::Space => Some(KeyCode::Space),

            // Arrows
            NamedKey::ArrowUp => Some(KeyCode::Up),
            NamedKey::ArrowDown => Some(KeyCode::Down),
            NamedKey::ArrowLeft => Some(KeyCode::Left),
            NamedKey::ArrowRight => Some(KeyCode::Right),

            // Navigation
            NamedKey::Home => Some(KeyCode::Home),
            NamedKey::End => Some(KeyCode::End),
            NamedKey::PageUp => Some(KeyCode::PageUp),
            NamedKey::PageDown => Some(KeyCode::PageDown),
            NamedKey::Insert => Some(KeyCode::Insert),

            // Function keys
            NamedKey::F1 => Some(KeyCode::F(1)),
            NamedKey::F2 => Some(KeyCode::F(2)),
            NamedKey::F3 => Some(KeyCode::F(3)),
            NamedKey::F4 => Some(KeyCode::F(4)),
            NamedKey::F5 => Some(KeyCode::F(5)),
            NamedKey::F6 => Some(KeyCode::F(6)),
            NamedKey::F7 => Some(KeyCode::F(7)),
            NamedKey::F8 => Some(KeyCode::F(8)),
            NamedKey::F9 => Some(KeyCode::F(9)),
            NamedKey::F10 => Some(KeyCode::F(10)),
            NamedKey::F11 => Some(KeyCode::F(11)),
            NamedKey::F12 => Some(KeyCode::F(12)),

            _ => None,
        },

        // Character keys - normalized to lowercase
        Key::Character(s) => s.chars().next().map(KeyCode::from_char),

        _ => None,
    };

    key_code.map(|key| KeyboardShortcut::new(key, mods))
}

fn numpad_from_physical(physical_key: PhysicalKey) -> Option<KeyCode> {
    let PhysicalKey::Code(code) = physical_key else {
        return None;
    };
    match code {
        WinitKeyCode::Numpad0 => Some(KeyCode::Numpad0),
        WinitKeyCode::Numpad1 => Some(KeyCode::Numpad1),
        WinitKeyCode::Numpad2 => Some(KeyCode::Numpad2),
        WinitKeyCode::Numpad3 => Some(KeyCode::Numpad3),
        WinitKeyCode::Numpad4 => Some(KeyCode::Numpad4),
        WinitKeyCode::Numpad5 => Some(KeyCode::Numpad5),
        WinitKeyCode::Numpad6 => Some(KeyCode::Numpad6),
        WinitKeyCode::Numpad7 => Some(KeyCode::Numpad7),
        WinitKeyCode::Numpad8 => Some(KeyCode::Numpad8),
        WinitKeyCode::Numpad9 => Some(KeyCode::Numpad9),
        WinitKeyCode::NumpadAdd => Some(KeyCode::NumpadAdd),
        WinitKeyCode::NumpadSubtract => Some(KeyCode::NumpadSubtract),
        WinitKeyCode::NumpadMultiply => Some(KeyCode::NumpadMultiply),
        WinitKeyCode::NumpadDivide => Some(KeyCode::NumpadDivide),
        WinitKeyCode::NumpadEnter => Some(KeyCode::NumpadEnter),
        WinitKeyCode::NumpadDecimal => Some(KeyCode::NumpadDecimal),
        _ => None,
    }
}
