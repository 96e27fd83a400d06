//! Core types for the keymap system: KeyCode, Modifiers, KeyboardShortcut
//!
//! A [`KeyboardShortcut`] has a canonical string form (`"Ctrl+Shift+A"`) that
//! round-trips through [`FromStr`], and a total order so it can key a `BTreeMap`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b001);
    pub const ALT: Modifiers = Modifiers(0b010);
    pub const SHIFT: Modifiers = Modifiers(0b100);

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, alt: bool, shift: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b001;
        }
        if alt {
            bits |= 0b010;
        }
        if shift {
            bits |= 0b100;
        }
        Modifiers(bits)
    }

    /// Check if ctrl (or cmd) is held
    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b001 != 0
    }

    /// Check if alt/option is held
    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b010 != 0
    }

    /// Check if shift is held
    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b100 != 0
    }

    /// Check if no modifiers are held
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }

    /// Check if this contains all modifiers in other
    #[inline]
    pub const fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl() {
            parts.push("Ctrl");
        }
        if self.alt() {
            parts.push("Alt");
        }
        if self.shift() {
            parts.push("Shift");
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// A key code representing a physical or logical key
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyCode {
    /// A character key (normalized to lowercase)
    Char(char),

    // Named keys
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,

    // Arrow keys
    Up,
    Down,
    Left,
    Right,

    // Navigation
    Home,
    End,
    PageUp,
    PageDown,
    Insert,

    // Function keys
    F(u8), // F1-F24

    // Numpad (physical keys)
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadEnter,
    NumpadDecimal,
}

impl KeyCode {
    /// Key code for a typed character; space maps to [`KeyCode::Space`]
    pub fn from_char(c: char) -> Self {
        if c == ' ' {
            KeyCode::Space
        } else {
            KeyCode::Char(fold_case(c))
        }
    }

    /// Canonical form: character keys folded to lowercase, space as [`KeyCode::Space`]
    ///
    /// `Char` is constructible directly; every chord constructor funnels
    /// through here so `KeyCode::Char('A')` and `KeyCode::Char('a')` bind the
    /// same key.
    pub fn normalized(self) -> Self {
        match self {
            KeyCode::Char(c) => KeyCode::from_char(c),
            other => other,
        }
    }

    /// Parse a key name (already lowercased, no modifiers)
    fn parse_name(key: &str) -> Option<KeyCode> {
        let mut chars = key.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::from_char(c));
        }

        if let Some(n) = key.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            return (1..=24).contains(&n).then_some(KeyCode::F(n));
        }

        let code = match key {
            "enter" | "return" => KeyCode::Enter,
            "escape" | "esc" => KeyCode::Escape,
            "tab" => KeyCode::Tab,
            "backspace" | "back" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Space,

            "up" | "arrowup" => KeyCode::Up,
            "down" | "arrowdown" => KeyCode::Down,
            "left" | "arrowleft" => KeyCode::Left,
            "right" | "arrowright" => KeyCode::Right,

            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdown" | "pgdn" => KeyCode::PageDown,
            "insert" | "ins" => KeyCode::Insert,

            "numpad0" | "num0" => KeyCode::Numpad0,
            "numpad1" | "num1" => KeyCode::Numpad1,
            "numpad2" | "num2" => KeyCode::Numpad2,
            "numpad3" | "num3" => KeyCode::Numpad3,
            "numpad4" | "num4" => KeyCode::Numpad4,
            "numpad5" | "num5" => KeyCode::Numpad5,
            "numpad6" | "num6" => KeyCode::Numpad6,
            "numpad7" | "num7" => KeyCode::Numpad7,
            "numpad8" | "num8" => KeyCode::Numpad8,
            "numpad9" | "num9" => KeyCode::Numpad9,
            "numpad_add" | "numadd" | "numplus" => KeyCode::NumpadAdd,
            "numpad_subtract" | "numsubtract" | "numsub" | "numminus" => KeyCode::NumpadSubtract,
            "numpad_multiply" | "nummultiply" | "nummul" => KeyCode::NumpadMultiply,
            "numpad_divide" | "numdivide" | "numdiv" => KeyCode::NumpadDivide,
            "numpad_enter" | "numenter" => KeyCode::NumpadEnter,
            "numpad_decimal" | "numdecimal" | "numdot" => KeyCode::NumpadDecimal,

            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", display_case(*c)),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Escape => write!(f, "Esc"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Space => write!(f, "Space"),
            KeyCode::Up => write!(f, "Up"),
            KeyCode::Down => write!(f, "Down"),
            KeyCode::Left => write!(f, "Left"),
            KeyCode::Right => write!(f, "Right"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
            KeyCode::PageUp => write!(f, "PageUp"),
            KeyCode::PageDown => write!(f, "PageDown"),
            KeyCode::Insert => write!(f, "Insert"),
            KeyCode::F(n) => write!(f, "F{}", n),
            KeyCode::Numpad0 => write!(f, "Num0"),
            KeyCode::Numpad1 => write!(f, "Num1"),
            KeyCode::Numpad2 => write!(f, "Num2"),
            KeyCode::Numpad3 => write!(f, "Num3"),
            KeyCode::Numpad4 => write!(f, "Num4"),
            KeyCode::Numpad5 => write!(f, "Num5"),
            KeyCode::Numpad6 => write!(f, "Num6"),
            KeyCode::Numpad7 => write!(f, "Num7"),
            KeyCode::Numpad8 => write!(f, "Num8"),
            KeyCode::Numpad9 => write!(f, "Num9"),
            KeyCode::NumpadAdd => write!(f, "NumAdd"),
            KeyCode::NumpadSubtract => write!(f, "NumSubtract"),
            KeyCode::NumpadMultiply => write!(f, "NumMultiply"),
            KeyCode::NumpadDivide => write!(f, "NumDivide"),
            KeyCode::NumpadEnter => write!(f, "NumEnter"),
            KeyCode::NumpadDecimal => write!(f, "NumDecimal"),
        }
    }
}

/// A keyboard chord: one key plus a modifier combination
///
/// Ordered by key first, then modifiers, so it can be used as a map key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyboardShortcut {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl KeyboardShortcut {
    /// Create a new shortcut; the key is stored in its canonical form
    pub fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self {
            key: key.normalized(),
            mods,
        }
    }

    /// Create a shortcut with no modifiers
    pub fn key(key: KeyCode) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// Same chord with the key in canonical form
    ///
    /// Only differs from `self` when the public fields were set directly.
    pub fn normalized(self) -> Self {
        Self::new(self.key, self.mods)
    }

    /// Create a shortcut with a character key
    pub fn char(c: char) -> Self {
        Self::key(KeyCode::from_char(c))
    }

    /// Create a shortcut with a character and modifiers
    pub fn char_with_mods(c: char, mods: Modifiers) -> Self {
        Self::new(KeyCode::from_char(c), mods)
    }

    /// Ctrl + character, the most common menu accelerator
    pub fn ctrl(c: char) -> Self {
        Self::char_with_mods(c, Modifiers::CTRL)
    }

    /// Ctrl + Shift + character
    pub fn ctrl_shift(c: char) -> Self {
        Self::char_with_mods(c, Modifiers::CTRL | Modifiers::SHIFT)
    }
}

impl fmt::Display for KeyboardShortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.mods.is_empty() {
            write!(f, "{}+{}", self.mods, self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

impl FromStr for KeyboardShortcut {
    type Err = ShortcutParseError;

    /// Parse a chord like `"Ctrl+Shift+A"` (case-insensitive, `Cmd` is an alias for `Ctrl`)
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ShortcutParseError::Empty);
        }

        // "Ctrl++" binds the plus key itself
        let (mods_part, key_part) = if trimmed == "+" {
            ("", "+")
        } else if let Some(prefix) = trimmed.strip_suffix("++") {
            (prefix, "+")
        } else {
            match trimmed.rsplit_once('+') {
                Some((prefix, key)) => (prefix, key),
                None => ("", trimmed),
            }
        };

        let mut mods = Modifiers::NONE;
        if !mods_part.is_empty() {
            for part in mods_part.split('+') {
                mods = mods | parse_modifier(part).ok_or_else(|| {
                    ShortcutParseError::UnknownModifier {
                        input: input.to_string(),
                        modifier: part.trim().to_string(),
                    }
                })?;
            }
        }

        let key_trimmed = key_part.trim();
        let key_lower = key_trimmed.to_lowercase();
        if key_lower.is_empty() || (key_part != "+" && parse_modifier(&key_lower).is_some()) {
            return Err(ShortcutParseError::MissingKey(input.to_string()));
        }

        let mut chars = key_trimmed.chars();
        let key = match (chars.next(), chars.next()) {
            _ if key_part == "+" => KeyCode::Char('+'),
            // Fold the single char itself; `str::to_lowercase` may expand it
            (Some(c), None) => KeyCode::from_char(c),
            _ => KeyCode::parse_name(&key_lower).ok_or_else(|| ShortcutParseError::UnknownKey {
                input: input.to_string(),
                key: key_trimmed.to_string(),
            })?,
        };

        Ok(KeyboardShortcut::new(key, mods))
    }
}

impl TryFrom<String> for KeyboardShortcut {
    type Error = ShortcutParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<KeyboardShortcut> for String {
    fn from(shortcut: KeyboardShortcut) -> Self {
        shortcut.to_string()
    }
}

/// Lowercase form of a key char, kept as-is when lowercasing is not one char
fn fold_case(c: char) -> char {
    single(c.to_lowercase()).unwrap_or(c)
}

/// Uppercase form for display, used only when it folds back to `c`
///
/// `ß` stays `ß` (its uppercase is "SS") and `ı` stays `ı` (its uppercase
/// `I` folds to `i`), so every displayed key parses back to itself.
fn display_case(c: char) -> char {
    single(c.to_uppercase())
        .filter(|upper| fold_case(*upper) == c)
        .unwrap_or(c)
}

fn single(mut chars: impl Iterator<Item = char>) -> Option<char> {
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn parse_modifier(part: &str) -> Option<Modifiers> {
    match part.trim().to_lowercase().as_str() {
        "ctrl" | "control" | "cmd" | "command" | "meta" | "super" => Some(Modifiers::CTRL),
        "alt" | "option" | "opt" => Some(Modifiers::ALT),
        "shift" => Some(Modifiers::SHIFT),
        _ => None,
    }
}

/// Errors produced when a chord string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortcutParseError {
    #[error("empty shortcut")]
    Empty,
    #[error("no key in shortcut '{0}'")]
    MissingKey(String),
    #[error("unknown modifier '{modifier}' in shortcut '{input}'")]
    UnknownModifier { input: String, modifier: String },
    #[error("unknown key '{key}' in shortcut '{input}'")]
    UnknownKey { input: String, key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_empty() {
        let mods = Modifiers::NONE;
        assert!(mods.is_empty());
        assert!(!mods.ctrl());
        assert!(!mods.shift());
        assert!(!mods.alt());
    }

    #[test]
    fn test_modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert!(mods.ctrl());
        assert!(mods.shift());
        assert!(!mods.alt());
        assert!(mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::ALT));
    }

    #[test]
    fn test_modifiers_new() {
        let mods = Modifiers::new(true, true, false);
        assert!(mods.ctrl());
        assert!(mods.alt());
        assert!(!mods.shift());
    }

    #[test]
    fn test_canonical_string() {
        assert_eq!(KeyboardShortcut::ctrl('s').to_string(), "Ctrl+S");
        assert_eq!(KeyboardShortcut::ctrl_shift('a').to_string(), "Ctrl+Shift+A");
        assert_eq!(
            KeyboardShortcut::new(KeyCode::F(4), Modifiers::ALT).to_string(),
            "Alt+F4"
        );
        assert_eq!(KeyboardShortcut::key(KeyCode::Escape).to_string(), "Esc");
    }

    #[test]
    fn test_parse_case_insensitive() {
        let stroke: KeyboardShortcut = "ctrl+shift+a".parse().unwrap();
        assert_eq!(stroke.key, KeyCode::Char('a'));
        assert!(stroke.mods.ctrl());
        assert!(stroke.mods.shift());
        assert!(!stroke.mods.alt());
    }

    #[test]
    fn test_parse_cmd_is_ctrl() {
        let stroke: KeyboardShortcut = "Cmd+S".parse().unwrap();
        assert_eq!(stroke, KeyboardShortcut::ctrl('s'));
    }

    #[test]
    fn test_parse_tolerates_spaces() {
        let stroke: KeyboardShortcut = " Ctrl + S ".parse().unwrap();
        assert_eq!(stroke, KeyboardShortcut::ctrl('s'));
    }

    #[test]
    fn test_parse_plus_key() {
        let stroke: KeyboardShortcut = "Ctrl++".parse().unwrap();
        assert_eq!(stroke.key, KeyCode::Char('+'));
        assert!(stroke.mods.ctrl());
        assert_eq!(stroke.to_string(), "Ctrl++");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<KeyboardShortcut>(), Err(ShortcutParseError::Empty));
        assert!(matches!(
            "Ctrl+".parse::<KeyboardShortcut>(),
            Err(ShortcutParseError::MissingKey(_))
        ));
        assert!(matches!(
            "Ctrl+Shift".parse::<KeyboardShortcut>(),
            Err(ShortcutParseError::MissingKey(_))
        ));
        assert!(matches!(
            "Hyper+S".parse::<KeyboardShortcut>(),
            Err(ShortcutParseError::UnknownModifier { .. })
        ));
        assert!(matches!(
            "Ctrl+Banana".parse::<KeyboardShortcut>(),
            Err(ShortcutParseError::UnknownKey { .. })
        ));
        assert!(matches!(
            "F25".parse::<KeyboardShortcut>(),
            Err(ShortcutParseError::UnknownKey { .. })
        ));
    }

    #[test]
    fn test_round_trip_named_keys() {
        let keys = [
            KeyCode::Enter,
            KeyCode::Escape,
            KeyCode::Tab,
            KeyCode::Backspace,
            KeyCode::Delete,
            KeyCode::Space,
            KeyCode::Up,
            KeyCode::Down,
            KeyCode::Left,
            KeyCode::Right,
            KeyCode::Home,
            KeyCode::End,
            KeyCode::PageUp,
            KeyCode::PageDown,
            KeyCode::Insert,
            KeyCode::F(1),
            KeyCode::F(12),
            KeyCode::F(24),
            KeyCode::Numpad0,
            KeyCode::Numpad9,
            KeyCode::NumpadAdd,
            KeyCode::NumpadSubtract,
            KeyCode::NumpadMultiply,
            KeyCode::NumpadDivide,
            KeyCode::NumpadEnter,
            KeyCode::NumpadDecimal,
            KeyCode::Char('7'),
            KeyCode::Char('/'),
        ];
        let mod_sets = [
            Modifiers::NONE,
            Modifiers::CTRL,
            Modifiers::CTRL | Modifiers::ALT | Modifiers::SHIFT,
        ];

        for key in keys {
            for mods in mod_sets {
                let stroke = KeyboardShortcut::new(key, mods);
                let parsed: KeyboardShortcut = stroke.to_string().parse().unwrap();
                assert_eq!(parsed, stroke, "round trip of {}", stroke);
            }
        }
    }

    #[test]
    fn test_ordering_is_total() {
        let mut strokes = vec![
            KeyboardShortcut::ctrl_shift('s'),
            KeyboardShortcut::char('s'),
            KeyboardShortcut::ctrl('s'),
            KeyboardShortcut::ctrl('a'),
        ];
        strokes.sort();
        assert_eq!(strokes[0], KeyboardShortcut::ctrl('a'));
        assert_eq!(strokes[1], KeyboardShortcut::char('s'));
        assert_eq!(strokes[2], KeyboardShortcut::ctrl('s'));
        assert_eq!(strokes[3], KeyboardShortcut::ctrl_shift('s'));
    }

    #[test]
    fn test_char_lowercase() {
        assert_eq!(KeyboardShortcut::char('A'), KeyboardShortcut::char('a'));
        assert_eq!(KeyboardShortcut::char(' ').key, KeyCode::Space);
    }

    #[test]
    fn test_direct_char_is_normalized() {
        let direct = KeyboardShortcut::new(KeyCode::Char('A'), Modifiers::CTRL);
        assert_eq!(direct, KeyboardShortcut::ctrl('a'));
        assert_eq!(direct.to_string().parse::<KeyboardShortcut>(), Ok(direct));

        let literal = KeyboardShortcut {
            key: KeyCode::Char('É'),
            mods: Modifiers::CTRL,
        };
        assert_eq!(literal.normalized(), KeyboardShortcut::ctrl('é'));
        assert_eq!(
            literal.to_string().parse::<KeyboardShortcut>(),
            Ok(literal.normalized())
        );
    }

    #[test]
    fn test_non_ascii_round_trip() {
        for c in ['ß', 'É', 'é', 'ø', 'ж', 'ı', 'İ', 'ǅ', 'Ω', '1', '[', '€'] {
            let chord = KeyboardShortcut::ctrl(c);
            let text = chord.to_string();
            assert_eq!(text.parse::<KeyboardShortcut>(), Ok(chord), "{:?} via {:?}", c, text);
        }
    }

    #[test]
    fn test_non_ascii_display() {
        assert_eq!(KeyboardShortcut::ctrl('é').to_string(), "Ctrl+É");
        assert_eq!(KeyboardShortcut::ctrl('ß').to_string(), "Ctrl+ß");
        assert_eq!(
            "Ctrl+É".parse::<KeyboardShortcut>(),
            Ok(KeyboardShortcut::ctrl('é'))
        );
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&KeyboardShortcut::ctrl('s')).unwrap();
        assert_eq!(json, "\"Ctrl+S\"");
        let back: KeyboardShortcut = serde_json::from_str(&json).unwrap();
        assert_eq!(back, KeyboardShortcut::ctrl('s'));
        assert!(serde_json::from_str::<KeyboardShortcut>("\"Ctrl+\"").is_err());
    }
}
