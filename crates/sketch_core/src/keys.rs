//! Keyboard state
//!
//! Pressed state is tracked under both the numeric key code and the symbolic
//! key name, so `keys.is_pressed("SPACE")` and `keys.is_code_pressed(32)`
//! agree.

use rustc_hash::FxHashMap;
use std::borrow::Cow;

/// Named key codes. Codes not listed map to the character with that code.
pub const KEY_NAMES: [(u32, &str); 10] = [
    (8, "BACKSPACE"),
    (9, "TAB"),
    (13, "ENTER"),
    (16, "SHIFT"),
    (27, "ESCAPE"),
    (32, "SPACE"),
    (37, "LEFT"),
    (38, "UP"),
    (39, "RIGHT"),
    (40, "DOWN"),
];

/// Symbolic name for a key code
pub fn key_name(code: u32) -> Cow<'static, str> {
    if let Some((_, name)) = KEY_NAMES.iter().find(|(c, _)| *c == code) {
        return Cow::Borrowed(name);
    }
    match char::from_u32(code) {
        Some(ch) => Cow::Owned(ch.to_string()),
        None => Cow::Owned(String::new()),
    }
}

/// Pressed state by code and by name
#[derive(Clone, Debug)]
pub struct KeyState {
    by_code: FxHashMap<u32, bool>,
    by_name: FxHashMap<String, bool>,
}

impl KeyState {
    /// All named keys start released.
    pub fn new() -> Self {
        let by_name = KEY_NAMES
            .iter()
            .map(|(_, name)| (name.to_string(), false))
            .collect();
        Self {
            by_code: FxHashMap::default(),
            by_name,
        }
    }

    /// Record a key transition.
    pub fn set(&mut self, code: u32, pressed: bool) {
        self.by_code.insert(code, pressed);
        self.by_name.insert(key_name(code).into_owned(), pressed);
    }

    pub fn is_pressed(&self, name: &str) -> bool {
        self.by_name.get(name).copied().unwrap_or(false)
    }

    pub fn is_code_pressed(&self, code: u32) -> bool {
        self.by_code.get(&code).copied().unwrap_or(false)
    }

    /// Whether a name is tracked at all (pressed or not)
    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }
}

impl Default for KeyState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_keys_start_released() {
        let keys = KeyState::new();
        for (_, name) in KEY_NAMES {
            assert!(keys.contains(name));
            assert!(!keys.is_pressed(name));
        }
    }

    #[test]
    fn test_key_name_fallback_to_char() {
        assert_eq!(key_name(32), "SPACE");
        assert_eq!(key_name(65), "A");
        assert_eq!(key_name(0x31), "1");
    }

    #[test]
    fn test_set_updates_code_and_name() {
        let mut keys = KeyState::new();
        keys.set(37, true);
        assert!(keys.is_pressed("LEFT"));
        assert!(keys.is_code_pressed(37));

        keys.set(37, false);
        assert!(!keys.is_pressed("LEFT"));
        assert!(!keys.is_code_pressed(37));

        keys.set(65, true);
        assert!(keys.is_pressed("A"));
        assert!(!keys.is_pressed("B"));
    }
}
