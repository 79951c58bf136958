use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
    Enter,
    Tab,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotkey {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Hotkey {
    fn matches(&self, event: &KeyEvent) -> bool {
        self.key == event.key
            && self.ctrl == event.ctrl
            && self.shift == event.shift
            && self.alt == event.alt
    }
}

/// A key press as reported by the host page.
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Focus sits inside an editable host-page element (input, textarea,
    /// contenteditable).
    pub editable_target: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, ctrl: false, shift: false, alt: false, editable_target: false }
    }

    fn has_modifier(&self) -> bool {
        self.ctrl || self.shift || self.alt
    }
}

/// Parse a hotkey string like "Alt+Shift+A" into a [`Hotkey`].
pub fn parse_hotkey(s: &str) -> Option<Hotkey> {
    let mut ctrl = false;
    let mut shift = false;
    let mut alt = false;
    let mut key: Option<Key> = None;

    for part in s.split('+') {
        let upper = part.trim().to_ascii_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => ctrl = true,
            "SHIFT" => shift = true,
            "ALT" => alt = true,
            "" => {}
            "ESC" | "ESCAPE" => key = Some(Key::Escape),
            "ENTER" | "RETURN" => key = Some(Key::Enter),
            "TAB" => key = Some(Key::Tab),
            _ => {
                let mut chars = upper.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphanumeric() => {
                        key = Some(Key::Char(c.to_ascii_lowercase()));
                    }
                    _ => return None,
                }
            }
        }
    }

    key.map(|k| Hotkey { key: k, ctrl, shift, alt })
}

/// Action a recognized shortcut maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    TogglePanel,
    ToggleShortcutGuide,
    ToggleReadingGuide,
    ToggleStructureMap,
    CloseActiveOverlay,
    CycleFocus,
}

/// Configurable binding strings; `None` keeps the default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingStrings {
    pub panel: Option<String>,
    pub shortcut_guide: Option<String>,
    pub reading_guide: Option<String>,
    pub structure_map: Option<String>,
}

pub const DEFAULT_PANEL_HOTKEY: &str = "Alt+Shift+A";
pub const DEFAULT_SHORTCUT_GUIDE_HOTKEY: &str = "Alt+Shift+K";
pub const DEFAULT_READING_GUIDE_HOTKEY: &str = "Alt+Shift+R";
pub const DEFAULT_STRUCTURE_MAP_HOTKEY: &str = "Alt+Shift+M";

pub struct ShortcutHandler {
    panel: Hotkey,
    shortcut_guide: Hotkey,
    reading_guide: Hotkey,
    structure_map: Hotkey,
}

impl Default for ShortcutHandler {
    fn default() -> Self {
        Self::from_strings(&BindingStrings::default())
    }
}

impl ShortcutHandler {
    /// Resolve binding strings, falling back to the default for any that
    /// fail to parse.
    pub fn from_strings(bindings: &BindingStrings) -> Self {
        Self {
            panel: resolve(bindings.panel.as_deref(), DEFAULT_PANEL_HOTKEY),
            shortcut_guide: resolve(
                bindings.shortcut_guide.as_deref(),
                DEFAULT_SHORTCUT_GUIDE_HOTKEY,
            ),
            reading_guide: resolve(bindings.reading_guide.as_deref(), DEFAULT_READING_GUIDE_HOTKEY),
            structure_map: resolve(bindings.structure_map.as_deref(), DEFAULT_STRUCTURE_MAP_HOTKEY),
        }
    }

    /// Map a key press to a widget action, or `None` when the event belongs
    /// to the host page.
    ///
    /// Escape always closes the active overlay while one is open, no matter
    /// how the overlay was opened or where focus sits. Otherwise, events
    /// from editable host-page elements are only matched against reserved
    /// modifier combinations so typing is never intercepted.
    pub fn handle_key(&self, event: &KeyEvent, overlay_open: bool) -> Option<ShortcutAction> {
        if event.key == Key::Escape {
            return overlay_open.then_some(ShortcutAction::CloseActiveOverlay);
        }
        if event.editable_target && !event.has_modifier() {
            return None;
        }
        if event.key == Key::Tab && !event.has_modifier() && overlay_open {
            return Some(ShortcutAction::CycleFocus);
        }
        if self.panel.matches(event) {
            Some(ShortcutAction::TogglePanel)
        } else if self.shortcut_guide.matches(event) {
            Some(ShortcutAction::ToggleShortcutGuide)
        } else if self.reading_guide.matches(event) {
            Some(ShortcutAction::ToggleReadingGuide)
        } else if self.structure_map.matches(event) {
            Some(ShortcutAction::ToggleStructureMap)
        } else {
            None
        }
    }
}

fn resolve(configured: Option<&str>, fallback: &str) -> Hotkey {
    if let Some(s) = configured {
        match parse_hotkey(s) {
            Some(k) => return k,
            None => {
                tracing::warn!(hotkey = s, fallback, "invalid hotkey string; using default");
            }
        }
    }
    parse_hotkey(fallback).unwrap_or(Hotkey {
        key: Key::Char('a'),
        ctrl: false,
        shift: true,
        alt: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifier_combo() {
        let hk = parse_hotkey("Alt+Shift+A").unwrap();
        assert_eq!(hk.key, Key::Char('a'));
        assert!(hk.alt && hk.shift && !hk.ctrl);
    }

    #[test]
    fn parses_named_keys() {
        assert_eq!(parse_hotkey("Escape").unwrap().key, Key::Escape);
        assert_eq!(parse_hotkey("ctrl+enter").unwrap().key, Key::Enter);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_hotkey("Alt+Shift").is_none());
        assert!(parse_hotkey("Alt+Foo").is_none());
    }
}
