use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::warn;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};

use crate::overlay::OverlayEvent;

/// Edge-triggered keyboard adapter for the console.
///
/// A bound key queues its event on the press transition only; it has to be released before it
/// fires again, so OS key repeat and held keys never repeat a transition.
pub struct OverlayInput {
    bindings: OverlayBindings,
    held: HashSet<KeyBinding>,
    pending: Vec<OverlayEvent>,
}

impl OverlayInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(path: impl AsRef<Path>) -> Self {
        Self::with_bindings(OverlayBindings::load_or_default(path))
    }

    /// Strict variant of [`OverlayInput::from_config`] for tooling that should report bad files.
    pub fn try_from_config(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).with_context(|| format!("Failed to read bindings {}", path.display()))?;
        let config: BindingsFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse bindings {}", path.display()))?;
        Ok(Self::with_bindings(OverlayBindings::from_config(config, &path.display().to_string())))
    }

    fn with_bindings(bindings: OverlayBindings) -> Self {
        Self { bindings, held: HashSet::new(), pending: Vec::new() }
    }

    pub fn push(&mut self, ev: InputEvent) {
        let InputEvent::Key { key, pressed } = ev else {
            return;
        };
        let Some(binding) = KeyBinding::from_event_key(&key) else {
            return;
        };
        if !pressed {
            self.held.remove(&binding);
            return;
        }
        if !self.held.insert(binding.clone()) {
            return;
        }
        self.pending.extend(self.bindings.events_for_key(&binding));
    }

    /// Hands over everything queued since the last call; call once per frame before `tick`.
    pub fn drain_events(&mut self) -> Vec<OverlayEvent> {
        self.pending.drain(..).collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Forgets held keys, e.g. after the window lost focus and releases were never delivered.
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl Default for OverlayInput {
    fn default() -> Self {
        Self::with_bindings(OverlayBindings::default())
    }
}

#[derive(Debug, Clone)]
struct OverlayBindings {
    key_to_events: HashMap<KeyBinding, Vec<OverlayEvent>>,
}

impl OverlayBindings {
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<BindingsFile>(&contents) {
                Ok(config) => Self::from_config(config, &path.display().to_string()),
                Err(err) => {
                    warn!(path = %path.display(), %err, "failed to parse console bindings, using defaults");
                    Self::default()
                }
            },
            Err(err) => {
                warn!(path = %path.display(), %err, "failed to read console bindings, using defaults");
                Self::default()
            }
        }
    }

    fn from_config(config: BindingsFile, origin: &str) -> Self {
        let mut event_map = Self::default_event_map();
        for (event, keys) in config.into_overrides(origin) {
            event_map.insert(event, keys);
        }
        Self::from_event_map(event_map)
    }

    fn default_event_map() -> HashMap<OverlayEvent, Vec<KeyBinding>> {
        use OverlayEvent::*;
        let mut map = HashMap::new();
        map.insert(TogglePanel, vec![KeyBinding::character("q"), KeyBinding::character("0")]);
        map.insert(MoveUp, vec![KeyBinding::character("w"), KeyBinding::named(NamedKeyCode::ArrowUp)]);
        map.insert(MoveDown, vec![KeyBinding::character("s"), KeyBinding::named(NamedKeyCode::ArrowDown)]);
        map.insert(Select, vec![KeyBinding::named(NamedKeyCode::Enter), KeyBinding::named(NamedKeyCode::Space)]);
        map.insert(DecreaseValue, vec![KeyBinding::character("a"), KeyBinding::named(NamedKeyCode::ArrowLeft)]);
        map.insert(IncreaseValue, vec![KeyBinding::character("d"), KeyBinding::named(NamedKeyCode::ArrowRight)]);
        map
    }

    fn from_event_map(event_map: HashMap<OverlayEvent, Vec<KeyBinding>>) -> Self {
        let mut key_to_events: HashMap<KeyBinding, Vec<OverlayEvent>> = HashMap::new();
        for (event, keys) in event_map {
            for key in keys {
                key_to_events.entry(key).or_default().push(event);
            }
        }
        Self { key_to_events }
    }

    fn events_for_key(&self, key: &KeyBinding) -> impl Iterator<Item = OverlayEvent> + '_ {
        self.key_to_events.get(key).into_iter().flatten().copied()
    }
}

impl Default for OverlayBindings {
    fn default() -> Self {
        Self::from_event_map(Self::default_event_map())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyBinding {
    Character(String),
    Named(NamedKeyCode),
}

impl KeyBinding {
    fn character(ch: &str) -> Self {
        Self::Character(ch.to_lowercase())
    }

    fn named(named: NamedKeyCode) -> Self {
        Self::Named(named)
    }

    fn from_event_key(key: &Key) -> Option<Self> {
        match key {
            Key::Character(ch) => {
                let s = ch.to_string();
                if s.is_empty() {
                    None
                } else {
                    Some(Self::Character(s.to_lowercase()))
                }
            }
            Key::Named(named) => NamedKeyCode::from_named_key(named).map(Self::Named),
            _ => None,
        }
    }

    fn from_config_value(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return None;
        }
        if let Some(named) = NamedKeyCode::from_str(&normalized) {
            return Some(Self::Named(named));
        }
        if normalized.chars().count() == 1 {
            return Some(Self::Character(normalized));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum NamedKeyCode {
    Space,
    Enter,
    Escape,
    Tab,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

impl NamedKeyCode {
    fn from_named_key(key: &NamedKey) -> Option<Self> {
        match key {
            NamedKey::Space => Some(Self::Space),
            NamedKey::Enter => Some(Self::Enter),
            NamedKey::Escape => Some(Self::Escape),
            NamedKey::Tab => Some(Self::Tab),
            NamedKey::ArrowUp => Some(Self::ArrowUp),
            NamedKey::ArrowDown => Some(Self::ArrowDown),
            NamedKey::ArrowLeft => Some(Self::ArrowLeft),
            NamedKey::ArrowRight => Some(Self::ArrowRight),
            _ => None,
        }
    }

    fn from_str(value: &str) -> Option<Self> {
        match value {
            "space" => Some(Self::Space),
            "enter" | "return" => Some(Self::Enter),
            "escape" | "esc" => Some(Self::Escape),
            "tab" => Some(Self::Tab),
            "arrow_up" | "up" => Some(Self::ArrowUp),
            "arrow_down" | "down" => Some(Self::ArrowDown),
            "arrow_left" | "left" => Some(Self::ArrowLeft),
            "arrow_right" | "right" => Some(Self::ArrowRight),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct BindingsFile {
    #[serde(default)]
    bindings: HashMap<String, Vec<String>>,
}

impl BindingsFile {
    fn into_overrides(self, origin: &str) -> HashMap<OverlayEvent, Vec<KeyBinding>> {
        let mut overrides = HashMap::new();
        for (event_name, keys) in self.bindings {
            let Some(event) = OverlayEvent::from_name(&event_name.trim().to_lowercase()) else {
                warn!(origin, event = %event_name, "unknown console action, ignoring");
                continue;
            };
            let mut parsed = Vec::new();
            for key in keys {
                match KeyBinding::from_config_value(&key) {
                    Some(binding) => parsed.push(binding),
                    None => warn!(origin, %key, event = %event_name, "unknown key, ignoring"),
                }
            }
            if parsed.is_empty() {
                warn!(origin, event = %event_name, "action has no valid keys, keeping defaults");
                continue;
            }
            overrides.insert(event, parsed);
        }
        overrides
    }
}

/// Input as seen by [`OverlayInput::push`].
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    Other,
}

impl InputEvent {
    /// Feed every winit `WindowEvent` through this into [`OverlayInput::push`] before calling
    /// [`OverlayInput::drain_events`] for the frame.
    pub fn from_window_event(ev: &WindowEvent) -> Self {
        match ev {
            WindowEvent::KeyboardInput { event, .. } => InputEvent::Key {
                key: event.logical_key.clone(),
                pressed: event.state == ElementState::Pressed,
            },
            _ => InputEvent::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(input: &mut OverlayInput, key: Key) {
        input.push(InputEvent::Key { key, pressed: true });
    }

    fn release(input: &mut OverlayInput, key: Key) {
        input.push(InputEvent::Key { key, pressed: false });
    }

    #[test]
    fn default_bindings_cover_every_event() {
        let bindings = OverlayBindings::default();
        for event in OverlayEvent::ALL {
            assert!(
                bindings.key_to_events.values().any(|events| events.contains(&event)),
                "{} has no default key",
                event.name()
            );
        }
    }

    #[test]
    fn held_key_fires_once_until_released() {
        let mut input = OverlayInput::new();
        press(&mut input, Key::Character("s".into()));
        press(&mut input, Key::Character("s".into()));
        assert_eq!(input.drain_events(), vec![OverlayEvent::MoveDown]);

        press(&mut input, Key::Character("s".into()));
        assert!(!input.has_pending(), "repeat while held must not fire");

        release(&mut input, Key::Character("s".into()));
        press(&mut input, Key::Character("S".into()));
        assert_eq!(input.drain_events(), vec![OverlayEvent::MoveDown], "case-insensitive after release");
    }

    #[test]
    fn non_keyboard_window_events_are_ignored() {
        let mut input = OverlayInput::new();
        for ev in [WindowEvent::Focused(false), WindowEvent::CloseRequested, WindowEvent::RedrawRequested] {
            let event = InputEvent::from_window_event(&ev);
            assert!(matches!(event, InputEvent::Other));
            input.push(event);
        }
        assert!(!input.has_pending());
    }

    #[test]
    fn named_keys_and_unbound_keys() {
        let mut input = OverlayInput::new();
        press(&mut input, Key::Named(NamedKey::ArrowRight));
        press(&mut input, Key::Named(NamedKey::F5));
        press(&mut input, Key::Character("x".into()));
        assert_eq!(input.drain_events(), vec![OverlayEvent::IncreaseValue]);
    }

    #[test]
    fn release_all_clears_stuck_keys() {
        let mut input = OverlayInput::new();
        press(&mut input, Key::Character("q".into()));
        input.release_all();
        press(&mut input, Key::Character("q".into()));
        assert_eq!(input.drain_events(), vec![OverlayEvent::TogglePanel, OverlayEvent::TogglePanel]);
    }

    #[test]
    fn config_values_parse_named_and_single_characters() {
        assert_eq!(KeyBinding::from_config_value(" Up "), Some(KeyBinding::Named(NamedKeyCode::ArrowUp)));
        assert_eq!(KeyBinding::from_config_value("K"), Some(KeyBinding::Character("k".into())));
        assert_eq!(KeyBinding::from_config_value("f13"), None);
        assert_eq!(KeyBinding::from_config_value(""), None);
    }
}
