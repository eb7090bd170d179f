use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::OverlayConfig;
use crate::field::FieldValue;
use crate::object::ObjectEntry;
use crate::scroll::{compute_offset, window_len, MAX_OVERSCAN};
use crate::slide::{SlideAnimator, SlideDirection};
use crate::view::{LineKind, OverlayLine, OverlayView};

/// Discrete, edge-triggered console input. Each variant fires at most once per key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayEvent {
    TogglePanel,
    MoveUp,
    MoveDown,
    Select,
    DecreaseValue,
    IncreaseValue,
}

impl OverlayEvent {
    pub const ALL: [OverlayEvent; 6] = [
        OverlayEvent::TogglePanel,
        OverlayEvent::MoveUp,
        OverlayEvent::MoveDown,
        OverlayEvent::Select,
        OverlayEvent::DecreaseValue,
        OverlayEvent::IncreaseValue,
    ];

    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "toggle_panel" => Some(Self::TogglePanel),
            "move_up" => Some(Self::MoveUp),
            "move_down" => Some(Self::MoveDown),
            "select" => Some(Self::Select),
            "decrease_value" => Some(Self::DecreaseValue),
            "increase_value" => Some(Self::IncreaseValue),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TogglePanel => "toggle_panel",
            Self::MoveUp => "move_up",
            Self::MoveDown => "move_down",
            Self::Select => "select",
            Self::DecreaseValue => "decrease_value",
            Self::IncreaseValue => "increase_value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayLevel {
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Navigation {
    List,
    /// Cursor 0 is the back line; cursor `k` edits field `k - 1` of `object`.
    Detail { object: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Left,
    Right,
}

/// The hack console: object registry, navigation state, mutation budget and slide animation.
///
/// Drive it with one [`OverlayController::tick`] per frame and read [`OverlayController::view`]
/// for drawing.
#[derive(Debug, Resource)]
pub struct OverlayController {
    registry: Vec<ObjectEntry>,
    is_open: bool,
    slide: SlideAnimator,
    navigation: Navigation,
    cursor: usize,
    scroll_offset: usize,
    mutation_budget: usize,
    used_mutations: usize,
    overscan: usize,
    lateral_select: bool,
}

impl OverlayController {
    pub fn new(config: &OverlayConfig) -> Self {
        Self {
            registry: Vec::new(),
            is_open: false,
            slide: SlideAnimator::new(config.panel_height, config.slide_acceleration),
            navigation: Navigation::List,
            cursor: 0,
            scroll_offset: 0,
            mutation_budget: config.mutation_budget,
            used_mutations: 0,
            overscan: config.overscan.min(MAX_OVERSCAN),
            lateral_select: config.lateral_select,
        }
    }

    pub fn register(&mut self, entry: ObjectEntry) {
        debug!(object = entry.name(), fields = entry.field_count(), "registered console object");
        self.registry.push(entry);
        self.used_mutations = self.count_changed_fields();
    }

    pub fn registry(&self) -> &[ObjectEntry] {
        &self.registry
    }

    pub fn object(&self, index: usize) -> Option<&ObjectEntry> {
        self.registry.get(index)
    }

    pub fn object_named(&self, name: &str) -> Option<&ObjectEntry> {
        self.registry.iter().find(|entry| entry.name() == name)
    }

    pub fn value_of(&self, object: &str, field: &str) -> Option<&FieldValue> {
        self.object_named(object).and_then(|entry| entry.value(field))
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The panel takes input and draws while open and while it is still sliding out.
    pub fn is_visible(&self) -> bool {
        self.is_open || !self.slide.is_hidden()
    }

    pub fn level(&self) -> OverlayLevel {
        match self.navigation {
            Navigation::List => OverlayLevel::List,
            Navigation::Detail { .. } => OverlayLevel::Detail,
        }
    }

    pub fn selected_object(&self) -> Option<&ObjectEntry> {
        match self.navigation {
            Navigation::List => None,
            Navigation::Detail { object } => self.registry.get(object),
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    pub fn panel_offset(&self) -> f32 {
        self.slide.offset()
    }

    pub fn slide(&self) -> &SlideAnimator {
        &self.slide
    }

    pub fn used_mutations(&self) -> usize {
        self.used_mutations
    }

    pub fn mutation_budget(&self) -> usize {
        self.mutation_budget
    }

    /// Advances the console by one frame.
    ///
    /// Toggles apply first, then the slide moves; navigation and value events only apply while
    /// the panel is visible.
    pub fn tick<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = OverlayEvent>,
    {
        let events: Vec<OverlayEvent> = events.into_iter().collect();
        for _ in events.iter().filter(|event| **event == OverlayEvent::TogglePanel) {
            self.toggle();
        }
        self.slide.tick();

        if !self.is_visible() {
            return;
        }

        for event in &events {
            match event {
                OverlayEvent::MoveUp => self.move_cursor(false),
                OverlayEvent::MoveDown => self.move_cursor(true),
                _ => {}
            }
        }
        for event in &events {
            let before = self.navigation;
            match event {
                OverlayEvent::Select => self.select(),
                OverlayEvent::DecreaseValue => self.decrease(),
                OverlayEvent::IncreaseValue => self.increase(),
                _ => {}
            }
            // Entering or leaving an object ends value handling for this frame.
            if self.navigation != before {
                break;
            }
        }

        self.scroll_offset = match self.navigation {
            Navigation::List => compute_offset(self.cursor, self.registry.len(), self.overscan),
            Navigation::Detail { object } => {
                compute_offset(self.cursor, self.registry[object].field_count() + 1, self.overscan)
            }
        };
        self.used_mutations = self.count_changed_fields();
    }

    fn toggle(&mut self) {
        self.is_open = !self.is_open;
        if self.is_open {
            self.slide.set_direction(SlideDirection::Opening);
            self.navigation = Navigation::List;
            self.cursor = 0;
        } else {
            self.slide.set_direction(SlideDirection::Closing);
        }
        debug!(open = self.is_open, "console toggled");
    }

    fn move_cursor(&mut self, down: bool) {
        let slots = match self.navigation {
            Navigation::List => self.registry.len(),
            Navigation::Detail { object } => self.registry[object].field_count() + 1,
        };
        if slots == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = if down { (self.cursor + 1) % slots } else { (self.cursor + slots - 1) % slots };
    }

    fn select(&mut self) {
        if self.navigation != Navigation::List || self.cursor >= self.registry.len() {
            return;
        }
        debug!(object = self.registry[self.cursor].name(), "console drill-in");
        self.navigation = Navigation::Detail { object: self.cursor };
        self.cursor = 0;
    }

    fn decrease(&mut self) {
        match self.navigation {
            Navigation::List if self.lateral_select => self.select(),
            Navigation::List => {}
            Navigation::Detail { object } if self.cursor == 0 => {
                debug!(object = self.registry[object].name(), "console back to list");
                self.navigation = Navigation::List;
                self.cursor = object;
            }
            Navigation::Detail { object } => self.step_field(object, self.cursor - 1, Step::Left),
        }
    }

    // No back action at cursor 0 here; only the decrease key leaves the detail view.
    fn increase(&mut self) {
        match self.navigation {
            Navigation::List if self.lateral_select => self.select(),
            Navigation::List => {}
            Navigation::Detail { .. } if self.cursor == 0 => {}
            Navigation::Detail { object } => self.step_field(object, self.cursor - 1, Step::Right),
        }
    }

    fn step_field(&mut self, object: usize, index: usize, step: Step) {
        let entry = &self.registry[object];
        if self.used_mutations >= self.mutation_budget && !entry.field_at(index).is_changed() {
            debug!(
                object = entry.name(),
                field = entry.field_at(index).name(),
                budget = self.mutation_budget,
                "mutation rejected, budget exhausted"
            );
            return;
        }
        let field = self.registry[object].field_at_mut(index);
        match step {
            Step::Left => field.move_left(),
            Step::Right => field.move_right(),
        }
        debug!(field = field.name(), value = %field.current_value(), changed = field.is_changed(), "field stepped");
        self.used_mutations = self.count_changed_fields();
    }

    fn count_changed_fields(&self) -> usize {
        self.registry.iter().map(ObjectEntry::changed_count).sum()
    }

    /// Read-only snapshot for the presentation layer.
    pub fn view(&self) -> OverlayView {
        let mut view = OverlayView {
            visible: self.is_visible(),
            panel_offset: self.slide.offset(),
            panel_height: self.slide.max_offset(),
            sliding: !self.slide.is_settled(),
            level: self.level(),
            title: String::new(),
            lines: Vec::new(),
            highlighted: None,
            used_mutations: self.used_mutations,
            mutation_budget: self.mutation_budget,
        };
        if !view.visible {
            return view;
        }

        let all_lines: Vec<OverlayLine> = match self.navigation {
            Navigation::List => {
                view.title = "<objects list>".to_string();
                self.registry
                    .iter()
                    .map(|entry| OverlayLine {
                        kind: LineKind::Object,
                        label: entry.name().to_string(),
                        value: None,
                        changed: entry.is_changed(),
                    })
                    .collect()
            }
            Navigation::Detail { object } => {
                let entry = &self.registry[object];
                view.title = format!("<variables of {}>", entry.name());
                std::iter::once(OverlayLine::back())
                    .chain(entry.fields().map(|field| OverlayLine {
                        kind: LineKind::Field,
                        label: field.name().to_string(),
                        value: Some(field.current_value().to_string()),
                        changed: field.is_changed(),
                    }))
                    .collect()
            }
        };

        if self.cursor < all_lines.len() {
            view.highlighted = Some(self.cursor.saturating_sub(self.scroll_offset));
        }
        view.lines =
            all_lines.into_iter().skip(self.scroll_offset).take(window_len(self.overscan)).collect();
        view
    }
}
