use bevy_ecs::prelude::{ResMut, Resource};

use crate::overlay::{OverlayController, OverlayEvent};

/// Console events collected during a frame, drained by [`advance_overlay`].
#[derive(Default, Resource)]
pub struct OverlayEventQueue {
    events: Vec<OverlayEvent>,
}

impl OverlayEventQueue {
    pub fn push(&mut self, event: OverlayEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = OverlayEvent>) {
        self.events.extend(events);
    }

    pub fn drain(&mut self) -> Vec<OverlayEvent> {
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Ticks the console once with the events queued this frame.
pub fn advance_overlay(mut queue: ResMut<OverlayEventQueue>, mut overlay: ResMut<OverlayController>) {
    let events = queue.drain();
    overlay.tick(events);
}
