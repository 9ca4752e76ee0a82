//! Event queue for pointer bursts and surface resizes

use crate::event::EngineEvent;

/// Queue that input adapters push to and the frame driver drains once per tick.
///
/// Back-to-back resizes collapse into the newest one so a drag-resize storm
/// reallocates the surfaces once. Bursts are never merged; each pointer move
/// spawns its own particles.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<EngineEvent>,
    coalesced: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: EngineEvent) {
        let pending_resize = self
            .events
            .last_mut()
            .filter(|last| matches!(last, EngineEvent::Resize { .. }));
        if let (EngineEvent::Resize { .. }, Some(last)) = (event, pending_resize) {
            log::trace!("[events] Replacing pending {:?} with {:?}", last, event);
            *last = event;
            self.coalesced += 1;
            return;
        }
        self.events.push(event);
    }

    /// Take every pending event in posting order
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Resizes dropped because a newer one replaced them
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
