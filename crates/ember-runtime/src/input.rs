//! Pointer tracking

use crate::event::EngineEvent;
use crate::event_bus::EventBus;

/// Pointer position before the first move, well off any surface
pub const OFFSCREEN: (f32, f32) = (-9999.0, -9999.0);

/// Last known pointer position; every move posts a spawn burst
#[derive(Clone, Copy, Debug)]
pub struct PointerInput {
    pub position: (f32, f32),
    moves: u64,
}

impl Default for PointerInput {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerInput {
    pub fn new() -> Self {
        Self {
            position: OFFSCREEN,
            moves: 0,
        }
    }

    /// Record a pointer or touch move and queue a burst at the new position
    pub fn moved(&mut self, x: f32, y: f32, bus: &mut EventBus) {
        self.position = (x, y);
        self.moves += 1;
        bus.push(EngineEvent::SpawnBurst { x, y });
    }

    /// Whether the pointer has been seen at all
    pub fn has_moved(&self) -> bool {
        self.moves > 0
    }

    pub fn move_count(&self) -> u64 {
        self.moves
    }
}
