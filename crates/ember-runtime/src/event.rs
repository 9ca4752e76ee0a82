//! Events delivered to the frame driver between frames

/// Discrete input posted by the pointer and resize adapters
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EngineEvent {
    /// Pointer moved to `(x, y)`; spawns a random burst there
    SpawnBurst { x: f32, y: f32 },
    /// Host surface changed size
    Resize { width: u32, height: u32 },
}
