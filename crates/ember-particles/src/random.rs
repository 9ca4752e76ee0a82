//! Random helpers over an injected generator

use rand::Rng;

/// Uniform float in `[min, max)`; reversed bounds are swapped
pub fn range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    let (min, max) = if min > max { (max, min) } else { (min, max) };
    min + (max - min) * rng.random::<f32>()
}

/// Uniformly chosen element, or None for an empty slice
pub fn sample<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}

/// Particles spawned per pointer move: an integer in `[2, 7)`
pub fn burst_count<R: Rng + ?Sized>(rng: &mut R) -> usize {
    rng.random_range(2..7)
}
