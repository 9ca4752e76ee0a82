//! Scripted pointer paths standing in for a live pointer

use clap::ValueEnum;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PointerPath {
    /// One loop around the surface center
    Circle,
    /// A figure eight through the center
    Figure8,
    /// Left to right across the middle
    Line,
}

impl PointerPath {
    /// Pointer position at `frame` of a `total`-frame run on a `width` x `height` surface
    pub fn position(self, frame: u64, total: u64, width: u32, height: u32) -> (f32, f32) {
        let t = frame as f32 / total.max(1) as f32;
        let (w, h) = (width as f32, height as f32);
        let (cx, cy) = (w * 0.5, h * 0.5);
        match self {
            PointerPath::Circle => {
                let r = w.min(h) * 0.35;
                let angle = t * TAU;
                (cx + r * angle.cos(), cy + r * angle.sin())
            }
            PointerPath::Figure8 => {
                let angle = t * TAU;
                (
                    cx + w * 0.35 * angle.sin(),
                    cy + h * 0.3 * (2.0 * angle).sin(),
                )
            }
            PointerPath::Line => (w * (0.1 + 0.8 * t), cy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_stay_on_surface() {
        for path in [PointerPath::Circle, PointerPath::Figure8, PointerPath::Line] {
            for frame in 0..120 {
                let (x, y) = path.position(frame, 120, 640, 360);
                assert!((0.0..=640.0).contains(&x), "{path:?} x={x}");
                assert!((0.0..=360.0).contains(&y), "{path:?} y={y}");
            }
        }
    }

    #[test]
    fn circle_starts_right_of_center() {
        let (x, y) = PointerPath::Circle.position(0, 100, 200, 100);
        assert!((x - 135.0).abs() < 1e-4);
        assert!((y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn line_moves_left_to_right() {
        let a = PointerPath::Line.position(0, 10, 100, 50);
        let b = PointerPath::Line.position(5, 10, 100, 50);
        assert_eq!(a, (10.0, 25.0));
        assert!(b.0 > a.0);
        assert_eq!(PointerPath::Line.position(3, 0, 100, 50).1, 25.0);
    }
}
