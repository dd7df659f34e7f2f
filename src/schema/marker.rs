use serde::{Deserialize, Serialize};

/// Stamp shape used when plotting a character's end points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    Circle,
    Square,
    Triangle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Black,
    Green,
    Red,
    Blue,
    Orange,
    Purple,
}

impl Color {
    /// Fill color as `(r, g, b)` components in `0.0..=1.0`.
    pub fn rgb(&self) -> (f32, f32, f32) {
        match self {
            Self::Black => (0.0, 0.0, 0.0),
            Self::Green => (0.0, 0.5, 0.0),
            Self::Red => (1.0, 0.0, 0.0),
            Self::Blue => (0.0, 0.0, 1.0),
            Self::Orange => (1.0, 0.65, 0.0),
            Self::Purple => (0.5, 0.0, 0.5),
        }
    }
}

/// How one batch of end points is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Marker {
    pub shape: Shape,
    pub color: Color,
}

impl Marker {
    pub const fn new(shape: Shape, color: Color) -> Self {
        Self { shape, color }
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self::new(Shape::Circle, Color::Black)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_components_in_unit_range() {
        for color in [
            Color::Black,
            Color::Green,
            Color::Red,
            Color::Blue,
            Color::Orange,
            Color::Purple,
        ] {
            let (r, g, b) = color.rgb();
            for c in [r, g, b] {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn marker_from_ron() {
        let m: Marker = ron::from_str("(shape: Triangle, color: Red)").unwrap();
        assert_eq!(m, Marker::new(Shape::Triangle, Color::Red));
    }
}
