//! Static level geometry - the ordered linedef list

use serde::{Deserialize, Serialize};

/// Collision style carried by every linedef.
///
/// The same tag is read two ways depending on the segment's orientation: on a
/// horizontal segment `Floor`/`PlateFloor` support entities from above and
/// `Ceiling`/`PlateCeiling` block them from below; on a vertical segment
/// (a wall) the ceiling styles mean "approached from the right" and the floor
/// styles mean "approached from the left". Level authoring relies on this
/// dual reading, so it must not be split into separate tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinedefStyle {
    /// Walkable ground, or a wall hit while moving right
    Floor,
    /// Overhead blocker, or a wall hit while moving left
    Ceiling,
    /// Plate variant of `Floor` (different surface material, same collision)
    PlateFloor,
    /// Plate variant of `Ceiling`
    PlateCeiling,
}

impl LinedefStyle {
    /// Floor-side styles: support from above on horizontal segments, wall
    /// approached from the left on vertical ones
    pub fn is_floor_side(self) -> bool {
        matches!(self, Self::Floor | Self::PlateFloor)
    }

    /// Ceiling-side styles: block from below on horizontal segments, wall
    /// approached from the right on vertical ones
    pub fn is_ceiling_side(self) -> bool {
        matches!(self, Self::Ceiling | Self::PlateCeiling)
    }
}

/// One immutable line segment of level geometry.
///
/// Orientation is derived, never stored: a segment whose endpoints share x is
/// a vertical wall, anything else is treated as (possibly sloped) horizontal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Linedef {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub style: LinedefStyle,
}

impl Linedef {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, style: LinedefStyle) -> Self {
        Self { x1, y1, x2, y2, style }
    }

    /// True when both endpoints share x (a wall)
    pub fn is_vertical(&self) -> bool {
        self.x1 == self.x2
    }

    /// Copy with endpoints swapped so that `x1 <= x2`
    pub fn normalized(&self) -> Self {
        if self.x1 <= self.x2 {
            *self
        } else {
            Self {
                x1: self.x2,
                y1: self.y2,
                x2: self.x1,
                y2: self.y1,
                style: self.style,
            }
        }
    }

    /// Slope of a normalized horizontal segment
    pub fn gradient(&self) -> f32 {
        let n = self.normalized();
        (n.y2 - n.y1) / (n.x2 - n.x1)
    }

    /// Y-intercept of a normalized horizontal segment
    pub fn shift(&self) -> f32 {
        let n = self.normalized();
        n.y1 - self.gradient() * n.x1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalization_swaps_reversed_endpoints() {
        let line = Linedef::new(10.0, 5.0, 0.0, 0.0, LinedefStyle::Floor);
        let n = line.normalized();
        assert_eq!((n.x1, n.y1), (0.0, 0.0));
        assert_eq!((n.x2, n.y2), (10.0, 5.0));
    }

    #[test]
    fn gradient_and_shift_describe_the_line() {
        // y = 0.5x + 2 between x=2 and x=10
        let line = Linedef::new(2.0, 3.0, 10.0, 7.0, LinedefStyle::Floor);
        assert_relative_eq!(line.gradient(), 0.5);
        assert_relative_eq!(line.shift(), 2.0);
    }

    #[test]
    fn verticality_is_derived_from_endpoints() {
        assert!(Linedef::new(4.0, 0.0, 4.0, 8.0, LinedefStyle::Ceiling).is_vertical());
        assert!(!Linedef::new(0.0, 0.0, 4.0, 0.0, LinedefStyle::Floor).is_vertical());
    }
}
