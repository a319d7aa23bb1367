//! Collision engine - one entity versus the static linedef list
//!
//! Stateless: each call scans the ordered geometry and produces a fresh
//! `CollisionResult`. The scan order matters: for every boundary the first
//! qualifying segment wins and later candidates are ignored, which level
//! authors rely on where segments overlap.

use crate::level::{Linedef, LinedefStyle};

/// Boundary contact flags plus the supporting floor's line equation.
/// `floor_gradient`/`floor_shift` are only meaningful while `below` is set
/// in the same tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionResult {
    pub above: bool,
    pub below: bool,
    pub left: bool,
    pub right: bool,
    pub floor_gradient: f32,
    pub floor_shift: f32,
}

impl CollisionResult {
    /// Any boundary contact this tick
    pub fn any(&self) -> bool {
        self.above || self.below || self.left || self.right
    }
}

/// Scan the linedef list for contacts around one entity.
///
/// `vel_x`/`vel_y` are the entity's current velocity in 60 Hz-baseline units
/// (one unit of velocity moves one unit of position per baseline tick), which
/// the "just crossed" wall tests use to look one step back.
pub fn check(
    x: f32,
    y: f32,
    vel_x: f32,
    vel_y: f32,
    half_w: f32,
    half_h: f32,
    linedefs: &[Linedef],
) -> CollisionResult {
    let mut result = CollisionResult::default();

    // Rising through a sloped floor must not register as support, so the
    // comparison happens in gradient space: vertical velocity per unit of
    // horizontal movement when moving, raw vertical velocity when not.
    let velocity_gradient = |vx: f32, vy: f32| if vx != 0.0 { vy / vx.abs() } else { vy };

    for line in linedefs {
        let n = line.normalized();

        if n.is_vertical() {
            let (seg_bottom, seg_top) = if n.y1 <= n.y2 { (n.y1, n.y2) } else { (n.y2, n.y1) };
            if y + half_h < seg_bottom || y - half_h > seg_top {
                continue;
            }

            let wall_x = n.x1;
            match n.style {
                // Ceiling styles double as "wall approached from the right"
                LinedefStyle::Ceiling | LinedefStyle::PlateCeiling => {
                    if !result.left {
                        let edge = x - half_w;
                        if edge <= wall_x && edge - vel_x >= wall_x {
                            result.left = true;
                            continue;
                        }
                    }
                }
                // Floor styles double as "wall approached from the left"
                LinedefStyle::Floor | LinedefStyle::PlateFloor => {
                    if !result.right {
                        let edge = x + half_w;
                        if edge >= wall_x && edge - vel_x <= wall_x {
                            result.right = true;
                            continue;
                        }
                    }
                }
            }
        } else {
            if x < n.x1 || x > n.x2 {
                continue;
            }

            let gradient = n.gradient();
            let shift = n.shift();
            let line_y = gradient * x + shift;
            let vg = velocity_gradient(vel_x, vel_y);

            if n.style.is_floor_side() {
                if !result.below && vg <= gradient && y - half_h <= line_y && y >= line_y {
                    result.below = true;
                    result.floor_gradient = gradient;
                    result.floor_shift = shift;
                }
            } else {
                let reach = half_w.max(half_h);
                if !result.above && vg >= gradient && y + reach >= line_y && y <= line_y {
                    result.above = true;
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor(x1: f32, y1: f32, x2: f32, y2: f32) -> Linedef {
        Linedef::new(x1, y1, x2, y2, LinedefStyle::Floor)
    }

    #[test]
    fn open_air_has_no_contacts() {
        let result = check(50.0, 20.0, 0.0, -1.0, 2.0, 2.0, &[]);
        assert_eq!(result, CollisionResult::default());
    }

    #[test]
    fn flat_floor_supports_entity_inside_its_span() {
        let lines = [floor(0.0, 0.0, 100.0, 0.0)];

        // Bottom edge at y = -1, falling
        let result = check(50.0, 1.0, 0.0, -0.5, 2.0, 2.0, &lines);
        assert!(result.below);
        assert_relative_eq!(result.floor_gradient, 0.0);
        assert_relative_eq!(result.floor_shift, 0.0);

        // Same entity outside the segment's x-range
        let result = check(150.0, 1.0, 0.0, -0.5, 2.0, 2.0, &lines);
        assert!(!result.below);
    }

    #[test]
    fn rising_entity_passes_through_a_floor() {
        let lines = [floor(0.0, 0.0, 100.0, 0.0)];
        let result = check(50.0, 1.0, 0.0, 2.0, 2.0, 2.0, &lines);
        assert!(!result.below);
    }

    #[test]
    fn first_matching_floor_wins() {
        // Two overlapping qualifying floors with different intercepts
        let lines = [floor(0.0, 0.5, 100.0, 0.5), floor(0.0, 0.0, 100.0, 0.0)];
        let result = check(50.0, 1.2, 0.0, -0.5, 2.0, 2.0, &lines);
        assert!(result.below);
        assert_relative_eq!(result.floor_shift, 0.5);
    }

    #[test]
    fn sloped_floor_reports_its_line_equation() {
        // y = 0.25x between x=0 and x=40
        let lines = [floor(0.0, 0.0, 40.0, 10.0)];
        let result = check(20.0, 6.0, 0.0, -0.5, 2.0, 2.0, &lines);
        assert!(result.below);
        assert_relative_eq!(result.floor_gradient, 0.25);
        assert_relative_eq!(result.floor_shift, 0.0);
    }

    #[test]
    fn ceiling_blocks_from_below() {
        let lines = [Linedef::new(0.0, 10.0, 100.0, 10.0, LinedefStyle::Ceiling)];
        let result = check(50.0, 9.0, 0.0, 1.5, 2.0, 2.0, &lines);
        assert!(result.above);
        assert!(!result.below);

        // Falling entity under the same ceiling is unobstructed
        let result = check(50.0, 9.0, 0.0, -1.5, 2.0, 2.0, &lines);
        assert!(!result.above);
    }

    #[test]
    fn ceiling_styled_wall_blocks_leftward_movement() {
        // Vertical wall at x=10, approached from the right
        let lines = [Linedef::new(10.0, 0.0, 10.0, 20.0, LinedefStyle::Ceiling)];

        // Left edge just crossed the wall this step
        let result = check(11.5, 5.0, -1.0, 0.0, 2.0, 2.0, &lines);
        assert!(result.left);
        assert!(!result.right);

        // Still clear of the wall
        let result = check(13.5, 5.0, -1.0, 0.0, 2.0, 2.0, &lines);
        assert!(!result.left);

        // Outside the wall's vertical span
        let result = check(11.5, 40.0, -1.0, 0.0, 2.0, 2.0, &lines);
        assert!(!result.left);
    }

    #[test]
    fn floor_styled_wall_blocks_rightward_movement() {
        let lines = [Linedef::new(10.0, 0.0, 10.0, 20.0, LinedefStyle::Floor)];

        let result = check(8.5, 5.0, 1.0, 0.0, 2.0, 2.0, &lines);
        assert!(result.right);
        assert!(!result.left);

        let result = check(6.0, 5.0, 1.0, 0.0, 2.0, 2.0, &lines);
        assert!(!result.right);
    }

    #[test]
    fn wall_flags_honor_scan_order() {
        // Two walls could both qualify; the flag reflects the first
        let lines = [
            Linedef::new(10.0, 0.0, 10.0, 20.0, LinedefStyle::Floor),
            Linedef::new(10.2, 0.0, 10.2, 20.0, LinedefStyle::Floor),
        ];
        let result = check(8.5, 5.0, 1.0, 0.0, 2.0, 2.0, &lines);
        assert!(result.right);
    }
}
