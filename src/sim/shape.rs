//! Local-space template geometry for slice instances
//!
//! A shape is a fixed run of triangle-list points. Each slice uploads one
//! shape per slot at startup and only translates it afterwards.

use glam::Vec2;

use crate::consts::*;

/// Template geometry for one instance
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Triangle-list points in local space
    pub points: Vec<Vec2>,
    /// Index of the point used as the leading edge in hit tests
    pub tip: usize,
}

impl Shape {
    /// Single triangle with its apex as the tip
    pub fn triangle(a: Vec2, apex: Vec2, b: Vec2) -> Self {
        Self {
            points: vec![a, apex, b],
            tip: 1,
        }
    }

    /// Axis-aligned rectangle as two triangles.
    ///
    /// Point order is `min, (max.x, min.y), max, min, max, (min.x, max.y)`;
    /// the tip is the top-left corner.
    pub fn rect(min: Vec2, max: Vec2) -> Self {
        let bottom_right = Vec2::new(max.x, min.y);
        let top_left = Vec2::new(min.x, max.y);
        Self {
            points: vec![min, bottom_right, max, min, max, top_left],
            tip: 5,
        }
    }

    /// Number of vertices this shape contributes
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Designated leading-edge point
    #[inline]
    pub fn tip(&self) -> Vec2 {
        self.points[self.tip]
    }

    /// Local-space AABB as `(min, max)`
    pub fn bounds(&self) -> (Vec2, Vec2) {
        self.points.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        )
    }

    /// Horizontal extent of the shape
    pub fn width(&self) -> f32 {
        let (min, max) = self.bounds();
        max.x - min.x
    }
}

/// Turret triangle resting on the bottom edge, centred on x = 0
pub fn turret() -> Shape {
    Shape::triangle(
        Vec2::new(-TURRET_WIDTH / 2.0, BOTTOM_EDGE),
        Vec2::new(0.0, MUZZLE_HEIGHT),
        Vec2::new(TURRET_WIDTH / 2.0, BOTTOM_EDGE),
    )
}

/// Bullet rectangle centred on x = 0 with its base at y = 0.
/// Spawn offsets place the base at the muzzle.
pub fn bullet() -> Shape {
    Shape::rect(
        Vec2::new(-BULLET_WIDTH / 2.0, 0.0),
        Vec2::new(BULLET_WIDTH / 2.0, BULLET_HEIGHT),
    )
}

/// Bird rectangle parked just beyond the left edge at y = 0.
///
/// With a zero offset the bird is fully hidden on the left; an offset of
/// `visible span + width` parks it just beyond the right edge.
pub fn bird() -> Shape {
    Shape::rect(
        Vec2::new(LEFT_EDGE - BIRD_WIDTH, 0.0),
        Vec2::new(LEFT_EDGE, BIRD_HEIGHT),
    )
}

/// Scorecard marker for `slot`, laid out along the top-left corner
pub fn score_marker(slot: usize) -> Shape {
    let x = LEFT_EDGE + SCORE_MARKER_SPACING * (slot as f32 + 0.5);
    let y = TOP_EDGE - SCORE_MARKER_SPACING;
    Shape::rect(
        Vec2::new(x, y),
        Vec2::new(x + SCORE_MARKER_SIZE, y + SCORE_MARKER_SIZE),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_bounds_and_tip() {
        let shape = Shape::rect(Vec2::new(-1.0, -2.0), Vec2::new(3.0, 4.0));
        assert_eq!(shape.vertex_count(), RECT_VERTICES);
        assert_eq!(shape.bounds(), (Vec2::new(-1.0, -2.0), Vec2::new(3.0, 4.0)));
        assert_eq!(shape.tip(), Vec2::new(-1.0, 4.0));
        assert!((shape.width() - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_turret_tip_is_muzzle() {
        let shape = turret();
        assert_eq!(shape.vertex_count(), TRIANGLE_VERTICES);
        assert!((shape.tip().y - MUZZLE_HEIGHT).abs() < f32::EPSILON);
        assert!((shape.width() - TURRET_WIDTH).abs() < 1e-6);
    }

    #[test]
    fn test_bird_starts_off_screen_left() {
        let (min, max) = bird().bounds();
        assert!(max.x <= LEFT_EDGE);
        assert!((min.x - (LEFT_EDGE - BIRD_WIDTH)).abs() < 1e-6);
    }
}
