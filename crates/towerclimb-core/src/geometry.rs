use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in integer pixel units.
///
/// `(x, y)` is the top-left corner and y grows downward, so `bottom()` is
/// numerically larger than `top()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Horizontal centre, rounded toward the left edge.
    pub const fn center_x(&self) -> i32 {
        self.x + self.width / 2
    }

    pub fn set_left(&mut self, left: i32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: i32) {
        self.x = right - self.width;
    }

    pub fn set_bottom(&mut self, bottom: i32) {
        self.y = bottom - self.height;
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }

    /// Copy of this rectangle moved by `(dx, dy)`.
    pub const fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Both extents strictly positive.
    pub const fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Strict interior overlap: rectangles that only share an edge do not
    /// collide, and a degenerate rectangle never collides with anything.
    pub const fn overlaps(&self, other: &Rect) -> bool {
        self.is_valid()
            && other.is_valid()
            && self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_top_left_origin() {
        let r = Rect::new(10, 20, 30, 50);
        assert_eq!(r.left(), 10);
        assert_eq!(r.right(), 40);
        assert_eq!(r.top(), 20);
        assert_eq!(r.bottom(), 70);
        assert_eq!(r.center_x(), 25);
    }

    #[test]
    fn setters_keep_size() {
        let mut r = Rect::new(0, 0, 30, 50);
        r.set_bottom(100);
        assert_eq!(r.y, 50);
        r.set_right(200);
        assert_eq!(r.x, 170);
        r.set_left(4);
        assert_eq!(r.x, 4);
        assert_eq!((r.width, r.height), (30, 50));
    }

    #[test]
    fn overlap_is_strict() {
        let a = Rect::new(0, 0, 10, 10);
        assert!(a.overlaps(&Rect::new(9, 9, 10, 10)));
        assert!(!a.overlaps(&Rect::new(10, 0, 10, 10)), "shared edge");
        assert!(!a.overlaps(&Rect::new(0, 10, 10, 10)), "shared edge");
        assert!(!a.overlaps(&Rect::new(2, 2, 0, 5)), "zero width");
    }

    #[test]
    fn one_pixel_sink_counts_as_contact() {
        let floor = Rect::new(0, 796, 500, 4);
        let mut player = Rect::new(250, 0, 30, 50);
        player.set_bottom(floor.top() + 1);
        assert!(player.overlaps(&floor));
        player.set_bottom(floor.top());
        assert!(!player.overlaps(&floor));
    }

    #[test]
    fn translated_returns_moved_copy() {
        let a = Rect::new(1, 2, 3, 4);
        let b = a.translated(5, -6);
        assert_eq!(a, Rect::new(1, 2, 3, 4));
        assert_eq!(b, Rect::new(6, -4, 3, 4));
    }
}
