//! Geometry primitives
//!
//! Page-space points, sizes and rects. Y grows downwards, matching the
//! document coordinates the host lays elements out in.

/// A point in page space
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A width/height pair
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero, negative or not finite
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

/// Margin applied around a rect
///
/// Positive values grow the rect, negative values shrink it, the same way
/// an intersection root margin behaves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margin {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margin {
    pub const ZERO: Margin = Margin::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same margin on every side
    pub const fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Only a bottom margin
    pub const fn bottom(value: f32) -> Self {
        Self::new(0.0, 0.0, value, 0.0)
    }
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Move the rect by an offset
    pub fn translate(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grow (positive) or shrink (negative) each side by a margin
    pub fn expand(&self, margin: &Margin) -> Rect {
        let x = self.x - margin.left;
        let y = self.y - margin.top;
        let width = (self.width + margin.left + margin.right).max(0.0);
        let height = (self.height + margin.top + margin.bottom).max(0.0);
        Rect::new(x, y, width, height)
    }

    /// Overlapping region, if the rects overlap with a non-negative extent
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < x || bottom < y {
            return None;
        }

        Some(Rect::new(x, y, right - x, bottom - y))
    }

    /// Fraction of this rect's area that lies inside `root`
    ///
    /// Zero-area rects report 1.0 when their origin sits inside the root and
    /// 0.0 otherwise.
    pub fn intersection_ratio(&self, root: &Rect) -> f32 {
        let area = self.area();
        if area <= 0.0 {
            return if root.contains(self.origin()) { 1.0 } else { 0.0 };
        }

        match self.intersection(root) {
            Some(overlap) => (overlap.area() / area).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}
