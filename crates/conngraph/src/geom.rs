//! Integer layout geometry: grid points, rectangles and routed shapes.
//!
//! All coordinates live on the manufacturing grid, so everything is `i32`
//! and distances are exact. Shapes are axis-aligned rectangles; a wire is
//! a rectangle drawn around its centerline with half-width endcaps, a via is
//! a rectangle centered on its reference point.

use std::fmt;

/// A grid point. Ordered lexicographically by `(x, y)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pt {
    pub x: i32,
    pub y: i32,
}

impl Pt {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance; widened so that far-apart grid points cannot overflow.
    #[inline]
    pub fn manhattan(self, other: Pt) -> i64 {
        (i64::from(self.x) - i64::from(other.x)).abs() + (i64::from(self.y) - i64::from(other.y)).abs()
    }
}

impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle with inclusive extents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub xmin: i32,
    pub ymin: i32,
    pub xmax: i32,
    pub ymax: i32,
}

impl Rect {
    /// Build from two corners in any order.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            xmin: x0.min(x1),
            ymin: y0.min(y1),
            xmax: x0.max(x1),
            ymax: y0.max(y1),
        }
    }

    #[inline]
    pub fn dx(&self) -> i32 {
        self.xmax - self.xmin
    }

    #[inline]
    pub fn dy(&self) -> i32 {
        self.ymax - self.ymin
    }

    /// True if a min extent has crossed its max extent.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    /// Twice the center, so odd extents stay exact.
    #[inline]
    pub fn center2(&self) -> Pt {
        Pt::new(self.xmin + self.xmax, self.ymin + self.ymax)
    }
}

/// A routed shape: the drawn rectangle of one wire segment or via.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rect: Rect,
    pub via: bool,
}

impl Shape {
    /// Wire between `a` and `b` with the given width, including half-width endcaps.
    pub fn wire(a: Pt, b: Pt, width: i32) -> Self {
        let h = width / 2;
        Self {
            rect: Rect::new(
                a.x.min(b.x) - h,
                a.y.min(b.y) - h,
                a.x.max(b.x) + h,
                a.y.max(b.y) + h,
            ),
            via: false,
        }
    }

    /// Square via of side `size` centered on `p`.
    pub fn via(p: Pt, size: i32) -> Self {
        let h = size / 2;
        Self {
            rect: Rect::new(p.x - h, p.y - h, p.x + h, p.y + h),
            via: true,
        }
    }

    /// Narrow side of the rectangle; for a wire this is its drawn width.
    #[inline]
    pub fn width(&self) -> i32 {
        self.rect.dx().min(self.rect.dy())
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        !self.via && self.rect.dx() > self.rect.dy()
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        !self.via && self.rect.dx() < self.rect.dy()
    }
}
