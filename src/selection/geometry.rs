//! Rectangle, handle and drag arithmetic for the region editor.

use crate::util::Point;

/// Smallest width or height a selection may be dragged to.
pub const MIN_SIZE: f64 = 10.0;
/// Side length of a drawn handle marker.
pub const HANDLE_SIZE: f64 = 10.0;
/// Extra hit tolerance around each handle, per side.
pub const HANDLE_HIT_SLOP: f64 = 6.0;
/// Padding added around the swirl bounding box when a session opens.
pub const SELECTION_PADDING: f64 = 25.0;

/// Axis-aligned capture rectangle in logical coordinates, y growing downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounding box of `points` grown by `padding` on every side.
    ///
    /// Non-finite points are skipped; returns `None` when nothing is left.
    pub fn bounding(points: &[Point], padding: f64) -> Option<Self> {
        let mut finite = points.iter().filter(|p| p.is_finite());
        let first = finite.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in finite {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(
            min_x - padding,
            min_y - padding,
            (max_x - min_x) + 2.0 * padding,
            (max_y - min_y) + 2.0 * padding,
        ))
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open containment: the left and top edges are inside, the right
    /// and bottom edges are not.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn meets_min_size(&self) -> bool {
        self.width >= MIN_SIZE && self.height >= MIN_SIZE
    }

    /// Square of side `size` centred on `center`.
    pub fn centered_square(center: Point, size: f64) -> Self {
        Self::new(center.x - size / 2.0, center.y - size / 2.0, size, size)
    }

    /// Rectangle translated by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Intersection with `other`, or `None` when they do not overlap.
    pub fn intersection(&self, other: &SelectionRect) -> Option<Self> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        (right > x && bottom > y).then(|| Self::new(x, y, right - x, bottom - y))
    }
}

/// How a drag delta on one axis changes the rectangle's origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisEffect {
    pub origin: i8,
    pub size: i8,
}

impl AxisEffect {
    /// Dragged edge is the leading one: origin follows, size shrinks.
    pub const LEADING: AxisEffect = AxisEffect { origin: 1, size: -1 };
    /// Dragged edge is the trailing one: size grows.
    pub const TRAILING: AxisEffect = AxisEffect { origin: 0, size: 1 };
    /// Whole rectangle moves.
    pub const SHIFT: AxisEffect = AxisEffect { origin: 1, size: 0 };
    /// Axis untouched.
    pub const FIXED: AxisEffect = AxisEffect { origin: 0, size: 0 };

    /// Applies `delta` to one axis and floors the size at [`MIN_SIZE`].
    ///
    /// When the leading edge is dragged past the minimum, the trailing edge
    /// stays put and the origin stops `MIN_SIZE` before it.
    pub fn apply(self, origin: f64, size: f64, delta: f64) -> (f64, f64) {
        let new_origin = origin + f64::from(self.origin) * delta;
        let new_size = size + f64::from(self.size) * delta;
        if new_size >= MIN_SIZE {
            return (new_origin, new_size);
        }
        if self.origin != 0 && self.size != 0 {
            (origin + size - MIN_SIZE, MIN_SIZE)
        } else {
            (new_origin, MIN_SIZE)
        }
    }
}

/// Cursor shape requested while hovering or dragging a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Default,
    Move,
    ResizeNorthWest,
    ResizeNorth,
    ResizeNorthEast,
    ResizeWest,
    ResizeEast,
    ResizeSouthWest,
    ResizeSouth,
    ResizeSouthEast,
}

/// Grab zone of the selection rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlePosition {
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    Interior,
}

impl HandlePosition {
    /// Border handles in hit-test order. `Interior` is tested last, separately.
    pub const BORDER: [HandlePosition; 8] = [
        HandlePosition::TopLeft,
        HandlePosition::Top,
        HandlePosition::TopRight,
        HandlePosition::Left,
        HandlePosition::Right,
        HandlePosition::BottomLeft,
        HandlePosition::Bottom,
        HandlePosition::BottomRight,
    ];

    /// Per-axis drag effect as `(horizontal, vertical)`.
    pub fn axes(self) -> (AxisEffect, AxisEffect) {
        use AxisEffect as A;
        match self {
            HandlePosition::TopLeft => (A::LEADING, A::LEADING),
            HandlePosition::Top => (A::FIXED, A::LEADING),
            HandlePosition::TopRight => (A::TRAILING, A::LEADING),
            HandlePosition::Left => (A::LEADING, A::FIXED),
            HandlePosition::Right => (A::TRAILING, A::FIXED),
            HandlePosition::BottomLeft => (A::LEADING, A::TRAILING),
            HandlePosition::Bottom => (A::FIXED, A::TRAILING),
            HandlePosition::BottomRight => (A::TRAILING, A::TRAILING),
            HandlePosition::Interior => (A::SHIFT, A::SHIFT),
        }
    }

    /// Centre of the handle marker on `rect`; `None` for the interior.
    pub fn anchor(self, rect: &SelectionRect) -> Option<Point> {
        let (left, top) = (rect.x, rect.y);
        let (mid_x, mid_y) = (rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
        let (right, bottom) = (rect.right(), rect.bottom());
        let point = match self {
            HandlePosition::TopLeft => Point::new(left, top),
            HandlePosition::Top => Point::new(mid_x, top),
            HandlePosition::TopRight => Point::new(right, top),
            HandlePosition::Left => Point::new(left, mid_y),
            HandlePosition::Right => Point::new(right, mid_y),
            HandlePosition::BottomLeft => Point::new(left, bottom),
            HandlePosition::Bottom => Point::new(mid_x, bottom),
            HandlePosition::BottomRight => Point::new(right, bottom),
            HandlePosition::Interior => return None,
        };
        Some(point)
    }

    pub fn cursor_hint(self) -> CursorHint {
        match self {
            HandlePosition::TopLeft => CursorHint::ResizeNorthWest,
            HandlePosition::Top => CursorHint::ResizeNorth,
            HandlePosition::TopRight => CursorHint::ResizeNorthEast,
            HandlePosition::Left => CursorHint::ResizeWest,
            HandlePosition::Right => CursorHint::ResizeEast,
            HandlePosition::BottomLeft => CursorHint::ResizeSouthWest,
            HandlePosition::Bottom => CursorHint::ResizeSouth,
            HandlePosition::BottomRight => CursorHint::ResizeSouthEast,
            HandlePosition::Interior => CursorHint::Move,
        }
    }
}

/// Hit zone of a border handle, widened by [`HANDLE_HIT_SLOP`].
pub fn handle_hit_rect(rect: &SelectionRect, handle: HandlePosition) -> Option<SelectionRect> {
    handle
        .anchor(rect)
        .map(|center| SelectionRect::centered_square(center, HANDLE_SIZE + 2.0 * HANDLE_HIT_SLOP))
}

/// First handle whose zone contains `point`, then the interior, else `None`.
pub fn hit_test(rect: &SelectionRect, point: Point) -> Option<HandlePosition> {
    HandlePosition::BORDER
        .into_iter()
        .find(|handle| handle_hit_rect(rect, *handle).is_some_and(|zone| zone.contains(point)))
        .or_else(|| rect.contains(point).then_some(HandlePosition::Interior))
}

/// Applies a drag of `(dx, dy)` on `handle` to the snapshot `start`.
pub fn apply_drag(start: &SelectionRect, handle: HandlePosition, dx: f64, dy: f64) -> SelectionRect {
    let (horizontal, vertical) = handle.axes();
    let (x, width) = horizontal.apply(start.x, start.width, dx);
    let (y, height) = vertical.apply(start.y, start.height, dy);
    SelectionRect::new(x, y, width, height)
}
