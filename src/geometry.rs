/// A position on the surface in pixel coordinates. Pointer input arrives as
/// fractional pixels and gesture math stays fractional until rasterization.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

const MIN_STAMP_SPACING: f32 = 0.25;

/// Evenly spaced stamp centers between `from` and `to` for a brush of the
/// given diameter. Spacing is a quarter of the diameter so consecutive stamps
/// overlap at any pointer velocity; both endpoints are always included, and a
/// zero-length segment yields the single starting point.
pub fn interpolate_points(from: Point, to: Point, diameter: f32) -> Vec<Point> {
    let spacing = (diameter / 4.0).max(MIN_STAMP_SPACING);
    let steps = (from.distance(to) / spacing).ceil() as u32;
    if steps == 0 {
        return vec![from];
    }

    let mut points = Vec::with_capacity(steps as usize + 1);
    for step in 0..steps {
        let t = step as f32 / steps as f32;
        points.push(Point::new(
            from.x + (to.x - from.x) * t,
            from.y + (to.y - from.y) * t,
        ));
    }
    points.push(to);
    points
}

/// Outline width for the brush cursor preview. The base width follows the
/// brush radius in four bands, is divided by the zoom factor so the outline
/// keeps its apparent thickness when the host scales the surface, and is
/// clamped to `[0.5, 10.0]`.
pub fn preview_stroke_width(radius: f32, zoom: f32) -> f32 {
    let base = if radius < 4.0 {
        1.0
    } else if radius < 12.0 {
        2.0
    } else if radius < 32.0 {
        3.0
    } else {
        4.0
    };
    (base / zoom).clamp(0.5, 10.0)
}

/// Signed span equalization for the constrain-proportions modifier. The
/// comparison is on the signed spans, so which span wins depends on the drag
/// direction, not on the absolute sizes.
pub fn constrain_spans(width: f32, height: f32) -> (f32, f32) {
    if width > height {
        (width, width)
    } else {
        (height, height)
    }
}

/// Vertices of the isoceles triangle for a drag from `anchor` to `current`:
/// apex at the anchor, base endpoints at the current point's y, mirrored
/// around the anchor's x.
pub fn triangle_points(anchor: Point, current: Point) -> [Point; 3] {
    [
        anchor,
        current,
        Point::new(2.0 * anchor.x - current.x, current.y),
    ]
}

/// An axis-aligned integer rectangle used for crop selections and marquee
/// drawing. May lie partially or fully outside a surface until clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    /// Rectangle spanned by a drag, normalized so width and height are
    /// non-negative regardless of drag direction.
    pub fn from_drag(anchor: Point, current: Point) -> Self {
        let x0 = anchor.x.min(current.x).round() as i32;
        let y0 = anchor.y.min(current.y).round() as i32;
        let x1 = anchor.x.max(current.x).round() as i32;
        let y1 = anchor.y.max(current.y).round() as i32;
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersect with a `width` x `height` surface, returning `None` when
    /// nothing remains.
    pub fn clamp(&self, width: u32, height: u32) -> Option<PixelRect> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x + self.width).min(width as i32);
        let y1 = (self.y + self.height).min(height as i32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}
