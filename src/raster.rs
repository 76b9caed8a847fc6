use ab_glyph::{Font, FontArc, ScaleFont};

use crate::config::ShapeKind;
use crate::geometry::{constrain_spans, triangle_points, PixelRect, Point};
use crate::surface::{Rgba, Surface};

/// Stamp a filled disc of the given diameter centered at `center`. Pixels are
/// covered when their center lies within the radius.
pub fn fill_circle(surface: &mut Surface, center: Point, diameter: f32, color: Rgba) {
    let radius = diameter / 2.0;
    let radius_sq = radius * radius;
    let x0 = (center.x - radius).floor() as i32;
    let x1 = (center.x + radius).ceil() as i32;
    let y0 = (center.y - radius).floor() as i32;
    let y1 = (center.y + radius).ceil() as i32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= radius_sq {
                surface.set_pixel(x, y, color);
            }
        }
    }
}

/// Stamp transparency in a disc, the eraser's mark.
pub fn erase_circle(surface: &mut Surface, center: Point, diameter: f32) {
    fill_circle(surface, center, diameter, Rgba::TRANSPARENT);
}

/// Draw a circle outline of the given stroke width centered on the radius.
pub fn stroke_circle(
    surface: &mut Surface,
    center: Point,
    radius: f32,
    stroke_width: f32,
    color: Rgba,
) {
    let half = stroke_width / 2.0;
    let outer = radius + half;
    let x0 = (center.x - outer).floor() as i32;
    let x1 = (center.x + outer).ceil() as i32;
    let y0 = (center.y - outer).floor() as i32;
    let y1 = (center.y + outer).ceil() as i32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 + 0.5 - center.x;
            let dy = y as f32 + 0.5 - center.y;
            let dist = (dx * dx + dy * dy).sqrt();
            if (dist - radius).abs() <= half {
                surface.set_pixel(x, y, color);
            }
        }
    }
}

/// Fill the axis-aligned rectangle spanned by two corners, either drag
/// direction. The covered area is half-open, so a ten-pixel span fills ten
/// pixel columns.
pub fn fill_rect(surface: &mut Surface, a: Point, b: Point, color: Rgba) {
    let x0 = a.x.min(b.x).round() as i32;
    let x1 = a.x.max(b.x).round() as i32;
    let y0 = a.y.min(b.y).round() as i32;
    let y1 = a.y.max(b.y).round() as i32;

    for y in y0..y1 {
        for x in x0..x1 {
            surface.set_pixel(x, y, color);
        }
    }
}

/// Draw a rectangle outline with the stroke centered on the rectangle's
/// boundary, the crop-selection marquee.
pub fn stroke_rect(surface: &mut Surface, rect: PixelRect, stroke_width: f32, color: Rgba) {
    let half = stroke_width / 2.0;
    let left = rect.x as f32;
    let top = rect.y as f32;
    let right = (rect.x + rect.width) as f32;
    let bottom = (rect.y + rect.height) as f32;

    let x0 = (left - half).floor() as i32;
    let x1 = (right + half).ceil() as i32;
    let y0 = (top - half).floor() as i32;
    let y1 = (bottom + half).ceil() as i32;

    for y in y0..y1 {
        for x in x0..x1 {
            let cx = x as f32 + 0.5;
            let cy = y as f32 + 0.5;
            let in_outer = cx >= left - half
                && cx < right + half
                && cy >= top - half
                && cy < bottom + half;
            let in_inner = cx >= left + half
                && cx < right - half
                && cy >= top + half
                && cy < bottom - half;
            if in_outer && !in_inner {
                surface.set_pixel(x, y, color);
            }
        }
    }
}

/// Fill a triangle given its three vertices. Zero-area triangles draw
/// nothing.
pub fn fill_triangle(surface: &mut Surface, points: [Point; 3], color: Rgba) {
    let [p0, p1, p2] = points;
    let area = (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y);
    if area.abs() < 1e-6 {
        return;
    }

    let min_x = p0.x.min(p1.x).min(p2.x).floor() as i32;
    let max_x = p0.x.max(p1.x).max(p2.x).ceil() as i32;
    let min_y = p0.y.min(p1.y).min(p2.y).floor() as i32;
    let max_y = p0.y.max(p1.y).max(p2.y).ceil() as i32;

    let edge = |a: Point, b: Point, px: f32, py: f32| -> f32 {
        (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let cx = x as f32 + 0.5;
            let cy = y as f32 + 0.5;
            let d0 = edge(p0, p1, cx, cy);
            let d1 = edge(p1, p2, cx, cy);
            let d2 = edge(p2, p0, cx, cy);
            let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
            let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
            if !(has_neg && has_pos) {
                surface.set_pixel(x, y, color);
            }
        }
    }
}

/// Rasterize one of the drag shapes from its anchor to the current point.
/// Preview and commit share this path so the committed pixels always match
/// the last preview.
pub fn fill_shape(
    surface: &mut Surface,
    kind: ShapeKind,
    anchor: Point,
    current: Point,
    constrain: bool,
    color: Rgba,
) {
    match kind {
        ShapeKind::Rectangle => {
            let mut width = current.x - anchor.x;
            let mut height = current.y - anchor.y;
            if constrain {
                (width, height) = constrain_spans(width, height);
            }
            let opposite = Point::new(anchor.x + width, anchor.y + height);
            fill_rect(surface, anchor, opposite, color);
        }
        ShapeKind::Circle => {
            let radius = anchor.distance(current);
            fill_circle(surface, anchor, radius * 2.0, color);
        }
        ShapeKind::Triangle => {
            fill_triangle(surface, triangle_points(anchor, current), color);
        }
    }
}

/// Source-over blit of `src` with its top-left corner at `origin`, clipped to
/// the destination bounds.
pub fn blit_image(surface: &mut Surface, src: &Surface, origin: Point) {
    let ox = origin.x.round() as i32;
    let oy = origin.y.round() as i32;

    for sy in 0..src.height() {
        let ty = oy + sy as i32;
        if ty < 0 || ty >= surface.height() as i32 {
            continue;
        }
        for sx in 0..src.width() {
            let tx = ox + sx as i32;
            let px = src.pixel(sx, sy);
            if px.a == 0 {
                continue;
            }
            surface.blend_pixel_at(tx, ty, px);
        }
    }
}

/// Rasterize `text` with its baseline at `origin.y + ascent`, so `origin` is
/// the top-left of the line box. Glyph coverage is alpha-blended with the
/// requested color.
pub fn draw_text(
    surface: &mut Surface,
    font: &FontArc,
    text: &str,
    px_size: f32,
    origin: Point,
    color: Rgba,
) {
    let scaled = font.as_scaled(px_size);
    let baseline_y = origin.y + scaled.ascent();

    let mut caret = origin.x;
    let mut prev_glyph = None;
    for ch in text.chars() {
        let gid = font.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            caret += scaled.kern(prev, gid);
        }
        let glyph = gid.with_scale_and_position(px_size, ab_glyph::point(caret, baseline_y));
        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, cov| {
                if cov > 0.0 {
                    let x = (bounds.min.x + px as f32).round() as i32;
                    let y = (bounds.min.y + py as f32).round() as i32;
                    let alpha = (cov * color.a as f32).round().min(255.0) as u8;
                    surface.blend_pixel_at(x, y, Rgba::rgba(color.r, color.g, color.b, alpha));
                }
            });
        }
        caret += scaled.h_advance(gid);
        prev_glyph = Some(gid);
    }
}
