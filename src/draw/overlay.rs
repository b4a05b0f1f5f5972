//! Cairo rendering of the selection overlay.

use cairo::Context;

use super::color::{BORDER, DIM, HANDLE_FILL, HANDLE_STROKE};
use crate::selection::{HandlePosition, SelectionRect, geometry::HANDLE_SIZE};

/// Border stroke width.
pub const BORDER_WIDTH: f64 = 2.0;
/// Handle marker outline width.
const HANDLE_STROKE_WIDTH: f64 = 1.5;

/// Paints the full overlay frame: dimmed surroundings, the clear selection,
/// its border and the eight handle markers.
///
/// `rect` is in surface coordinates. The caller clears the surface first.
pub fn render_selection(ctx: &Context, rect: &SelectionRect, width: f64, height: f64) {
    ctx.save().ok();

    // Dim everything, then punch the selection back out.
    ctx.set_operator(cairo::Operator::Source);
    DIM.apply(ctx);
    ctx.rectangle(0.0, 0.0, width, height);
    let _ = ctx.fill();

    ctx.set_operator(cairo::Operator::Clear);
    ctx.rectangle(rect.x, rect.y, rect.width, rect.height);
    let _ = ctx.fill();

    ctx.set_operator(cairo::Operator::Over);
    BORDER.apply(ctx);
    ctx.set_line_width(BORDER_WIDTH);
    ctx.rectangle(rect.x, rect.y, rect.width, rect.height);
    let _ = ctx.stroke();

    render_handles(ctx, rect);

    ctx.restore().ok();
}

/// Round markers at the corners and edge midpoints.
pub fn render_handles(ctx: &Context, rect: &SelectionRect) {
    let radius = HANDLE_SIZE / 2.0;
    ctx.set_line_width(HANDLE_STROKE_WIDTH);
    for handle in HandlePosition::BORDER {
        let Some(center) = handle.anchor(rect) else {
            continue;
        };
        ctx.new_sub_path();
        ctx.arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU);
        HANDLE_FILL.apply(ctx);
        let _ = ctx.fill_preserve();
        HANDLE_STROKE.apply(ctx);
        let _ = ctx.stroke();
    }
}

/// Clears the whole surface to transparent.
pub fn clear(ctx: &Context) {
    ctx.save().ok();
    ctx.set_operator(cairo::Operator::Clear);
    let _ = ctx.paint();
    ctx.restore().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use cairo::{Format, ImageSurface};

    /// Alpha byte of pixel (x, y) in an ARGB32 surface.
    fn alpha(surface: &mut ImageSurface, x: usize, y: usize) -> u8 {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        data[y * stride + x * 4 + 3]
    }

    #[test]
    fn outside_is_dimmed_and_inside_is_clear() {
        let mut surface = ImageSurface::create(Format::ARgb32, 200, 200).unwrap();
        {
            let ctx = Context::new(&surface).unwrap();
            clear(&ctx);
            render_selection(&ctx, &SelectionRect::new(50.0, 50.0, 100.0, 100.0), 200.0, 200.0);
        }
        surface.flush();

        let outside = alpha(&mut surface, 10, 10);
        assert!((100..=130).contains(&outside), "outside alpha {outside}");
        assert_eq!(alpha(&mut surface, 100, 80), 0);
        // Border and handle markers are opaque-ish.
        assert!(alpha(&mut surface, 100, 50) > 200);
        assert!(alpha(&mut surface, 50, 50) > 200);
    }
}
