/// UI rendering: size label and help hint drawn on top of the selection overlay
use cairo::Context;

use crate::draw::color::{LABEL_BACKGROUND, LABEL_TEXT};
use crate::selection::SelectionRect;
use crate::util::Point;

// ============================================================================
// UI Layout Constants (not configurable)
// ============================================================================

/// Gap between the selection and its size label
pub const LABEL_GAP: f64 = 6.0;
/// Minimum free space below the selection for the label to go there
pub const LABEL_MIN_SPACE_BELOW: f64 = 30.0;
/// Horizontal padding inside the label pill
const LABEL_PAD_X: f64 = 8.0;
/// Vertical padding inside the label pill
const LABEL_PAD_Y: f64 = 4.0;
/// Label pill corner radius
const LABEL_RADIUS: f64 = 6.0;
/// Distance of the help hint from the bottom edge
const HINT_MARGIN_BOTTOM: f64 = 40.0;

const LABEL_FONT: &str = "Sans Bold 13";
const HINT_FONT: &str = "Sans 12";

/// Text of the help hint.
pub const HELP_HINT: &str = "Enter / double-click: confirm | Esc / right-click: cancel";

/// `"{w} × {h}"` with both dimensions truncated to whole units.
pub fn size_label_text(rect: &SelectionRect) -> String {
    format!("{} × {}", rect.width as i64, rect.height as i64)
}

/// Top-left corner of a `label_w` × `label_h` label for `rect`.
///
/// Centred horizontally on the selection; `LABEL_GAP` below it, or above it
/// when no more than `LABEL_MIN_SPACE_BELOW` remains before `screen_height`.
pub fn label_origin(
    rect: &SelectionRect,
    label_w: f64,
    label_h: f64,
    screen_height: f64,
) -> Point {
    let x = rect.x + (rect.width - label_w) / 2.0;
    let space_below = screen_height - rect.bottom();
    let y = if space_below > LABEL_MIN_SPACE_BELOW {
        rect.bottom() + LABEL_GAP
    } else {
        rect.y - label_h - LABEL_GAP
    };
    Point::new(x, y)
}

fn rounded_rect(ctx: &Context, x: f64, y: f64, w: f64, h: f64, r: f64) {
    use std::f64::consts::FRAC_PI_2;
    ctx.new_sub_path();
    ctx.arc(x + w - r, y + r, r, -FRAC_PI_2, 0.0);
    ctx.arc(x + w - r, y + h - r, r, 0.0, FRAC_PI_2);
    ctx.arc(x + r, y + h - r, r, FRAC_PI_2, 2.0 * FRAC_PI_2);
    ctx.arc(x + r, y + r, r, 2.0 * FRAC_PI_2, 3.0 * FRAC_PI_2);
    ctx.close_path();
}

/// Draws `text` in a pill whose top-left corner is computed by `place` from
/// the pill size. Returns the pill rectangle.
fn render_pill(
    ctx: &Context,
    text: &str,
    font: &str,
    place: impl FnOnce(f64, f64) -> Point,
) -> SelectionRect {
    let layout = pangocairo::functions::create_layout(ctx);
    layout.set_font_description(Some(&pango::FontDescription::from_string(font)));
    layout.set_text(text);

    let (_ink, logical) = layout.extents();
    let text_w = logical.width() as f64 / pango::SCALE as f64;
    let text_h = logical.height() as f64 / pango::SCALE as f64;
    let pill_w = text_w + LABEL_PAD_X * 2.0;
    let pill_h = text_h + LABEL_PAD_Y * 2.0;
    let origin = place(pill_w, pill_h);

    ctx.save().ok();
    ctx.set_antialias(cairo::Antialias::Best);
    rounded_rect(ctx, origin.x, origin.y, pill_w, pill_h, LABEL_RADIUS);
    LABEL_BACKGROUND.apply(ctx);
    let _ = ctx.fill();

    LABEL_TEXT.apply(ctx);
    ctx.move_to(origin.x + LABEL_PAD_X, origin.y + LABEL_PAD_Y);
    pangocairo::functions::show_layout(ctx, &layout);
    ctx.restore().ok();

    SelectionRect::new(origin.x, origin.y, pill_w, pill_h)
}

/// Live `w × h` label next to the selection.
pub fn render_size_label(ctx: &Context, rect: &SelectionRect, screen_height: f64) -> SelectionRect {
    render_pill(ctx, &size_label_text(rect), LABEL_FONT, |w, h| {
        label_origin(rect, w, h, screen_height)
    })
}

/// Help hint centred at the bottom of the screen.
pub fn render_help_hint(ctx: &Context, screen_width: f64, screen_height: f64) -> SelectionRect {
    render_pill(ctx, HELP_HINT, HINT_FONT, |w, h| {
        Point::new(
            (screen_width - w) / 2.0,
            screen_height - HINT_MARGIN_BOTTOM - h,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_text_truncates() {
        let rect = SelectionRect::new(0.0, 0.0, 120.9, 45.2);
        assert_eq!(size_label_text(&rect), "120 × 45");
    }

    #[test]
    fn label_goes_below_when_there_is_room() {
        let rect = SelectionRect::new(100.0, 100.0, 200.0, 100.0);
        let origin = label_origin(&rect, 80.0, 20.0, 1000.0);
        assert_eq!(origin, Point::new(160.0, 206.0));
    }

    #[test]
    fn label_flips_above_near_bottom_edge() {
        let rect = SelectionRect::new(100.0, 100.0, 200.0, 100.0);
        // Exactly 30 units left below: not enough.
        let origin = label_origin(&rect, 80.0, 20.0, 230.0);
        assert_eq!(origin, Point::new(160.0, 74.0));
    }
}
