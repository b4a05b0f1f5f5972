//! RGBA color type and the overlay palette.

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use swirlcap::draw::Color;
/// let dim = Color::new(0.0, 0.0, 0.0, 0.45);
/// assert_eq!(dim.a, 0.45);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Makes this color the context's source.
    pub fn apply(&self, ctx: &cairo::Context) {
        ctx.set_source_rgba(self.r, self.g, self.b, self.a);
    }
}

/// Veil over everything outside the selection.
pub const DIM: Color = Color::new(0.0, 0.0, 0.0, 0.45);

/// Selection border.
pub const BORDER: Color = Color::new(1.0, 1.0, 1.0, 0.9);

/// Handle marker fill.
pub const HANDLE_FILL: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Handle marker outline (system accent blue).
pub const HANDLE_STROKE: Color = Color::new(0.0, 0.48, 1.0, 1.0);

/// Size label and hint text.
pub const LABEL_TEXT: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Pill behind the size label and hint text.
pub const LABEL_BACKGROUND: Color = Color::new(0.0, 0.0, 0.0, 0.7);
