//! Cut a region out of a full-output PNG.

use std::io::Cursor;

use cairo::{Context, Format, ImageSurface};

use crate::capture::types::{CaptureError, CaptureRegion};

/// Crops `png` to `region`.
///
/// The image is assumed to cover the region's output. Its pixel size divided
/// by the output's logical width gives the scale; without output geometry the
/// image is treated as unscaled and anchored at the origin.
pub fn crop_png(png: &[u8], region: &CaptureRegion) -> Result<Vec<u8>, CaptureError> {
    let source = ImageSurface::create_from_png(&mut Cursor::new(png))
        .map_err(|e| CaptureError::ImageError(format!("Failed to decode screenshot: {}", e)))?;

    let (origin_x, origin_y, scale) = match region.output {
        Some(output) if output.width > 0 => (
            output.x,
            output.y,
            f64::from(source.width()) / f64::from(output.width),
        ),
        _ => (0, 0, 1.0),
    };

    let left = (f64::from(region.x - origin_x) * scale).round().max(0.0);
    let top = (f64::from(region.y - origin_y) * scale).round().max(0.0);
    let right = (f64::from(region.x - origin_x + region.width as i32) * scale)
        .round()
        .min(f64::from(source.width()));
    let bottom = (f64::from(region.y - origin_y + region.height as i32) * scale)
        .round()
        .min(f64::from(source.height()));

    if right <= left || bottom <= top {
        return Err(CaptureError::ImageError(format!(
            "Region {} lies outside the captured image ({}x{})",
            region.grim_geometry(),
            source.width(),
            source.height()
        )));
    }

    let width = (right - left) as i32;
    let height = (bottom - top) as i32;
    log::debug!(
        "Cropping {}x{} at ({}, {}) from {}x{} screenshot (scale {:.2})",
        width,
        height,
        left,
        top,
        source.width(),
        source.height(),
        scale
    );

    let target = ImageSurface::create(Format::ARgb32, width, height)
        .map_err(|e| CaptureError::ImageError(format!("Failed to create surface: {}", e)))?;
    {
        let ctx = Context::new(&target)
            .map_err(|e| CaptureError::ImageError(format!("Failed to create context: {}", e)))?;
        ctx.set_source_surface(&source, -left, -top)
            .map_err(|e| CaptureError::ImageError(format!("Failed to set source: {}", e)))?;
        ctx.paint()
            .map_err(|e| CaptureError::ImageError(format!("Failed to paint crop: {}", e)))?;
    }
    target.flush();

    let mut encoded = Vec::new();
    target
        .write_to_png(&mut encoded)
        .map_err(|e| CaptureError::ImageError(format!("Failed to encode PNG: {}", e)))?;
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::types::OutputGeometry;

    /// 200x100 PNG: left half red, right half blue.
    fn two_tone_png() -> Vec<u8> {
        let surface = ImageSurface::create(Format::ARgb32, 200, 100).unwrap();
        {
            let ctx = Context::new(&surface).unwrap();
            ctx.set_source_rgb(1.0, 0.0, 0.0);
            ctx.rectangle(0.0, 0.0, 100.0, 100.0);
            ctx.fill().unwrap();
            ctx.set_source_rgb(0.0, 0.0, 1.0);
            ctx.rectangle(100.0, 0.0, 100.0, 100.0);
            ctx.fill().unwrap();
        }
        let mut png = Vec::new();
        surface.write_to_png(&mut png).unwrap();
        png
    }

    fn decode(png: &[u8]) -> ImageSurface {
        ImageSurface::create_from_png(&mut Cursor::new(png)).unwrap()
    }

    /// Returns (r, g, b) of pixel (x, y) in an ARGB32 surface.
    fn pixel(surface: &mut ImageSurface, x: usize, y: usize) -> (u8, u8, u8) {
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let offset = y * stride + x * 4;
        (data[offset + 2], data[offset + 1], data[offset])
    }

    #[test]
    fn crops_in_logical_coordinates_with_scale() {
        // Output is 100x50 logical, image is 200x100 physical: scale 2.
        let region = CaptureRegion {
            x: 1040,
            y: 10,
            width: 20,
            height: 20,
            output: Some(OutputGeometry {
                x: 1000,
                y: 0,
                width: 100,
                height: 50,
            }),
        };
        let cropped = crop_png(&two_tone_png(), &region).unwrap();
        let mut surface = decode(&cropped);
        assert_eq!((surface.width(), surface.height()), (40, 40));
        assert_eq!(pixel(&mut surface, 5, 5), (255, 0, 0));
        assert_eq!(pixel(&mut surface, 35, 35), (0, 0, 255));
    }

    #[test]
    fn region_outside_image_is_an_error() {
        let region = CaptureRegion {
            x: 500,
            y: 500,
            width: 10,
            height: 10,
            output: None,
        };
        assert!(crop_png(&two_tone_png(), &region).is_err());
    }
}
