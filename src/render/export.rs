use std::path::{Path, PathBuf};
use crate::error::PlotError;

/// Extension every saved figure gets, whatever the user typed.
pub const IMAGE_EXTENSION: &str = "png";

/// Replace any extension on `path` with `.png`.
pub fn normalize_output_path(path: &Path) -> PathBuf {
    path.with_extension(IMAGE_EXTENSION)
}

/// Tightly packed RGBA pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaPixels {
    pub width: usize,
    pub height: usize,
    pub bytes: Vec<u8>,
}

/// Crop a viewport screenshot to `rect`, given in points.
pub fn crop_screenshot(image: &egui::ColorImage, rect: egui::Rect, pixels_per_point: f32) -> RgbaPixels {
    let full_w = image.width();
    let full_h = image.height();
    let x0 = ((rect.left() * pixels_per_point).max(0.0) as usize).min(full_w);
    let y0 = ((rect.top() * pixels_per_point).max(0.0) as usize).min(full_h);
    let x1 = ((rect.right() * pixels_per_point).ceil().max(0.0) as usize).min(full_w);
    let y1 = ((rect.bottom() * pixels_per_point).ceil().max(0.0) as usize).min(full_h);
    let width = x1.saturating_sub(x0);
    let height = y1.saturating_sub(y0);

    let mut bytes = Vec::with_capacity(width * height * 4);
    for row in y0..y1 {
        for col in x0..x1 {
            let c = image.pixels[row * full_w + col];
            bytes.extend_from_slice(&[c.r(), c.g(), c.b(), c.a()]);
        }
    }

    RgbaPixels { width, height, bytes }
}

/// Write pixels to `path` as a PNG image.
pub fn save_png(path: &Path, pixels: &RgbaPixels) -> Result<(), PlotError> {
    let img = image::RgbaImage::from_raw(
        pixels.width as u32,
        pixels.height as u32,
        pixels.bytes.clone(),
    )
    .ok_or_else(|| PlotError::Unexpected("captured image has an inconsistent size".to_string()))?;

    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| PlotError::Unexpected(format!("failed to save image {:?}: {e}", path)))?;

    tracing::info!("Saved figure to {:?}", path);
    Ok(())
}

pub fn copy_to_clipboard(pixels: RgbaPixels) -> Result<(), PlotError> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| PlotError::Unexpected(format!("failed to access clipboard: {e}")))?;
    clipboard
        .set_image(arboard::ImageData {
            width: pixels.width,
            height: pixels.height,
            bytes: std::borrow::Cow::Owned(pixels.bytes),
        })
        .map_err(|e| PlotError::Unexpected(format!("failed to copy to clipboard: {e}")))?;

    tracing::info!("Copied figure to clipboard");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, ColorImage, Rect};

    #[test]
    fn any_extension_becomes_png() {
        assert_eq!(normalize_output_path(Path::new("out/plot.jpg")), PathBuf::from("out/plot.png"));
        assert_eq!(normalize_output_path(Path::new("out/plot")), PathBuf::from("out/plot.png"));
        assert_eq!(normalize_output_path(Path::new("out/plot.png")), PathBuf::from("out/plot.png"));
    }

    fn gradient(width: usize, height: usize) -> ColorImage {
        let rgba: Vec<u8> = (0..width * height)
            .flat_map(|i| [(i % width) as u8, (i / width) as u8, 7, 255])
            .collect();
        ColorImage::from_rgba_unmultiplied([width, height], &rgba)
    }

    #[test]
    fn crop_scales_points_to_pixels() {
        let image = gradient(20, 10);
        let rect = Rect::from_min_max(pos2(2.0, 1.0), pos2(5.0, 3.0));
        let cropped = crop_screenshot(&image, rect, 2.0);

        assert_eq!((cropped.width, cropped.height), (6, 4));
        assert_eq!(cropped.bytes.len(), 6 * 4 * 4);
        // First pixel comes from column 4, row 2.
        assert_eq!(&cropped.bytes[..4], &[4, 2, 7, 255]);
    }

    #[test]
    fn crop_is_clamped_to_the_screenshot() {
        let image = gradient(10, 10);
        let rect = Rect::from_min_max(pos2(-5.0, 8.0), pos2(50.0, 50.0));
        let cropped = crop_screenshot(&image, rect, 1.0);
        assert_eq!((cropped.width, cropped.height), (10, 2));
    }

    #[test]
    fn saved_png_has_the_captured_size() {
        let pixels = crop_screenshot(&gradient(12, 8), Rect::from_min_max(pos2(0.0, 0.0), pos2(12.0, 8.0)), 1.0);
        let path = std::env::temp_dir()
            .join(format!("sectionplot_export_{}.png", std::process::id()));

        save_png(&path, &pixels).unwrap();
        let reopened = image::open(&path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (12, 8));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn inconsistent_buffer_is_unexpected() {
        let pixels = RgbaPixels { width: 4, height: 4, bytes: vec![0; 3] };
        let path = std::env::temp_dir().join("sectionplot_export_bad.png");
        assert!(matches!(save_png(&path, &pixels), Err(PlotError::Unexpected(_))));
    }
}
