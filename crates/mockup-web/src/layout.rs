//! Canvas sizing

use mockup_core::ViewportSize;

/// Backing-store size for a canvas laid out at `css_width` x `css_height`
///
/// Scales by the device pixel ratio (falling back to 1 when it is not a
/// positive number) and never returns a zero dimension.
pub fn physical_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> ViewportSize {
    let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio
    } else {
        1.0
    };
    let scale = |css: f64| {
        let css = if css.is_finite() { css.max(0.0) } else { 0.0 };
        ((css * ratio).round() as u32).max(1)
    };
    ViewportSize::new(scale(css_width), scale(css_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scales_by_pixel_ratio() {
        assert_eq!(physical_size(400.0, 300.0, 2.0), ViewportSize::new(800, 600));
        assert_eq!(physical_size(333.5, 100.0, 1.5), ViewportSize::new(500, 150));
    }

    #[test]
    fn test_invalid_ratio_falls_back_to_one() {
        assert_eq!(physical_size(640.0, 480.0, 0.0), ViewportSize::new(640, 480));
        assert_eq!(physical_size(640.0, 480.0, f64::NAN), ViewportSize::new(640, 480));
    }

    #[test]
    fn test_collapsed_container_keeps_one_pixel() {
        assert_eq!(physical_size(0.0, -5.0, 2.0), ViewportSize::new(1, 1));
    }
}
