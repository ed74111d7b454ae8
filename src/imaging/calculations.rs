//! Pure dimension math, testable without any images.

/// Output dimensions for a resize request.
///
/// Without a target width the source dimensions are kept. With one, the
/// height follows the source aspect ratio, rounded to the nearest pixel
/// and never below 1: 4000x3000 at width 800 gives 800x600.
pub fn target_dimensions(source: (u32, u32), target_width: Option<u32>) -> (u32, u32) {
    let (src_w, src_h) = source;
    match target_width {
        None => source,
        Some(w) => {
            let h = (src_h as f64 * w as f64 / src_w as f64).round().max(1.0) as u32;
            (w, h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_width_keeps_source() {
        assert_eq!(target_dimensions((123, 45), None), (123, 45));
    }

    #[test]
    fn downscale_preserves_aspect() {
        assert_eq!(target_dimensions((1920, 1080), Some(640)), (640, 360));
        assert_eq!(target_dimensions((1000, 1500), Some(400)), (400, 600));
    }

    #[test]
    fn upscale_allowed() {
        assert_eq!(target_dimensions((100, 50), Some(300)), (300, 150));
    }

    #[test]
    fn height_rounds_to_nearest() {
        // 100 * 2 / 3 = 66.67
        assert_eq!(target_dimensions((3, 100), Some(2)), (2, 67));
        // 10 * 7 / 4 = 17.5
        assert_eq!(target_dimensions((4, 10), Some(7)), (7, 18));
    }

    #[test]
    fn height_never_zero() {
        assert_eq!(target_dimensions((10000, 10), Some(1)), (1, 1));
    }
}
