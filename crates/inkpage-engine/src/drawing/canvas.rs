//! Canvas height heuristics that emulate unbounded vertical drawing space

use crate::models::Point;

/// Growth triggers when the pointer comes within this share of a viewport
/// of the canvas bottom. On an unexpanded canvas that is the lower half.
pub const EXPAND_TRIGGER_RATIO: f64 = 0.5;
/// First expansion sets the canvas to this many viewports
pub const FIRST_EXPANSION_FACTOR: f64 = 2.0;
/// Later expansions multiply the explicit height by this
pub const EXPANSION_GROWTH_FACTOR: f64 = 1.5;
/// Room kept below the lowest ink when shrinking, in viewports
pub const SHRINK_PADDING_RATIO: f64 = 0.5;
/// A shrink must save more than this share of a viewport to apply
pub const SHRINK_HYSTERESIS_RATIO: f64 = 0.2;

/// Height of the scrollable drawing surface.
///
/// `None` means "fit the viewport" and holds until the first expansion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CanvasGeometry {
    height: Option<f64>,
}

impl CanvasGeometry {
    pub fn height(&self) -> Option<f64> {
        self.height
    }

    pub fn effective_height(&self, viewport_height: f64) -> f64 {
        self.height.unwrap_or(viewport_height)
    }

    /// Grow when drawing reaches the lower region. Returns the new height.
    pub fn maybe_expand(&mut self, point: Point, viewport_height: f64) -> Option<f64> {
        let current = self.effective_height(viewport_height);
        if point.y <= current - EXPAND_TRIGGER_RATIO * viewport_height {
            return None;
        }
        let grown = match self.height {
            None => FIRST_EXPANSION_FACTOR * viewport_height,
            Some(height) => height * EXPANSION_GROWTH_FACTOR,
        };
        log::debug!("Expanding canvas from {current} to {grown}");
        self.height = Some(grown);
        Some(grown)
    }

    /// Shrink toward the ink after an erase. Returns the new height if applied.
    pub fn maybe_shrink(&mut self, content_max_y: f64, viewport_height: f64) -> Option<f64> {
        let current = self.effective_height(viewport_height);
        let target = shrink_target(content_max_y, viewport_height, current)?;
        log::debug!("Shrinking canvas from {current} to {target}");
        self.height = Some(target);
        Some(target)
    }
}

/// The height a canvas should shrink to, or `None` if the saving is inside
/// the hysteresis band (or there is nothing to save)
pub fn shrink_target(
    content_max_y: f64,
    viewport_height: f64,
    current_canvas_height: f64,
) -> Option<f64> {
    let candidate = viewport_height.max(content_max_y + SHRINK_PADDING_RATIO * viewport_height);
    let saving = current_canvas_height - candidate;
    (candidate < current_canvas_height && saving > SHRINK_HYSTERESIS_RATIO * viewport_height)
        .then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const VIEWPORT: f64 = 800.0;

    #[test]
    fn test_first_expansion_doubles_viewport() {
        let mut canvas = CanvasGeometry::default();

        assert_eq!(canvas.maybe_expand(Point::new(0.0, 400.0), VIEWPORT), None);
        assert_eq!(canvas.height(), None);

        assert_eq!(
            canvas.maybe_expand(Point::new(0.0, 401.0), VIEWPORT),
            Some(1600.0)
        );
    }

    #[test]
    fn test_later_expansions_multiply() {
        let mut canvas = CanvasGeometry::default();
        canvas.maybe_expand(Point::new(0.0, 500.0), VIEWPORT);

        // Still well above the new bottom region
        assert_eq!(canvas.maybe_expand(Point::new(0.0, 500.0), VIEWPORT), None);
        assert_eq!(
            canvas.maybe_expand(Point::new(0.0, 1250.0), VIEWPORT),
            Some(2400.0)
        );
        assert_eq!(canvas.height(), Some(2400.0));
    }

    #[rstest]
    // Trigger line sits half a viewport above the 1600 bottom
    #[case(500.0, None)]
    #[case(1200.0, None)]
    #[case(1201.0, Some(2400.0))]
    fn test_expanded_canvas_trigger_follows_bottom(#[case] y: f64, #[case] expected: Option<f64>) {
        let mut canvas = CanvasGeometry::default();
        canvas.maybe_expand(Point::new(0.0, 401.0), VIEWPORT);
        assert_eq!(canvas.height(), Some(1600.0));

        assert_eq!(canvas.maybe_expand(Point::new(0.0, y), VIEWPORT), expected);
    }

    #[rstest]
    // candidate max(800, 100 + 400) = 800, saving 1600 - 800 > 160
    #[case(100.0, 1600.0, Some(800.0))]
    // candidate 1000 + 400 = 1400, saving 200 > 160
    #[case(1000.0, 1600.0, Some(1400.0))]
    // candidate 1100 + 400 = 1500, saving 100 inside hysteresis band
    #[case(1100.0, 1600.0, None)]
    // candidate above current
    #[case(1500.0, 1600.0, None)]
    fn test_shrink_target(
        #[case] content_max_y: f64,
        #[case] current: f64,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(shrink_target(content_max_y, VIEWPORT, current), expected);
    }

    #[test]
    fn test_unexpanded_canvas_never_shrinks() {
        let mut canvas = CanvasGeometry::default();
        assert_eq!(canvas.maybe_shrink(0.0, VIEWPORT), None);
        assert_eq!(canvas.height(), None);
    }
}
