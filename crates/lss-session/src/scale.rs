//! Screen scaling of the printed page.

use std::cell::Cell;

/// Caches the first measured page width and derives the scale factor that
/// fits the page into the viewport.
#[derive(Debug, Default)]
pub struct PageScale {
    page_width: Cell<Option<f64>>,
}

impl PageScale {
    pub fn page_width(&self) -> Option<f64> {
        self.page_width.get()
    }

    /// Record a measurement and return `viewport_width / page_width`.
    ///
    /// Only the first positive page width is kept; later measurements are
    /// taken at the scaled size and would compound. Returns `None` until a
    /// usable width has been seen.
    pub fn update(&self, measured_page_width: f64, viewport_width: f64) -> Option<f64> {
        if self.page_width.get().is_none()
            && measured_page_width > 0.0
            && measured_page_width.is_finite()
        {
            self.page_width.set(Some(measured_page_width));
        }
        let page_width = self.page_width.get()?;
        (viewport_width > 0.0).then(|| viewport_width / page_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_width_is_cached() {
        let scale = PageScale::default();
        assert_eq!(scale.update(0.0, 800.0), None);
        assert_eq!(scale.update(400.0, 800.0), Some(2.0));
        assert_eq!(scale.update(800.0, 1200.0), Some(3.0));
        assert_eq!(scale.page_width(), Some(400.0));
    }
}
