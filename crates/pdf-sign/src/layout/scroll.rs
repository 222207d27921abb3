//! Page switching by scrolling past the top or bottom of a page

use crate::constants::EDGE_SCROLL_NOTCHES;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Where the canvas scroll position sits, taken after the frame is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    pub at_top: bool,
    pub at_bottom: bool,
    /// The whole page is visible, nothing to scroll
    pub fits: bool,
}

impl ScrollPosition {
    pub fn from_offsets(offset: f64, viewport_height: f64, content_height: f64) -> Self {
        let fits = content_height <= viewport_height + 1.0;
        Self {
            at_top: fits || offset <= 1.0,
            at_bottom: fits || offset + viewport_height >= content_height - 1.0,
            fits,
        }
    }
}

/// Counts wheel notches pushing against a page edge.
///
/// When the page overflows the canvas, a few consecutive notches at the
/// edge are needed before the page changes, so a normal scroll to the end
/// of a page does not flip it.
#[derive(Debug, Clone)]
pub struct EdgeScroll {
    effort: u32,
    threshold: u32,
}

impl Default for EdgeScroll {
    fn default() -> Self {
        Self::new(EDGE_SCROLL_NOTCHES)
    }
}

impl EdgeScroll {
    pub fn new(threshold: u32) -> Self {
        Self {
            effort: 0,
            threshold: threshold.max(1),
        }
    }

    /// Feed one wheel notch. Returns the direction to change page in, if any.
    pub fn notch(
        &mut self,
        direction: ScrollDirection,
        position: ScrollPosition,
    ) -> Option<ScrollDirection> {
        if position.fits {
            self.effort = 0;
            return Some(direction);
        }

        let at_edge = match direction {
            ScrollDirection::Down => position.at_bottom,
            ScrollDirection::Up => position.at_top,
        };
        if !at_edge {
            self.effort = 0;
            return None;
        }

        self.effort += 1;
        if self.effort >= self.threshold {
            self.effort = 0;
            Some(direction)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        self.effort = 0;
    }

    pub fn effort(&self) -> u32 {
        self.effort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIDDLE: ScrollPosition = ScrollPosition {
        at_top: false,
        at_bottom: false,
        fits: false,
    };

    #[test]
    fn test_position_from_offsets() {
        let top = ScrollPosition::from_offsets(0.0, 600.0, 1650.0);
        assert!(top.at_top && !top.at_bottom && !top.fits);

        let bottom = ScrollPosition::from_offsets(1050.0, 600.0, 1650.0);
        assert!(bottom.at_bottom && !bottom.at_top);

        let fits = ScrollPosition::from_offsets(0.0, 900.0, 850.0);
        assert!(fits.fits && fits.at_top && fits.at_bottom);
    }

    #[test]
    fn test_scrolling_inside_page_resets_effort() {
        let mut edge = EdgeScroll::new(3);
        let bottom = ScrollPosition::from_offsets(1050.0, 600.0, 1650.0);

        assert_eq!(edge.notch(ScrollDirection::Down, bottom), None);
        assert_eq!(edge.effort(), 1);
        assert_eq!(edge.notch(ScrollDirection::Down, MIDDLE), None);
        assert_eq!(edge.effort(), 0);
    }
}
