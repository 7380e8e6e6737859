//! Placement of the tag reference popup and the popover menus.
//!
//! Coordinates are viewport pixels with the origin at the top-left corner.
//! The popup top is not clamped: with a reference element close to the top of
//! the viewport and a tall popup, the fallback position can be negative.

use serde::{Deserialize, Serialize};

/// An element's bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxRect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxRect {
    #[must_use]
    pub const fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Top-left corner of a placed popup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayPosition {
    pub top: f64,
    pub left: f64,
}

/// Popup placement geometry.
///
/// # Examples
///
/// ```
/// use versenav::overlay::{BoxRect, OverlayPositioner};
///
/// let positioner = OverlayPositioner::default();
/// let reference = BoxRect::new(480.0, 10.0, 300.0, 20.0);
/// let next = BoxRect::new(500.0, 10.0, 300.0, 20.0);
/// let viewport = BoxRect::new(0.0, 0.0, 1200.0, 900.0);
///
/// let position = positioner.place(&reference, Some(&next), &viewport, 1200.0);
/// assert_eq!(position.top, 507.0);
/// assert_eq!(position.left, 500.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPositioner {
    pub popup_height: f64,
    pub popup_width: f64,
    pub right_margin: f64,
    /// Offset below the element that follows the reference.
    pub gap: f64,
    /// Offset below a menu button.
    pub menu_offset: f64,
}

impl Default for OverlayPositioner {
    fn default() -> Self {
        Self {
            popup_height: 240.0,
            popup_width: 620.0,
            right_margin: 80.0,
            gap: 7.0,
            menu_offset: 12.0,
        }
    }
}

impl OverlayPositioner {
    /// Places the popup below the element following `reference`, or directly
    /// above `reference` when it would not fit inside `list_viewport`.
    ///
    /// A missing `next` (reference is the last element) places relative to
    /// `reference` itself. The popup is always right-aligned in the window.
    #[must_use]
    pub fn place(
        &self,
        reference: &BoxRect,
        next: Option<&BoxRect>,
        list_viewport: &BoxRect,
        window_width: f64,
    ) -> OverlayPosition {
        let next = next.unwrap_or(reference);
        let candidate_top = next.top + self.gap;

        let top = if candidate_top + self.popup_height < list_viewport.bottom() {
            candidate_top
        } else {
            reference.top - self.popup_height
        };

        if top < 0.0 {
            tracing::debug!(top, "popup placed above the viewport edge");
        }

        OverlayPosition {
            top,
            left: window_width - self.popup_width - self.right_margin,
        }
    }

    /// Position of a popover menu opened from `button`.
    #[must_use]
    pub fn menu_position(&self, button: &BoxRect) -> OverlayPosition {
        OverlayPosition {
            top: button.top + button.height + self.menu_offset,
            left: button.left,
        }
    }
}
