//! Tree-wide configuration.

use std::time::Duration;

use crate::geometry::Rect;
use crate::hover::{DEFAULT_GRACE_PERIOD, DEFAULT_OPEN_DELAY};
use crate::navigation::Orientation;
use crate::placement::{Placement, PlacementOptions};
use crate::typeahead::DEFAULT_RESET_DELAY;

/// Configuration for one [`MenuTree`](crate::tree::MenuTree).
///
/// The defaults match the common desktop-menu feel: panels drop below the
/// root trigger with a small gap, submenus fly out to the right slightly
/// overlapping their parent panel, and hover intent uses a 75 ms debounce.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use cascade_menu::{MenuConfig, Orientation};
///
/// let config = MenuConfig::new()
///     .with_root_orientation(Orientation::Horizontal)
///     .with_open_delay(Duration::from_millis(120));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MenuConfig {
    /// Debounce before a hovered nested trigger opens.
    pub(crate) open_delay: Duration,
    /// Grace period outside the safe polygon before an open node closes.
    pub(crate) grace_period: Duration,
    /// Idle timeout before the typeahead buffer resets.
    pub(crate) typeahead_reset_delay: Duration,
    /// Layout axis of the root node's items.
    pub(crate) root_orientation: Orientation,
    /// Placement of the root panel relative to its trigger.
    pub(crate) root_placement: PlacementOptions,
    /// Placement of nested panels relative to their parent item.
    pub(crate) nested_placement: PlacementOptions,
    /// Initial viewport for flip/shift, until the host reports one.
    pub(crate) viewport: Rect,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            open_delay: DEFAULT_OPEN_DELAY,
            grace_period: DEFAULT_GRACE_PERIOD,
            typeahead_reset_delay: DEFAULT_RESET_DELAY,
            root_orientation: Orientation::Vertical,
            root_placement: PlacementOptions {
                placement: Placement::BOTTOM_START,
                main_axis_offset: 4.0,
                ..Default::default()
            },
            nested_placement: PlacementOptions {
                placement: Placement::RIGHT_START,
                cross_axis_offset: -4.0,
                ..Default::default()
            },
            // Unbounded until the host calls `set_viewport`.
            viewport: Rect::new(0.0, 0.0, f32::INFINITY, f32::INFINITY),
        }
    }
}

impl MenuConfig {
    /// Create a configuration with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hover-open debounce using builder pattern.
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    /// Set the hover-close grace period using builder pattern.
    pub fn with_grace_period(mut self, period: Duration) -> Self {
        self.grace_period = period;
        self
    }

    /// Set the typeahead idle timeout using builder pattern.
    pub fn with_typeahead_reset_delay(mut self, delay: Duration) -> Self {
        self.typeahead_reset_delay = delay;
        self
    }

    /// Set the root node's layout axis using builder pattern.
    pub fn with_root_orientation(mut self, orientation: Orientation) -> Self {
        self.root_orientation = orientation;
        self
    }

    /// Override root panel placement using builder pattern.
    pub fn with_root_placement(mut self, options: PlacementOptions) -> Self {
        self.root_placement = options;
        self
    }

    /// Override nested panel placement using builder pattern.
    pub fn with_nested_placement(mut self, options: PlacementOptions) -> Self {
        self.nested_placement = options;
        self
    }

    /// Set the initial viewport using builder pattern.
    pub fn with_viewport(mut self, viewport: Rect) -> Self {
        self.viewport = viewport;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::Side;

    #[test]
    fn defaults_match_desktop_menu_conventions() {
        let config = MenuConfig::default();

        assert_eq!(config.open_delay, Duration::from_millis(75));
        assert_eq!(config.root_placement.placement, Placement::BOTTOM_START);
        assert_eq!(config.root_placement.main_axis_offset, 4.0);
        assert_eq!(config.nested_placement.placement.side, Side::Right);
        assert_eq!(config.nested_placement.cross_axis_offset, -4.0);
    }

    #[test]
    fn builders_override_defaults() {
        let config = MenuConfig::new()
            .with_open_delay(Duration::from_millis(120))
            .with_root_orientation(Orientation::Horizontal);

        assert_eq!(config.open_delay, Duration::from_millis(120));
        assert_eq!(config.root_orientation, Orientation::Horizontal);
    }
}
