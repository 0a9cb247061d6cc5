//! Hover-intent detection for nested triggers.
//!
//! Nested nodes open on hover only after a short debounce (default
//! 75 ms); a pointer that leaves the trigger before expiry never opens
//! the node. Once open, the pointer must be allowed to cross the gap
//! between trigger and panel without closing anything: the
//! [`SafePolygon`] spanned from the pointer's exit point to the panel's
//! near edge suppresses close-on-leave while the pointer stays inside it.
//! A sample outside the polygon arms a grace timer that closes the node
//! on expiry unless the pointer reaches the panel or re-enters the
//! polygon first. Leaving the panel itself arms the same grace timer,
//! with the polygon re-spanned back toward the trigger so the return
//! transit stays safe.
//!
//! Root nodes ignore hover entirely; only clicks open them.

use std::time::Duration;

use cascade_core::TimerId;

use crate::geometry::{Point, Rect};
use crate::placement::Side;

/// Debounce before a hovered nested trigger opens its node.
pub const DEFAULT_OPEN_DELAY: Duration = Duration::from_millis(75);

/// How long the pointer may linger outside the safe polygon before the
/// node closes.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(300);

/// The region between a trigger and its open panel within which pointer
/// movement does not count as leaving.
///
/// Spanned as a triangle from the pointer's exit point to the two corners
/// of the panel edge facing the trigger.
#[derive(Debug, Clone, PartialEq)]
pub struct SafePolygon {
    vertices: [Point; 3],
}

impl SafePolygon {
    /// Build the polygon for a pointer leaving at `exit` toward a panel
    /// attached on `side` of the trigger.
    pub fn new(exit: Point, panel: Rect, side: Side) -> Self {
        // The near edge is the panel edge facing back toward the trigger.
        let (a, b) = match side {
            Side::Right => (
                Point::new(panel.left(), panel.top()),
                Point::new(panel.left(), panel.bottom()),
            ),
            Side::Left => (
                Point::new(panel.right(), panel.top()),
                Point::new(panel.right(), panel.bottom()),
            ),
            Side::Bottom => (
                Point::new(panel.left(), panel.top()),
                Point::new(panel.right(), panel.top()),
            ),
            Side::Top => (
                Point::new(panel.left(), panel.bottom()),
                Point::new(panel.right(), panel.bottom()),
            ),
        };
        Self {
            vertices: [exit, a, b],
        }
    }

    /// Even-odd containment test.
    pub fn contains(&self, point: Point) -> bool {
        let v = &self.vertices;
        let mut inside = false;
        let mut j = v.len() - 1;
        for i in 0..v.len() {
            let (vi, vj) = (v[i], v[j]);
            if (vi.y > point.y) != (vj.y > point.y)
                && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Per-node hover-intent state.
///
/// Owns no timers itself: the tree schedules against its
/// [`TimerService`](cascade_core::TimerService) and parks the IDs here so
/// close/unmount can cancel them on every exit path.
#[derive(Debug, Default)]
pub struct HoverIntent {
    /// Pending debounced open, if the pointer is resting on the trigger.
    pending_open: Option<TimerId>,
    /// Armed close, if the pointer wandered off the safe path.
    pending_close: Option<TimerId>,
    /// Safe polygon active while the pointer transits toward the panel.
    polygon: Option<SafePolygon>,
}

impl HoverIntent {
    /// Create idle hover state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scheduled open, returning any superseded timer for
    /// cancellation.
    pub fn arm_open(&mut self, timer: TimerId) -> Option<TimerId> {
        self.pending_open.replace(timer)
    }

    /// Take the pending open, if any. The caller cancels it.
    pub fn take_pending_open(&mut self) -> Option<TimerId> {
        self.pending_open.take()
    }

    /// Whether an open is pending. Used when a fired timer checks it is
    /// still the current one.
    pub fn is_open_pending(&self, timer: TimerId) -> bool {
        self.pending_open == Some(timer)
    }

    /// Clear the pending open after it fired.
    pub fn open_fired(&mut self) {
        self.pending_open = None;
    }

    /// Record a scheduled grace close, returning any superseded timer.
    pub fn arm_close(&mut self, timer: TimerId) -> Option<TimerId> {
        self.pending_close.replace(timer)
    }

    /// Take the pending close, if any. The caller cancels it.
    pub fn take_pending_close(&mut self) -> Option<TimerId> {
        self.pending_close.take()
    }

    /// Whether the given close timer is still current.
    pub fn is_close_pending(&self, timer: TimerId) -> bool {
        self.pending_close == Some(timer)
    }

    /// Whether any grace close is armed.
    pub fn has_pending_close(&self) -> bool {
        self.pending_close.is_some()
    }

    /// Clear the pending close after it fired.
    pub fn close_fired(&mut self) {
        self.pending_close = None;
    }

    /// Activate a safe polygon for the current transit.
    pub fn set_polygon(&mut self, polygon: SafePolygon) {
        self.polygon = Some(polygon);
    }

    /// The active safe polygon, if any.
    pub fn polygon(&self) -> Option<&SafePolygon> {
        self.polygon.as_ref()
    }

    /// Drop the safe polygon (pointer reached the panel, or node closed).
    pub fn clear_polygon(&mut self) {
        self.polygon = None;
    }

    /// Reset everything, returning timers the caller must cancel.
    pub fn reset(&mut self) -> (Option<TimerId>, Option<TimerId>) {
        self.polygon = None;
        (self.pending_open.take(), self.pending_close.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_covers_gap_toward_right_panel() {
        // Trigger around x=100..180, panel opens at x=200.
        let exit = Point::new(180.0, 115.0);
        let panel = Rect::new(200.0, 100.0, 160.0, 180.0);
        let polygon = SafePolygon::new(exit, panel, Side::Right);

        // Straight toward the panel: safe.
        assert!(polygon.contains(Point::new(190.0, 115.0)));
        // Diagonal but still between exit point and panel edge: safe.
        assert!(polygon.contains(Point::new(195.0, 150.0)));
        // Far above the transit corridor: unsafe.
        assert!(!polygon.contains(Point::new(190.0, 20.0)));
        // Moving backwards away from the panel: unsafe.
        assert!(!polygon.contains(Point::new(100.0, 115.0)));
    }

    #[test]
    fn polygon_covers_gap_toward_bottom_panel() {
        let exit = Point::new(140.0, 80.0);
        let panel = Rect::new(100.0, 100.0, 200.0, 150.0);
        let polygon = SafePolygon::new(exit, panel, Side::Bottom);

        assert!(polygon.contains(Point::new(140.0, 95.0)));
        assert!(!polygon.contains(Point::new(400.0, 95.0)));
    }

    #[test]
    fn arming_replaces_previous_timer() {
        let mut hover = HoverIntent::new();
        let mut service = cascade_core::TimerService::new();
        let now = std::time::Instant::now();

        let first = service.schedule(now, DEFAULT_OPEN_DELAY);
        assert_eq!(hover.arm_open(first), None);

        let second = service.schedule(now, DEFAULT_OPEN_DELAY);
        // The superseded timer comes back so the caller can cancel it.
        assert_eq!(hover.arm_open(second), Some(first));
        assert!(hover.is_open_pending(second));
        assert!(!hover.is_open_pending(first));
    }

    #[test]
    fn reset_returns_all_pending_timers() {
        let mut hover = HoverIntent::new();
        let mut service = cascade_core::TimerService::new();
        let now = std::time::Instant::now();

        let open = service.schedule(now, DEFAULT_OPEN_DELAY);
        let close = service.schedule(now, DEFAULT_GRACE_PERIOD);
        hover.arm_open(open);
        hover.arm_close(close);
        hover.set_polygon(SafePolygon::new(
            Point::ZERO,
            Rect::new(10.0, 0.0, 10.0, 10.0),
            Side::Right,
        ));

        let (pending_open, pending_close) = hover.reset();
        assert_eq!(pending_open, Some(open));
        assert_eq!(pending_close, Some(close));
        assert!(hover.polygon().is_none());
    }
}
