//! Floating panel placement.
//!
//! The menu tree consumes positioning through the narrow
//! [`PositionProvider`] trait: anchor rectangle in, resolved coordinates
//! out. [`ViewportPositioner`] is the built-in implementation with
//! flip/shift handling; hosts with their own layout engines can supply a
//! different provider.

use crate::geometry::{Point, Rect, Size};

/// The side of the anchor a panel attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// The opposite side, used when flipping an overflowing panel.
    pub fn opposite(self) -> Self {
        match self {
            Side::Top => Side::Bottom,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Whether the panel grows along the horizontal axis from the anchor.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::Left | Side::Right)
    }
}

/// Alignment of the panel along the anchor's cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Align the panel's leading edge with the anchor's leading edge.
    #[default]
    Start,
    /// Align the panel's trailing edge with the anchor's trailing edge.
    End,
}

/// Where a floating panel sits relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub side: Side,
    pub alignment: Alignment,
}

impl Placement {
    /// Below the anchor, leading edges aligned. Default for root menus.
    pub const BOTTOM_START: Self = Self {
        side: Side::Bottom,
        alignment: Alignment::Start,
    };

    /// Right of the anchor, top edges aligned. Default for submenus.
    pub const RIGHT_START: Self = Self {
        side: Side::Right,
        alignment: Alignment::Start,
    };

    /// The placement with the side flipped to its opposite.
    pub fn flipped(self) -> Self {
        Self {
            side: self.side.opposite(),
            alignment: self.alignment,
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::BOTTOM_START
    }
}

/// Options controlling one placement computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementOptions {
    /// Requested placement before flip/shift adjustments.
    pub placement: Placement,
    /// Gap between anchor and panel along the attachment axis.
    pub main_axis_offset: f32,
    /// Slide along the alignment axis (negative values overlap the anchor,
    /// which visually nests submenus with their parent panel).
    pub cross_axis_offset: f32,
    /// Flip to the opposite side when the panel would overflow.
    pub flip: bool,
    /// Clamp the cross axis into the viewport.
    pub shift: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            placement: Placement::BOTTOM_START,
            main_axis_offset: 0.0,
            cross_axis_offset: 0.0,
            flip: true,
            shift: true,
        }
    }
}

/// The outcome of a placement computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPlacement {
    /// Top-left corner of the panel.
    pub position: Point,
    /// The placement actually used (differs from the request after a flip).
    pub placement: Placement,
}

/// Computes where a floating panel goes, given its anchor and size.
///
/// Implementations must be pure: the tree calls `compute` on every open
/// and again on every viewport change while the node stays open.
pub trait PositionProvider {
    /// Resolve a placement within `viewport`.
    fn compute(
        &self,
        anchor: Rect,
        panel: Size,
        options: &PlacementOptions,
        viewport: Rect,
    ) -> ResolvedPlacement;
}

/// Built-in positioner: anchored placement with flip and shift.
///
/// Flip applies when the panel overflows the viewport on the attachment
/// axis and the opposite side has room. Shift then clamps the cross axis
/// so the panel stays inside the viewport.
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportPositioner;

impl PositionProvider for ViewportPositioner {
    fn compute(
        &self,
        anchor: Rect,
        panel: Size,
        options: &PlacementOptions,
        viewport: Rect,
    ) -> ResolvedPlacement {
        let mut placement = options.placement;
        let mut position = anchored_position(anchor, panel, placement, options);

        if options.flip && overflows_main_axis(position, panel, placement.side, viewport) {
            let flipped = placement.flipped();
            let flipped_position = anchored_position(anchor, panel, flipped, options);
            if !overflows_main_axis(flipped_position, panel, flipped.side, viewport) {
                placement = flipped;
                position = flipped_position;
            }
        }

        if options.shift {
            position = shift_cross_axis(position, panel, placement.side, viewport);
        }

        ResolvedPlacement {
            position,
            placement,
        }
    }
}

/// Panel top-left for a placement, before any adjustment.
fn anchored_position(
    anchor: Rect,
    panel: Size,
    placement: Placement,
    options: &PlacementOptions,
) -> Point {
    let main = options.main_axis_offset;
    let cross = options.cross_axis_offset;

    let main_coord = match placement.side {
        Side::Bottom => anchor.bottom() + main,
        Side::Top => anchor.top() - panel.height - main,
        Side::Right => anchor.right() + main,
        Side::Left => anchor.left() - panel.width - main,
    };

    let cross_coord = if placement.side.is_horizontal() {
        match placement.alignment {
            Alignment::Start => anchor.top() + cross,
            Alignment::End => anchor.bottom() - panel.height - cross,
        }
    } else {
        match placement.alignment {
            Alignment::Start => anchor.left() + cross,
            Alignment::End => anchor.right() - panel.width - cross,
        }
    };

    if placement.side.is_horizontal() {
        Point::new(main_coord, cross_coord)
    } else {
        Point::new(cross_coord, main_coord)
    }
}

/// Whether the panel sticks out of the viewport on the attachment axis.
fn overflows_main_axis(position: Point, panel: Size, side: Side, viewport: Rect) -> bool {
    match side {
        Side::Bottom => position.y + panel.height > viewport.bottom(),
        Side::Top => position.y < viewport.top(),
        Side::Right => position.x + panel.width > viewport.right(),
        Side::Left => position.x < viewport.left(),
    }
}

/// Clamp the cross axis so the panel stays inside the viewport.
fn shift_cross_axis(position: Point, panel: Size, side: Side, viewport: Rect) -> Point {
    if side.is_horizontal() {
        let max_y = viewport.bottom() - panel.height;
        Point::new(position.x, position.y.clamp(viewport.top(), max_y.max(viewport.top())))
    } else {
        let max_x = viewport.right() - panel.width;
        Point::new(position.x.clamp(viewport.left(), max_x.max(viewport.left())), position.y)
    }
}
