//! Per-menu node state.
//!
//! A [`MenuNode`] is one menu in the tree: the root attached to its
//! trigger, or a nested panel attached to an item of its parent. Nodes
//! live in the tree's arena and are only mutated through
//! [`MenuTree`](crate::tree::MenuTree) methods; the struct itself is a
//! plain state record.

use slotmap::new_key_type;

use cascade_core::TimerId;

use crate::bus::SubscriptionId;
use crate::geometry::{Rect, Size};
use crate::hover::HoverIntent;
use crate::item::{ItemId, ItemRegistry};
use crate::navigation::Orientation;
use crate::placement::ResolvedPlacement;
use crate::typeahead::TypeaheadMatcher;

new_key_type! {
    /// A unique identifier for a mounted menu node.
    ///
    /// Stable for the lifetime of the mount; a remounted menu gets a fresh
    /// key, so stale identifiers can never address a new node.
    pub struct MenuNodeId;
}

/// State record for one menu node.
#[derive(Debug)]
pub(crate) struct MenuNode {
    /// Text label (the trigger caption; submenu nodes share it with their
    /// parent item).
    pub(crate) label: String,
    /// The enclosing node, or `None` for the root.
    pub(crate) parent: Option<MenuNodeId>,
    /// The item in the parent's registry that triggers this node.
    pub(crate) parent_item: Option<ItemId>,
    /// Whether the node's floating panel is live.
    pub(crate) open: bool,
    /// The highlighted item, if any.
    pub(crate) active_index: Option<usize>,
    /// Whether keyboard focus currently lives inside this node's subtree.
    pub(crate) has_focus_inside: bool,
    /// Items mounted under this node, in declaration order.
    pub(crate) items: ItemRegistry,
    /// Layout axis of this node's items.
    pub(crate) orientation: Orientation,
    /// Typeahead buffer for this node's panel.
    pub(crate) typeahead: TypeaheadMatcher,
    /// Pending typeahead idle-reset timer.
    pub(crate) typeahead_reset: Option<TimerId>,
    /// Hover-intent state (nested nodes only; unused on the root).
    pub(crate) hover: HoverIntent,
    /// Bus subscriptions held by this node, removed at unmount.
    pub(crate) subscriptions: Vec<SubscriptionId>,
    /// Trigger bounds reported by the host, used as the placement anchor.
    pub(crate) anchor: Rect,
    /// Measured panel size reported by the host.
    pub(crate) panel_size: Size,
    /// Placement of the open panel, recomputed on viewport change.
    pub(crate) resolved: Option<ResolvedPlacement>,
}

impl MenuNode {
    pub(crate) fn new(
        label: String,
        parent: Option<MenuNodeId>,
        parent_item: Option<ItemId>,
        orientation: Orientation,
    ) -> Self {
        Self {
            label,
            parent,
            parent_item,
            open: false,
            active_index: None,
            has_focus_inside: false,
            items: ItemRegistry::new(),
            orientation,
            typeahead: TypeaheadMatcher::new(),
            typeahead_reset: None,
            hover: HoverIntent::new(),
            subscriptions: Vec::new(),
            anchor: Rect::ZERO,
            panel_size: Size::new(0.0, 0.0),
            resolved: None,
        }
    }

    /// Whether this node is a submenu of another node.
    pub(crate) fn is_nested(&self) -> bool {
        self.parent.is_some()
    }

    /// Re-validate `active_index` after a registry mutation.
    pub(crate) fn revalidate_active_index(&mut self) {
        self.active_index = self.items.clamp_index(self.active_index);
    }

    /// The open panel's rectangle, if the node is open.
    pub(crate) fn panel_rect(&self) -> Option<Rect> {
        let resolved = self.resolved?;
        Some(Rect {
            origin: resolved.position,
            size: self.panel_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::item::MenuItem;

    #[test]
    fn nested_iff_parent_set() {
        let mut arena: slotmap::SlotMap<MenuNodeId, ()> = slotmap::SlotMap::with_key();
        let parent = arena.insert(());

        let root = MenuNode::new("File".into(), None, None, Orientation::Vertical);
        assert!(!root.is_nested());

        let nested = MenuNode::new(
            "Copy as".into(),
            Some(parent),
            None,
            Orientation::Vertical,
        );
        assert!(nested.is_nested());
    }

    #[test]
    fn revalidation_tracks_registry_shrink() {
        let mut node = MenuNode::new("Edit".into(), None, None, Orientation::Vertical);
        node.items.register(MenuItem::new("Cut"));
        let copy = node.items.register(MenuItem::new("Copy"));
        node.active_index = Some(1);

        node.items.unregister(copy);
        node.revalidate_active_index();
        assert_eq!(node.active_index, Some(0));

        let cut = node.items.id_at(0).unwrap();
        node.items.unregister(cut);
        node.revalidate_active_index();
        assert_eq!(node.active_index, None);
    }
}
