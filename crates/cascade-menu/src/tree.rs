//! The menu tree.
//!
//! [`MenuTree`] owns every node descending from one root trigger: the
//! arena they live in, the event bus they coordinate over, the timer
//! service driving hover and typeahead delays, the positioner, and the
//! focus manager. All cross-node transitions are tree methods; a node is
//! never mutated except through its tree.
//!
//! The tree is host-driven and single-threaded. Pointer and keyboard
//! input arrive as method calls, time advances only through
//! [`MenuTree::tick`], and state is read back through the query surface.
//! Hosts that want push-style notification connect to
//! [`MenuTree::events`], which mirrors every bus broadcast.

use std::collections::HashMap;
use std::time::Instant;

use slotmap::SlotMap;

use cascade_core::{Signal, TimerId, TimerService};

use crate::bus::{TreeBus, TreeEvent, TreeEventKind};
use crate::config::MenuConfig;
use crate::error::{MenuError, MenuResult};
use crate::events::Key;
use crate::focus::{FocusManager, FocusTarget, TrapOptions};
use crate::geometry::{Point, Rect, Size};
use crate::hover::SafePolygon;
use crate::item::{ItemId, MenuItem};
use crate::navigation::{
    NavCommand, NavOutcome, Orientation, command_for_key, compute_next_index,
};
use crate::node::{MenuNode, MenuNodeId};
use crate::placement::{PositionProvider, ResolvedPlacement, ViewportPositioner};
use crate::typeahead::TypeaheadMatcher;

const TREE: &str = "cascade_menu::tree";
const HOVER: &str = "cascade_menu::hover";

/// What a pending timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerPurpose {
    /// Debounced hover open of a nested node.
    HoverOpen(MenuNodeId),
    /// Grace-period close after the pointer left the safe polygon.
    HoverClose(MenuNodeId),
    /// Idle reset of a node's typeahead buffer.
    TypeaheadReset(MenuNodeId),
}

/// A tree of nested floating menus sharing one root trigger.
pub struct MenuTree {
    /// Node arena.
    nodes: SlotMap<MenuNodeId, MenuNode>,
    /// The root node, mounted at construction, never unmounted.
    root: MenuNodeId,
    /// Cross-node coordination bus.
    bus: TreeBus,
    /// Host-facing mirror of bus traffic.
    events: Signal<TreeEvent>,
    /// Pending one-shot timers.
    timers: TimerService,
    /// What each pending timer does; purged with the timer.
    timer_routes: HashMap<TimerId, TimerPurpose>,
    /// Positioning engine.
    positioner: Box<dyn PositionProvider>,
    /// Keyboard focus and trap stack.
    focus: FocusManager,
    /// Open nodes registered for viewport-change repositioning.
    reposition: Vec<MenuNodeId>,
    /// Current viewport for flip/shift.
    viewport: Rect,
    config: MenuConfig,
}

impl MenuTree {
    /// Create a tree with a root node labelled `label`.
    pub fn new(label: impl Into<String>, config: MenuConfig) -> Self {
        let mut tree = Self {
            nodes: SlotMap::with_key(),
            root: MenuNodeId::default(),
            bus: TreeBus::new(),
            events: Signal::new(),
            timers: TimerService::new(),
            timer_routes: HashMap::new(),
            positioner: Box::new(ViewportPositioner),
            focus: FocusManager::new(),
            reposition: Vec::new(),
            viewport: config.viewport,
            config,
        };
        let orientation = tree.config.root_orientation;
        tree.root = tree.mount_node(label.into(), None, None, orientation);
        tree
    }

    /// Swap in a custom positioning engine using builder pattern.
    pub fn with_positioner(mut self, positioner: impl PositionProvider + 'static) -> Self {
        self.positioner = Box::new(positioner);
        self
    }

    // ========================================================================
    // Mount / unmount
    // ========================================================================

    /// Mount a nested menu under `parent`.
    ///
    /// The submenu is also registered as an item of the parent, in
    /// declaration order, so navigation and typeahead see it like any
    /// other entry.
    pub fn add_submenu(
        &mut self,
        parent: MenuNodeId,
        label: impl Into<String>,
    ) -> MenuResult<MenuNodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(MenuError::UnknownNode);
        }
        let label = label.into();
        let child = self.mount_node(label.clone(), Some(parent), None, Orientation::Vertical);
        let item_id = self
            .node_mut(parent)?
            .items
            .register(MenuItem::new(label).with_submenu(child));
        self.node_mut(child)?.parent_item = Some(item_id);
        Ok(child)
    }

    /// Register a plain item under a node.
    pub fn add_item(
        &mut self,
        node: MenuNodeId,
        label: impl Into<String>,
        disabled: bool,
    ) -> MenuResult<ItemId> {
        let item = MenuItem::new(label).with_disabled(disabled);
        Ok(self.node_mut(node)?.items.register(item))
    }

    /// Register an item with an activation callback.
    ///
    /// The callback runs in addition to (never instead of) the tree's own
    /// activation handling.
    pub fn add_item_with(
        &mut self,
        node: MenuNodeId,
        label: impl Into<String>,
        disabled: bool,
        callback: impl FnMut() + 'static,
    ) -> MenuResult<ItemId> {
        let item = MenuItem::new(label)
            .with_disabled(disabled)
            .with_on_activate(callback);
        Ok(self.node_mut(node)?.items.register(item))
    }

    /// Remove an item from a node.
    ///
    /// If the item triggers a submenu, that whole subtree is unmounted.
    /// The node's active index is re-validated against the new registry.
    pub fn remove_item(&mut self, node: MenuNodeId, item: ItemId) -> MenuResult<()> {
        let submenu = self
            .node(node)?
            .items
            .get_by_id(item)
            .ok_or(MenuError::UnknownItem)?
            .submenu();
        if let Some(child) = submenu {
            self.unmount_subtree(child);
        }
        let record = self.node_mut(node)?;
        record.items.unregister(item);
        record.revalidate_active_index();
        Ok(())
    }

    /// Unmount a nested node and its entire subtree.
    ///
    /// Cancels every pending timer, removes every bus subscription, and
    /// unregisters the triggering item from the parent. No events are
    /// emitted; an unmounted node can never be resurrected by later bus
    /// traffic. The root cannot be removed.
    pub fn remove_node(&mut self, node: MenuNodeId) -> MenuResult<()> {
        let record = self.node(node)?;
        let Some(parent) = record.parent else {
            return Err(MenuError::NotNested);
        };
        let parent_item = record.parent_item;

        self.unmount_subtree(node);

        if let Some(item) = parent_item
            && let Some(parent_record) = self.nodes.get_mut(parent)
        {
            parent_record.items.unregister(item);
            parent_record.revalidate_active_index();
        }
        Ok(())
    }

    fn mount_node(
        &mut self,
        label: String,
        parent: Option<MenuNodeId>,
        parent_item: Option<ItemId>,
        orientation: Orientation,
    ) -> MenuNodeId {
        let id = self
            .nodes
            .insert(MenuNode::new(label, parent, parent_item, orientation));
        let activated = self.bus.on(TreeEventKind::ItemActivated, id);
        let opened = self.bus.on(TreeEventKind::NodeOpened, id);
        if let Some(node) = self.nodes.get_mut(id) {
            node.subscriptions = vec![activated, opened];
            node.typeahead =
                TypeaheadMatcher::new().with_reset_delay(self.config.typeahead_reset_delay);
            tracing::debug!(target: TREE, node = ?id, label = %node.label, "node mounted");
        }
        id
    }

    fn unmount_subtree(&mut self, id: MenuNodeId) {
        let children: Vec<MenuNodeId> = self
            .nodes
            .get(id)
            .map(|node| node.items.iter().filter_map(|item| item.submenu()).collect())
            .unwrap_or_default();
        for child in children {
            self.unmount_subtree(child);
        }
        self.unmount_one(id);
    }

    fn unmount_one(&mut self, id: MenuNodeId) {
        let Some(mut node) = self.nodes.remove(id) else {
            return;
        };
        let (pending_open, pending_close) = node.hover.reset();
        let timers: Vec<TimerId> = pending_open
            .into_iter()
            .chain(pending_close)
            .chain(node.typeahead_reset.take())
            .collect();
        for timer in timers {
            self.cancel_timer(timer);
        }
        for subscription in node.subscriptions.drain(..) {
            self.bus.off(subscription);
        }
        self.focus.release(id);
        self.reposition.retain(|&open| open != id);
        tracing::debug!(target: TREE, node = ?id, label = %node.label, "node unmounted");
    }

    // ========================================================================
    // Open / close
    // ========================================================================

    /// Open a node's panel.
    ///
    /// A nested node refuses to open while its parent is closed. Opening
    /// an already-open node is a no-op and emits nothing. On the
    /// closed-to-open transition the panel is placed, a root node traps
    /// focus on its first enabled item, and a `NodeOpened` broadcast
    /// closes any open sibling.
    pub fn open_node(&mut self, id: MenuNodeId) -> MenuResult<()> {
        let record = self.node(id)?;
        if record.open {
            return Ok(());
        }
        let parent = record.parent;
        if let Some(parent) = parent
            && !self.nodes.get(parent).is_some_and(|node| node.open)
        {
            return Err(MenuError::ParentClosed);
        }

        let anchor = record.anchor;
        let panel = record.panel_size;
        let nested = parent.is_some();
        let options = if nested {
            self.config.nested_placement
        } else {
            self.config.root_placement
        };
        let resolved = self.positioner.compute(anchor, panel, &options, self.viewport);

        let record = self.node_mut(id)?;
        record.open = true;
        record.resolved = Some(resolved);
        if !self.reposition.contains(&id) {
            self.reposition.push(id);
        }

        if nested {
            // No trap: focus stays on the parent item until the user
            // navigates into the panel.
        } else {
            let initial = self.first_enabled(id);
            if initial.is_some() {
                self.node_mut(id)?.active_index = initial;
            }
            self.focus.trap(
                id,
                TrapOptions {
                    modal: false,
                    initial_focus: initial,
                    return_focus: true,
                },
            );
        }

        tracing::debug!(target: TREE, node = ?id, ?resolved, "node opened");
        self.emit_tree_event(TreeEvent::NodeOpened { node: id, parent });
        Ok(())
    }

    /// Close a node's panel, descendants first.
    pub fn close_node(&mut self, id: MenuNodeId) -> MenuResult<()> {
        if !self.nodes.contains_key(id) {
            return Err(MenuError::UnknownNode);
        }
        self.close_subtree(id);
        Ok(())
    }

    fn close_subtree(&mut self, id: MenuNodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.open {
            return;
        }
        let children: Vec<MenuNodeId> = node
            .items
            .iter()
            .filter_map(|item| item.submenu())
            .collect();
        for child in children {
            self.close_subtree(child);
        }
        self.close_one(id);
    }

    fn close_one(&mut self, id: MenuNodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if !node.open {
            return;
        }
        let (pending_open, pending_close) = node.hover.reset();
        let timers: Vec<TimerId> = pending_open
            .into_iter()
            .chain(pending_close)
            .chain(node.typeahead_reset.take())
            .collect();
        node.typeahead.reset();
        node.open = false;
        node.active_index = None;
        node.has_focus_inside = false;
        node.resolved = None;

        for timer in timers {
            self.cancel_timer(timer);
        }
        self.reposition.retain(|&open| open != id);
        self.focus.release(id);
        tracing::debug!(target: TREE, node = ?id, "node closed");
    }

    // ========================================================================
    // Activation
    // ========================================================================

    /// Activate the item at `index` under `node`.
    ///
    /// Disabled items are a silent no-op. An item that triggers a submenu
    /// opens it and highlights its first enabled entry. A plain item runs
    /// its host callback and then broadcasts `ItemActivated`, which closes
    /// every node in the tree.
    pub fn activate_item(&mut self, node: MenuNodeId, index: usize) -> MenuResult<()> {
        let item = self
            .node(node)?
            .items
            .get(index)
            .ok_or(MenuError::UnknownItem)?;
        if item.is_disabled() {
            return Ok(());
        }
        if let Some(child) = item.submenu() {
            return self.open_nested_with_focus(child);
        }

        if let Some(item) = self.node_mut(node)?.items.get_mut(index) {
            item.invoke_on_activate();
        }
        tracing::debug!(target: TREE, node = ?node, index, "item activated");
        self.emit_tree_event(TreeEvent::ItemActivated);
        Ok(())
    }

    /// Open a nested node and move the highlight into it.
    fn open_nested_with_focus(&mut self, child: MenuNodeId) -> MenuResult<()> {
        self.open_node(child)?;
        if let Some(index) = self.first_enabled(child) {
            self.node_mut(child)?.active_index = Some(index);
            self.focus.set_focus(FocusTarget::Item { node: child, index });
        }
        Ok(())
    }

    /// Close a nested node and restore the parent item's highlight.
    fn exit_nested(&mut self, id: MenuNodeId) {
        let Some((parent, parent_item)) = self
            .nodes
            .get(id)
            .map(|node| (node.parent, node.parent_item))
        else {
            return;
        };
        let Some(parent) = parent else {
            return;
        };
        self.close_subtree(id);

        let index = parent_item.and_then(|item| {
            self.nodes
                .get(parent)
                .and_then(|node| node.items.index_of(item))
        });
        if let Some(index) = index {
            if let Some(node) = self.nodes.get_mut(parent) {
                node.active_index = Some(index);
            }
            self.focus.set_focus(FocusTarget::Item {
                node: parent,
                index,
            });
        }
    }

    // ========================================================================
    // Keyboard input
    // ========================================================================

    /// Deliver a key press to a node's open panel.
    ///
    /// Navigation keys move the highlight (discarding any typeahead
    /// buffer), `Enter`/`Space` activate the highlighted item, `Escape`
    /// closes a nested node back to its parent item or dismisses the
    /// whole tree from the root, `Tab` dismisses, and printable
    /// characters feed typeahead. Keys delivered to a closed node are
    /// ignored.
    pub fn key_press(&mut self, id: MenuNodeId, key: Key, now: Instant) -> MenuResult<()> {
        let (open, orientation, nested) = {
            let node = self.node(id)?;
            (node.open, node.orientation, node.is_nested())
        };
        if !open {
            return Ok(());
        }

        if key.is_navigation() {
            self.reset_typeahead(id)?;
            let Some(command) = command_for_key(key, orientation, nested) else {
                return Ok(());
            };
            let outcome = {
                let node = self.node(id)?;
                compute_next_index(node.active_index, command, &node.items.nav_entries())
            };
            match outcome {
                NavOutcome::Move(index) => {
                    self.node_mut(id)?.active_index = Some(index);
                    self.focus.set_focus(FocusTarget::Item { node: id, index });
                }
                NavOutcome::OpenNested(index) => {
                    let child = self
                        .node(id)?
                        .items
                        .get(index)
                        .and_then(|item| item.submenu());
                    if let Some(child) = child {
                        self.open_nested_with_focus(child)?;
                    }
                }
                NavOutcome::CloseCurrent => self.exit_nested(id),
                NavOutcome::Unchanged => {}
            }
            return Ok(());
        }

        match key {
            Key::Enter | Key::Space => {
                if let Some(index) = self.node(id)?.active_index {
                    self.activate_item(id, index)?;
                }
            }
            Key::Escape => {
                if nested {
                    self.exit_nested(id);
                } else {
                    self.close_subtree(self.root);
                }
            }
            Key::Tab => self.tab_out(),
            Key::Char(_) => {
                if let Some(ch) = key.printable() {
                    self.typeahead_char(id, ch, now)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn typeahead_char(&mut self, id: MenuNodeId, ch: char, now: Instant) -> MenuResult<()> {
        let matched = {
            let node = self.node_mut(id)?;
            let labels = node.items.typeahead_labels();
            node.typeahead.on_char(now, ch, &labels)
        };

        // Every keystroke restarts the idle-reset window.
        let superseded = self.node_mut(id)?.typeahead_reset.take();
        if let Some(timer) = superseded {
            self.cancel_timer(timer);
        }
        let timer = self.timers.schedule(now, self.config.typeahead_reset_delay);
        self.timer_routes.insert(timer, TimerPurpose::TypeaheadReset(id));
        self.node_mut(id)?.typeahead_reset = Some(timer);

        if let Some(index) = matched {
            self.node_mut(id)?.active_index = Some(index);
            self.focus.set_focus(FocusTarget::Item { node: id, index });
        }
        Ok(())
    }

    fn reset_typeahead(&mut self, id: MenuNodeId) -> MenuResult<()> {
        let node = self.node_mut(id)?;
        node.typeahead.reset();
        let pending = node.typeahead_reset.take();
        if let Some(timer) = pending {
            self.cancel_timer(timer);
        }
        Ok(())
    }

    // ========================================================================
    // Pointer input
    // ========================================================================

    /// The pointer entered a node's trigger.
    ///
    /// Root triggers ignore hover entirely. A nested trigger whose parent
    /// is open arms the debounced hover open; if the node is already open
    /// the pointer is back on the trigger, so any armed grace close is
    /// abandoned.
    pub fn pointer_enter_trigger(&mut self, id: MenuNodeId, now: Instant) -> MenuResult<()> {
        let (nested, open, parent_open) = {
            let node = self.node(id)?;
            let parent_open = node
                .parent
                .map(|parent| self.nodes.get(parent).is_some_and(|node| node.open));
            (node.is_nested(), node.open, parent_open)
        };
        if !nested || parent_open != Some(true) {
            return Ok(());
        }

        if open {
            let pending = self.node_mut(id)?.hover.take_pending_close();
            if let Some(timer) = pending {
                self.cancel_timer(timer);
            }
            self.node_mut(id)?.hover.clear_polygon();
            return Ok(());
        }

        let timer = self.timers.schedule(now, self.config.open_delay);
        self.timer_routes.insert(timer, TimerPurpose::HoverOpen(id));
        let superseded = self.node_mut(id)?.hover.arm_open(timer);
        if let Some(old) = superseded {
            self.cancel_timer(old);
        }
        tracing::trace!(target: HOVER, node = ?id, "hover open armed");
        Ok(())
    }

    /// The pointer left a node's trigger at `exit`.
    ///
    /// A pending hover open is cancelled. If the node is open, the safe
    /// polygon from the exit point to the panel's near edge activates so
    /// the transit across the gap does not close anything.
    pub fn pointer_leave_trigger(&mut self, id: MenuNodeId, exit: Point) -> MenuResult<()> {
        let pending = self.node_mut(id)?.hover.take_pending_open();
        if let Some(timer) = pending {
            self.cancel_timer(timer);
            tracing::trace!(target: HOVER, node = ?id, "hover open cancelled");
        }

        let polygon = {
            let node = self.node(id)?;
            if node.open && node.is_nested() {
                node.resolved.and_then(|resolved| {
                    node.panel_rect()
                        .map(|rect| SafePolygon::new(exit, rect, resolved.placement.side))
                })
            } else {
                None
            }
        };
        if let Some(polygon) = polygon {
            self.node_mut(id)?.hover.set_polygon(polygon);
        }
        Ok(())
    }

    /// A pointer sample while a node's safe polygon is active.
    ///
    /// Inside the panel the transit is over; inside the polygon any armed
    /// grace close is abandoned; outside both, the grace timer arms.
    pub fn pointer_move(&mut self, id: MenuNodeId, point: Point, now: Instant) -> MenuResult<()> {
        let (open, transiting, in_panel, in_polygon, close_armed) = {
            let node = self.node(id)?;
            let in_panel = node.panel_rect().is_some_and(|rect| rect.contains(point));
            let in_polygon = node
                .hover
                .polygon()
                .is_some_and(|polygon| polygon.contains(point));
            (
                node.open,
                node.hover.polygon().is_some(),
                in_panel,
                in_polygon,
                node.hover.has_pending_close(),
            )
        };
        if !open || !transiting {
            return Ok(());
        }

        if in_panel {
            self.pointer_enter_panel(id)?;
        } else if in_polygon {
            if close_armed {
                let pending = self.node_mut(id)?.hover.take_pending_close();
                if let Some(timer) = pending {
                    self.cancel_timer(timer);
                }
            }
        } else if !close_armed {
            let timer = self.timers.schedule(now, self.config.grace_period);
            self.timer_routes.insert(timer, TimerPurpose::HoverClose(id));
            self.node_mut(id)?.hover.arm_close(timer);
            tracing::trace!(target: HOVER, node = ?id, "grace close armed");
        }
        Ok(())
    }

    /// The pointer reached a node's open panel: the transit is complete.
    pub fn pointer_enter_panel(&mut self, id: MenuNodeId) -> MenuResult<()> {
        let node = self.node_mut(id)?;
        node.hover.clear_polygon();
        let pending = node.hover.take_pending_close();
        if let Some(timer) = pending {
            self.cancel_timer(timer);
        }
        Ok(())
    }

    /// The pointer left a node's open panel at `exit`.
    ///
    /// Arms the grace close and re-spans the safe polygon back toward the
    /// trigger, so returning to either the panel or the trigger before
    /// expiry keeps the node open. Root panels ignore pointer departure;
    /// they close on press or keyboard only.
    pub fn pointer_leave_panel(
        &mut self,
        id: MenuNodeId,
        exit: Point,
        now: Instant,
    ) -> MenuResult<()> {
        let (open, nested) = {
            let node = self.node(id)?;
            (node.open, node.is_nested())
        };
        if !open || !nested {
            return Ok(());
        }

        let polygon = {
            let node = self.node(id)?;
            node.resolved.map(|resolved| {
                SafePolygon::new(exit, node.anchor, resolved.placement.side.opposite())
            })
        };
        if let Some(polygon) = polygon {
            self.node_mut(id)?.hover.set_polygon(polygon);
        }

        if !self.node(id)?.hover.has_pending_close() {
            let timer = self.timers.schedule(now, self.config.grace_period);
            self.timer_routes.insert(timer, TimerPurpose::HoverClose(id));
            self.node_mut(id)?.hover.arm_close(timer);
            tracing::trace!(target: HOVER, node = ?id, "grace close armed");
        }
        Ok(())
    }

    /// Mouse press on a node's trigger.
    ///
    /// The root trigger toggles its panel. Nested triggers ignore the
    /// mouse: they open on hover intent or keyboard only.
    pub fn mouse_down_trigger(&mut self, id: MenuNodeId) -> MenuResult<()> {
        let (nested, open) = {
            let node = self.node(id)?;
            (node.is_nested(), node.open)
        };
        if nested {
            return Ok(());
        }
        if open {
            self.close_subtree(id);
        } else {
            self.open_node(id)?;
        }
        Ok(())
    }

    /// A press landed outside every trigger and panel: dismiss the whole
    /// tree and let focus go wherever the press put it.
    pub fn outside_press(&mut self) {
        let root = self.root;
        self.close_subtree(root);
        self.focus.clear_focus();
    }

    /// Focus tabbed out of the tree: dismiss everything.
    pub fn tab_out(&mut self) {
        let root = self.root;
        self.close_subtree(root);
        self.focus.clear_focus();
    }

    // ========================================================================
    // Focus notifications
    // ========================================================================

    /// The host focused a node's trigger.
    ///
    /// The trigger sits in the parent's panel, so the focus-inside flag
    /// moves up: cleared on the node itself, set on the parent.
    pub fn notify_trigger_focus(&mut self, id: MenuNodeId) -> MenuResult<()> {
        let parent = self.node(id)?.parent;
        self.node_mut(id)?.has_focus_inside = false;
        if let Some(parent) = parent
            && let Some(node) = self.nodes.get_mut(parent)
        {
            node.has_focus_inside = true;
        }
        self.focus.set_focus(FocusTarget::Trigger(id));
        Ok(())
    }

    /// The host focused an item inside a node's panel.
    pub fn notify_item_focus(&mut self, id: MenuNodeId, index: usize) -> MenuResult<()> {
        let node = self.node_mut(id)?;
        if node.items.get(index).is_none() {
            return Err(MenuError::UnknownItem);
        }
        node.active_index = Some(index);
        node.has_focus_inside = true;
        self.focus.set_focus(FocusTarget::Item { node: id, index });
        Ok(())
    }

    // ========================================================================
    // Time and geometry
    // ========================================================================

    /// Advance time to `now`, firing every due timer.
    ///
    /// A fired timer acts only if it is still the node's current one and
    /// the node is still mounted in the required state; anything stale is
    /// dropped on the floor.
    pub fn tick(&mut self, now: Instant) {
        for timer in self.timers.process_expired(now) {
            let Some(purpose) = self.timer_routes.remove(&timer) else {
                continue;
            };
            match purpose {
                TimerPurpose::HoverOpen(id) => {
                    let due = self
                        .nodes
                        .get(id)
                        .is_some_and(|node| node.hover.is_open_pending(timer) && !node.open);
                    if !due {
                        continue;
                    }
                    if let Some(node) = self.nodes.get_mut(id) {
                        node.hover.open_fired();
                    }
                    if self.open_node(id).is_err() {
                        tracing::trace!(target: HOVER, node = ?id, "hover open skipped");
                    }
                }
                TimerPurpose::HoverClose(id) => {
                    let due = self
                        .nodes
                        .get(id)
                        .is_some_and(|node| node.hover.is_close_pending(timer));
                    if !due {
                        continue;
                    }
                    if let Some(node) = self.nodes.get_mut(id) {
                        node.hover.close_fired();
                    }
                    self.close_subtree(id);
                }
                TimerPurpose::TypeaheadReset(id) => {
                    if let Some(node) = self.nodes.get_mut(id)
                        && node.typeahead_reset == Some(timer)
                    {
                        node.typeahead_reset = None;
                        node.typeahead.reset();
                    }
                }
            }
        }
    }

    /// Report a new viewport and reposition every open panel against it.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        for id in self.reposition.clone() {
            self.recompute_placement(id);
        }
    }

    /// Report a node's trigger bounds (the placement anchor).
    pub fn set_trigger_bounds(&mut self, id: MenuNodeId, bounds: Rect) -> MenuResult<()> {
        self.node_mut(id)?.anchor = bounds;
        self.recompute_placement(id);
        Ok(())
    }

    /// Report a node's measured panel size.
    pub fn set_panel_size(&mut self, id: MenuNodeId, size: Size) -> MenuResult<()> {
        self.node_mut(id)?.panel_size = size;
        self.recompute_placement(id);
        Ok(())
    }

    fn recompute_placement(&mut self, id: MenuNodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if !node.open {
            return;
        }
        let options = if node.is_nested() {
            self.config.nested_placement
        } else {
            self.config.root_placement
        };
        let resolved = self
            .positioner
            .compute(node.anchor, node.panel_size, &options, self.viewport);
        if let Some(node) = self.nodes.get_mut(id) {
            node.resolved = Some(resolved);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// The root node.
    pub fn root(&self) -> MenuNodeId {
        self.root
    }

    /// Whether a node is mounted in this tree.
    pub fn contains(&self, id: MenuNodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Whether a node's panel is open. Unknown nodes read as closed.
    pub fn is_open(&self, id: MenuNodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.open)
    }

    /// The highlighted item index of a node.
    pub fn active_index(&self, id: MenuNodeId) -> Option<usize> {
        self.nodes.get(id)?.active_index
    }

    /// Move a node's highlight programmatically.
    pub fn set_active_index(&mut self, id: MenuNodeId, index: Option<usize>) -> MenuResult<()> {
        let node = self.node_mut(id)?;
        if let Some(index) = index
            && node.items.get(index).is_none()
        {
            return Err(MenuError::UnknownItem);
        }
        node.active_index = index;
        Ok(())
    }

    /// Whether keyboard focus lives inside a node's subtree.
    pub fn has_focus_inside(&self, id: MenuNodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.has_focus_inside)
    }

    /// Set a node's focus-inside flag directly.
    pub fn set_has_focus_inside(&mut self, id: MenuNodeId, value: bool) -> MenuResult<()> {
        self.node_mut(id)?.has_focus_inside = value;
        Ok(())
    }

    /// The resolved placement of a node's open panel.
    pub fn placement(&self, id: MenuNodeId) -> Option<ResolvedPlacement> {
        self.nodes.get(id)?.resolved
    }

    /// Number of items registered under a node. Unknown nodes read as 0.
    pub fn item_count(&self, id: MenuNodeId) -> usize {
        self.nodes.get(id).map(|node| node.items.len()).unwrap_or(0)
    }

    /// A node's label.
    pub fn label(&self, id: MenuNodeId) -> Option<&str> {
        self.nodes.get(id).map(|node| node.label.as_str())
    }

    /// A node's parent, or `None` for the root (and for unknown nodes).
    pub fn parent_of(&self, id: MenuNodeId) -> Option<MenuNodeId> {
        self.nodes.get(id)?.parent
    }

    /// The label of the item at `index` under a node.
    pub fn item_label(&self, id: MenuNodeId, index: usize) -> Option<&str> {
        Some(self.nodes.get(id)?.items.get(index)?.label())
    }

    /// Whether the item at `index` under a node is disabled.
    pub fn item_disabled(&self, id: MenuNodeId, index: usize) -> Option<bool> {
        Some(self.nodes.get(id)?.items.get(index)?.is_disabled())
    }

    /// The submenu triggered by the item at `index`, if it is a nested
    /// trigger.
    pub fn submenu_at(&self, id: MenuNodeId, index: usize) -> Option<MenuNodeId> {
        self.nodes.get(id)?.items.get(index)?.submenu()
    }

    /// Where keyboard focus currently lives.
    pub fn focused(&self) -> Option<FocusTarget> {
        self.focus.focused()
    }

    /// Host-facing signal mirroring every bus broadcast.
    pub fn events(&self) -> &Signal<TreeEvent> {
        &self.events
    }

    #[cfg(test)]
    fn reposition_count(&self) -> usize {
        self.reposition.len()
    }

    #[cfg(test)]
    fn subscription_count(&self) -> usize {
        self.bus.subscription_count()
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn node(&self, id: MenuNodeId) -> MenuResult<&MenuNode> {
        self.nodes.get(id).ok_or(MenuError::UnknownNode)
    }

    fn node_mut(&mut self, id: MenuNodeId) -> MenuResult<&mut MenuNode> {
        self.nodes.get_mut(id).ok_or(MenuError::UnknownNode)
    }

    /// First enabled item index of a node, if any.
    fn first_enabled(&self, id: MenuNodeId) -> Option<usize> {
        let node = self.nodes.get(id)?;
        match compute_next_index(None, NavCommand::First, &node.items.nav_entries()) {
            NavOutcome::Move(index) => Some(index),
            _ => None,
        }
    }

    /// Cancel a timer and drop its route. Already-fired timers are fine.
    fn cancel_timer(&mut self, timer: TimerId) {
        let _ = self.timers.cancel(timer);
        self.timer_routes.remove(&timer);
    }

    /// Broadcast an event: bus subscribers first, in subscription order,
    /// then the host signal.
    fn emit_tree_event(&mut self, event: TreeEvent) {
        let subscribers = self.bus.subscribers(event.kind());
        for subscriber in subscribers {
            self.deliver(subscriber, event);
        }
        self.events.emit(event);
    }

    /// One node's reaction to a bus event.
    fn deliver(&mut self, subscriber: MenuNodeId, event: TreeEvent) {
        match event {
            // A selection anywhere collapses the whole tree.
            TreeEvent::ItemActivated => {
                if self.nodes.get(subscriber).is_some_and(|node| node.open) {
                    self.close_subtree(subscriber);
                }
            }
            // An opening node closes its open siblings.
            TreeEvent::NodeOpened { node, parent } => {
                let is_open_sibling = self.nodes.get(subscriber).is_some_and(|record| {
                    subscriber != node && record.parent == parent && record.open
                });
                if is_open_sibling {
                    self.close_subtree(subscriber);
                }
            }
        }
    }
}
