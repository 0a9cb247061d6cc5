//! Focus management for menu trees.
//!
//! Each tree owns one [`FocusManager`] that tracks where keyboard focus
//! lives (a node's trigger or one of its items) and maintains a stack of
//! focus traps. Opening a root node traps focus in its panel with initial
//! focus on the first item and restores focus to the trigger on close;
//! opening a nested node traps nothing and leaves focus on the parent
//! item until the user navigates in.

use crate::node::MenuNodeId;

/// Where keyboard focus currently lives inside a menu tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// The trigger element of a node.
    Trigger(MenuNodeId),
    /// An item inside a node's open panel.
    Item {
        /// The node owning the panel.
        node: MenuNodeId,
        /// Item index in the node's registry.
        index: usize,
    },
}

/// Options for one focus trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapOptions {
    /// Whether the trap blocks interaction outside the container.
    pub modal: bool,
    /// Item index to focus when the trap activates, or `None` to leave
    /// focus where it is.
    pub initial_focus: Option<usize>,
    /// Whether releasing the trap restores focus to where it was when the
    /// trap activated.
    pub return_focus: bool,
}

/// One active trap on the stack.
#[derive(Debug)]
struct FocusTrap {
    node: MenuNodeId,
    options: TrapOptions,
    /// Focus at activation time, restored on release when `return_focus`.
    previous: Option<FocusTarget>,
}

/// Tracks focus position and the trap stack for one menu tree.
#[derive(Debug, Default)]
pub struct FocusManager {
    /// The current focus target, if focus is inside the tree at all.
    focused: Option<FocusTarget>,
    /// Active traps, innermost last.
    traps: Vec<FocusTrap>,
}

impl FocusManager {
    /// Create a manager with no focus and no traps.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current focus target.
    #[inline]
    pub fn focused(&self) -> Option<FocusTarget> {
        self.focused
    }

    /// Move focus to a target.
    pub fn set_focus(&mut self, target: FocusTarget) {
        if self.focused != Some(target) {
            tracing::trace!(target: "cascade_menu::focus", ?target, "focus moved");
            self.focused = Some(target);
        }
    }

    /// Clear focus (focus left the tree).
    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    /// Activate a trap for a node's panel.
    ///
    /// Remembers the current focus so release can restore it, then moves
    /// focus to `initial_focus` if one is requested.
    pub fn trap(&mut self, node: MenuNodeId, options: TrapOptions) {
        let previous = self.focused;
        self.traps.push(FocusTrap {
            node,
            options,
            previous,
        });

        if let Some(index) = options.initial_focus {
            self.set_focus(FocusTarget::Item { node, index });
        }
    }

    /// Release the trap owned by `node`, if one is active.
    ///
    /// With `return_focus`, focus goes back to wherever it was when the
    /// trap activated (typically the invoking trigger).
    pub fn release(&mut self, node: MenuNodeId) {
        let Some(position) = self.traps.iter().rposition(|trap| trap.node == node) else {
            return;
        };
        let trap = self.traps.remove(position);

        if trap.options.return_focus {
            tracing::trace!(
                target: "cascade_menu::focus",
                node = ?node,
                restored = ?trap.previous,
                "focus trap released"
            );
            self.focused = trap.previous;
        }
    }

    /// Whether a node currently holds a trap.
    pub fn is_trapped(&self, node: MenuNodeId) -> bool {
        self.traps.iter().any(|trap| trap.node == node)
    }

    /// Number of active traps.
    pub fn trap_count(&self) -> usize {
        self.traps.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn node_ids(count: usize) -> Vec<MenuNodeId> {
        let mut arena: SlotMap<MenuNodeId, ()> = SlotMap::with_key();
        (0..count).map(|_| arena.insert(())).collect()
    }

    #[test]
    fn trap_moves_initial_focus() {
        let ids = node_ids(1);
        let mut focus = FocusManager::new();
        focus.set_focus(FocusTarget::Trigger(ids[0]));

        focus.trap(
            ids[0],
            TrapOptions {
                modal: false,
                initial_focus: Some(0),
                return_focus: true,
            },
        );

        assert_eq!(
            focus.focused(),
            Some(FocusTarget::Item {
                node: ids[0],
                index: 0
            })
        );
        assert!(focus.is_trapped(ids[0]));
    }

    #[test]
    fn trap_without_initial_focus_leaves_focus() {
        let ids = node_ids(2);
        let mut focus = FocusManager::new();
        focus.set_focus(FocusTarget::Item {
            node: ids[0],
            index: 2,
        });

        // Nested-node style trap: no focus steal.
        focus.trap(
            ids[1],
            TrapOptions {
                modal: false,
                initial_focus: None,
                return_focus: false,
            },
        );

        assert_eq!(
            focus.focused(),
            Some(FocusTarget::Item {
                node: ids[0],
                index: 2
            })
        );
    }

    #[test]
    fn release_restores_previous_focus() {
        let ids = node_ids(1);
        let mut focus = FocusManager::new();
        focus.set_focus(FocusTarget::Trigger(ids[0]));

        focus.trap(
            ids[0],
            TrapOptions {
                modal: false,
                initial_focus: Some(0),
                return_focus: true,
            },
        );
        focus.release(ids[0]);

        assert_eq!(focus.focused(), Some(FocusTarget::Trigger(ids[0])));
        assert_eq!(focus.trap_count(), 0);
    }

    #[test]
    fn release_without_return_keeps_focus() {
        let ids = node_ids(1);
        let mut focus = FocusManager::new();
        focus.set_focus(FocusTarget::Trigger(ids[0]));

        focus.trap(
            ids[0],
            TrapOptions {
                modal: false,
                initial_focus: Some(1),
                return_focus: false,
            },
        );
        focus.release(ids[0]);

        assert_eq!(
            focus.focused(),
            Some(FocusTarget::Item {
                node: ids[0],
                index: 1
            })
        );
    }

    #[test]
    fn release_unknown_node_is_noop() {
        let ids = node_ids(2);
        let mut focus = FocusManager::new();
        focus.trap(
            ids[0],
            TrapOptions {
                modal: false,
                initial_focus: Some(0),
                return_focus: true,
            },
        );

        focus.release(ids[1]);
        assert_eq!(focus.trap_count(), 1);
    }
}
