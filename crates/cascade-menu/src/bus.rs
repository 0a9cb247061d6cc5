//! Per-tree event bus.
//!
//! Cross-node coordination runs over a synchronous publish/subscribe bus
//! scoped to one [`MenuTree`](crate::tree::MenuTree): when an item is
//! activated or a node opens, every subscribed node is notified in
//! subscription order and reacts by adjusting its own state. Events are
//! fire-and-forget; the bus retains no payloads and answers no queries
//! about past traffic. Two trees never share a bus.

use crate::node::MenuNodeId;

/// Identifies one bus subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The kinds of events the bus carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEventKind {
    /// An enabled, non-nested item was activated somewhere in the tree.
    ItemActivated,
    /// A node transitioned from closed to open.
    NodeOpened,
}

/// An event broadcast over the bus (and mirrored on the tree's signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// An enabled, non-nested item was activated. Every node closes.
    ItemActivated,
    /// A node opened. Open siblings (same parent, different node) close.
    NodeOpened {
        /// The node that opened.
        node: MenuNodeId,
        /// Its parent, or `None` for the root.
        parent: Option<MenuNodeId>,
    },
}

impl TreeEvent {
    /// The subscription kind this event is delivered under.
    pub fn kind(&self) -> TreeEventKind {
        match self {
            TreeEvent::ItemActivated => TreeEventKind::ItemActivated,
            TreeEvent::NodeOpened { .. } => TreeEventKind::NodeOpened,
        }
    }
}

#[derive(Debug)]
struct Subscription {
    id: SubscriptionId,
    subscriber: MenuNodeId,
    kind: TreeEventKind,
}

/// Ordered subscription registry for one tree.
///
/// Delivery order equals subscription order, so subscriptions live in a
/// plain vector rather than a keyed arena.
#[derive(Debug, Default)]
pub struct TreeBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
}

impl TreeBus {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a node to one event kind.
    pub fn on(&mut self, kind: TreeEventKind, subscriber: MenuNodeId) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            subscriber,
            kind,
        });
        tracing::trace!(
            target: "cascade_menu::bus",
            ?kind,
            node = ?subscriber,
            "subscribed"
        );
        id
    }

    /// Remove one subscription. Returns whether it existed.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|sub| sub.id != id);
        before != self.subscriptions.len()
    }

    /// Snapshot the subscribers of a kind, in subscription order.
    ///
    /// The tree delivers against the snapshot so reactions may mutate the
    /// bus (e.g. an unmount triggered mid-delivery) without skipping or
    /// double-delivering.
    pub fn subscribers(&self, kind: TreeEventKind) -> Vec<MenuNodeId> {
        self.subscriptions
            .iter()
            .filter(|sub| sub.kind == kind)
            .map(|sub| sub.subscriber)
            .collect()
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
