//! Per-node item registry.
//!
//! Each menu node owns one [`ItemRegistry`]: an ordered sequence of
//! selectable entries. Registration order must match the rendered order,
//! so sequential keyboard navigation matches what the user sees. Items
//! mount and unmount dynamically; the registry is the single source of
//! truth the navigator and typeahead matcher read from.

use slotmap::{SlotMap, new_key_type};

use crate::navigation::NavEntry;
use crate::node::MenuNodeId;

new_key_type! {
    /// A unique identifier for a registered menu item.
    pub struct ItemId;
}

/// Callback invoked when an item is activated.
pub type ActivateFn = Box<dyn FnMut()>;

/// A selectable entry in a menu.
///
/// An item is either a plain action (optionally carrying a host callback)
/// or the trigger of a nested submenu. Disabled items stay in the registry
/// so indices match the rendered order, but they never receive activation
/// and are skipped by navigation and typeahead.
pub struct MenuItem {
    /// Text label, used for typeahead matching.
    label: String,
    /// Whether the item is disabled.
    disabled: bool,
    /// The submenu this item triggers, if it is a nested-menu trigger.
    submenu: Option<MenuNodeId>,
    /// Host callback invoked on activation.
    on_activate: Option<ActivateFn>,
}

impl MenuItem {
    /// Create a plain enabled item.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
            submenu: None,
            on_activate: None,
        }
    }

    /// Set the disabled state using builder pattern.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Attach an activation callback using builder pattern.
    pub fn with_on_activate(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_activate = Some(Box::new(callback));
        self
    }

    /// Mark this item as the trigger of a submenu.
    pub(crate) fn with_submenu(mut self, node: MenuNodeId) -> Self {
        self.submenu = Some(node);
        self
    }

    /// The item's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the item is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The submenu this item triggers, if any.
    pub fn submenu(&self) -> Option<MenuNodeId> {
        self.submenu
    }

    /// Run the activation callback, if one is attached.
    pub(crate) fn invoke_on_activate(&mut self) {
        if let Some(callback) = self.on_activate.as_mut() {
            callback();
        }
    }
}

impl std::fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .field("submenu", &self.submenu)
            .field("has_on_activate", &self.on_activate.is_some())
            .finish()
    }
}

/// An ordered registry of the items mounted under one menu node.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    /// Item storage.
    entries: SlotMap<ItemId, MenuItem>,
    /// Declaration order of the live items.
    order: Vec<ItemId>,
}

impl ItemRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Register an item at the end of the order.
    pub fn register(&mut self, item: MenuItem) -> ItemId {
        let id = self.entries.insert(item);
        self.order.push(id);
        id
    }

    /// Register an item at a specific index (clamped to the current length).
    pub fn register_at(&mut self, index: usize, item: MenuItem) -> ItemId {
        let id = self.entries.insert(item);
        let index = index.min(self.order.len());
        self.order.insert(index, id);
        id
    }

    /// Remove an item, returning it if it was registered.
    pub fn unregister(&mut self, id: ItemId) -> Option<MenuItem> {
        let item = self.entries.remove(id)?;
        self.order.retain(|&existing| existing != id);
        Some(item)
    }

    /// Number of registered items.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The index of an item in declaration order.
    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.order.iter().position(|&existing| existing == id)
    }

    /// The item ID at an index.
    pub fn id_at(&self, index: usize) -> Option<ItemId> {
        self.order.get(index).copied()
    }

    /// The item at an index.
    pub fn get(&self, index: usize) -> Option<&MenuItem> {
        self.entries.get(self.id_at(index)?)
    }

    /// Mutable access to the item at an index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut MenuItem> {
        let id = self.id_at(index)?;
        self.entries.get_mut(id)
    }

    /// The item with a given ID.
    pub fn get_by_id(&self, id: ItemId) -> Option<&MenuItem> {
        self.entries.get(id)
    }

    /// Iterate items in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &MenuItem> {
        self.order.iter().filter_map(|&id| self.entries.get(id))
    }

    /// Typeahead view: one entry per item, `None` for disabled items.
    pub fn typeahead_labels(&self) -> Vec<Option<&str>> {
        self.iter()
            .map(|item| (!item.is_disabled()).then(|| item.label()))
            .collect()
    }

    /// Navigation view: disabled/nested flags per item, in order.
    pub fn nav_entries(&self) -> Vec<NavEntry> {
        self.iter()
            .map(|item| NavEntry {
                disabled: item.is_disabled(),
                nested: item.submenu().is_some(),
            })
            .collect()
    }

    /// Re-validate an active index against the current registry.
    ///
    /// An index pointing past the new end resets to the last valid index,
    /// or `None` when the registry is empty.
    pub fn clamp_index(&self, current: Option<usize>) -> Option<usize> {
        let index = current?;
        if self.order.is_empty() {
            None
        } else {
            Some(index.min(self.order.len() - 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_preserves_order() {
        let mut registry = ItemRegistry::new();
        let a = registry.register(MenuItem::new("Alpha"));
        let b = registry.register(MenuItem::new("Beta"));
        let c = registry.register_at(1, MenuItem::new("Between"));

        assert_eq!(registry.len(), 3);
        assert_eq!(registry.index_of(a), Some(0));
        assert_eq!(registry.index_of(c), Some(1));
        assert_eq!(registry.index_of(b), Some(2));

        let labels: Vec<_> = registry.iter().map(|i| i.label().to_string()).collect();
        assert_eq!(labels, vec!["Alpha", "Between", "Beta"]);
    }

    #[test]
    fn unregister_compacts_order() {
        let mut registry = ItemRegistry::new();
        let a = registry.register(MenuItem::new("A"));
        let b = registry.register(MenuItem::new("B"));
        let c = registry.register(MenuItem::new("C"));

        let removed = registry.unregister(b).unwrap();
        assert_eq!(removed.label(), "B");
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.index_of(a), Some(0));
        assert_eq!(registry.index_of(c), Some(1));
        assert!(registry.unregister(b).is_none());
    }

    #[test]
    fn typeahead_labels_exclude_disabled() {
        let mut registry = ItemRegistry::new();
        registry.register(MenuItem::new("Open"));
        registry.register(MenuItem::new("Save").with_disabled(true));
        registry.register(MenuItem::new("Quit"));

        assert_eq!(
            registry.typeahead_labels(),
            vec![Some("Open"), None, Some("Quit")]
        );
    }

    #[test]
    fn clamp_index_revalidates() {
        let mut registry = ItemRegistry::new();
        registry.register(MenuItem::new("A"));
        registry.register(MenuItem::new("B"));

        assert_eq!(registry.clamp_index(Some(5)), Some(1));
        assert_eq!(registry.clamp_index(Some(1)), Some(1));
        assert_eq!(registry.clamp_index(None), None);

        let empty = ItemRegistry::new();
        assert_eq!(empty.clamp_index(Some(0)), None);
    }

    #[test]
    fn activation_callback_runs() {
        use std::cell::Cell;
        use std::rc::Rc;

        let hits = Rc::new(Cell::new(0));
        let hits_clone = hits.clone();
        let mut registry = ItemRegistry::new();
        registry.register(MenuItem::new("Copy").with_on_activate(move || {
            hits_clone.set(hits_clone.get() + 1);
        }));

        registry.get_mut(0).unwrap().invoke_on_activate();
        assert_eq!(hits.get(), 1);
    }
}
