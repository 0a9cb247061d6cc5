//! Headless nested-menu state machine for Cascade.
//!
//! A [`MenuTree`] owns an arbitrarily deep tree of popup menus sharing one
//! root trigger. Each node opens and closes independently, positions its
//! panel relative to its trigger, traps and restores keyboard focus, and
//! coordinates with the rest of the tree so that opening one submenu
//! collapses unrelated branches and selecting an item dismisses
//! everything.
//!
//! The crate is headless: it renders nothing and owns no windows. A host
//! (GUI toolkit, web binding, test harness) feeds it pointer and keyboard
//! input plus trigger/panel geometry, advances time through
//! [`MenuTree::tick`], and reads state back through the query surface.
//! Time never advances implicitly, which makes hover and typeahead
//! behavior fully deterministic.
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use cascade_menu::{Key, MenuConfig, MenuTree};
//!
//! let mut tree = MenuTree::new("File", MenuConfig::default());
//! let root = tree.root();
//! tree.add_item(root, "Open", false)?;
//! let copy_as = tree.add_submenu(root, "Copy as")?;
//! tree.add_item(copy_as, "Text", false)?;
//! tree.add_item(copy_as, "Image", false)?;
//!
//! // Click the trigger, arrow down to "Copy as", arrow right to enter.
//! let now = Instant::now();
//! tree.mouse_down_trigger(root)?;
//! tree.key_press(root, Key::ArrowDown, now)?;
//! tree.key_press(root, Key::ArrowRight, now)?;
//!
//! assert!(tree.is_open(copy_as));
//! assert_eq!(tree.active_index(copy_as), Some(0));
//! # Ok::<(), cascade_menu::MenuError>(())
//! ```

mod bus;
mod config;
pub mod debug;
mod error;
mod events;
mod focus;
mod geometry;
mod hover;
mod item;
mod navigation;
mod node;
mod placement;
mod tree;
mod typeahead;

pub use bus::{TreeEvent, TreeEventKind};
pub use config::MenuConfig;
pub use error::{MenuError, MenuResult};
pub use events::Key;
pub use focus::{FocusManager, FocusTarget, TrapOptions};
pub use geometry::{Point, Rect, Size};
pub use hover::{DEFAULT_GRACE_PERIOD, DEFAULT_OPEN_DELAY, SafePolygon};
pub use item::{ActivateFn, ItemId, ItemRegistry, MenuItem};
pub use navigation::{
    NavCommand, NavEntry, NavOutcome, Orientation, command_for_key, compute_next_index,
};
pub use node::MenuNodeId;
pub use placement::{
    Alignment, Placement, PlacementOptions, PositionProvider, ResolvedPlacement, Side,
    ViewportPositioner,
};
pub use tree::MenuTree;
pub use typeahead::{DEFAULT_RESET_DELAY, TypeaheadMatcher};
