//! Debug visualization for menu trees.
//!
//! The `tracing` instrumentation shows transitions as they happen;
//! [`format_tree`] complements it with a snapshot of the whole tree at
//! one moment, rendered as indented text. Useful when debugging host
//! integration:
//!
//! ```
//! use cascade_menu::{MenuConfig, MenuTree};
//! use cascade_menu::debug::{TreeFormatOptions, format_tree};
//!
//! let mut tree = MenuTree::new("File", MenuConfig::default());
//! let root = tree.root();
//! tree.add_item(root, "Open", false).unwrap();
//!
//! println!("{}", format_tree(&tree, &TreeFormatOptions::default()));
//! ```

use std::fmt::Write as _;

use crate::node::MenuNodeId;
use crate::tree::MenuTree;

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
}

/// Configuration for menu tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show open/closed state and the highlighted item.
    pub show_state: bool,
    /// Maximum node depth to traverse (`None` for unlimited).
    pub max_depth: Option<usize>,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_state: true,
            max_depth: None,
        }
    }
}

/// Render a snapshot of a tree's state as indented text.
///
/// One line per node and per item; nested menus indent under the item
/// that triggers them. Disabled items are marked, and with `show_state`
/// the highlighted item carries a `*`.
pub fn format_tree(tree: &MenuTree, options: &TreeFormatOptions) -> String {
    let mut out = String::new();
    render_node(tree, tree.root(), 0, options, &mut out);
    out
}

fn render_node(
    tree: &MenuTree,
    id: MenuNodeId,
    depth: usize,
    options: &TreeFormatOptions,
    out: &mut String,
) {
    if options.max_depth.is_some_and(|max| depth > max) {
        return;
    }
    let indent = "    ".repeat(depth);
    let label = tree.label(id).unwrap_or("<unmounted>");

    let _ = write!(out, "{indent}{label}");
    if options.show_state {
        let state = if tree.is_open(id) { "open" } else { "closed" };
        let _ = write!(out, " [{state}]");
    }
    let _ = writeln!(out);

    let branch = match options.style {
        TreeStyle::Ascii => "+- ",
        TreeStyle::Unicode => "├─ ",
    };
    for index in 0..tree.item_count(id) {
        let Some(item_label) = tree.item_label(id, index) else {
            continue;
        };
        let _ = write!(out, "{indent}{branch}{item_label}");
        if tree.item_disabled(id, index) == Some(true) {
            let _ = write!(out, " (disabled)");
        }
        if options.show_state && tree.active_index(id) == Some(index) {
            let _ = write!(out, " *");
        }
        let _ = writeln!(out);

        if let Some(child) = tree.submenu_at(id, index) {
            render_node(tree, child, depth + 1, options, out);
        }
    }
}
