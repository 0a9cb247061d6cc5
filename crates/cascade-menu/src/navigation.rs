//! List navigation.
//!
//! [`compute_next_index`] is a pure function from a keyboard command and
//! the current registry shape to the next active index. It knows nothing
//! about menu identity; the tree interprets the outcome. Root-level
//! horizontal navigation and submenu vertical navigation share this
//! function, differing only in the key-to-command mapping of
//! [`command_for_key`].

use crate::events::Key;

/// The axis a menu's items are laid out along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Items stack top to bottom (popup panels).
    #[default]
    Vertical,
    /// Items run left to right (menu-bar style roots).
    Horizontal,
}

/// A navigation command decoded from keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Move to the next enabled item, wrapping.
    Next,
    /// Move to the previous enabled item, wrapping.
    Previous,
    /// Move to the first enabled item.
    First,
    /// Move to the last enabled item.
    Last,
    /// Open the submenu owned by the current item.
    EnterNested,
    /// Close the current nested node and return to the parent item.
    ExitNested,
}

/// Navigation-relevant flags for one registered item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavEntry {
    /// Disabled items are skipped, never selected.
    pub disabled: bool,
    /// Whether the item triggers a submenu.
    pub nested: bool,
}

/// What a navigation command asks the owning node to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Highlight the item at this index.
    Move(usize),
    /// Open the submenu owned by the item at this index.
    OpenNested(usize),
    /// Close the current node and restore the parent item's highlight.
    CloseCurrent,
    /// Nothing to do (no enabled target, or command does not apply).
    Unchanged,
}

/// Map a key to a navigation command for a node.
///
/// The mapping depends on the node's orientation (which axis `Next` runs
/// along) and on whether the node is nested (only nested nodes can exit
/// toward a parent).
pub fn command_for_key(key: Key, orientation: Orientation, nested: bool) -> Option<NavCommand> {
    let command = match (orientation, key) {
        (Orientation::Vertical, Key::ArrowDown) => NavCommand::Next,
        (Orientation::Vertical, Key::ArrowUp) => NavCommand::Previous,
        (Orientation::Vertical, Key::ArrowRight) => NavCommand::EnterNested,
        (Orientation::Vertical, Key::ArrowLeft) if nested => NavCommand::ExitNested,
        (Orientation::Horizontal, Key::ArrowRight) => NavCommand::Next,
        (Orientation::Horizontal, Key::ArrowLeft) => NavCommand::Previous,
        (Orientation::Horizontal, Key::ArrowDown) => NavCommand::EnterNested,
        (Orientation::Horizontal, Key::ArrowUp) if nested => NavCommand::ExitNested,
        (_, Key::Home) => NavCommand::First,
        (_, Key::End) => NavCommand::Last,
        _ => return None,
    };
    Some(command)
}

/// Compute the next active index for a navigation command.
///
/// `Next`/`Previous` wrap circularly and skip disabled entries; when every
/// entry is disabled the outcome is [`NavOutcome::Unchanged`]. The
/// function is idempotent: feeding a returned `Move` index back in with
/// the same command and registry yields the index the same scan would.
pub fn compute_next_index(
    current: Option<usize>,
    command: NavCommand,
    entries: &[NavEntry],
) -> NavOutcome {
    match command {
        NavCommand::Next => {
            let start = current.map(|i| i + 1).unwrap_or(0);
            resolve_move(current, next_enabled_from(start, entries))
        }
        NavCommand::Previous => {
            let start = current.unwrap_or(entries.len());
            resolve_move(current, previous_enabled_from(start, entries))
        }
        NavCommand::First => resolve_move(current, next_enabled_from(0, entries)),
        NavCommand::Last => resolve_move(current, previous_enabled_from(entries.len(), entries)),
        NavCommand::EnterNested => match current {
            Some(index)
                if entries
                    .get(index)
                    .is_some_and(|entry| entry.nested && !entry.disabled) =>
            {
                NavOutcome::OpenNested(index)
            }
            _ => NavOutcome::Unchanged,
        },
        NavCommand::ExitNested => NavOutcome::CloseCurrent,
    }
}

fn resolve_move(current: Option<usize>, target: Option<usize>) -> NavOutcome {
    match target {
        Some(index) if current != Some(index) => NavOutcome::Move(index),
        _ => NavOutcome::Unchanged,
    }
}

/// First enabled index at or after `start`, scanning forward with wrap.
fn next_enabled_from(start: usize, entries: &[NavEntry]) -> Option<usize> {
    let count = entries.len();
    if count == 0 {
        return None;
    }

    (0..count)
        .map(|offset| (start + offset) % count)
        .find(|&index| !entries[index].disabled)
}

/// First enabled index strictly before `start`, scanning backward with wrap.
fn previous_enabled_from(start: usize, entries: &[NavEntry]) -> Option<usize> {
    let count = entries.len();
    if count == 0 {
        return None;
    }

    (1..=count)
        .map(|offset| (start + count - offset) % count)
        .find(|&index| !entries[index].disabled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(flags: &[(bool, bool)]) -> Vec<NavEntry> {
        flags
            .iter()
            .map(|&(disabled, nested)| NavEntry { disabled, nested })
            .collect()
    }

    #[test]
    fn next_skips_disabled_and_wraps() {
        let items = entries(&[(false, false), (true, false), (false, false)]);

        assert_eq!(
            compute_next_index(Some(0), NavCommand::Next, &items),
            NavOutcome::Move(2)
        );
        assert_eq!(
            compute_next_index(Some(2), NavCommand::Next, &items),
            NavOutcome::Move(0)
        );
    }

    #[test]
    fn previous_skips_disabled_and_wraps() {
        let items = entries(&[(false, false), (true, false), (false, false)]);

        assert_eq!(
            compute_next_index(Some(2), NavCommand::Previous, &items),
            NavOutcome::Move(0)
        );
        assert_eq!(
            compute_next_index(Some(0), NavCommand::Previous, &items),
            NavOutcome::Move(2)
        );
    }

    #[test]
    fn starts_from_edges_when_no_current() {
        let items = entries(&[(true, false), (false, false), (false, false)]);

        assert_eq!(
            compute_next_index(None, NavCommand::Next, &items),
            NavOutcome::Move(1)
        );
        assert_eq!(
            compute_next_index(None, NavCommand::Previous, &items),
            NavOutcome::Move(2)
        );
    }

    #[test]
    fn first_and_last_land_on_enabled() {
        let items = entries(&[(true, false), (false, false), (false, false), (true, false)]);

        assert_eq!(
            compute_next_index(Some(2), NavCommand::First, &items),
            NavOutcome::Move(1)
        );
        assert_eq!(
            compute_next_index(Some(1), NavCommand::Last, &items),
            NavOutcome::Move(2)
        );
    }

    #[test]
    fn all_disabled_is_unchanged() {
        let items = entries(&[(true, false), (true, false)]);

        for command in [
            NavCommand::Next,
            NavCommand::Previous,
            NavCommand::First,
            NavCommand::Last,
        ] {
            assert_eq!(
                compute_next_index(Some(0), command, &items),
                NavOutcome::Unchanged
            );
        }
    }

    #[test]
    fn empty_registry_is_unchanged() {
        assert_eq!(
            compute_next_index(None, NavCommand::Next, &[]),
            NavOutcome::Unchanged
        );
    }

    #[test]
    fn single_enabled_item_is_idempotent() {
        let items = entries(&[(false, false)]);

        assert_eq!(
            compute_next_index(Some(0), NavCommand::Next, &items),
            NavOutcome::Unchanged
        );
        assert_eq!(
            compute_next_index(Some(0), NavCommand::Previous, &items),
            NavOutcome::Unchanged
        );
    }

    #[test]
    fn enter_nested_requires_enabled_submenu_item() {
        let items = entries(&[(false, true), (false, false), (true, true)]);

        assert_eq!(
            compute_next_index(Some(0), NavCommand::EnterNested, &items),
            NavOutcome::OpenNested(0)
        );
        assert_eq!(
            compute_next_index(Some(1), NavCommand::EnterNested, &items),
            NavOutcome::Unchanged
        );
        assert_eq!(
            compute_next_index(Some(2), NavCommand::EnterNested, &items),
            NavOutcome::Unchanged
        );
        assert_eq!(
            compute_next_index(None, NavCommand::EnterNested, &items),
            NavOutcome::Unchanged
        );
    }

    #[test]
    fn exit_nested_always_closes() {
        let items = entries(&[(false, false)]);
        assert_eq!(
            compute_next_index(None, NavCommand::ExitNested, &items),
            NavOutcome::CloseCurrent
        );
    }

    #[test]
    fn orientation_shares_one_code_path() {
        // Vertical: Down advances. Horizontal: Right advances.
        assert_eq!(
            command_for_key(Key::ArrowDown, Orientation::Vertical, false),
            Some(NavCommand::Next)
        );
        assert_eq!(
            command_for_key(Key::ArrowRight, Orientation::Horizontal, false),
            Some(NavCommand::Next)
        );
        // Entering a submenu is the cross-axis key.
        assert_eq!(
            command_for_key(Key::ArrowRight, Orientation::Vertical, true),
            Some(NavCommand::EnterNested)
        );
        assert_eq!(
            command_for_key(Key::ArrowDown, Orientation::Horizontal, true),
            Some(NavCommand::EnterNested)
        );
        // Exiting only applies to nested nodes.
        assert_eq!(
            command_for_key(Key::ArrowLeft, Orientation::Vertical, false),
            None
        );
        assert_eq!(
            command_for_key(Key::ArrowLeft, Orientation::Vertical, true),
            Some(NavCommand::ExitNested)
        );
    }
}
