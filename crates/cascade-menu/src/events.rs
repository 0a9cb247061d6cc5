//! Keyboard input model.
//!
//! Cascade is headless, so it works with logical keys rather than physical
//! scancodes: the host translates whatever its platform delivers into
//! [`Key`] values. Printable input arrives as [`Key::Char`] and feeds the
//! typeahead matcher; everything else drives navigation and dismissal.

/// A logical keyboard key delivered to the menu tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character (already layout-resolved by the host).
    Char(char),

    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,

    // Activation and dismissal
    Enter,
    Space,
    Escape,
    Tab,
}

impl Key {
    /// Check if this is a directional or boundary navigation key.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowUp
                | Key::ArrowDown
                | Key::ArrowLeft
                | Key::ArrowRight
                | Key::Home
                | Key::End
        )
    }

    /// The printable character this key contributes to typeahead, if any.
    ///
    /// `Space` is deliberately excluded: it activates the highlighted item
    /// instead of extending the typeahead buffer.
    pub fn printable(&self) -> Option<char> {
        match self {
            Key::Char(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_keys() {
        assert!(Key::ArrowDown.is_navigation());
        assert!(Key::Home.is_navigation());
        assert!(!Key::Enter.is_navigation());
        assert!(!Key::Char('a').is_navigation());
    }

    #[test]
    fn printable_keys() {
        assert_eq!(Key::Char('a').printable(), Some('a'));
        assert_eq!(Key::Char('Z').printable(), Some('Z'));
        assert_eq!(Key::Char('\u{8}').printable(), None);
        assert_eq!(Key::Space.printable(), None);
        assert_eq!(Key::Escape.printable(), None);
    }
}
