//! Typeahead matching.
//!
//! Printable keystrokes accumulate into a short-lived buffer that is
//! matched, case-insensitively, against the prefix of every enabled item
//! label. The first match in registry order wins. The buffer goes stale
//! after an idle timeout (default 750 ms) and is discarded whenever a
//! navigation key is pressed.
//!
//! Matching only moves the highlight; it never opens or closes a node.

use std::time::{Duration, Instant};

/// Idle time after which the accumulated buffer is discarded.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(750);

/// Accumulates printable input and resolves it to an item index.
#[derive(Debug, Clone)]
pub struct TypeaheadMatcher {
    /// Accumulated printable characters.
    buffer: String,
    /// When the last character arrived.
    last_input: Option<Instant>,
    /// Idle timeout before the buffer resets.
    reset_delay: Duration,
}

impl Default for TypeaheadMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeaheadMatcher {
    /// Create a matcher with the default idle timeout.
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            last_input: None,
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }

    /// Set the idle timeout using builder pattern.
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    /// The idle timeout before the buffer resets.
    pub fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    /// The currently accumulated buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Discard the accumulated buffer.
    ///
    /// Called on idle expiry and on any non-printable navigation key.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_input = None;
    }

    /// Feed one printable character and return the matched item index.
    ///
    /// `labels` holds one entry per registered item in declaration order,
    /// with `None` for disabled items (they never match). Resolution:
    ///
    /// 1. A buffer older than the idle timeout is discarded first.
    /// 2. The character is appended and the extended buffer matched; on a
    ///    hit the buffer is kept and the first matching index returned.
    /// 3. On a miss, the character alone is retried; on a hit the buffer
    ///    resets to just that character.
    /// 4. On a double miss the extended buffer is kept so the next
    ///    keystroke can still narrow, and `None` is returned.
    pub fn on_char(
        &mut self,
        now: Instant,
        ch: char,
        labels: &[Option<&str>],
    ) -> Option<usize> {
        if self
            .last_input
            .is_some_and(|last| now.duration_since(last) >= self.reset_delay)
        {
            self.buffer.clear();
        }
        self.last_input = Some(now);

        self.buffer.push(ch);
        if let Some(index) = find_prefix_match(&self.buffer, labels) {
            tracing::trace!(
                target: "cascade_menu::typeahead",
                buffer = %self.buffer,
                index,
                "typeahead matched"
            );
            return Some(index);
        }

        // Retry with the new character alone; a hit restarts the buffer.
        let single = ch.to_string();
        if let Some(index) = find_prefix_match(&single, labels) {
            self.buffer = single;
            tracing::trace!(
                target: "cascade_menu::typeahead",
                buffer = %self.buffer,
                index,
                "typeahead restarted on single char"
            );
            return Some(index);
        }

        // Double miss: keep the extended buffer for progressive narrowing.
        None
    }
}

/// First label in order whose lowercase form starts with `prefix`.
fn find_prefix_match(prefix: &str, labels: &[Option<&str>]) -> Option<usize> {
    let needle = prefix.to_lowercase();
    labels.iter().position(|label| {
        label.is_some_and(|text| text.to_lowercase().starts_with(&needle))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_labels() -> Vec<Option<&'static str>> {
        vec![Some("Apple"), Some("Apricot"), Some("Banana")]
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_match_wins_on_shared_prefix() {
        // "a" matches Apple; "ap" still prefixes Apple, so the highlight
        // stays on the first match rather than narrowing to Apricot.
        let mut matcher = TypeaheadMatcher::new();
        let labels = fruit_labels();
        let t0 = Instant::now();

        assert_eq!(matcher.on_char(t0, 'a', &labels), Some(0));
        assert_eq!(matcher.on_char(t0 + ms(100), 'p', &labels), Some(0));
        assert_eq!(matcher.buffer(), "ap");
    }

    #[test]
    fn buffer_narrows_to_unique_match() {
        let mut matcher = TypeaheadMatcher::new();
        let labels = fruit_labels();
        let t0 = Instant::now();

        matcher.on_char(t0, 'a', &labels);
        matcher.on_char(t0 + ms(50), 'p', &labels);
        assert_eq!(matcher.on_char(t0 + ms(100), 'r', &labels), Some(1));
        assert_eq!(matcher.buffer(), "apr");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let mut matcher = TypeaheadMatcher::new();
        let labels = fruit_labels();

        assert_eq!(matcher.on_char(Instant::now(), 'B', &labels), Some(2));
    }

    #[test]
    fn disabled_items_never_match() {
        let mut matcher = TypeaheadMatcher::new();
        let labels = vec![None, Some("Apricot"), Some("Banana")];

        assert_eq!(matcher.on_char(Instant::now(), 'a', &labels), Some(1));
    }

    #[test]
    fn idle_timeout_discards_buffer() {
        let mut matcher = TypeaheadMatcher::new();
        let labels = fruit_labels();
        let t0 = Instant::now();

        matcher.on_char(t0, 'a', &labels);
        matcher.on_char(t0 + ms(10), 'p', &labels);

        // After the idle window the next keystroke starts a fresh buffer.
        assert_eq!(matcher.on_char(t0 + ms(800), 'b', &labels), Some(2));
        assert_eq!(matcher.buffer(), "b");
    }

    #[test]
    fn no_match_retries_single_char() {
        let mut matcher = TypeaheadMatcher::new();
        let labels = fruit_labels();
        let t0 = Instant::now();

        matcher.on_char(t0, 'a', &labels);
        // "ab" matches nothing, but "b" alone matches Banana: the buffer
        // resets to the failing character and retries.
        assert_eq!(matcher.on_char(t0 + ms(50), 'b', &labels), Some(2));
        assert_eq!(matcher.buffer(), "b");
    }

    #[test]
    fn keeps_unmatched_buffer() {
        let mut matcher = TypeaheadMatcher::new();
        let labels = fruit_labels();
        let t0 = Instant::now();

        matcher.on_char(t0, 'a', &labels);
        // Neither "ax" nor "x" match; the extended buffer survives so a
        // later keystroke could still narrow against it.
        assert_eq!(matcher.on_char(t0 + ms(50), 'x', &labels), None);
        assert_eq!(matcher.buffer(), "ax");
    }

    #[test]
    fn reset_clears_state() {
        let mut matcher = TypeaheadMatcher::new();
        let labels = fruit_labels();

        matcher.on_char(Instant::now(), 'a', &labels);
        matcher.reset();
        assert_eq!(matcher.buffer(), "");
    }
}
