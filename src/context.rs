use std::ops::Range;

use crate::config::ContextConfig;

/// Rolling dialogue window over the segments preceding the one being translated.
///
/// Only the number of lines is bounded; the text of each line is passed through whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    enabled: bool,
    history: usize,
}

impl ContextWindow {
    pub fn new(enabled: bool, history: usize) -> Self {
        Self { enabled, history }
    }

    pub fn disabled() -> Self {
        Self::new(false, 0)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn history(&self) -> usize {
        self.history
    }

    /// Indices `[max(0, index - history), index)`, or `None` when there is nothing to show.
    pub fn range(&self, index: usize) -> Option<Range<usize>> {
        if !self.enabled || index == 0 || self.history == 0 {
            return None;
        }

        Some(index.saturating_sub(self.history)..index)
    }

    /// Slice of `items` forming the context for `items[index]`.
    pub fn select<'a, T>(&self, items: &'a [T], index: usize) -> Option<&'a [T]> {
        let range = self.range(index)?;
        let end = range.end.min(items.len());
        let start = range.start.min(end);

        let window = &items[start..end];
        if window.is_empty() { None } else { Some(window) }
    }
}

impl From<ContextConfig> for ContextWindow {
    fn from(config: ContextConfig) -> Self {
        Self::new(config.enabled, config.history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINES: [&str; 5] = ["zero", "one", "two", "three", "four"];

    #[test]
    fn test_first_segment_has_no_context() {
        assert_eq!(ContextWindow::new(true, 10).select(&LINES, 0), None);
    }

    #[test]
    fn test_disabled_window_is_always_absent() {
        let window = ContextWindow::disabled();
        for i in 0..LINES.len() {
            assert_eq!(window.select(&LINES, i), None);
        }
    }

    #[test]
    fn test_history_bounds_line_count() {
        let window = ContextWindow::new(true, 2);
        assert_eq!(window.select(&LINES, 3), Some(&LINES[1..3]));
        assert_eq!(window.select(&LINES, 1), Some(&LINES[0..1]));
    }

    #[test]
    fn test_window_length_is_min_of_index_and_history() {
        for history in 1..7 {
            let window = ContextWindow::new(true, history);
            for i in 1..LINES.len() {
                let selected = window.select(&LINES, i).unwrap();
                assert_eq!(selected.len(), i.min(history));
                assert_eq!(selected.last(), Some(&LINES[i - 1]));
            }
        }
    }

    #[test]
    fn test_zero_history_is_absent() {
        assert_eq!(ContextWindow::new(true, 0).select(&LINES, 3), None);
    }

    #[test]
    fn test_index_past_end_is_clamped() {
        let window = ContextWindow::new(true, 2);
        assert_eq!(window.select(&LINES[..2], 4), None);
        assert_eq!(window.range(4), Some(2..4));
    }
}
