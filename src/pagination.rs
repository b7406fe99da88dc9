//! Start/end list windows
//!
//! List operations page with a half-open `start..end` range over the
//! backend's ordering. Windows past the available items are clamped, never
//! rejected.

use crate::arguments::ArgumentBag;

/// A half-open `start..end` window over an ordered listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListWindow {
    start: i32,
    end: i32,
}

impl ListWindow {
    pub const START: &'static str = "start";
    pub const END: &'static str = "end";

    /// Normalize a requested window: negative bounds become zero and an `end`
    /// before `start` collapses to an empty window at `start`.
    pub fn new(start: i32, end: i32) -> Self {
        let start = start.max(0);
        let end = end.max(start);
        Self { start, end }
    }

    /// Read `start`/`end`, defaulting to `0` and `page_size`
    pub fn from_arguments(args: &ArgumentBag, page_size: i32) -> Self {
        Self::new(args.get_or(Self::START, 0), args.get_or(Self::END, page_size))
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of positions the window spans
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Trim a backend page to the window's size
    pub fn clamp<T>(&self, mut items: Vec<T>) -> Vec<T> {
        items.truncate(self.len());
        items
    }

    /// Slice an in-memory, fully ordered listing
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = (self.start as usize).min(items.len());
        let end = (self.end as usize).min(items.len());
        &items[start..end]
    }
}

impl Default for ListWindow {
    fn default() -> Self {
        Self::new(0, crate::config::DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: i32) -> Vec<i32> {
        (0..n).collect()
    }

    #[test]
    fn test_default_window_is_first_ten() {
        let window = ListWindow::from_arguments(&ArgumentBag::new(), 10);
        assert_eq!(window, ListWindow::new(0, 10));
        assert_eq!(window, ListWindow::default());
        assert_eq!(window.slice(&items(20)), &items(10)[..]);
    }

    #[test]
    fn test_degenerate_window_is_empty() {
        let window = ListWindow::new(3, 3);
        assert!(window.is_empty());
        assert!(window.slice(&items(20)).is_empty());
    }

    #[test]
    fn test_window_past_end_is_clamped() {
        let all = items(20);
        assert_eq!(ListWindow::new(0, 100).slice(&all).len(), 20);
        assert_eq!(ListWindow::new(15, 100).slice(&all), &[15, 16, 17, 18, 19]);
        assert!(ListWindow::new(40, 50).slice(&all).is_empty());
    }

    #[test]
    fn test_slice_length_property() {
        let all = items(20);
        for start in 0..25 {
            for end in start..30 {
                let window = ListWindow::new(start, end);
                let slice = window.slice(&all);
                let expected = (end - start).min((20 - start).max(0)) as usize;
                assert_eq!(slice.len(), expected, "window {start}..{end}");
                if let Some(first) = slice.first() {
                    assert_eq!(*first, start);
                }
            }
        }
    }

    #[test]
    fn test_inverted_and_negative_bounds() {
        assert_eq!(ListWindow::new(5, 2), ListWindow::new(5, 5));
        assert_eq!(ListWindow::new(-4, 3), ListWindow::new(0, 3));
    }

    #[test]
    fn test_inverted_window_slices_nothing() {
        let window = ListWindow::new(5, 2);
        assert_eq!((window.start(), window.end()), (5, 5));
        assert_eq!(window.len(), 0);
        assert!(window.slice(&items(7)).is_empty());
    }

    #[test]
    fn test_clamp_trims_oversized_page() {
        let window = ListWindow::new(0, 2);
        assert_eq!(window.clamp(vec!["a", "b", "c"]), vec!["a", "b"]);
    }
}
