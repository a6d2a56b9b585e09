//! Page windowing and navigation for the grid.
//!
//! `compute_window` is a pure function of its inputs; `Paginator` owns the display offset
//! and turns navigation actions into "redraw needed" answers.

use tracing::debug;

/// Number of page controls shown at once.
pub const DEFAULT_WINDOW_SIZE: usize = 5;

/// Rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 50;

/// The page-number controls currently shown, plus the state of the previous/next controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationWindow {
    /// 1-based page numbers, ascending.
    pub pages: Vec<usize>,
    /// 1-based number of the current page; 0 when there are no pages.
    pub current: usize,
    pub previous_disabled: bool,
    pub next_disabled: bool,
}

impl PaginationWindow {
    pub fn contains(&self, page_number: usize) -> bool {
        self.pages.contains(&page_number)
    }

    pub fn is_current(&self, page_number: usize) -> bool {
        page_number == self.current
    }
}

/// Compute the window of page controls.
///
/// `current_page` is 0-based, the returned page numbers are 1-based.
///
/// # Panics
/// When `window_size` is zero, or `current_page` is out of `[0, total_pages)` while
/// `total_pages > 0`. Both are caller bugs, not runtime conditions.
pub fn compute_window(current_page: usize, total_pages: usize, window_size: usize) -> PaginationWindow {
    assert!(window_size >= 1, "window_size must be at least 1");
    assert!(
        total_pages == 0 || current_page < total_pages,
        "current_page {} out of range for {} pages",
        current_page,
        total_pages
    );

    let half = window_size / 2;
    let (start, end) = if total_pages <= window_size {
        (1, total_pages)
    } else if current_page <= half {
        (1, window_size)
    } else if current_page >= total_pages - half {
        (total_pages - window_size + 1, total_pages)
    } else {
        let start = current_page - half + 1;
        (start, start + window_size - 1)
    };

    PaginationWindow {
        pages: (start..=end).collect(),
        current: if total_pages == 0 { 0 } else { current_page + 1 },
        previous_disabled: current_page == 0,
        next_disabled: total_pages == 0 || current_page == total_pages - 1,
    }
}

/// Display offset over a result set of known size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    /// Index of the first displayed row.
    pub display_start: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub window_size: usize,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_WINDOW_SIZE)
    }
}

impl Paginator {
    /// # Panics
    /// When `page_size` or `window_size` is zero.
    pub fn new(page_size: usize, window_size: usize) -> Self {
        assert!(page_size >= 1, "page_size must be at least 1");
        assert!(window_size >= 1, "window_size must be at least 1");
        Self {
            display_start: 0,
            page_size,
            total_rows: 0,
            window_size,
        }
    }

    /// 0-based index of the current page.
    pub fn current_page(&self) -> usize {
        self.display_start.div_ceil(self.page_size)
    }

    pub fn total_pages(&self) -> usize {
        self.total_rows.div_ceil(self.page_size)
    }

    /// Index one past the last displayed row.
    pub fn display_end(&self) -> usize {
        (self.display_start + self.page_size).min(self.total_rows)
    }

    pub fn window(&self) -> PaginationWindow {
        compute_window(self.current_page(), self.total_pages(), self.window_size)
    }

    /// Record a new total row count, clamping the offset back onto the last page if the
    /// result set shrank.
    pub fn set_total_rows(&mut self, total_rows: usize) {
        self.total_rows = total_rows;
        let pages = self.total_pages();
        if pages == 0 {
            self.display_start = 0;
        } else if self.current_page() >= pages {
            self.display_start = (pages - 1) * self.page_size;
        }
    }

    /// Jump to a 0-based page. Returns true when the grid must be redrawn.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let pages = self.total_pages();
        if page >= pages.max(1) {
            return false;
        }
        let start = page * self.page_size;
        debug!(target: "pagination", page, start, "go to page");
        self.display_start = start;
        true
    }

    /// Activate the `slot`-th visible page control (0-based within the window).
    pub fn select_control(&mut self, slot: usize) -> bool {
        match self.window().pages.get(slot) {
            Some(&page_number) => self.go_to_page(page_number - 1),
            None => false,
        }
    }

    /// Step back one page's worth of rows; no-op when previous is disabled.
    pub fn previous(&mut self) -> bool {
        if self.window().previous_disabled {
            return false;
        }
        self.display_start = self.display_start.saturating_sub(self.page_size);
        true
    }

    /// Step forward one page's worth of rows; no-op when next is disabled.
    pub fn next(&mut self) -> bool {
        if self.window().next_disabled {
            return false;
        }
        self.display_start += self.page_size;
        true
    }

    pub fn first(&mut self) -> bool {
        if self.window().previous_disabled {
            return false;
        }
        self.go_to_page(0)
    }

    pub fn last(&mut self) -> bool {
        if self.window().next_disabled {
            return false;
        }
        self.go_to_page(self.total_pages() - 1)
    }

    /// "Showing 1 to 50 of 123 entries", as the info line under the grid.
    pub fn summary(&self) -> String {
        if self.total_rows == 0 {
            return "Showing 0 to 0 of 0 entries".to_string();
        }
        format!(
            "Showing {} to {} of {} entries",
            self.display_start + 1,
            self.display_end(),
            self.total_rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_result_shows_all_pages() {
        let w = compute_window(0, 3, 5);
        assert_eq!(w.pages, vec![1, 2, 3]);
        assert!(w.previous_disabled);
        assert!(!w.next_disabled);

        let w = compute_window(2, 3, 5);
        assert_eq!(w.pages, vec![1, 2, 3]);
        assert!(!w.previous_disabled);
        assert!(w.next_disabled);
    }

    #[test]
    fn test_window_centers_on_current_page() {
        let w = compute_window(10, 20, 5);
        assert_eq!(w.pages, vec![9, 10, 11, 12, 13]);
        assert_eq!(w.current, 11);
        assert!(!w.previous_disabled);
        assert!(!w.next_disabled);
    }

    #[test]
    fn test_window_leaves_edges_one_page_past_half() {
        assert_eq!(compute_window(3, 20, 5).pages, vec![2, 3, 4, 5, 6]);
        assert_eq!(compute_window(17, 20, 5).pages, vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_window_clamps_at_edges() {
        assert_eq!(compute_window(0, 20, 5).pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(compute_window(2, 20, 5).pages, vec![1, 2, 3, 4, 5]);
        assert_eq!(compute_window(18, 20, 5).pages, vec![16, 17, 18, 19, 20]);
        assert_eq!(compute_window(19, 20, 5).pages, vec![16, 17, 18, 19, 20]);
    }

    #[test]
    fn test_empty_result_disables_navigation() {
        let w = compute_window(0, 0, 5);
        assert!(w.pages.is_empty());
        assert_eq!(w.current, 0);
        assert!(w.previous_disabled);
        assert!(w.next_disabled);
    }

    #[test]
    fn test_window_properties_hold_for_all_inputs() {
        for window_size in 1..=7 {
            for total_pages in 0..=30 {
                for current_page in 0..total_pages.max(1) {
                    if total_pages == 0 && current_page > 0 {
                        continue;
                    }
                    let w = compute_window(current_page, total_pages, window_size);
                    assert_eq!(w.pages.len(), total_pages.min(window_size));
                    assert!(w.pages.iter().all(|&p| p >= 1 && p <= total_pages));
                    assert!(w.pages.windows(2).all(|pair| pair[1] == pair[0] + 1));
                    if total_pages > 0 {
                        assert!(w.contains(current_page + 1));
                    }
                    assert_eq!(w, compute_window(current_page, total_pages, window_size));
                }
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_page_panics() {
        compute_window(3, 3, 5);
    }

    #[test]
    #[should_panic]
    fn test_zero_window_panics() {
        compute_window(0, 3, 0);
    }

    #[test]
    fn test_single_short_page() {
        let mut p = Paginator::new(50, 5);
        p.set_total_rows(47);
        let w = p.window();
        assert_eq!(p.total_pages(), 1);
        assert_eq!(w.pages, vec![1]);
        assert!(w.previous_disabled);
        assert!(w.next_disabled);
        assert!(!p.next());
        assert!(!p.previous());
        assert_eq!(p.display_start, 0);
        assert_eq!(p.summary(), "Showing 1 to 47 of 47 entries");
    }

    #[test]
    fn test_next_and_previous_move_by_page_size() {
        let mut p = Paginator::new(10, 5);
        p.set_total_rows(35);
        assert!(p.next());
        assert_eq!(p.display_start, 10);
        assert!(p.next());
        assert!(p.next());
        assert_eq!(p.current_page(), 3);
        assert!(!p.next());
        assert_eq!(p.display_end(), 35);
        assert!(p.previous());
        assert_eq!(p.display_start, 20);
    }

    #[test]
    fn test_select_control_uses_window_slot() {
        let mut p = Paginator::new(10, 5);
        p.set_total_rows(200);
        assert!(p.go_to_page(10));
        // window is [9..=13]; slot 4 is page 13 (0-based 12)
        assert!(p.select_control(4));
        assert_eq!(p.current_page(), 12);
        assert!(!p.select_control(5));
    }

    #[test]
    fn test_first_and_last() {
        let mut p = Paginator::new(10, 5);
        p.set_total_rows(95);
        assert!(!p.first());
        assert!(p.last());
        assert_eq!(p.current_page(), 9);
        assert!(!p.last());
        assert!(p.first());
        assert_eq!(p.display_start, 0);
    }

    #[test]
    fn test_shrinking_total_clamps_offset() {
        let mut p = Paginator::new(10, 5);
        p.set_total_rows(100);
        p.go_to_page(9);
        p.set_total_rows(25);
        assert_eq!(p.current_page(), 2);
        p.set_total_rows(0);
        assert_eq!(p.display_start, 0);
    }
}
