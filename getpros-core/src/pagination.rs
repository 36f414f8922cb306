//! Page arithmetic and the compressed page-link sequence used by listing grids.
//!
//! Pages are 1-indexed everywhere in this module. Nothing here panics on bad
//! input: out-of-range pages are clamped and a zero page size is treated as one.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Number of neighbours shown on each side of the current page
pub const DEFAULT_DELTA: usize = 2;

/// A request for one page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
    /// Total count known upstream (server-side pagination). When absent the
    /// total is the length of the materialized list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<usize>,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            total_items: None,
        }
    }

    pub fn with_total(mut self, total_items: usize) -> Self {
        self.total_items = Some(total_items);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    /// Zero-based offset of the first item on this page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Total used for page counting, falling back to what is loaded locally
    pub fn total_for(&self, loaded: usize) -> usize {
        self.total_items.unwrap_or(loaded)
    }
}

/// One entry of a rendered page-link row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

impl fmt::Display for PageLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLink::Page(page) => write!(f, "{}", page),
            PageLink::Ellipsis => write!(f, "…"),
        }
    }
}

/// `ceil(total_items / page_size)`, never less than one
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if total_items == 0 {
        1
    } else {
        total_items.div_ceil(page_size.max(1))
    }
}

/// Clamp `page` into `[1, total_pages]`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Build the page-link row for `current_page` out of `total_pages`.
///
/// The first and last page are always present, together with every page within
/// `delta` of the current one. A gap of exactly one page is filled with that page;
/// wider gaps collapse into a single [`PageLink::Ellipsis`]. An empty row is
/// returned when there is nothing to paginate.
///
/// `current_page` is not clamped here; callers pass an in-range page.
pub fn compute_page_numbers(current_page: usize, total_pages: usize, delta: usize) -> Vec<PageLink> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let low = current_page.saturating_sub(delta).max(1);
    let high = current_page.saturating_add(delta).min(total_pages);

    let selected: BTreeSet<usize> = std::iter::once(1)
        .chain(low..=high)
        .chain(std::iter::once(total_pages))
        .collect();

    let mut links = Vec::with_capacity(selected.len() + 2);
    links.push(PageLink::Page(1));
    for (a, b) in selected.iter().copied().tuple_windows() {
        match b - a {
            1 => {}
            2 => links.push(PageLink::Page(a + 1)),
            _ => links.push(PageLink::Ellipsis),
        }
        links.push(PageLink::Page(b));
    }
    links
}

/// The derived projection of a list for one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a, T> {
    pub visible_items: &'a [T],
    pub page_numbers: Vec<PageLink>,
    pub current_page: usize,
    pub total_pages: usize,
}

/// Pagination state over a count of items that may not be held locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedGrid {
    pub current_page: usize,
    pub total_items: usize,
    pub items_per_page: usize,
}

impl PaginatedGrid {
    pub fn new(total_items: usize, items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            total_items,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.items_per_page)
    }

    pub fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    pub fn prev_page(&mut self) -> bool {
        if self.can_go_prev() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        if self.can_go_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Move to `requested`, clamped into range. Returns the page actually selected.
    pub fn go_to_page(&mut self, requested: usize) -> usize {
        let page = clamp_page(requested, self.total_pages());
        if page != requested {
            log::debug!(
                "Clamped page request {} to {} (of {})",
                requested,
                page,
                self.total_pages()
            );
        }
        self.current_page = page;
        page
    }

    /// Replace the item count, keeping the current page in range
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current_page = clamp_page(self.current_page, self.total_pages());
    }

    /// Half-open index range of the current page, bounded by the item count
    pub fn get_current_page_range(&self) -> (usize, usize) {
        let start = self
            .current_page
            .saturating_sub(1)
            .saturating_mul(self.items_per_page)
            .min(self.total_items);
        let end = start.saturating_add(self.items_per_page).min(self.total_items);
        (start, end)
    }

    pub fn page_numbers(&self, delta: usize) -> Vec<PageLink> {
        compute_page_numbers(self.current_page, self.total_pages(), delta)
    }
}

/// Pagination over a list held in memory
#[derive(Debug, Clone)]
pub struct PaginatedView<T> {
    items: Vec<T>,
    grid: PaginatedGrid,
}

impl<T> PaginatedView<T> {
    pub fn new(items: Vec<T>, items_per_page: usize) -> Self {
        let grid = PaginatedGrid::new(items.len(), items_per_page);
        Self { items, grid }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn current_page(&self) -> usize {
        self.grid.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.grid.total_pages()
    }

    pub fn can_go_prev(&self) -> bool {
        self.grid.can_go_prev()
    }

    pub fn can_go_next(&self) -> bool {
        self.grid.can_go_next()
    }

    pub fn prev_page(&mut self) -> bool {
        self.grid.prev_page()
    }

    pub fn next_page(&mut self) -> bool {
        self.grid.next_page()
    }

    pub fn go_to_page(&mut self, requested: usize) -> usize {
        self.grid.go_to_page(requested)
    }

    /// Swap in a new list; the page is kept when still valid
    pub fn set_items(&mut self, items: Vec<T>) {
        self.grid.set_total_items(items.len());
        self.items = items;
    }

    pub fn get_current_page_items(&self) -> &[T] {
        let (start, end) = self.grid.get_current_page_range();
        &self.items[start..end]
    }

    pub fn get_current_page_range(&self) -> (usize, usize) {
        self.grid.get_current_page_range()
    }

    pub fn view(&self, delta: usize) -> PageView<'_, T> {
        PageView {
            visible_items: self.get_current_page_items(),
            page_numbers: self.grid.page_numbers(delta),
            current_page: self.grid.current_page,
            total_pages: self.grid.total_pages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PageLink::{Ellipsis, Page};

    fn pages(numbers: &[usize]) -> Vec<PageLink> {
        numbers.iter().map(|&n| Page(n)).collect()
    }

    #[test]
    fn single_page_has_no_links() {
        assert!(compute_page_numbers(1, 1, DEFAULT_DELTA).is_empty());
        assert!(compute_page_numbers(1, 0, DEFAULT_DELTA).is_empty());
    }

    #[test]
    fn small_range_is_listed_in_full() {
        assert_eq!(compute_page_numbers(1, 5, 2), pages(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn single_page_gap_is_filled() {
        assert_eq!(
            compute_page_numbers(5, 10, 2),
            vec![
                Page(1),
                Page(2),
                Page(3),
                Page(4),
                Page(5),
                Page(6),
                Page(7),
                Ellipsis,
                Page(10)
            ]
        );
    }

    #[test]
    fn wide_gaps_collapse_on_both_sides() {
        assert_eq!(
            compute_page_numbers(6, 12, 2),
            vec![
                Page(1),
                Ellipsis,
                Page(4),
                Page(5),
                Page(6),
                Page(7),
                Page(8),
                Ellipsis,
                Page(12)
            ]
        );
    }

    #[test]
    fn last_page_window() {
        assert_eq!(
            compute_page_numbers(20, 20, 2),
            vec![Page(1), Ellipsis, Page(18), Page(19), Page(20)]
        );
    }

    #[test]
    fn every_in_range_page_produces_a_well_formed_row() {
        for total in 2..=30 {
            for current in 1..=total {
                let links = compute_page_numbers(current, total, DEFAULT_DELTA);
                let numbers: Vec<usize> = links
                    .iter()
                    .filter_map(|link| match link {
                        Page(n) => Some(*n),
                        Ellipsis => None,
                    })
                    .collect();

                assert_eq!(numbers.first(), Some(&1));
                assert_eq!(numbers.last(), Some(&total));
                assert!(numbers.contains(&current));
                assert!(numbers.windows(2).all(|w| w[0] < w[1]), "{:?}", links);
                // never two ellipses in a row
                assert!(!links.windows(2).any(|w| w == [Ellipsis, Ellipsis]));
            }
        }
    }

    #[test]
    fn out_of_range_current_page_does_not_panic() {
        let links = compute_page_numbers(50, 10, 2);
        assert_eq!(links.first(), Some(&Page(1)));
        assert_eq!(links.last(), Some(&Page(10)));
        assert_eq!(
            compute_page_numbers(0, 10, 2),
            vec![Page(1), Page(2), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn total_pages_rounds_up_with_minimum_one() {
        assert_eq!(total_pages(0, 8), 1);
        assert_eq!(total_pages(8, 8), 1);
        assert_eq!(total_pages(25, 8), 4);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn page_request_offsets() {
        let request = PageRequest::new(3, 8);
        assert_eq!(request.offset(), 16);
        assert_eq!(request.total_for(8), 8);
        assert_eq!(request.with_total(120).total_for(8), 120);
        assert_eq!(PageRequest::new(0, 0), PageRequest::new(1, 1));
    }

    #[test]
    fn go_to_page_clamps() {
        let mut grid = PaginatedGrid::new(25, 8);
        assert_eq!(grid.go_to_page(0), 1);
        assert_eq!(grid.go_to_page(9), 4);
        assert_eq!(grid.current_page, 4);
        assert_eq!(grid.get_current_page_range(), (24, 25));
    }

    #[test]
    fn grid_navigation() {
        let mut grid = PaginatedGrid::new(20, 10);
        assert!(!grid.prev_page());
        assert!(grid.next_page());
        assert!(!grid.next_page());
        assert_eq!(grid.current_page, 2);
        assert!(grid.prev_page());
        assert_eq!(grid.current_page, 1);
    }

    #[test]
    fn shrinking_total_pulls_page_back_in_range() {
        let mut grid = PaginatedGrid::new(100, 10);
        grid.go_to_page(10);
        grid.set_total_items(15);
        assert_eq!(grid.current_page, 2);
        grid.set_total_items(0);
        assert_eq!(grid.current_page, 1);
        assert_eq!(grid.get_current_page_range(), (0, 0));
    }

    #[test]
    fn paginated_view_slices_current_page() {
        let items: Vec<u32> = (0..25).collect();
        let mut view = PaginatedView::new(items, 8);
        view.go_to_page(3);
        assert_eq!(view.get_current_page_items(), &(16..24).collect::<Vec<u32>>()[..]);

        let page = view.view(DEFAULT_DELTA);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.page_numbers, pages(&[1, 2, 3, 4]));

        view.next_page();
        assert_eq!(view.get_current_page_items(), &[24]);
    }

    #[test]
    fn paginated_view_handles_empty_list() {
        let view: PaginatedView<u32> = PaginatedView::new(Vec::new(), 8);
        assert_eq!(view.total_pages(), 1);
        assert!(view.get_current_page_items().is_empty());
        assert!(view.view(DEFAULT_DELTA).page_numbers.is_empty());
    }

    #[test]
    fn set_items_keeps_valid_page() {
        let mut view = PaginatedView::new((0..30).collect::<Vec<u32>>(), 10);
        view.go_to_page(2);
        view.set_items((0..25).collect());
        assert_eq!(view.current_page(), 2);
        view.set_items((0..5).collect());
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn links_display() {
        let rendered = compute_page_numbers(6, 12, 2)
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rendered, "1 … 4 5 6 7 8 … 12");
    }
}
