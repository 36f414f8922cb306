//! Listing grid adapter.
//!
//! A [`GridAdapter`] decides which part of a list is on screen and which controls
//! go under it. Lists are either paginated in memory ([`PaginationMode::Client`])
//! or one page at a time by whoever owns the data ([`PaginationMode::Server`]).
//! A locked preview always shows the leading window and swaps the page links for
//! a single "view all" link.
//!
//! Presentation side effects are returned as [`GridEvent`]s instead of being
//! performed here.

use crate::pagination::{self, DEFAULT_DELTA, PageLink, PageRequest, PaginatedGrid};
use std::fmt;

/// Receives page requests when a server-paginated grid changes page
pub trait PageFetcher {
    fn fetch_page(&mut self, request: PageRequest);
}

impl<F> PageFetcher for F
where
    F: FnMut(PageRequest),
{
    fn fetch_page(&mut self, request: PageRequest) {
        self(request)
    }
}

/// Where paging happens
pub enum PaginationMode {
    /// The whole list is in memory; only the window moves
    Client { local_page: usize },
    /// Only the current page is held; page changes go to the fetcher
    Server { fetcher: Box<dyn PageFetcher> },
}

impl fmt::Debug for PaginationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaginationMode::Client { local_page } => f
                .debug_struct("Client")
                .field("local_page", local_page)
                .finish(),
            PaginationMode::Server { .. } => f.debug_struct("Server").finish_non_exhaustive(),
        }
    }
}

/// Link shown instead of page controls when a grid is a locked preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewAll {
    pub label: String,
    pub href: String,
}

impl ViewAll {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Intents produced by a page change, handled by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    PageChanged(usize),
    ScrollToTop,
}

/// Everything needed to draw a page-link row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    pub links: Vec<PageLink>,
    pub current_page: usize,
    pub total_pages: usize,
    /// 1-based position of the first item on the page
    pub first_item: usize,
    pub last_item: usize,
    pub total_items: usize,
}

impl PageControls {
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn summary(&self) -> String {
        format!(
            "Showing {}-{} of {}",
            self.first_item, self.last_item, self.total_items
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Controls {
    None,
    Pages(PageControls),
    ViewAll(ViewAll),
}

/// The visible part of a list plus its controls
#[derive(Debug, Clone, PartialEq)]
pub struct GridView<'a, T> {
    pub items: &'a [T],
    pub controls: Controls,
}

#[derive(Debug)]
pub struct GridAdapter {
    mode: PaginationMode,
    config: PageRequest,
    preview: Option<ViewAll>,
    delta: usize,
}

impl GridAdapter {
    /// Grid paginating an in-memory list
    pub fn client(page_size: usize) -> Self {
        Self {
            mode: PaginationMode::Client { local_page: 1 },
            config: PageRequest::new(1, page_size),
            preview: None,
            delta: DEFAULT_DELTA,
        }
    }

    /// Grid showing one fetched page at a time. `config` describes the page the
    /// caller currently holds, including the upstream total when known.
    pub fn server<F>(config: PageRequest, fetcher: F) -> Self
    where
        F: PageFetcher + 'static,
    {
        Self {
            mode: PaginationMode::Server {
                fetcher: Box::new(fetcher),
            },
            config,
            preview: None,
            delta: DEFAULT_DELTA,
        }
    }

    /// Turn the grid into a locked preview of its first page
    pub fn locked(mut self, view_all: ViewAll) -> Self {
        self.preview = Some(view_all);
        self
    }

    pub fn with_delta(mut self, delta: usize) -> Self {
        self.delta = delta;
        self
    }

    pub fn is_locked(&self) -> bool {
        self.preview.is_some()
    }

    pub fn is_server_side(&self) -> bool {
        matches!(self.mode, PaginationMode::Server { .. })
    }

    pub fn mode(&self) -> &PaginationMode {
        &self.mode
    }

    pub fn config(&self) -> PageRequest {
        self.config
    }

    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    /// Store the description of a freshly fetched page (new total, new page)
    pub fn set_config(&mut self, config: PageRequest) {
        self.config = config;
    }

    /// Page the grid believes it is on, before clamping against the list
    pub fn current_page(&self) -> usize {
        match &self.mode {
            PaginationMode::Client { local_page } => *local_page,
            PaginationMode::Server { .. } => self.config.page,
        }
    }

    pub fn total_items<T>(&self, items: &[T]) -> usize {
        self.config.total_for(items.len())
    }

    pub fn total_pages<T>(&self, items: &[T]) -> usize {
        pagination::total_pages(self.total_items(items), self.config.page_size)
    }

    /// Pagination state for `items`, with the current page clamped into range
    fn page_grid<T>(&self, items: &[T]) -> PaginatedGrid {
        let mut grid = PaginatedGrid::new(self.total_items(items), self.config.page_size);
        grid.go_to_page(self.current_page());
        grid
    }

    fn effective_page<T>(&self, items: &[T]) -> usize {
        self.page_grid(items).current_page
    }

    /// The items to draw for the current state
    pub fn visible_slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let page_size = self.config.page_size;
        if self.preview.is_some() {
            return &items[..page_size.min(items.len())];
        }

        match &self.mode {
            PaginationMode::Server { .. } => items,
            PaginationMode::Client { .. } => {
                let (start, end) = self.page_grid(items).get_current_page_range();
                let end = end.min(items.len());
                &items[start.min(end)..end]
            }
        }
    }

    /// Move to `new_page` (clamped). Requests for the page already shown still
    /// notify and, server side, refetch. Locked previews produce no events.
    pub fn on_page_change<T>(&mut self, items: &[T], new_page: usize) -> Vec<GridEvent> {
        if self.preview.is_some() {
            log::debug!("Ignoring page change to {} on a locked preview", new_page);
            return Vec::new();
        }

        let page = pagination::clamp_page(new_page, self.total_pages(items));

        match &mut self.mode {
            PaginationMode::Client { local_page } => {
                log::debug!("Client-side page change {} -> {}", local_page, page);
                *local_page = page;
            }
            PaginationMode::Server { fetcher } => {
                log::debug!("Requesting server page {} of size {}", page, self.config.page_size);
                self.config.page = page;
                fetcher.fetch_page(self.config);
            }
        }

        vec![GridEvent::PageChanged(page), GridEvent::ScrollToTop]
    }

    pub fn next_page<T>(&mut self, items: &[T]) -> Vec<GridEvent> {
        let next = self.effective_page(items).saturating_add(1);
        self.on_page_change(items, next)
    }

    pub fn prev_page<T>(&mut self, items: &[T]) -> Vec<GridEvent> {
        let prev = self.effective_page(items).saturating_sub(1);
        self.on_page_change(items, prev)
    }

    /// Back to the first page after the underlying list changed (e.g. a new
    /// filter). Server grids always refetch since the data itself changed.
    pub fn reset_page(&mut self) {
        match &mut self.mode {
            PaginationMode::Client { local_page } => *local_page = 1,
            PaginationMode::Server { fetcher } => {
                self.config.page = 1;
                self.config.total_items = None;
                fetcher.fetch_page(self.config);
            }
        }
    }

    pub fn view<'a, T>(&self, items: &'a [T]) -> GridView<'a, T> {
        let visible = self.visible_slice(items);

        let controls = if let Some(view_all) = &self.preview {
            Controls::ViewAll(view_all.clone())
        } else {
            let grid = self.page_grid(items);
            if grid.total_pages() <= 1 {
                Controls::None
            } else {
                let (start, end) = grid.get_current_page_range();
                Controls::Pages(PageControls {
                    links: grid.page_numbers(self.delta),
                    current_page: grid.current_page,
                    total_pages: grid.total_pages(),
                    first_item: start + 1,
                    last_item: end,
                    total_items: grid.total_items,
                })
            }
        };

        GridView {
            items: visible,
            controls,
        }
    }
}
