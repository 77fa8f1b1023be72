//! Pure projection of a cached collection into what a list view shows.
//!
//! Deliberately not cached: collections here are tens to low hundreds of
//! entities, so recomputing the slice on every call is cheaper than any
//! staleness risk. Callable from tests without mounting any UI.

use std::cmp::Ordering;

/// Trait for entities that can be matched against a search term.
///
/// Each type chooses which of its fields take part; matching is
/// case-insensitive substring over any of them.
pub trait Searchable {
  fn search_fields(&self) -> Vec<&str>;
}

pub type FilterFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;
pub type SortFn<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// What a list view wants to see of a collection.
pub struct ViewQuery<T> {
  search: Option<String>,
  filter: Option<FilterFn<T>>,
  sort: Option<SortFn<T>>,
  page: usize,
  page_size: usize,
}

impl<T> ViewQuery<T> {
  pub fn new() -> Self {
    Self {
      search: None,
      filter: None,
      sort: None,
      page: 1,
      page_size: DEFAULT_PAGE_SIZE,
    }
  }

  /// Keep only items whose search fields contain `term` (case-insensitive).
  pub fn with_search(mut self, term: impl Into<String>) -> Self {
    self.search = Some(term.into());
    self
  }

  /// Keep only items matching the predicate.
  pub fn with_filter(mut self, filter: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
    self.filter = Some(Box::new(filter));
    self
  }

  /// Order items with the comparator. Equal keys preserve their prior
  /// relative order.
  pub fn with_sort(mut self, sort: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
    self.sort = Some(Box::new(sort));
    self
  }

  /// Select a 1-indexed page.
  pub fn with_page(mut self, page: usize) -> Self {
    self.page = page;
    self
  }

  pub fn with_page_size(mut self, page_size: usize) -> Self {
    self.page_size = page_size;
    self
  }
}

impl<T> Default for ViewQuery<T> {
  fn default() -> Self {
    Self::new()
  }
}

/// One page of a projected collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
  pub items: Vec<T>,
  /// The page actually shown; clamped when the requested page fell beyond
  /// the end after the collection shrank
  pub page: usize,
  pub total_pages: usize,
  pub total_items: usize,
}

/// Project a collection into the page a list view shows.
///
/// Filtering and search run first, then the stable sort, then pagination.
/// `total_pages` is at least 1; a requested page beyond it clamps to the
/// last valid page rather than showing empty content.
pub fn project<T: Clone + Searchable>(items: &[T], query: &ViewQuery<T>) -> Page<T> {
  let needle = query
    .search
    .as_ref()
    .map(|term| term.to_lowercase())
    .filter(|term| !term.is_empty());

  let mut selected: Vec<&T> = items
    .iter()
    .filter(|item| match &needle {
      Some(needle) => item
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle)),
      None => true,
    })
    .filter(|item| match &query.filter {
      Some(filter) => filter(item),
      None => true,
    })
    .collect();

  if let Some(sort) = &query.sort {
    selected.sort_by(|a, b| sort(a, b));
  }

  let page_size = query.page_size.max(1);
  let total_items = selected.len();
  let total_pages = total_items.div_ceil(page_size).max(1);
  let page = query.page.clamp(1, total_pages);

  let items = selected
    .into_iter()
    .skip((page - 1) * page_size)
    .take(page_size)
    .cloned()
    .collect();

  Page {
    items,
    page,
    total_pages,
    total_items,
  }
}
